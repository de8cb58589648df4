//! Round state machine
//!
//! Idle -> Countdown -> Racing -> (Crashed | Finished) -> Idle
//!
//! The countdown (3..2..1..GO) and the terminal banner are timed on the same
//! `dt` stream as the race itself, so a host only ever calls [`Game::tick`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::clock::sanitize_dt;
use super::collision::Rect;
use super::state::{Enemy, GameEvent, GamePhase, RoundState};
use super::tick::{InputIntent, Race, RoundOutcome, step};
use crate::{Tuning, TuningError};

#[derive(Debug, Error)]
pub enum RoundError {
    #[error("cannot {action} while {phase:?}")]
    InvalidTransition {
        action: &'static str,
        phase: GamePhase,
    },
    #[error(transparent)]
    Tuning(#[from] TuningError),
}

/// What the countdown overlay should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountdownDisplay {
    Number(u32),
    Go,
}

/// Internal phase with its timers
#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    Idle,
    /// Showing `remaining`, `elapsed` ms into the current number
    Counting { remaining: u32, elapsed: f32 },
    /// Showing GO for `held` ms
    Go { held: f32 },
    Racing,
    /// Terminal banner, `waited` ms so far
    Ended { outcome: RoundOutcome, waited: f32 },
}

/// Result of one tick
#[derive(Debug, Clone)]
pub struct TickResult {
    /// Phase after the tick
    pub phase: GamePhase,
    /// Round counters after the tick
    pub round: RoundState,
    /// Events fired during the tick, in order
    pub events: Vec<GameEvent>,
}

/// Single owner of a game: tuning, race state, and the phase machine
#[derive(Debug, Clone)]
pub struct Game {
    race: Race,
    stage: Stage,
    /// Events raised outside of `tick` (start command), delivered with the next tick
    pending: Vec<GameEvent>,
    last_outcome: Option<RoundOutcome>,
}

impl Game {
    /// Build a game; the tuning is validated up front
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        Ok(Self {
            race: Race::new(tuning, seed)?,
            stage: Stage::Idle,
            pending: Vec::new(),
            last_outcome: None,
        })
    }

    /// Swap in new tuning between rounds
    pub fn set_tuning(&mut self, tuning: Tuning) -> Result<(), RoundError> {
        if self.stage != Stage::Idle {
            return Err(RoundError::InvalidTransition {
                action: "change tuning",
                phase: self.phase(),
            });
        }
        // Keep the RNG stream running across rounds
        let spawner = self.race.spawner.clone();
        let mut race = Race::new(tuning, spawner.seed())?;
        race.spawner = spawner;
        self.race = race;
        Ok(())
    }

    /// Idle -> Countdown; returns the countdown length in ms
    pub fn start_round(&mut self) -> Result<u32, RoundError> {
        if self.stage != Stage::Idle {
            return Err(RoundError::InvalidTransition {
                action: "start a round",
                phase: self.phase(),
            });
        }
        self.race.tuning.validate()?;

        self.race.reset();
        self.last_outcome = None;
        if self.race.tuning.start_grid {
            let Race {
                tuning,
                lanes,
                round,
                store,
                spawner,
            } = &mut self.race;
            spawner.fill_start_grid(round, store, tuning, lanes);
        }

        let steps = self.race.tuning.countdown_steps;
        self.stage = Stage::Counting {
            remaining: steps,
            elapsed: 0.0,
        };
        self.pending
            .push(GameEvent::CountdownStep { remaining: steps });

        let duration = self.race.tuning.countdown_duration_ms();
        log::info!("Round starting, countdown {} ms", duration);
        Ok(duration)
    }

    /// Leave the terminal banner early (user dismissed it)
    pub fn dismiss(&mut self) -> Result<(), RoundError> {
        if !matches!(self.stage, Stage::Ended { .. }) {
            return Err(RoundError::InvalidTransition {
                action: "dismiss the round",
                phase: self.phase(),
            });
        }
        let mut events = std::mem::take(&mut self.pending);
        self.return_to_idle(&mut events);
        self.pending = events;
        Ok(())
    }

    /// Advance by `dt_ms` with the current input intent
    pub fn tick(&mut self, dt_ms: f32, input: &InputIntent) -> TickResult {
        let dt = sanitize_dt(dt_ms, self.race.tuning.max_frame_dt);
        if dt_ms > self.race.tuning.max_frame_dt {
            log::warn!("Clamped frame delta {} ms to {} ms", dt_ms, dt);
        }
        let mut events = std::mem::take(&mut self.pending);

        match self.stage {
            Stage::Idle => {}
            Stage::Counting { remaining, elapsed } => {
                self.advance_countdown(remaining, elapsed + dt, &mut events);
            }
            Stage::Go { held } => {
                let held = held + dt;
                if held >= self.race.tuning.go_hold_ms as f32 {
                    self.launch(&mut events);
                } else {
                    self.stage = Stage::Go { held };
                }
            }
            Stage::Racing => {
                if let Some(outcome) = step(&mut self.race, input, dt, &mut events) {
                    self.finish(outcome, &mut events);
                }
            }
            Stage::Ended { outcome, waited } => {
                let waited = waited + dt;
                if waited >= self.race.tuning.end_delay_ms as f32 {
                    self.return_to_idle(&mut events);
                } else {
                    self.stage = Stage::Ended { outcome, waited };
                }
            }
        }

        TickResult {
            phase: self.phase(),
            round: self.race.round.clone(),
            events,
        }
    }

    fn advance_countdown(&mut self, remaining: u32, elapsed: f32, events: &mut Vec<GameEvent>) {
        let step_ms = self.race.tuning.countdown_step_ms as f32;
        if elapsed < step_ms {
            self.stage = Stage::Counting { remaining, elapsed };
            return;
        }

        let carry = elapsed - step_ms;
        let remaining = remaining.saturating_sub(1);
        if remaining > 0 {
            self.stage = Stage::Counting {
                remaining,
                elapsed: carry,
            };
            events.push(GameEvent::CountdownStep { remaining });
        } else {
            self.stage = Stage::Go { held: carry };
            events.push(GameEvent::CountdownGo);
        }
    }

    /// Countdown -> Racing
    fn launch(&mut self, events: &mut Vec<GameEvent>) {
        for (id, lane) in self.race.store.launch_lineup() {
            events.push(GameEvent::EnemySpawned { id, lane });
        }
        self.stage = Stage::Racing;
        events.push(GameEvent::RaceStarted);
        log::info!("Race started");
    }

    /// Racing -> Crashed | Finished
    fn finish(&mut self, outcome: RoundOutcome, events: &mut Vec<GameEvent>) {
        let score = self.race.round.score;
        self.stage = Stage::Ended {
            outcome,
            waited: 0.0,
        };
        self.last_outcome = Some(outcome);
        events.push(GameEvent::RoundFinished {
            won: outcome.won(),
            score,
        });
        log::info!(
            "Round over ({:?}): score {}, lives {}, {:.1}s left",
            outcome,
            score,
            self.race.round.lives,
            self.race.round.time_left
        );
    }

    /// Crashed | Finished -> Idle
    fn return_to_idle(&mut self, events: &mut Vec<GameEvent>) {
        self.race.reset();
        self.stage = Stage::Idle;
        events.push(GameEvent::ReturnedToIdle);
        log::info!("Back to idle");
    }

    // === Read-only views ===

    pub fn phase(&self) -> GamePhase {
        match self.stage {
            Stage::Idle => GamePhase::Idle,
            Stage::Counting { .. } | Stage::Go { .. } => GamePhase::Countdown,
            Stage::Racing => GamePhase::Racing,
            Stage::Ended {
                outcome: RoundOutcome::Crashed,
                ..
            } => GamePhase::Crashed,
            Stage::Ended { .. } => GamePhase::Finished,
        }
    }

    /// Number or GO while counting down
    pub fn countdown_display(&self) -> Option<CountdownDisplay> {
        match self.stage {
            Stage::Counting { remaining, .. } => Some(CountdownDisplay::Number(remaining)),
            Stage::Go { .. } => Some(CountdownDisplay::Go),
            _ => None,
        }
    }

    /// How the most recent round ended (cleared by the next start)
    pub fn last_outcome(&self) -> Option<RoundOutcome> {
        self.last_outcome
    }

    pub fn round(&self) -> &RoundState {
        &self.race.round
    }

    pub fn tuning(&self) -> &Tuning {
        &self.race.tuning
    }

    pub fn player_rect(&self) -> Rect {
        self.race.store.player.rect()
    }

    pub fn enemies(&self) -> &[Enemy] {
        self.race.store.enemies()
    }

    pub fn enemy_rects(&self) -> Vec<Rect> {
        self.race.store.enemies().iter().map(Enemy::rect).collect()
    }

    /// Cars parked on the start grid during the countdown
    pub fn lineup_rects(&self) -> Vec<Rect> {
        self.race.store.lineup().iter().map(Enemy::rect).collect()
    }
}
