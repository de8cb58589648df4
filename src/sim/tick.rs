//! Racing simulation step
//!
//! One call advances the race by `dt` milliseconds. The order inside a step
//! is fixed: speed, elapsed time, player, spawn, traffic, collisions,
//! off-screen pruning, race clock, terminal checks.

use super::lane::LaneGeometry;
use super::spawner::Spawner;
use super::state::{DespawnReason, EntityStore, GameEvent, RoundState};
use crate::consts::{NOMINAL_FRAME_MS, SCROLL_PX_PER_SEC, STRIPE_PERIOD};
use crate::{Tuning, TuningError};

/// Held controls for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputIntent {
    pub left: bool,
    pub right: bool,
    pub accelerate: bool,
    pub decelerate: bool,
}

/// How a race ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Lives ran out
    Crashed,
    /// Survived the race clock
    TimeUp,
    /// Crossed the finish line
    FinishLine,
}

impl RoundOutcome {
    pub fn won(&self) -> bool {
        !matches!(self, RoundOutcome::Crashed)
    }
}

/// Everything one race mutates, owned in one place
#[derive(Debug, Clone)]
pub struct Race {
    pub tuning: Tuning,
    pub lanes: LaneGeometry,
    pub round: RoundState,
    pub store: EntityStore,
    pub spawner: Spawner,
}

impl Race {
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        let lanes = LaneGeometry::from_tuning(&tuning);
        Ok(Self {
            round: RoundState::new(&tuning),
            store: EntityStore::new(&tuning, &lanes),
            spawner: Spawner::new(seed),
            lanes,
            tuning,
        })
    }

    /// Fresh round counters, empty road, player back in the center lane
    pub fn reset(&mut self) {
        self.round = RoundState::new(&self.tuning);
        self.store = EntityStore::new(&self.tuning, &self.lanes);
    }
}

/// Lateral responsiveness grows with speed (1.0 at base speed 2)
#[inline]
pub fn lateral_factor(base_speed: f32) -> f32 {
    1.0 + (base_speed - 2.0) / 4.0
}

/// Advance the race by one tick
///
/// `dt` must already be sanitized (finite, non-negative, clamped). Returns
/// the outcome when this step ended the race; at most one outcome per step,
/// with a crash taking precedence over the clock.
pub fn step(
    race: &mut Race,
    input: &InputIntent,
    dt: f32,
    events: &mut Vec<GameEvent>,
) -> Option<RoundOutcome> {
    let Race {
        tuning,
        lanes,
        round,
        store,
        spawner,
    } = race;
    let frames = dt / NOMINAL_FRAME_MS;

    // Speed control
    if input.accelerate {
        round.base_speed = (round.base_speed + tuning.accel_rate * dt).min(tuning.max_speed);
    }
    if input.decelerate {
        round.base_speed = (round.base_speed - tuning.decel_rate * dt).max(tuning.min_speed);
    }

    // Difficulty ramp
    round.elapsed_ms += dt;
    round.speed_multiplier = 1.0
        + (round.elapsed_ms / tuning.speed_ramp_window_ms).floor() * tuning.speed_ramp_step;
    round.road_scroll = (round.road_scroll
        + SCROLL_PX_PER_SEC * (dt / 1000.0) * round.speed_multiplier)
        .rem_euclid(STRIPE_PERIOD);

    // Player steering
    let lateral = store.player.lateral_speed * lateral_factor(round.base_speed) * frames;
    if input.left {
        store.player.pos.x -= lateral;
    }
    if input.right {
        store.player.pos.x += lateral;
    }
    store.player.pos.x = lanes.clamp_x(store.player.pos.x);
    if tuning.player_forward_rate > 0.0 {
        let advance = (round.base_speed - tuning.min_speed) * tuning.player_forward_rate * frames;
        store.player.pos.y = (store.player.pos.y - advance).max(0.0);
    }

    spawner.tick(dt, round, store, tuning, lanes, events);

    // Traffic falls toward the player
    let drift = round.speed_multiplier * tuning.enemy_drift;
    let pull = round.base_speed * tuning.position_factor;
    for enemy in store.enemies_mut() {
        enemy.pos.y += (enemy.speed + drift + pull) * frames;
    }

    resolve_collisions(round, store, lanes, events);
    prune_offscreen(round, store, tuning, events);

    round.time_left = (round.time_left - dt / 1000.0).max(0.0);

    if round.lives == 0 {
        Some(RoundOutcome::Crashed)
    } else if round.time_left <= 0.0 {
        Some(RoundOutcome::TimeUp)
    } else if tuning
        .finish_line_y
        .is_some_and(|line| store.player.pos.y <= line)
    {
        Some(RoundOutcome::FinishLine)
    } else {
        None
    }
}

/// Remove every car touching the player, one life each
fn resolve_collisions(
    round: &mut RoundState,
    store: &mut EntityStore,
    lanes: &LaneGeometry,
    events: &mut Vec<GameEvent>,
) {
    let ids: Vec<u32> = store.enemies().iter().map(|e| e.id).collect();
    let mut player = store.player.rect();

    for id in ids {
        if round.lives == 0 {
            break;
        }
        let hit = store
            .enemy(id)
            .is_some_and(|enemy| player.overlaps(&enemy.rect()));
        if !hit || store.remove_enemy(id).is_none() {
            continue;
        }

        round.lives = round.lives.saturating_sub(1);
        log::info!("Crash with enemy {}, {} lives left", id, round.lives);
        events.push(GameEvent::EnemyDespawned {
            id,
            reason: DespawnReason::Collision,
        });
        events.push(GameEvent::Crash {
            lives_left: round.lives,
        });

        if round.lives > 0 {
            store.player.recenter(lanes);
            player = store.player.rect();
        }
    }
}

/// Score and drop cars that left the bottom of the canvas
fn prune_offscreen(
    round: &mut RoundState,
    store: &mut EntityStore,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) {
    let limit = tuning.canvas_height + tuning.offscreen_margin;
    let passed: Vec<u32> = store
        .enemies()
        .iter()
        .filter(|e| e.pos.y > limit)
        .map(|e| e.id)
        .collect();

    for id in passed {
        if store.remove_enemy(id).is_some() {
            round.score += 1;
            log::debug!("Enemy {} passed, score {}", id, round.score);
            events.push(GameEvent::EnemyDespawned {
                id,
                reason: DespawnReason::Offscreen,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::state::Enemy;

    fn race() -> Race {
        Race::new(Tuning::default(), 12345).unwrap()
    }

    /// Place a car directly, bypassing the spawner
    fn place_enemy(race: &mut Race, lane: u32, y: f32, speed: f32) -> u32 {
        let id = race.store.next_enemy_id();
        let enemy = Enemy {
            id,
            lane,
            pos: Vec2::new(race.lanes.lane_center(lane), y),
            size: Vec2::new(race.tuning.car_width, race.tuning.car_height),
            speed,
            speed_offset: 0.0,
        };
        assert!(race.store.add_enemy(enemy));
        id
    }

    fn idle() -> InputIntent {
        InputIntent::default()
    }

    #[test]
    fn test_enemy_advance_reference_step() {
        let mut race = race();
        let id = place_enemy(&mut race, 1, -200.0, 2.0);
        let mut events = Vec::new();

        assert!(step(&mut race, &idle(), 16.0, &mut events).is_none());

        // (speed 2 + multiplier 1 * drift 1 + base 2 * 0.3) * (16 / 16)
        let y = race.store.enemy(id).unwrap().pos.y;
        assert!((y - (-200.0 + 3.6)).abs() < 1e-4);
        assert_eq!(race.store.enemy(id).unwrap().pos.x, race.lanes.road_x + 124.0);
    }

    #[test]
    fn test_accelerate_and_brake_clamped() {
        let mut race = race();
        let mut events = Vec::new();
        let gas = InputIntent {
            accelerate: true,
            ..Default::default()
        };
        step(&mut race, &gas, 16.0, &mut events);
        assert!((race.round.base_speed - 2.064).abs() < 1e-5);

        for _ in 0..200 {
            step(&mut race, &gas, 16.0, &mut events);
        }
        assert_eq!(race.round.base_speed, race.tuning.max_speed);

        let brake = InputIntent {
            decelerate: true,
            ..Default::default()
        };
        for _ in 0..200 {
            step(&mut race, &brake, 16.0, &mut events);
        }
        assert_eq!(race.round.base_speed, race.tuning.min_speed);
    }

    #[test]
    fn test_speed_multiplier_ramps_every_window() {
        let mut race = race();
        let mut events = Vec::new();
        race.round.elapsed_ms = 7990.0;
        step(&mut race, &idle(), 16.0, &mut events);
        assert!((race.round.speed_multiplier - 1.12).abs() < 1e-6);

        race.round.elapsed_ms = 16_000.0;
        step(&mut race, &idle(), 16.0, &mut events);
        assert!((race.round.speed_multiplier - 1.24).abs() < 1e-6);
    }

    #[test]
    fn test_lateral_movement_scales_with_speed() {
        let mut race = race();
        let mut events = Vec::new();
        let start = race.store.player.pos.x;
        let left = InputIntent {
            left: true,
            ..Default::default()
        };
        step(&mut race, &left, 16.0, &mut events);
        assert!((race.store.player.pos.x - (start - 6.0)).abs() < 1e-4);

        race.round.base_speed = 6.0;
        let before = race.store.player.pos.x;
        step(&mut race, &left, 16.0, &mut events);
        // factor 1 + (6 - 2) / 4 = 2
        assert!((race.store.player.pos.x - (before - 12.0)).abs() < 1e-4);
    }

    #[test]
    fn test_player_clamped_to_road() {
        let mut race = race();
        let mut events = Vec::new();
        let right = InputIntent {
            right: true,
            ..Default::default()
        };
        for _ in 0..100 {
            step(&mut race, &right, 16.0, &mut events);
        }
        assert_eq!(race.store.player.pos.x, race.lanes.max_x());
    }

    #[test]
    fn test_collision_costs_a_life_and_respawns() {
        let mut race = race();
        let mut events = Vec::new();
        // Player drifted into lane 0, traffic sitting on top of it
        race.store.player.pos.x = race.lanes.lane_center(0);
        let player_y = race.store.player.pos.y;
        let id = place_enemy(&mut race, 0, player_y - 50.0, 2.0);

        let outcome = step(&mut race, &idle(), 16.0, &mut events);
        assert!(outcome.is_none());
        assert_eq!(race.round.lives, 2);
        assert!(race.store.enemy(id).is_none());
        assert_eq!(race.store.player.pos.x, race.lanes.lane_center(1));
        assert!(events.contains(&GameEvent::Crash { lives_left: 2 }));
        assert!(events.contains(&GameEvent::EnemyDespawned {
            id,
            reason: DespawnReason::Collision
        }));
        assert_eq!(race.round.score, 0);
    }

    #[test]
    fn test_last_life_crash_ends_round() {
        let mut race = race();
        let mut events = Vec::new();
        race.round.lives = 1;
        let player_y = race.store.player.pos.y;
        place_enemy(&mut race, 1, player_y - 50.0, 2.0);

        let outcome = step(&mut race, &idle(), 16.0, &mut events);
        assert_eq!(outcome, Some(RoundOutcome::Crashed));
        assert_eq!(race.round.lives, 0);
        assert!(!outcome.unwrap().won());
    }

    #[test]
    fn test_two_simultaneous_hits_cost_two_lives() {
        let mut race = race();
        let mut events = Vec::new();
        let player_y = race.store.player.pos.y;
        place_enemy(&mut race, 1, player_y - 50.0, 2.0);
        place_enemy(&mut race, 1, player_y + 20.0, 2.0);

        step(&mut race, &idle(), 16.0, &mut events);
        assert_eq!(race.round.lives, 1);
        let crashes = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Crash { .. }))
            .count();
        assert_eq!(crashes, 2);
    }

    #[test]
    fn test_offscreen_enemy_scores_exactly_once() {
        let mut race = race();
        let mut events = Vec::new();
        let limit = race.tuning.canvas_height + race.tuning.offscreen_margin;
        // Lane 0, player stays in lane 1
        let id = place_enemy(&mut race, 0, limit - 1.0, 2.0);

        step(&mut race, &idle(), 16.0, &mut events);
        assert_eq!(race.round.score, 1);
        assert!(race.store.enemy(id).is_none());

        for _ in 0..10 {
            step(&mut race, &idle(), 16.0, &mut events);
        }
        assert_eq!(race.round.score, 1);
        let despawns = events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyDespawned { id: d, .. } if *d == id))
            .count();
        assert_eq!(despawns, 1);
    }

    #[test]
    fn test_collided_enemy_never_scores() {
        let mut race = race();
        let mut events = Vec::new();
        // Off-screen limit at the player's roof: the overlapping car is also past it
        race.tuning.canvas_height = race.store.player.pos.y;
        race.tuning.offscreen_margin = 0.0;
        let player_y = race.store.player.pos.y;
        place_enemy(&mut race, 1, player_y + 10.0, 2.0);

        step(&mut race, &idle(), 16.0, &mut events);
        assert_eq!(race.round.lives, 2);
        assert_eq!(race.round.score, 0);
    }

    #[test]
    fn test_clock_runs_out() {
        let mut race = race();
        let mut events = Vec::new();
        race.round.time_left = 0.01;
        let outcome = step(&mut race, &idle(), 16.0, &mut events);
        assert_eq!(outcome, Some(RoundOutcome::TimeUp));
        assert_eq!(race.round.time_left, 0.0);
        assert!(outcome.unwrap().won());
    }

    #[test]
    fn test_crash_beats_clock_in_same_step() {
        let mut race = race();
        let mut events = Vec::new();
        race.round.time_left = 0.01;
        race.round.lives = 1;
        let player_y = race.store.player.pos.y;
        place_enemy(&mut race, 1, player_y - 50.0, 2.0);

        assert_eq!(
            step(&mut race, &idle(), 16.0, &mut events),
            Some(RoundOutcome::Crashed)
        );
    }

    #[test]
    fn test_finish_line_wins() {
        let tuning = Tuning {
            finish_line_y: Some(40.0),
            player_forward_rate: 1.0,
            // No traffic
            spawn_base_interval: 1.0e9,
            spawn_floor_interval: 1.0e9,
            ..Default::default()
        };
        let mut race = Race::new(tuning, 7).unwrap();
        let mut events = Vec::new();
        let throttle = InputIntent {
            accelerate: true,
            ..Default::default()
        };

        let start_y = race.store.player.pos.y;
        assert_eq!(step(&mut race, &throttle, 16.0, &mut events), None);
        assert!(race.store.player.pos.y < start_y);

        let mut outcome = None;
        for _ in 0..2000 {
            outcome = step(&mut race, &throttle, 16.0, &mut events);
            if outcome.is_some() {
                break;
            }
        }
        assert_eq!(outcome, Some(RoundOutcome::FinishLine));
        assert!(race.store.player.pos.y <= 40.0);
        assert!(race.round.time_left > 0.0);
    }

    #[test]
    fn test_finish_line_unreachable_without_forward_rate() {
        let tuning = Tuning {
            finish_line_y: Some(40.0),
            spawn_base_interval: 1.0e9,
            spawn_floor_interval: 1.0e9,
            ..Default::default()
        };
        let mut race = Race::new(tuning, 7).unwrap();
        let mut events = Vec::new();
        let throttle = InputIntent {
            accelerate: true,
            ..Default::default()
        };
        let start_y = race.store.player.pos.y;
        for _ in 0..100 {
            assert_eq!(step(&mut race, &throttle, 16.0, &mut events), None);
        }
        assert_eq!(race.store.player.pos.y, start_y);
    }

    #[test]
    fn test_zero_dt_moves_nothing() {
        let mut race = race();
        let mut events = Vec::new();
        let id = place_enemy(&mut race, 0, 100.0, 3.0);
        let before = race.round.clone();
        let held = InputIntent {
            left: true,
            accelerate: true,
            ..Default::default()
        };
        let player_x = race.store.player.pos.x;

        step(&mut race, &held, 0.0, &mut events);
        assert_eq!(race.round, before);
        assert_eq!(race.store.player.pos.x, player_x);
        assert_eq!(race.store.enemy(id).unwrap().pos.y, 100.0);
    }

    #[test]
    fn test_road_scroll_wraps() {
        let mut race = race();
        let mut events = Vec::new();
        for _ in 0..100 {
            step(&mut race, &idle(), 16.0, &mut events);
            assert!((0.0..STRIPE_PERIOD).contains(&race.round.road_scroll));
        }
    }
}
