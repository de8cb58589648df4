//! Round state and entity types
//!
//! Everything the simulation mutates lives here: the player, the traffic
//! (`EntityStore`), and the per-round counters (`RoundState`).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::lane::LaneGeometry;
use crate::Tuning;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a start command
    Idle,
    /// 3..2..1..GO sequence
    Countdown,
    /// Active race, the simulation step runs
    Racing,
    /// Out of lives (terminal banner)
    Crashed,
    /// Survived the clock or crossed the finish line (terminal banner)
    Finished,
}

impl GamePhase {
    /// Crashed or Finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Crashed | GamePhase::Finished)
    }
}

/// Why an enemy left the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DespawnReason {
    /// Passed below the canvas and scored
    Offscreen,
    /// Hit the player
    Collision,
}

/// Events fired during a tick, consumed by presentation and audio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Countdown shows a number (3, 2, 1)
    CountdownStep { remaining: u32 },
    /// Countdown shows GO
    CountdownGo,
    /// Countdown finished, the race is on
    RaceStarted,
    EnemySpawned { id: u32, lane: u32 },
    EnemyDespawned { id: u32, reason: DespawnReason },
    /// Player hit traffic
    Crash { lives_left: u32 },
    /// Round reached a terminal phase
    RoundFinished { won: bool, score: u32 },
    /// Terminal banner expired, everything reset
    ReturnedToIdle,
}

/// The player's car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner; x moves freely between the road margins
    pub pos: Vec2,
    pub size: Vec2,
    /// Lateral px per nominal frame
    pub lateral_speed: f32,
}

impl Player {
    /// Player parked in the center lane at its resting y
    pub fn new(tuning: &Tuning, lanes: &LaneGeometry) -> Self {
        Self {
            pos: Vec2::new(lanes.lane_center(lanes.center_lane()), tuning.player_y()),
            size: Vec2::new(tuning.car_width, tuning.car_height),
            lateral_speed: tuning.player_lateral_speed,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Back to the center lane (after a crash or a reset)
    pub fn recenter(&mut self, lanes: &LaneGeometry) {
        self.pos.x = lanes.lane_center(lanes.center_lane());
    }
}

/// A traffic car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Lane the car spawned in
    pub lane: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Own fall speed (base speed at spawn plus `speed_offset`)
    pub speed: f32,
    /// Individual jitter so cars do not move in lockstep
    pub speed_offset: f32,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// Owns the player and the active traffic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    pub player: Player,
    /// Active traffic in insertion order
    enemies: Vec<Enemy>,
    /// Cars parked on the start grid, launched on GO
    lineup: Vec<Enemy>,
    capacity: usize,
    next_id: u32,
}

impl EntityStore {
    pub fn new(tuning: &Tuning, lanes: &LaneGeometry) -> Self {
        Self {
            player: Player::new(tuning, lanes),
            enemies: Vec::new(),
            lineup: Vec::new(),
            capacity: tuning.max_enemies,
            next_id: 1,
        }
    }

    /// Allocate a new enemy ID
    pub fn next_enemy_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append an enemy; returns false (and drops it) when the store is full
    pub fn add_enemy(&mut self, enemy: Enemy) -> bool {
        if self.is_full() {
            log::warn!(
                "Enemy store full ({} cars), dropping enemy {}",
                self.capacity,
                enemy.id
            );
            return false;
        }
        self.enemies.push(enemy);
        true
    }

    /// Remove an enemy by id; a second removal of the same id is a no-op
    pub fn remove_enemy(&mut self, id: u32) -> Option<Enemy> {
        let index = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.remove(index))
    }

    /// Drop all traffic (active and parked)
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.lineup.clear();
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.enemies.len() >= self.capacity
    }

    pub fn lineup(&self) -> &[Enemy] {
        &self.lineup
    }

    /// Park a car on the start grid
    pub fn park(&mut self, enemy: Enemy) {
        self.lineup.push(enemy);
    }

    /// Move every parked car into active traffic; returns the (id, lane) of each launched car
    pub fn launch_lineup(&mut self) -> Vec<(u32, u32)> {
        let parked = std::mem::take(&mut self.lineup);
        parked
            .into_iter()
            .filter_map(|car| {
                let tag = (car.id, car.lane);
                self.add_enemy(car).then_some(tag)
            })
            .collect()
    }
}

/// Per-round counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub score: u32,
    pub lives: u32,
    /// Seconds left on the race clock
    pub time_left: f32,
    /// Shared speed the player controls with accelerate/brake
    pub base_speed: f32,
    /// Race time consumed so far (ms)
    pub elapsed_ms: f32,
    /// Difficulty ramp applied to traffic fall speed
    pub speed_multiplier: f32,
    /// Time since the last spawn (ms)
    pub spawn_timer: f32,
    /// Stripe scroll offset in [0, stripe period), for the road renderer
    pub road_scroll: f32,
}

impl RoundState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.starting_lives,
            time_left: tuning.total_time,
            base_speed: tuning.base_speed,
            elapsed_ms: 0.0,
            speed_multiplier: 1.0,
            spawn_timer: 0.0,
            road_scroll: 0.0,
        }
    }

    /// Engine loudness in [0, 1] for the audio layer
    pub fn engine_intensity(&self) -> f32 {
        ((self.base_speed - 1.0) / 6.0).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> EntityStore {
        let tuning = Tuning::default();
        EntityStore::new(&tuning, &LaneGeometry::from_tuning(&tuning))
    }

    fn enemy(store: &mut EntityStore) -> Enemy {
        Enemy {
            id: store.next_enemy_id(),
            lane: 0,
            pos: Vec2::new(54.0, -100.0),
            size: Vec2::new(52.0, 96.0),
            speed: 2.0,
            speed_offset: 0.0,
        }
    }

    #[test]
    fn test_player_starts_centered() {
        let store = store();
        assert_eq!(store.player.pos, Vec2::new(154.0, 640.0 - 96.0 - 16.0));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = store();
        let a = enemy(&mut store);
        let b = enemy(&mut store);
        let (a_id, b_id) = (a.id, b.id);
        assert!(store.add_enemy(a));
        assert!(store.add_enemy(b));

        assert!(store.remove_enemy(a_id).is_some());
        assert!(store.remove_enemy(a_id).is_none());
        assert_eq!(store.len(), 1);
        assert!(store.enemy(b_id).is_some());
    }

    #[test]
    fn test_capacity_bounds_growth() {
        let mut store = store();
        for _ in 0..crate::consts::MAX_ENEMIES {
            let e = enemy(&mut store);
            assert!(store.add_enemy(e));
        }
        assert!(store.is_full());
        let overflow = enemy(&mut store);
        assert!(!store.add_enemy(overflow));
        assert_eq!(store.len(), crate::consts::MAX_ENEMIES);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut store = store();
        let ids: Vec<u32> = (0..5).map(|_| store.next_enemy_id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_launch_lineup_moves_parked_cars() {
        let mut store = store();
        let a = enemy(&mut store);
        let b = enemy(&mut store);
        store.park(a);
        store.park(b);
        assert!(store.is_empty());

        let launched = store.launch_lineup();
        assert_eq!(launched.len(), 2);
        assert!(store.lineup().is_empty());
        assert_eq!(store.len(), 2);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_engine_intensity_clamped() {
        let mut round = RoundState::new(&Tuning::default());
        round.base_speed = 0.8;
        assert_eq!(round.engine_intensity(), 0.0);
        round.base_speed = 4.0;
        assert!((round.engine_intensity() - 0.5).abs() < 1e-6);
        round.base_speed = 9.0;
        assert_eq!(round.engine_intensity(), 1.0);
    }
}
