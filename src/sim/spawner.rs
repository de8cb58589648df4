//! Traffic spawning
//!
//! Decides once per racing step whether a new car enters the road. The spawn
//! interval shrinks with race time and with the player's speed, down to a
//! floor, so the road keeps getting busier.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::lane::LaneGeometry;
use super::state::{Enemy, EntityStore, GameEvent, RoundState};
use crate::Tuning;

/// Seeded traffic spawner
#[derive(Debug, Clone)]
pub struct Spawner {
    seed: u64,
    rng: Pcg32,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current spawn interval in ms
    pub fn interval(round: &RoundState, tuning: &Tuning) -> f32 {
        let shrunk = tuning.spawn_base_interval
            - round.elapsed_ms * tuning.spawn_decay_per_ms
            - round.base_speed * tuning.spawn_speed_penalty;
        shrunk.max(tuning.spawn_floor_interval)
    }

    /// Advance the spawn timer by `dt` and spawn a car when it is due
    pub fn tick(
        &mut self,
        dt: f32,
        round: &mut RoundState,
        store: &mut EntityStore,
        tuning: &Tuning,
        lanes: &LaneGeometry,
        events: &mut Vec<GameEvent>,
    ) {
        round.spawn_timer += dt;
        if round.spawn_timer < Self::interval(round, tuning) {
            return;
        }
        round.spawn_timer = 0.0;

        let lane = self.rng.random_range(0..lanes.lane_count);
        let y = -tuning.car_height - self.jitter(tuning.spawn_y_jitter);
        let speed_offset = self.jitter(tuning.enemy_speed_jitter);
        let enemy = Enemy {
            id: store.next_enemy_id(),
            lane,
            pos: Vec2::new(lanes.lane_center(lane), y),
            size: Vec2::new(tuning.car_width, tuning.car_height),
            speed: round.base_speed + speed_offset,
            speed_offset,
        };
        let id = enemy.id;
        if store.add_enemy(enemy) {
            log::debug!("Spawned enemy {} in lane {} at y={:.1}", id, lane, y);
            events.push(GameEvent::EnemySpawned { id, lane });
        }
    }

    /// Park one car on the start line in every lane but the player's
    pub fn fill_start_grid(
        &mut self,
        round: &RoundState,
        store: &mut EntityStore,
        tuning: &Tuning,
        lanes: &LaneGeometry,
    ) {
        let player_lane = lanes.center_lane();
        for lane in (0..lanes.lane_count).filter(|&l| l != player_lane) {
            let speed_offset = tuning.enemy_speed_jitter;
            let car = Enemy {
                id: store.next_enemy_id(),
                lane,
                pos: Vec2::new(lanes.lane_center(lane), tuning.start_line_y),
                size: Vec2::new(tuning.car_width, tuning.car_height),
                speed: round.base_speed + speed_offset,
                speed_offset,
            };
            store.park(car);
        }
    }

    /// Uniform sample in [0, max)
    fn jitter(&mut self, max: f32) -> f32 {
        self.rng.random::<f32>() * max
    }
}
