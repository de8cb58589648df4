//! Data-driven game balance
//!
//! A single `Tuning` value describes the playfield, the cars, and every rate
//! the simulation uses. It is supplied when a `Game` is built and validated
//! before any round starts, so bad values fail fast instead of mid-race.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("lane count must be at least 1")]
    NoLanes,
    #[error("{field} must be a finite positive number, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must be a finite non-negative number, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("car width {car_width} does not fit a lane of width {lane_width}")]
    CarWiderThanLane { car_width: f32, lane_width: f32 },
    #[error("road [{road_x}, {road_right}] does not fit the canvas width {canvas_width}")]
    RoadOutsideCanvas {
        road_x: f32,
        road_right: f32,
        canvas_width: f32,
    },
    #[error("speed range is empty: min {min} > max {max}")]
    SpeedRange { min: f32, max: f32 },
    #[error("initial speed {initial} is outside [{min}, {max}]")]
    InitialSpeed { initial: f32, min: f32, max: f32 },
    #[error("spawn floor interval {floor} exceeds base interval {base}")]
    SpawnIntervals { floor: f32, base: f32 },
    #[error("starting lives must be at least 1")]
    NoLives,
    #[error("enemy capacity must be at least 1")]
    NoCapacity,
    #[error("countdown must have at least one step")]
    NoCountdown,
    #[error("countdown of {steps} x {step_ms} ms plus {hold_ms} ms hold is too long")]
    CountdownTooLong { steps: u32, step_ms: u32, hold_ms: u32 },
    #[error("finish line y {line} must lie above the player's start y {player_y}")]
    FinishLine { line: f32, player_y: f32 },
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Balance and geometry for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub road_x: f32,
    pub road_width: f32,
    /// Gap the player keeps from the road edges
    pub road_margin: f32,
    pub lane_count: u32,

    // === Cars ===
    pub car_width: f32,
    pub car_height: f32,
    pub player_bottom_gap: f32,
    /// Lateral px per nominal frame at base speed 2
    pub player_lateral_speed: f32,
    /// Forward px per nominal frame per unit of speed above `min_speed`
    /// (0 keeps the player at its resting y)
    pub player_forward_rate: f32,

    // === Round ===
    /// Race length in seconds
    pub total_time: f32,
    pub starting_lives: u32,
    /// Player top edge at or above this y wins the race (disabled when `None`)
    pub finish_line_y: Option<f32>,
    /// Park one car per lane on the start line during the countdown
    pub start_grid: bool,
    pub start_line_y: f32,

    // === Speed ===
    pub base_speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub accel_rate: f32,
    pub decel_rate: f32,
    pub speed_ramp_window_ms: f32,
    pub speed_ramp_step: f32,
    pub enemy_drift: f32,
    pub position_factor: f32,

    // === Spawning ===
    pub spawn_base_interval: f32,
    pub spawn_floor_interval: f32,
    pub spawn_decay_per_ms: f32,
    pub spawn_speed_penalty: f32,
    pub spawn_y_jitter: f32,
    pub enemy_speed_jitter: f32,
    pub max_enemies: usize,
    pub offscreen_margin: f32,

    // === Timing ===
    pub max_frame_dt: f32,
    pub countdown_steps: u32,
    pub countdown_step_ms: u32,
    pub go_hold_ms: u32,
    pub end_delay_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            road_x: ROAD_X,
            road_width: ROAD_WIDTH,
            road_margin: ROAD_MARGIN,
            lane_count: LANE_COUNT,

            car_width: CAR_WIDTH,
            car_height: CAR_HEIGHT,
            player_bottom_gap: PLAYER_BOTTOM_GAP,
            player_lateral_speed: PLAYER_LATERAL_SPEED,
            player_forward_rate: 0.0,

            total_time: TOTAL_TIME_SECS,
            starting_lives: STARTING_LIVES,
            finish_line_y: None,
            start_grid: false,
            start_line_y: START_LINE_Y,

            base_speed: BASE_SPEED,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            accel_rate: ACCEL_RATE,
            decel_rate: DECEL_RATE,
            speed_ramp_window_ms: SPEED_RAMP_WINDOW_MS,
            speed_ramp_step: SPEED_RAMP_STEP,
            enemy_drift: ENEMY_DRIFT,
            position_factor: POSITION_FACTOR,

            spawn_base_interval: SPAWN_BASE_INTERVAL_MS,
            spawn_floor_interval: SPAWN_FLOOR_INTERVAL_MS,
            spawn_decay_per_ms: SPAWN_DECAY_PER_MS,
            spawn_speed_penalty: SPAWN_SPEED_PENALTY,
            spawn_y_jitter: SPAWN_Y_JITTER,
            enemy_speed_jitter: ENEMY_SPEED_JITTER,
            max_enemies: MAX_ENEMIES,
            offscreen_margin: OFFSCREEN_MARGIN,

            max_frame_dt: MAX_FRAME_DT_MS,
            countdown_steps: COUNTDOWN_STEPS,
            countdown_step_ms: COUNTDOWN_STEP_MS,
            go_hold_ms: GO_HOLD_MS,
            end_delay_ms: END_DELAY_MS,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Negative { field, value })
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject configurations the simulation cannot run
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.lane_count == 0 {
            return Err(TuningError::NoLanes);
        }
        positive("canvas_width", self.canvas_width)?;
        positive("canvas_height", self.canvas_height)?;
        positive("road_width", self.road_width)?;
        positive("car_width", self.car_width)?;
        positive("car_height", self.car_height)?;
        positive("total_time", self.total_time)?;
        positive("max_frame_dt", self.max_frame_dt)?;
        positive("spawn_floor_interval", self.spawn_floor_interval)?;
        positive("speed_ramp_window_ms", self.speed_ramp_window_ms)?;
        non_negative("road_x", self.road_x)?;
        non_negative("road_margin", self.road_margin)?;
        non_negative("player_lateral_speed", self.player_lateral_speed)?;
        non_negative("player_bottom_gap", self.player_bottom_gap)?;
        non_negative("player_forward_rate", self.player_forward_rate)?;
        non_negative("start_line_y", self.start_line_y)?;
        non_negative("min_speed", self.min_speed)?;
        non_negative("accel_rate", self.accel_rate)?;
        non_negative("decel_rate", self.decel_rate)?;
        non_negative("speed_ramp_step", self.speed_ramp_step)?;
        non_negative("spawn_decay_per_ms", self.spawn_decay_per_ms)?;
        non_negative("spawn_speed_penalty", self.spawn_speed_penalty)?;
        non_negative("spawn_y_jitter", self.spawn_y_jitter)?;
        non_negative("enemy_speed_jitter", self.enemy_speed_jitter)?;
        non_negative("offscreen_margin", self.offscreen_margin)?;

        let road_right = self.road_x + self.road_width;
        if road_right > self.canvas_width {
            return Err(TuningError::RoadOutsideCanvas {
                road_x: self.road_x,
                road_right,
                canvas_width: self.canvas_width,
            });
        }

        let lane_width = self.road_width / self.lane_count as f32;
        // The player also needs room between the margins
        if self.car_width > lane_width
            || self.car_width + 2.0 * self.road_margin > self.road_width
        {
            return Err(TuningError::CarWiderThanLane {
                car_width: self.car_width,
                lane_width,
            });
        }

        if !self.max_speed.is_finite() || self.min_speed > self.max_speed {
            return Err(TuningError::SpeedRange {
                min: self.min_speed,
                max: self.max_speed,
            });
        }
        if !(self.min_speed..=self.max_speed).contains(&self.base_speed) {
            return Err(TuningError::InitialSpeed {
                initial: self.base_speed,
                min: self.min_speed,
                max: self.max_speed,
            });
        }
        if !self.spawn_base_interval.is_finite()
            || self.spawn_floor_interval > self.spawn_base_interval
        {
            return Err(TuningError::SpawnIntervals {
                floor: self.spawn_floor_interval,
                base: self.spawn_base_interval,
            });
        }
        if self.starting_lives == 0 {
            return Err(TuningError::NoLives);
        }
        if self.max_enemies == 0 {
            return Err(TuningError::NoCapacity);
        }
        if self.countdown_steps == 0 {
            return Err(TuningError::NoCountdown);
        }
        if self.checked_countdown_ms().is_none() {
            return Err(TuningError::CountdownTooLong {
                steps: self.countdown_steps,
                step_ms: self.countdown_step_ms,
                hold_ms: self.go_hold_ms,
            });
        }
        if let Some(line) = self.finish_line_y {
            // A line at or below the resting player would end the race on GO
            let player_y = self.player_y();
            if !line.is_finite() || line >= player_y {
                return Err(TuningError::FinishLine { line, player_y });
            }
        }
        Ok(())
    }

    fn checked_countdown_ms(&self) -> Option<u32> {
        self.countdown_steps
            .checked_mul(self.countdown_step_ms)?
            .checked_add(self.go_hold_ms)
    }

    /// Total countdown length (steps plus the GO hold) in ms
    pub fn countdown_duration_ms(&self) -> u32 {
        self.checked_countdown_ms().unwrap_or(u32::MAX)
    }

    /// Player's resting y (rear bumper `player_bottom_gap` above the canvas bottom)
    pub fn player_y(&self) -> f32 {
        self.canvas_height - self.car_height - self.player_bottom_gap
    }
}
