//! Lane Rush - A top-down traffic dodging arcade racer
//!
//! Core modules:
//! - `sim`: Simulation core (entities, spawning, collisions, round state machine)
//! - `input`: Key/button bindings to per-tick input intent
//! - `audio`: Mapping of game events to sound cues
//! - `tuning`: Data-driven game balance
//! - `settings`: Presentation preferences

pub mod audio;
pub mod input;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{EffectStyle, Settings};
pub use tuning::{Tuning, TuningError};

/// Canonical balance constants (reference values for [`Tuning::default`])
pub mod consts {
    /// Nominal frame length in ms that movement rates are expressed against
    pub const NOMINAL_FRAME_MS: f32 = 16.0;
    /// Largest dt a single tick may consume (prevents tunneling)
    pub const MAX_FRAME_DT_MS: f32 = 50.0;

    /// Playfield
    pub const CANVAS_WIDTH: f32 = 360.0;
    pub const CANVAS_HEIGHT: f32 = 640.0;
    pub const ROAD_X: f32 = 30.0;
    pub const ROAD_WIDTH: f32 = CANVAS_WIDTH - 2.0 * ROAD_X;
    pub const ROAD_MARGIN: f32 = 6.0;
    pub const LANE_COUNT: u32 = 3;

    /// Cars (player and traffic share a footprint)
    pub const CAR_WIDTH: f32 = 52.0;
    pub const CAR_HEIGHT: f32 = 96.0;
    /// Gap between the player's rear bumper and the bottom of the canvas
    pub const PLAYER_BOTTOM_GAP: f32 = 16.0;
    /// Lateral player speed in px per nominal frame
    pub const PLAYER_LATERAL_SPEED: f32 = 6.0;

    /// Round
    pub const TOTAL_TIME_SECS: f32 = 45.0;
    pub const STARTING_LIVES: u32 = 3;

    /// Base speed control
    pub const BASE_SPEED: f32 = 2.0;
    pub const MIN_SPEED: f32 = 0.8;
    pub const MAX_SPEED: f32 = 7.0;
    /// Speed gained per ms while accelerating
    pub const ACCEL_RATE: f32 = 0.004;
    /// Speed lost per ms while braking
    pub const DECEL_RATE: f32 = 0.006;

    /// Difficulty ramp: +12% traffic speed every 8 seconds
    pub const SPEED_RAMP_WINDOW_MS: f32 = 8000.0;
    pub const SPEED_RAMP_STEP: f32 = 0.12;
    pub const ENEMY_DRIFT: f32 = 1.0;
    pub const POSITION_FACTOR: f32 = 0.3;

    /// Spawning
    pub const SPAWN_BASE_INTERVAL_MS: f32 = 1200.0;
    pub const SPAWN_FLOOR_INTERVAL_MS: f32 = 600.0;
    pub const SPAWN_DECAY_PER_MS: f32 = 0.05;
    pub const SPAWN_SPEED_PENALTY: f32 = 40.0;
    pub const SPAWN_Y_JITTER: f32 = 120.0;
    pub const ENEMY_SPEED_JITTER: f32 = 0.6;
    pub const MAX_ENEMIES: usize = 50;
    /// Distance below the canvas an enemy must pass before it scores
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    /// Countdown: 3..2..1 then GO
    pub const COUNTDOWN_STEPS: u32 = 3;
    pub const COUNTDOWN_STEP_MS: u32 = 1000;
    pub const GO_HOLD_MS: u32 = 700;
    /// Terminal banner duration before returning to Idle
    pub const END_DELAY_MS: u32 = 900;

    /// Start grid
    pub const START_LINE_Y: f32 = 80.0;

    /// Road stripes
    pub const SCROLL_PX_PER_SEC: f32 = 220.0;
    pub const STRIPE_PERIOD: f32 = 40.0;
}
