//! Simulation core
//!
//! All gameplay logic lives here. This module has no rendering or platform
//! dependencies:
//! - Time only enters through the `dt` handed to `Game::tick`
//! - Seeded RNG only
//! - Stable iteration order (enemies kept in spawn order)

pub mod clock;
pub mod collision;
pub mod lane;
pub mod round;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::{FrameClock, sanitize_dt};
pub use collision::{Rect, rects_overlap};
pub use lane::LaneGeometry;
pub use round::{CountdownDisplay, Game, RoundError, TickResult};
pub use spawner::Spawner;
pub use state::{
    DespawnReason, Enemy, EntityStore, GameEvent, GamePhase, Player, RoundState,
};
pub use tick::{InputIntent, Race, RoundOutcome, lateral_factor, step};
