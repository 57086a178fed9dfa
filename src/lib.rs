//! Arcade Suite - simulation engines for four classic arcade games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (Snake, Tetris, Brick Breaker, Asteroids)
//! - `scheduler`: Fixed-period tick driver, decoupled from any runtime
//! - `arcade`: Active-game selection and dispatch
//! - `settings`: Data-driven configuration (seed, tick periods)
//!
//! Rendering and raw keyboard plumbing live outside this crate. A shell feeds
//! [`sim::Intent`]s in, drives [`scheduler::Session::advance`] from its frame
//! loop, and paints whatever the engine snapshot says.

pub mod arcade;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use arcade::{Arcade, ArcadeSnapshot, GameKind};
pub use scheduler::{FixedStep, Session};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Snake moves one cell every 150 ms
    pub const SNAKE_TICK_SECS: f32 = 0.150;
    /// Tetris gravity step every 500 ms
    pub const TETRIS_TICK_SECS: f32 = 0.500;
    /// Brick Breaker physics at 60 Hz
    pub const BREAKOUT_TICK_SECS: f32 = 1.0 / 60.0;
    /// Asteroids physics at 60 Hz
    pub const ASTEROIDS_TICK_SECS: f32 = 1.0 / 60.0;

    /// Maximum ticks per `advance` call to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default run seed
    pub const DEFAULT_SEED: u64 = 0x5EED_CAFE;
}
