//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only (no wall-clock reads)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod asteroids;
pub mod breakout;
pub mod collision;
pub mod session;
pub mod snake;
pub mod tetris;

pub use asteroids::{Asteroid, AsteroidsEngine, AsteroidsState, Bullet, Ship};
pub use breakout::{Ball, Brick, BreakoutEngine, BreakoutState, Paddle};
pub use collision::{
    Rect, cell_occupied, circle_overlap, grid_in_bounds, rect_contains_point, wrap_toroidal,
};
pub use session::{Engine, Intent, SessionStatus};
pub use snake::{SnakeEngine, SnakeState};
pub use tetris::{Board, Color, Piece, Shape, ShapeKind, TetrisEngine, TetrisState};
