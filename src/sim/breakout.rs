//! Brick Breaker: ball and paddle physics against a destructible brick grid
//!
//! Coordinates are canvas pixels, origin top-left, y down. One tick moves the
//! ball by its velocity (pixels per tick); there is no sub-stepping.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, rect_contains_point};
use super::session::{Engine, Intent, SessionStatus};

/// Field dimensions
pub const FIELD_WIDTH: f32 = 480.0;
pub const FIELD_HEIGHT: f32 = 400.0;

/// Paddle defaults
pub const PADDLE_WIDTH: f32 = 75.0;
pub const PADDLE_HEIGHT: f32 = 10.0;
/// Top edge of the paddle band
pub const PADDLE_Y: f32 = FIELD_HEIGHT - PADDLE_HEIGHT - 10.0;
/// Pixels per tick while a paddle key is held
pub const PADDLE_STEP: f32 = 5.0;

/// Ball defaults
pub const BALL_RADIUS: f32 = 8.0;
pub const BALL_START: Vec2 = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - 30.0);
pub const BALL_START_VEL: Vec2 = Vec2::new(2.0, -2.0);

/// Brick grid layout
pub const BRICK_ROWS: usize = 5;
pub const BRICK_COLS: usize = 8;
pub const BRICK_WIDTH: f32 = 55.0;
pub const BRICK_HEIGHT: f32 = 20.0;
pub const BRICK_PADDING: f32 = 5.0;
pub const BRICK_OFFSET_TOP: f32 = 30.0;
pub const BRICK_OFFSET_LEFT: f32 = 15.0;

/// Points per brick
pub const BRICK_REWARD: u64 = 10;

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: FIELD_WIDTH / 2.0 - PADDLE_WIDTH / 2.0,
        }
    }
}

impl Paddle {
    /// Strictly within the paddle's horizontal span
    #[inline]
    pub fn spans(&self, x: f32) -> bool {
        x > self.x && x < self.x + PADDLE_WIDTH
    }

    /// Move by `dx`, staying on the field
    pub fn slide(&mut self, dx: f32) {
        self.x = (self.x + dx).clamp(0.0, FIELD_WIDTH - PADDLE_WIDTH);
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub radius: f32,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: BALL_START,
            vel: BALL_START_VEL,
            radius: BALL_RADIUS,
        }
    }
}

/// A brick in the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub row: usize,
    pub col: usize,
    pub rect: Rect,
    /// Goes false exactly once
    pub alive: bool,
}

/// Held paddle keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
}

/// Build the full grid, row-major
pub fn brick_grid() -> Vec<Brick> {
    let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
    for row in 0..BRICK_ROWS {
        for col in 0..BRICK_COLS {
            let x = col as f32 * (BRICK_WIDTH + BRICK_PADDING) + BRICK_OFFSET_LEFT;
            let y = row as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_OFFSET_TOP;
            bricks.push(Brick {
                row,
                col,
                rect: Rect::new(x, y, BRICK_WIDTH, BRICK_HEIGHT),
                alive: true,
            });
        }
    }
    bricks
}

/// Complete Brick Breaker session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakoutState {
    pub status: SessionStatus,
    pub score: u64,
    pub time_ticks: u64,
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
    pub held: HeldKeys,
}

impl BreakoutState {
    pub fn new(status: SessionStatus) -> Self {
        Self {
            status,
            score: 0,
            time_ticks: 0,
            paddle: Paddle::default(),
            ball: Ball::default(),
            bricks: brick_grid(),
            held: HeldKeys::default(),
        }
    }

    pub fn live_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| b.alive).count()
    }
}

impl Default for BreakoutState {
    fn default() -> Self {
        Self::new(SessionStatus::NotStarted)
    }
}

/// Brick Breaker engine
#[derive(Debug, Clone, Default)]
pub struct BreakoutEngine {
    state: BreakoutState,
}

impl BreakoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &BreakoutState {
        &self.state
    }

    /// Kill every live brick containing the ball center
    ///
    /// The scan doesn't stop at the first hit: each brick hit flips vertical
    /// velocity and scores on its own.
    fn collide_bricks(&mut self) {
        let BreakoutState {
            status,
            score,
            ball,
            bricks,
            ..
        } = &mut self.state;

        let mut live = bricks.iter().filter(|b| b.alive).count();
        for brick in bricks.iter_mut().filter(|b| b.alive) {
            if !rect_contains_point(&brick.rect, ball.pos) {
                continue;
            }
            brick.alive = false;
            ball.vel.y = -ball.vel.y;
            *score += BRICK_REWARD;
            live -= 1;
            log::debug!("Brick ({}, {}) destroyed, {} left", brick.row, brick.col, live);

            if live == 0 {
                *status = SessionStatus::Won;
            }
        }
    }

    fn bounce_walls(&mut self) {
        let ball = &mut self.state.ball;
        if ball.pos.x + ball.radius > FIELD_WIDTH || ball.pos.x - ball.radius < 0.0 {
            ball.vel.x = -ball.vel.x;
        }
        if ball.pos.y - ball.radius < 0.0 {
            ball.vel.y = -ball.vel.y;
        }
    }

    fn bounce_paddle(&mut self) {
        let BreakoutState { ball, paddle, .. } = &mut self.state;
        if ball.pos.y + ball.radius > PADDLE_Y && paddle.spans(ball.pos.x) {
            ball.vel.y = -ball.vel.y;
        }
    }

    fn move_paddle(&mut self) {
        let BreakoutState { paddle, held, .. } = &mut self.state;
        if held.right && paddle.x < FIELD_WIDTH - PADDLE_WIDTH {
            paddle.slide(PADDLE_STEP);
        } else if held.left && paddle.x > 0.0 {
            paddle.slide(-PADDLE_STEP);
        }
    }
}

impl Engine for BreakoutEngine {
    type Snapshot = BreakoutState;

    fn apply_intent(&mut self, intent: Intent) {
        if !matches!(intent, Intent::Left | Intent::Right) {
            return;
        }

        match self.state.status {
            SessionStatus::NotStarted => {
                // The starting key only starts the game
                self.reset();
                return;
            }
            SessionStatus::Running => {}
            SessionStatus::Over | SessionStatus::Won => return,
        }

        match intent {
            Intent::Left => self.state.held.left = true,
            Intent::Right => self.state.held.right = true,
            _ => {}
        }
    }

    fn release_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Left => self.state.held.left = false,
            Intent::Right => self.state.held.right = false,
            _ => {}
        }
    }

    fn tick(&mut self) {
        if self.state.status != SessionStatus::Running {
            return;
        }
        self.state.time_ticks += 1;

        self.collide_bricks();
        if self.state.status == SessionStatus::Won {
            log::info!("Brick Breaker cleared! Score {}", self.state.score);
            return;
        }

        let ball = &mut self.state.ball;
        ball.pos += ball.vel;

        self.bounce_walls();
        self.bounce_paddle();

        let ball = &self.state.ball;
        if ball.pos.y + ball.radius > FIELD_HEIGHT {
            log::info!("Brick Breaker ball lost, score {}", self.state.score);
            self.state.status = SessionStatus::Over;
            return;
        }

        self.move_paddle();
    }

    fn reset(&mut self) {
        self.state = BreakoutState::new(SessionStatus::Running);
        log::info!("Brick Breaker reset");
    }

    fn status(&self) -> SessionStatus {
        self.state.status
    }

    fn score(&self) -> u64 {
        self.state.score
    }

    fn ticks(&self) -> u64 {
        self.state.time_ticks
    }

    fn snapshot(&self) -> BreakoutState {
        self.state.clone()
    }
}
