//! Snake: grid-based self-avoiding path
//!
//! The head advances one cell per tick along the current direction. Running
//! into a wall or into the body ends the session; eating food grows the body
//! by one cell and respawns the food somewhere random.

use std::collections::VecDeque;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::grid_in_bounds;
use super::session::{Engine, Intent, SessionStatus};

/// Square grid side length in cells
pub const GRID_SIZE: i32 = 20;
pub const INITIAL_HEAD: IVec2 = IVec2::new(10, 10);
pub const INITIAL_DIRECTION: IVec2 = IVec2::new(1, 0);
pub const INITIAL_FOOD: IVec2 = IVec2::new(15, 15);
/// Points per food eaten
pub const FOOD_REWARD: u64 = 10;

/// Complete Snake session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeState {
    pub status: SessionStatus,
    pub score: u64,
    pub time_ticks: u64,
    /// Body cells, head first. Never empty.
    pub body: VecDeque<IVec2>,
    /// Unit step in {(±1,0), (0,±1)}
    pub direction: IVec2,
    pub food: IVec2,
}

impl SnakeState {
    pub fn new(status: SessionStatus) -> Self {
        Self {
            status,
            score: 0,
            time_ticks: 0,
            body: VecDeque::from([INITIAL_HEAD]),
            direction: INITIAL_DIRECTION,
            food: INITIAL_FOOD,
        }
    }

    #[inline]
    pub fn head(&self) -> IVec2 {
        self.body.front().copied().unwrap_or(INITIAL_HEAD)
    }
}

impl Default for SnakeState {
    fn default() -> Self {
        Self::new(SessionStatus::NotStarted)
    }
}

/// Snake engine
#[derive(Debug, Clone)]
pub struct SnakeEngine {
    state: SnakeState,
    rng: Pcg32,
}

impl SnakeEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            state: SnakeState::default(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn state(&self) -> &SnakeState {
        &self.state
    }

    /// Accept a turn only if it is perpendicular to the current heading
    fn turn(&mut self, direction: IVec2) {
        if direction.dot(self.state.direction) == 0 {
            self.state.direction = direction;
        }
    }

    /// Uniform random cell. Body cells are not excluded.
    fn random_cell(&mut self) -> IVec2 {
        IVec2::new(
            self.rng.random_range(0..GRID_SIZE),
            self.rng.random_range(0..GRID_SIZE),
        )
    }
}

impl Engine for SnakeEngine {
    type Snapshot = SnakeState;

    fn apply_intent(&mut self, intent: Intent) {
        let direction = match intent {
            Intent::Up => IVec2::NEG_Y,
            Intent::Down => IVec2::Y,
            Intent::Left => IVec2::NEG_X,
            Intent::Right => IVec2::X,
            _ => return,
        };

        match self.state.status {
            SessionStatus::NotStarted => {
                log::info!("Snake started");
                self.state.status = SessionStatus::Running;
            }
            SessionStatus::Running => {}
            SessionStatus::Over | SessionStatus::Won => return,
        }

        self.turn(direction);
    }

    fn tick(&mut self) {
        if self.state.status != SessionStatus::Running {
            return;
        }
        self.state.time_ticks += 1;

        let new_head = self.state.head() + self.state.direction;

        if !grid_in_bounds(new_head, GRID_SIZE, GRID_SIZE) {
            log::info!("Snake hit the wall at {:?}, score {}", new_head, self.state.score);
            self.state.status = SessionStatus::Over;
            return;
        }

        if self.state.body.contains(&new_head) {
            log::info!("Snake bit itself at {:?}, score {}", new_head, self.state.score);
            self.state.status = SessionStatus::Over;
            return;
        }

        self.state.body.push_front(new_head);

        if new_head == self.state.food {
            self.state.food = self.random_cell();
            self.state.score += FOOD_REWARD;
            log::debug!(
                "Snake ate at {:?}, length {}, food now {:?}",
                new_head,
                self.state.body.len(),
                self.state.food
            );
        } else {
            self.state.body.pop_back();
        }
    }

    fn reset(&mut self) {
        self.state = SnakeState::new(SessionStatus::Running);
        log::info!("Snake reset");
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

    fn snapshot(&self) -> SnakeState {
        self.state.clone()
    }
}
