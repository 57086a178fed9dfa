//! Tetris: falling-piece board with rotation and line clearing
//!
//! Board coordinates are (column, row) with row 0 at the top. A piece is a
//! 0/1 shape matrix placed at an integer origin; only its filled cells take
//! part in collision. Cells above the board (negative rows) are allowed while
//! a piece enters and are never considered occupied.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{cell_occupied, grid_in_bounds};
use super::session::{Engine, Intent, SessionStatus};

pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;
/// New pieces appear at the center column, top row
pub const SPAWN_ORIGIN: IVec2 = IVec2::new(BOARD_WIDTH as i32 / 2 - 1, 0);
/// Points per cleared line
pub const LINE_REWARD: u64 = 100;

/// Packed 0xRRGGBB colour of a settled cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

/// Colours drawn independently of the shape on every spawn
pub const PALETTE: [Color; 7] = [
    Color(0x00f0f0),
    Color(0xf0f000),
    Color(0xa000f0),
    Color(0x00f000),
    Color(0xf00000),
    Color(0x0000f0),
    Color(0xf0a000),
];

pub type Row = [Option<Color>; BOARD_WIDTH];

const EMPTY_ROW: Row = [None; BOARD_WIDTH];

/// The seven tetrominoes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    /// Spawn orientation
    pub fn shape(&self) -> Shape {
        const I: &[&[u8]] = &[&[1, 1, 1, 1]];
        const O: &[&[u8]] = &[&[1, 1], &[1, 1]];
        const T: &[&[u8]] = &[&[0, 1, 0], &[1, 1, 1]];
        const S: &[&[u8]] = &[&[0, 1, 1], &[1, 1, 0]];
        const Z: &[&[u8]] = &[&[1, 1, 0], &[0, 1, 1]];
        const J: &[&[u8]] = &[&[1, 0, 0], &[1, 1, 1]];
        const L: &[&[u8]] = &[&[0, 0, 1], &[1, 1, 1]];

        Shape::from_rows(match self {
            ShapeKind::I => I,
            ShapeKind::O => O,
            ShapeKind::T => T,
            ShapeKind::S => S,
            ShapeKind::Z => Z,
            ShapeKind::J => J,
            ShapeKind::L => L,
        })
    }
}

/// Rectangular 0/1 shape matrix, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|&v| v == 1).collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    #[inline]
    fn filled(&self, row: usize, col: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Offsets (column, row) of the filled cells
    pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(x, _)| IVec2::new(x as i32, y as i32))
        })
    }

    /// 90° clockwise: transpose, then reverse each new row
    pub fn rotated_cw(&self) -> Self {
        let height = self.height();
        let rows = (0..self.width())
            .map(|col| (0..height).rev().map(|row| self.filled(row, col)).collect::<Vec<_>>())
            .collect();
        Self { rows }
    }
}

/// The falling piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: ShapeKind,
    pub shape: Shape,
    pub color: Color,
    /// Board position of the shape's top-left corner
    pub origin: IVec2,
}

impl Piece {
    pub fn new(kind: ShapeKind, color: Color) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            color,
            origin: SPAWN_ORIGIN,
        }
    }

    /// Board cells covered by the piece
    pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.shape.cells().map(move |offset| self.origin + offset)
    }
}

/// Settled cells, always exactly `BOARD_WIDTH` x `BOARD_HEIGHT`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    rows: Vec<Row>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            rows: vec![EMPTY_ROW; BOARD_HEIGHT],
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[inline]
    pub fn is_occupied(&self, cell: IVec2) -> bool {
        cell_occupied(&self.rows, cell)
    }

    /// Fill a cell. Out-of-range cells are ignored; returns whether it was written.
    pub fn set(&mut self, cell: IVec2, color: Color) -> bool {
        if !grid_in_bounds(cell, BOARD_WIDTH as i32, BOARD_HEIGHT as i32) {
            return false;
        }
        match self
            .rows
            .get_mut(cell.y as usize)
            .and_then(|row| row.get_mut(cell.x as usize))
        {
            Some(slot) => {
                *slot = Some(color);
                true
            }
            None => false,
        }
    }

    /// Remove every full row, shifting the rows above down. Returns lines cleared.
    pub fn clear_full_rows(&mut self) -> u32 {
        let before = self.rows.len();
        self.rows.retain(|row| !row.iter().all(Option::is_some));
        let cleared = before - self.rows.len();
        for _ in 0..cleared {
            self.rows.insert(0, EMPTY_ROW);
        }
        cleared as u32
    }

    /// Whether a shape placed at `origin` would leave the board or hit a settled cell
    ///
    /// Rows above the board only get the horizontal bounds check.
    pub fn collides(&self, shape: &Shape, origin: IVec2) -> bool {
        shape.cells().any(|offset| {
            let cell = origin + offset;
            let clamped = IVec2::new(cell.x, cell.y.max(0));
            !grid_in_bounds(clamped, BOARD_WIDTH as i32, BOARD_HEIGHT as i32)
                || self.is_occupied(cell)
        })
    }
}

/// Complete Tetris session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TetrisState {
    pub status: SessionStatus,
    pub score: u64,
    pub time_ticks: u64,
    pub board: Board,
    /// None before the first spawn and after a blocked spawn
    pub piece: Option<Piece>,
}

impl TetrisState {
    fn new(status: SessionStatus, board: Board) -> Self {
        Self {
            status,
            score: 0,
            time_ticks: 0,
            board,
            piece: None,
        }
    }

    /// Board with the falling piece painted in, for display
    pub fn display_board(&self) -> Vec<Row> {
        let mut rows = self.board.rows().to_vec();
        if let Some(piece) = &self.piece {
            for cell in piece.cells() {
                if !grid_in_bounds(cell, BOARD_WIDTH as i32, BOARD_HEIGHT as i32) {
                    continue;
                }
                if let Some(slot) = rows
                    .get_mut(cell.y as usize)
                    .and_then(|row| row.get_mut(cell.x as usize))
                {
                    *slot = Some(piece.color);
                }
            }
        }
        rows
    }
}

impl Default for TetrisState {
    fn default() -> Self {
        Self::new(SessionStatus::NotStarted, Board::new())
    }
}

/// Tetris engine
#[derive(Debug, Clone)]
pub struct TetrisEngine {
    state: TetrisState,
    rng: Pcg32,
}

impl TetrisEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            state: TetrisState::default(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Start a running session on a prepared board
    ///
    /// The first piece spawns immediately; if the spawn origin is blocked the
    /// session is Over before any tick.
    pub fn from_board(seed: u64, board: Board) -> Self {
        let mut engine = Self {
            state: TetrisState::new(SessionStatus::Running, board),
            rng: Pcg32::seed_from_u64(seed),
        };
        engine.spawn_piece();
        engine
    }

    pub fn state(&self) -> &TetrisState {
        &self.state
    }

    /// Would `piece` collide if its origin were moved to `origin`?
    pub fn check_collision(&self, piece: &Piece, origin: IVec2) -> bool {
        self.state.board.collides(&piece.shape, origin)
    }

    fn random_piece(&mut self) -> Piece {
        let kind = ShapeKind::ALL[self.rng.random_range(0..ShapeKind::ALL.len())];
        let color = PALETTE[self.rng.random_range(0..PALETTE.len())];
        Piece::new(kind, color)
    }

    fn spawn_piece(&mut self) {
        let piece = self.random_piece();
        if self.state.board.collides(&piece.shape, piece.origin) {
            log::info!(
                "Tetris spawn blocked ({:?}), game over with score {}",
                piece.kind,
                self.state.score
            );
            self.state.piece = None;
            self.state.status = SessionStatus::Over;
        } else {
            self.state.piece = Some(piece);
        }
    }

    /// Move the piece by `delta` if the target is free; otherwise leave it
    fn try_shift(&mut self, delta: IVec2) -> bool {
        let TetrisState { board, piece, .. } = &mut self.state;
        let Some(piece) = piece else {
            return false;
        };
        let target = piece.origin + delta;
        if board.collides(&piece.shape, target) {
            return false;
        }
        piece.origin = target;
        true
    }

    /// Rotate in place; no wall kicks
    fn try_rotate(&mut self) -> bool {
        let TetrisState { board, piece, .. } = &mut self.state;
        let Some(piece) = piece else {
            return false;
        };
        let rotated = piece.shape.rotated_cw();
        if board.collides(&rotated, piece.origin) {
            return false;
        }
        piece.shape = rotated;
        true
    }

    /// Commit the piece into the board, clear lines, spawn the next one
    fn lock(&mut self, piece: Piece) {
        for cell in piece.cells() {
            if cell.y < 0 {
                continue;
            }
            self.state.board.set(cell, piece.color);
        }

        let lines = self.state.board.clear_full_rows();
        if lines > 0 {
            self.state.score += lines as u64 * LINE_REWARD;
            log::debug!("Tetris cleared {} line(s), score {}", lines, self.state.score);
        }

        self.spawn_piece();
    }
}

impl Engine for TetrisEngine {
    type Snapshot = TetrisState;

    fn apply_intent(&mut self, intent: Intent) {
        if !matches!(
            intent,
            Intent::Left | Intent::Right | Intent::Down | Intent::Rotate | Intent::Up
        ) {
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
            Intent::Left => {
                self.try_shift(IVec2::NEG_X);
            }
            Intent::Right => {
                self.try_shift(IVec2::X);
            }
            Intent::Down => {
                self.try_shift(IVec2::Y);
            }
            Intent::Rotate | Intent::Up => {
                self.try_rotate();
            }
            _ => {}
        }
    }

    fn tick(&mut self) {
        if self.state.status != SessionStatus::Running {
            return;
        }
        self.state.time_ticks += 1;

        let Some(mut piece) = self.state.piece.take() else {
            self.spawn_piece();
            return;
        };

        let below = piece.origin + IVec2::Y;
        if self.check_collision(&piece, below) {
            self.lock(piece);
        } else {
            piece.origin = below;
            self.state.piece = Some(piece);
        }
    }

    fn reset(&mut self) {
        self.state = TetrisState::new(SessionStatus::Running, Board::new());
        self.spawn_piece();
        log::info!("Tetris reset");
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

    fn snapshot(&self) -> TetrisState {
        self.state.clone()
    }
}
