//! Active-game selection
//!
//! Exactly one game runs at a time. Switching games drops the current session
//! (and its timer) and builds a fresh one, so nothing carries over.

use serde::{Deserialize, Serialize};

use crate::scheduler::{FixedStep, Session};
use crate::settings::Settings;
use crate::sim::{
    AsteroidsEngine, AsteroidsState, BreakoutEngine, BreakoutState, Intent, SessionStatus,
    SnakeEngine, SnakeState, TetrisEngine, TetrisState,
};

/// The four cabinets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameKind {
    #[default]
    Snake,
    Tetris,
    BrickBreaker,
    Asteroids,
}

impl GameKind {
    pub const ALL: [GameKind; 4] = [
        GameKind::Snake,
        GameKind::Tetris,
        GameKind::BrickBreaker,
        GameKind::Asteroids,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Snake => "Snake",
            GameKind::Tetris => "Tetris",
            GameKind::BrickBreaker => "Brick Breaker",
            GameKind::Asteroids => "Asteroids",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "snake" => Some(GameKind::Snake),
            "tetris" => Some(GameKind::Tetris),
            "breakout" | "brickbreaker" | "brick breaker" => Some(GameKind::BrickBreaker),
            "asteroids" => Some(GameKind::Asteroids),
            _ => None,
        }
    }
}

/// Snapshot of whichever game is active
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "game", content = "state")]
pub enum ArcadeSnapshot {
    Snake(SnakeState),
    Tetris(TetrisState),
    BrickBreaker(BreakoutState),
    Asteroids(AsteroidsState),
}

enum ActiveGame {
    Snake(Session<SnakeEngine>),
    Tetris(Session<TetrisEngine>),
    BrickBreaker(Session<BreakoutEngine>),
    Asteroids(Session<AsteroidsEngine>),
}

/// Forward a call to the active session
macro_rules! dispatch {
    ($game:expr, $session:ident => $body:expr) => {
        match $game {
            ActiveGame::Snake($session) => $body,
            ActiveGame::Tetris($session) => $body,
            ActiveGame::BrickBreaker($session) => $body,
            ActiveGame::Asteroids($session) => $body,
        }
    };
}

/// Owns the active game session
pub struct Arcade {
    settings: Settings,
    kind: GameKind,
    game: ActiveGame,
    /// Bumped per selection so every new session gets its own seed
    sessions: u64,
}

impl Arcade {
    pub fn new(settings: Settings) -> Self {
        let kind = settings.default_game;
        let game = Self::build(&settings, kind, settings.seed);
        log::info!("Arcade ready: {} (seed {})", kind.as_str(), settings.seed);
        Self {
            settings,
            kind,
            game,
            sessions: 0,
        }
    }

    fn build(settings: &Settings, kind: GameKind, seed: u64) -> ActiveGame {
        let clock = FixedStep::with_max_substeps(settings.tick_secs(kind), settings.max_substeps);
        match kind {
            GameKind::Snake => ActiveGame::Snake(Session::with_clock(SnakeEngine::new(seed), clock)),
            GameKind::Tetris => {
                ActiveGame::Tetris(Session::with_clock(TetrisEngine::new(seed), clock))
            }
            GameKind::BrickBreaker => {
                ActiveGame::BrickBreaker(Session::with_clock(BreakoutEngine::new(), clock))
            }
            GameKind::Asteroids => {
                ActiveGame::Asteroids(Session::with_clock(AsteroidsEngine::new(seed), clock))
            }
        }
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Tear down the current game and start a fresh, not-yet-started one
    pub fn select(&mut self, kind: GameKind) {
        self.sessions += 1;
        let seed = self.settings.seed.wrapping_add(self.sessions);
        self.game = Self::build(&self.settings, kind, seed);
        self.kind = kind;
        log::info!("Selected {}", kind.as_str());
    }

    pub fn apply_intent(&mut self, intent: Intent) {
        dispatch!(&mut self.game, s => s.apply_intent(intent))
    }

    pub fn release_intent(&mut self, intent: Intent) {
        dispatch!(&mut self.game, s => s.release_intent(intent))
    }

    /// Feed elapsed seconds to the active game's timer
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        dispatch!(&mut self.game, s => s.advance(elapsed))
    }

    pub fn reset(&mut self) {
        dispatch!(&mut self.game, s => s.reset())
    }

    pub fn status(&self) -> SessionStatus {
        dispatch!(&self.game, s => s.status())
    }

    pub fn score(&self) -> u64 {
        dispatch!(&self.game, s => s.score())
    }

    pub fn snapshot(&self) -> ArcadeSnapshot {
        match &self.game {
            ActiveGame::Snake(s) => ArcadeSnapshot::Snake(s.snapshot()),
            ActiveGame::Tetris(s) => ArcadeSnapshot::Tetris(s.snapshot()),
            ActiveGame::BrickBreaker(s) => ArcadeSnapshot::BrickBreaker(s.snapshot()),
            ActiveGame::Asteroids(s) => ArcadeSnapshot::Asteroids(s.snapshot()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_kind_from_str() {
        assert_eq!(GameKind::from_str("Tetris"), Some(GameKind::Tetris));
        assert_eq!(GameKind::from_str("breakout"), Some(GameKind::BrickBreaker));
        assert_eq!(GameKind::from_str("pinball"), None);
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_select_tears_down_previous_game() {
        let mut arcade = Arcade::new(Settings::default());
        assert_eq!(arcade.kind(), GameKind::Snake);

        arcade.apply_intent(Intent::Right);
        arcade.advance(1.0);
        assert_eq!(arcade.status(), SessionStatus::Running);

        arcade.select(GameKind::Tetris);
        assert_eq!(arcade.kind(), GameKind::Tetris);
        assert_eq!(arcade.status(), SessionStatus::NotStarted);
        assert_eq!(arcade.score(), 0);
        assert!(matches!(arcade.snapshot(), ArcadeSnapshot::Tetris(_)));
    }

    #[test]
    fn test_intents_reach_active_game() {
        let mut arcade = Arcade::new(Settings::default());
        arcade.select(GameKind::Asteroids);

        arcade.apply_intent(Intent::Fire);
        assert_eq!(arcade.status(), SessionStatus::Running);
        arcade.apply_intent(Intent::Fire);

        match arcade.snapshot() {
            ArcadeSnapshot::Asteroids(state) => assert_eq!(state.bullets.len(), 1),
            other => panic!("unexpected snapshot {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_serializes_with_tag() {
        let arcade = Arcade::new(Settings::default());
        let json = serde_json::to_value(arcade.snapshot()).unwrap();
        assert_eq!(json["game"], "Snake");
        assert_eq!(json["state"]["status"], "NotStarted");
        assert_eq!(json["state"]["score"], 0);
    }
}
