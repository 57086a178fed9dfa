//! Shared engine contract
//!
//! Every game is an explicit state machine driven by two entry points:
//! `apply_intent` (input events, immediate effect) and `tick` (one fixed step).

use serde::{Deserialize, Serialize};

/// Lifecycle of a single play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Waiting for the first qualifying intent
    #[default]
    NotStarted,
    /// Active gameplay
    Running,
    /// Lost
    Over,
    /// Cleared the level (Brick Breaker only)
    Won,
}

impl SessionStatus {
    /// Over and Won are terminal until an explicit reset
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Over | SessionStatus::Won)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::NotStarted => "NotStarted",
            SessionStatus::Running => "Running",
            SessionStatus::Over => "Over",
            SessionStatus::Won => "Won",
        }
    }
}

/// Semantic input event, already decoupled from key codes
///
/// Each engine accepts a subset; anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Up,
    Down,
    Left,
    Right,
    Rotate,
    Thrust,
    Fire,
}

impl Intent {
    pub const ALL: [Intent; 7] = [
        Intent::Up,
        Intent::Down,
        Intent::Left,
        Intent::Right,
        Intent::Rotate,
        Intent::Thrust,
        Intent::Fire,
    ];
}

/// A game simulation driven by intents and a fixed-period tick
pub trait Engine {
    /// Owned, read-only view of everything the renderer needs for one frame
    type Snapshot: Clone + Serialize;

    /// Key-down or discrete action
    fn apply_intent(&mut self, intent: Intent);

    /// Key-up for held intents (paddle keys, thrust, rotation)
    fn release_intent(&mut self, _intent: Intent) {}

    /// Advance the simulation by one step. No-op unless Running.
    fn tick(&mut self);

    /// Replace the whole session state with a fresh one and start running
    fn reset(&mut self);

    fn status(&self) -> SessionStatus;

    fn score(&self) -> u64;

    /// Ticks elapsed since the last reset
    fn ticks(&self) -> u64;

    fn snapshot(&self) -> Self::Snapshot;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!SessionStatus::NotStarted.is_terminal());
        assert!(!SessionStatus::Running.is_terminal());
        assert!(SessionStatus::Over.is_terminal());
        assert!(SessionStatus::Won.is_terminal());
        assert_eq!(SessionStatus::default(), SessionStatus::NotStarted);
    }

    #[test]
    fn test_status_serializes_as_name() {
        let json = serde_json::to_string(&SessionStatus::Won).unwrap();
        assert_eq!(json, "\"Won\"");
        assert_eq!(SessionStatus::Over.as_str(), "Over");
    }
}
