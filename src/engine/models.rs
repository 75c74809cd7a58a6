//! Core engine data types: markers, positions, players, match status and events.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::bot_strategy::Strategy;
use crate::engine::error::GameError;

pub type PlayerId = String;

/// The symbol a player places in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    X,
    O,
}

impl Marker {
    pub fn opponent(self) -> Marker {
        match self {
            Marker::X => Marker::O,
            Marker::O => Marker::X,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Marker::X => 'X',
            Marker::O => 'O',
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Marker {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "X" | "x" => Ok(Marker::X),
            "O" | "o" => Ok(Marker::O),
            other => Err(GameError::UnknownMarker(other.to_string())),
        }
    }
}

/// A (row, col) coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: PlayerId,
    pub display_name: String,
    pub marker: Marker,
    pub strategy: Strategy,
    /// Matches won; only ever incremented.
    #[serde(default)]
    pub score: u32,
}

impl Player {
    pub fn new(
        player_id: impl Into<PlayerId>,
        display_name: impl Into<String>,
        marker: Marker,
        strategy: Strategy,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            display_name: display_name.into(),
            marker,
            strategy,
            score: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    #[serde(default = "default_size")]
    pub size: usize,
    /// Seed for every random choice made during the match. `None` draws from entropy.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

fn default_size() -> usize {
    3
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            random_seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchState {
    InProgress { active: PlayerId },
    Won { winner: PlayerId },
    Draw,
}

impl MatchState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MatchState::InProgress { .. })
    }
}

/// Notification emitted by a match, as recorded by [`crate::engine::game_match::EventLog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum MatchEvent {
    Message { text: String },
    CellChanged { row: usize, col: usize, marker: Marker },
    PlayersChanged { players: Vec<Player> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_parse_and_opponent() {
        assert_eq!("x".parse::<Marker>().unwrap(), Marker::X);
        assert_eq!(" O ".parse::<Marker>().unwrap(), Marker::O);
        assert_eq!(
            "Z".parse::<Marker>(),
            Err(GameError::UnknownMarker("Z".into()))
        );
        assert_eq!(Marker::X.opponent(), Marker::O);
        assert_eq!(Marker::O.opponent().opponent(), Marker::O);
    }

    #[test]
    fn test_state_and_event_json() {
        let state = MatchState::InProgress { active: "p1".into() };
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            serde_json::json!({"status": "in_progress", "active": "p1"})
        );
        assert!(!state.is_terminal());
        assert!(MatchState::Draw.is_terminal());

        let event = MatchEvent::CellChanged { row: 1, col: 2, marker: Marker::O };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({"event_type": "cell_changed", "row": 1, "col": 2, "marker": "O"})
        );
    }

    #[test]
    fn test_config_defaults() {
        let config: MatchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.size, 3);
        assert_eq!(config.random_seed, None);
    }
}
