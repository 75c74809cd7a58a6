//! Error types shared by the board, strategies and match.

use thiserror::Error;

/// Why a match refused a move.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveRejection {
    #[error("cell ({row}, {col}) is outside a {size}x{size} board")]
    OutOfRange { row: usize, col: usize, size: usize },

    #[error("cell ({row}, {col}) is already occupied")]
    CellOccupied { row: usize, col: usize },

    #[error("the match is already over")]
    MatchOver,
}

/// Errors that can occur while playing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("cell ({row}, {col}) is outside a {size}x{size} board")]
    OutOfRange { row: usize, col: usize, size: usize },

    #[error("cell ({row}, {col}) is already occupied")]
    CellOccupied { row: usize, col: usize },

    #[error("invalid move: {0}")]
    InvalidMove(MoveRejection),

    #[error("unknown player id: {0}")]
    UnknownPlayerId(String),

    /// A bot returned no move while empty cells remained.
    #[error("strategy for player {player} returned no move on a non-full board")]
    IllegalStrategyResult { player: String },

    #[error("invalid board size {0}: boards are square with a side of at least 3")]
    InvalidBoardSize(usize),

    #[error("unknown marker: {0:?}")]
    UnknownMarker(String),

    #[error("unknown strategy: {0:?}")]
    UnknownStrategy(String),

    #[error("arena strategy {0:?} needs external input")]
    HumanInArena(String),
}

impl GameError {
    /// Lift a board-level failure into the match-level `InvalidMove` wrapper.
    pub fn into_invalid_move(self) -> GameError {
        match self {
            GameError::OutOfRange { row, col, size } => {
                GameError::InvalidMove(MoveRejection::OutOfRange { row, col, size })
            }
            GameError::CellOccupied { row, col } => {
                GameError::InvalidMove(MoveRejection::CellOccupied { row, col })
            }
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_errors_wrap_into_invalid_move() {
        let err = GameError::CellOccupied { row: 1, col: 2 }.into_invalid_move();
        assert_eq!(
            err,
            GameError::InvalidMove(MoveRejection::CellOccupied { row: 1, col: 2 })
        );

        let err = GameError::UnknownPlayerId("p9".into()).into_invalid_move();
        assert_eq!(err, GameError::UnknownPlayerId("p9".into()));
    }

    #[test]
    fn test_messages() {
        let err = GameError::OutOfRange { row: 3, col: 0, size: 3 };
        assert_eq!(err.to_string(), "cell (3, 0) is outside a 3x3 board");
        let err = GameError::InvalidMove(MoveRejection::MatchOver);
        assert_eq!(err.to_string(), "invalid move: the match is already over");
    }
}
