//! Move-selection strategies.
//!
//! A strategy is a plain tagged value bound to a player. It keeps no state
//! between calls; every decision is made from the board it is handed.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::board::Board;
use crate::engine::error::{GameError, Result};
use crate::engine::minimax::{minimax_search, MinimaxParams};
use crate::engine::models::{Marker, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Strategy {
    /// Waits for input from outside the engine.
    Human,
    Random,
    /// One-ply lookahead: win if possible, otherwise block, otherwise random.
    Heuristic,
    Minimax(MinimaxParams),
}

/// Strategy tag without parameters, as chosen in a UI or on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Human,
    Random,
    Heuristic,
    Minimax,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Human => "human",
            StrategyKind::Random => "random",
            StrategyKind::Heuristic => "heuristic",
            StrategyKind::Minimax => "minimax",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = GameError;

    /// Accepts the difficulty names (`easy`, `normal`, `hard`) as aliases.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(StrategyKind::Human),
            "random" | "easy" => Ok(StrategyKind::Random),
            "heuristic" | "normal" => Ok(StrategyKind::Heuristic),
            "minimax" | "hard" => Ok(StrategyKind::Minimax),
            _ => Err(GameError::UnknownStrategy(s.to_string())),
        }
    }
}

impl From<StrategyKind> for Strategy {
    fn from(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Human => Strategy::Human,
            StrategyKind::Random => Strategy::Random,
            StrategyKind::Heuristic => Strategy::Heuristic,
            StrategyKind::Minimax => Strategy::Minimax(MinimaxParams::default()),
        }
    }
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Human => StrategyKind::Human,
            Strategy::Random => StrategyKind::Random,
            Strategy::Heuristic => StrategyKind::Heuristic,
            Strategy::Minimax(_) => StrategyKind::Minimax,
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, Strategy::Human)
    }

    /// Pick a move for `me` against `opponent`.
    ///
    /// Returns `Ok(None)` for `Human`, and for the bots only when the board
    /// has no empty cell left.
    pub fn select_move<R: Rng + ?Sized>(
        &self,
        board: &Board,
        me: Marker,
        opponent: Marker,
        rng: &mut R,
    ) -> Result<Option<Position>> {
        match self {
            Strategy::Human => Ok(None),
            Strategy::Random => Ok(random_move(board, rng)),
            Strategy::Heuristic => heuristic_move(board, me, opponent, rng),
            Strategy::Minimax(params) => minimax_search(board, me, params, rng),
        }
    }
}

fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Position> {
    board.empty_cells().choose(rng).map(|cell| cell.position())
}

/// First empty cell where `marker` would complete a line.
fn completing_move(board: &Board, marker: Marker) -> Result<Option<Position>> {
    for cell in board.empty_cells() {
        let mut scratch = board.clone();
        scratch.set_marker(cell.row(), cell.col(), marker)?;
        if scratch.winner() == Some(marker) {
            return Ok(Some(cell.position()));
        }
    }
    Ok(None)
}

fn heuristic_move<R: Rng + ?Sized>(
    board: &Board,
    me: Marker,
    opponent: Marker,
    rng: &mut R,
) -> Result<Option<Position>> {
    if let Some(pos) = completing_move(board, me)? {
        tracing::debug!(marker = %me, %pos, "heuristic: winning move");
        return Ok(Some(pos));
    }
    if let Some(pos) = completing_move(board, opponent)? {
        tracing::debug!(marker = %me, %pos, "heuristic: blocking move");
        return Ok(Some(pos));
    }
    Ok(random_move(board, rng))
}
