//! Exhaustive minimax search for perfect play.
//!
//! Terminal boards are graded from the searching player's point of view:
//! +1 for a win, -1 for a loss, 0 for a full board with no line. Both sides
//! prefer the longer game when grades are equal, and the root picks uniformly
//! among moves tied on grade and depth.
//!
//! Nested calls only report `{grade, depth}`, so a transposition table keyed on
//! (cells, side to move) that stores the grade and the plies remaining is exact:
//! it never changes which moves tie at the root.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::board::Board;
use crate::engine::error::Result;
use crate::engine::models::{Marker, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimaxParams {
    #[serde(default = "default_use_transposition_table")]
    pub use_transposition_table: bool,
}

fn default_use_transposition_table() -> bool {
    true
}

impl Default for MinimaxParams {
    fn default() -> Self {
        Self {
            use_transposition_table: default_use_transposition_table(),
        }
    }
}

/// Outcome of a line of play: the grade it ends with and how many moves it took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Graded {
    pub grade: i8,
    pub depth: usize,
}

/// Grade a terminal board for `me`; `None` while the game is still open.
pub fn grade(board: &Board, me: Marker) -> Option<i8> {
    match board.winner() {
        Some(winner) if winner == me => Some(1),
        Some(_) => Some(-1),
        None if board.is_full() => Some(0),
        None => None,
    }
}

fn is_better(candidate: Graded, best: Graded, maximizing: bool) -> bool {
    let better_grade = if maximizing {
        candidate.grade > best.grade
    } else {
        candidate.grade < best.grade
    };
    better_grade || (candidate.grade == best.grade && candidate.depth > best.depth)
}

fn best_of(grades: impl IntoIterator<Item = Graded>, maximizing: bool) -> Option<Graded> {
    grades.into_iter().reduce(|best, cur| {
        if is_better(cur, best, maximizing) {
            cur
        } else {
            best
        }
    })
}

type TableKey = (Vec<Option<Marker>>, Marker);

#[derive(Debug, Default, Clone, Copy)]
pub struct SearchStats {
    pub nodes: usize,
    pub table_hits: usize,
}

struct Search {
    me: Marker,
    /// (grade, plies remaining) per position.
    table: Option<HashMap<TableKey, (i8, usize)>>,
    stats: SearchStats,
}

impl Search {
    fn new(me: Marker, params: &MinimaxParams) -> Self {
        Self {
            me,
            table: params.use_transposition_table.then(HashMap::new),
            stats: SearchStats::default(),
        }
    }

    fn evaluate(&mut self, board: &Board, to_move: Marker, depth: usize) -> Result<Graded> {
        self.stats.nodes += 1;
        if let Some(grade) = grade(board, self.me) {
            return Ok(Graded { grade, depth });
        }

        let key = self.table.as_ref().map(|_| (board.markers(), to_move));
        if let (Some(table), Some(key)) = (self.table.as_ref(), key.as_ref()) {
            if let Some(&(grade, remaining)) = table.get(key) {
                self.stats.table_hits += 1;
                return Ok(Graded { grade, depth: depth + remaining });
            }
        }

        let candidates = self.expand(board, to_move, depth)?;
        let best = best_of(candidates.into_iter().map(|(_, g)| g), to_move == self.me)
            .unwrap_or(Graded { grade: 0, depth });

        if let (Some(table), Some(key)) = (self.table.as_mut(), key) {
            table.insert(key, (best.grade, best.depth - depth));
        }
        Ok(best)
    }

    /// Grade every move available to `to_move`.
    fn expand(
        &mut self,
        board: &Board,
        to_move: Marker,
        depth: usize,
    ) -> Result<Vec<(Position, Graded)>> {
        let mut out = Vec::new();
        for cell in board.empty_cells() {
            let mut next = board.clone();
            next.set_marker(cell.row(), cell.col(), to_move)?;
            let graded = self.evaluate(&next, to_move.opponent(), depth + 1)?;
            out.push((cell.position(), graded));
        }
        Ok(out)
    }
}

/// Every legal move for `me` paired with its minimax outcome.
pub fn root_candidates(
    board: &Board,
    me: Marker,
    params: &MinimaxParams,
) -> Result<Vec<(Position, Graded)>> {
    Search::new(me, params).expand(board, me, 0)
}

/// Minimax value of `board` for `me` with `to_move` about to play.
pub fn minimax_value(
    board: &Board,
    to_move: Marker,
    me: Marker,
    params: &MinimaxParams,
) -> Result<Graded> {
    Search::new(me, params).evaluate(board, to_move, 0)
}

/// Choose a move for `me`. Returns `None` if the board is already decided.
pub fn minimax_search<R: Rng + ?Sized>(
    board: &Board,
    me: Marker,
    params: &MinimaxParams,
    rng: &mut R,
) -> Result<Option<Position>> {
    if grade(board, me).is_some() {
        return Ok(None);
    }

    let mut search = Search::new(me, params);
    let candidates = search.expand(board, me, 0)?;
    let Some(best) = best_of(candidates.iter().map(|(_, g)| *g), true) else {
        return Ok(None);
    };

    let tied: Vec<Position> = candidates
        .iter()
        .filter(|(_, g)| *g == best)
        .map(|(pos, _)| *pos)
        .collect();
    let choice = tied.choose(rng).copied();

    tracing::debug!(
        marker = %me,
        grade = best.grade,
        depth = best.depth,
        tied = tied.len(),
        nodes = search.stats.nodes,
        table_hits = search.stats.table_hits,
        chosen = ?choice,
        "minimax move"
    );
    Ok(choice)
}
