//! Square N×N grid of cells with empty-cell listing and full-line detection.
//!
//! The board is the only owner of its cells. A cell's marker changes only
//! through [`Board::set_marker`], which refuses to overwrite. Search strategies
//! explore hypothetical futures on clones; cells are plain values, so
//! `clone()` is a deep copy.

use std::fmt;

use serde::Serialize;

use crate::engine::error::{GameError, Result};
use crate::engine::models::{Marker, Position};

pub const MIN_BOARD_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Cell {
    row: usize,
    col: usize,
    marker: Option<Marker>,
}

impl Cell {
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn marker(&self) -> Option<Marker> {
        self.marker
    }

    pub fn is_empty(&self) -> bool {
        self.marker.is_none()
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Row(usize),
    Column(usize),
    /// Starts at (0, 0).
    DownRight,
    /// Starts at (size - 1, 0).
    UpRight,
}

/// A row, column or main diagonal: exactly `size` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub kind: LineKind,
    pub cells: Vec<Cell>,
}

impl Line {
    /// The shared marker if every cell holds the same one.
    pub fn marker(&self) -> Option<Marker> {
        let first = self.cells.first()?.marker?;
        self.cells
            .iter()
            .all(|c| c.marker == Some(first))
            .then_some(first)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "BoardView")]
pub struct Board {
    size: usize,
    /// Row-major; index = row * size + col.
    cells: Vec<Cell>,
}

#[derive(Serialize)]
struct BoardView {
    size: usize,
    rows: Vec<Vec<Option<Marker>>>,
}

impl From<Board> for BoardView {
    fn from(board: Board) -> Self {
        BoardView {
            size: board.size,
            rows: board
                .cells
                .chunks(board.size)
                .map(|row| row.iter().map(|c| c.marker).collect())
                .collect(),
        }
    }
}

impl Board {
    pub fn new(size: usize) -> Result<Self> {
        if size < MIN_BOARD_SIZE {
            return Err(GameError::InvalidBoardSize(size));
        }
        let cells = (0..size)
            .flat_map(|row| (0..size).map(move |col| Cell { row, col, marker: None }))
            .collect();
        Ok(Self { size, cells })
    }

    /// Parse a board from text rows: `X`/`O` for markers, `.`, `_` or `-` for
    /// empty cells. Whitespace is ignored.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let size = rows.len();
        let mut board = Board::new(size)?;
        for (row, text) in rows.iter().enumerate() {
            let symbols: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != size {
                return Err(GameError::InvalidBoardSize(symbols.len()));
            }
            for (col, symbol) in symbols.into_iter().enumerate() {
                match symbol {
                    '.' | '_' | '-' => {}
                    other => board.set_marker(row, col, other.to_string().parse::<Marker>()?)?,
                }
            }
        }
        Ok(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.size || col >= self.size {
            return Err(GameError::OutOfRange { row, col, size: self.size });
        }
        Ok(row * self.size + col)
    }

    pub fn get_cell(&self, row: usize, col: usize) -> Result<&Cell> {
        let idx = self.index(row, col)?;
        Ok(&self.cells[idx])
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells without a marker, in row-major order.
    pub fn empty_cells(&self) -> Vec<Cell> {
        self.cells.iter().copied().filter(Cell::is_empty).collect()
    }

    pub fn set_marker(&mut self, row: usize, col: usize, marker: Marker) -> Result<()> {
        let idx = self.index(row, col)?;
        let cell = &mut self.cells[idx];
        if cell.marker.is_some() {
            return Err(GameError::CellOccupied { row, col });
        }
        cell.marker = Some(marker);
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }

    fn line(&self, kind: LineKind) -> Line {
        let n = self.size;
        let cells = (0..n)
            .map(|i| {
                let (row, col) = match kind {
                    LineKind::Row(r) => (r, i),
                    LineKind::Column(c) => (i, c),
                    LineKind::DownRight => (i, i),
                    LineKind::UpRight => (n - 1 - i, i),
                };
                self.cells[row * n + col]
            })
            .collect();
        Line { kind, cells }
    }

    /// All `2 * size + 2` lines in scan order: row i, column i, and the
    /// down-right diagonal after index 0 / the up-right diagonal after index 1.
    pub fn lines(&self) -> Vec<Line> {
        let mut lines = Vec::with_capacity(2 * self.size + 2);
        for i in 0..self.size {
            lines.push(self.line(LineKind::Row(i)));
            lines.push(self.line(LineKind::Column(i)));
            match i {
                0 => lines.push(self.line(LineKind::DownRight)),
                1 => lines.push(self.line(LineKind::UpRight)),
                _ => {}
            }
        }
        lines
    }

    /// First line, in scan order, whose cells all hold the same marker.
    pub fn matching_line(&self) -> Option<Line> {
        self.lines().into_iter().find(|line| line.marker().is_some())
    }

    pub fn winner(&self) -> Option<Marker> {
        self.matching_line().and_then(|line| line.marker())
    }

    /// Marker layout only, for hashing search positions.
    pub(crate) fn markers(&self) -> Vec<Option<Marker>> {
        self.cells.iter().map(|c| c.marker).collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            let symbols: Vec<String> = row
                .iter()
                .map(|c| c.marker.map_or('.', Marker::as_char).to_string())
                .collect();
            writeln!(f, "{}", symbols.join(" "))?;
        }
        Ok(())
    }
}
