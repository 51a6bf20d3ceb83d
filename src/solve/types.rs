use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The state of the game is logically inconsistent.
///
/// Raised whenever an observation or an injected fact cannot be reconciled
/// with what the knowledge base has already derived.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Error)]
#[error("{reason}{}", located_at(.cell))]
pub struct InconsistencyError {
    /// What went wrong
    pub reason: &'static str,
    /// The cell at which the inconsistency was detected, if any
    pub cell: Option<Cell>,
}
impl InconsistencyError {
    pub(crate) fn new(reason: &'static str) -> Self {
        Self {
            reason,
            cell: None,
        }
    }

    pub(crate) fn at(reason: &'static str, cell: Cell) -> Self {
        Self {
            reason,
            cell: Some(cell),
        }
    }
}

fn located_at(cell: &Option<Cell>) -> String {
    cell.map(|cell| format!(" at {cell}")).unwrap_or_default()
}

/// Errors surfaced by the public operations of the knowledge base.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Error)]
pub enum KnowledgeError {
    /// The cell does not lie on the board
    #[error("cell {cell} lies outside the {size} board")]
    OutOfBounds { cell: Cell, size: BoardSize },
    /// The new information contradicts what is already known
    #[error("contradictory knowledge: {0}")]
    Contradiction(#[from] InconsistencyError),
}

/// A cell on the board, addressed by 0-indexed row and column.
///
/// Ordering is row-major.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}
impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
        }
    }
}
impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}
impl From<Cell> for (usize, usize) {
    fn from(cell: Cell) -> Self {
        (cell.row, cell.col)
    }
}
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Board geometry; fixed for the lifetime of a game.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardSize {
    pub height: usize,
    pub width: usize,
}
impl BoardSize {
    pub const fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
        }
    }

    /// Does the cell lie within `[0, height) x [0, width)`?
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    pub fn total_cells(&self) -> usize {
        self.height * self.width
    }

    /// All cells of the board, row-major
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let width = self.width;
        (0..self.height)
            .cartesian_product(0..width)
            .map(Cell::from)
    }
}
impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}

/// A logical statement about the board: exactly `count` of `cells` are mines.
///
/// Always satisfies `count <= cells.len()`. Equality is structural: two
/// sentences are equal iff they have the same cell set and the same count.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    count: usize,
}
impl Sentence {
    pub fn new(
        cells: impl IntoIterator<Item = Cell>,
        count: usize,
    ) -> Result<Self, InconsistencyError> {
        let cells = cells.into_iter().collect::<BTreeSet<_>>();
        if count > cells.len() {
            return Err(InconsistencyError::new("Sentence with more mines than cells"));
        }
        Ok(Self {
            cells,
            count,
        })
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Cells known to be mines: all of them when every cell must hold one.
    pub fn known_mines(&self) -> BTreeSet<Cell> {
        if self.count > 0 && self.count == self.cells.len() {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Cells known to be safe: all of them when the count is zero.
    pub fn known_safes(&self) -> BTreeSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Fails if removing `cell` as a mine would leave a negative count.
    pub fn check_mine(&self, cell: Cell) -> Result<(), InconsistencyError> {
        if self.contains(cell) && self.count == 0 {
            Err(InconsistencyError::at(
                "Mine in a sentence that has no mines left",
                cell,
            ))
        } else {
            Ok(())
        }
    }

    /// Fails if removing `cell` as safe would leave more mines than cells.
    pub fn check_safe(&self, cell: Cell) -> Result<(), InconsistencyError> {
        if self.contains(cell) && self.count == self.cells.len() {
            Err(InconsistencyError::at(
                "Safe cell in a sentence where every cell is a mine",
                cell,
            ))
        } else {
            Ok(())
        }
    }

    /// `cell` is a mine: drop it and account for one fewer mine. No-op if the
    /// cell is not part of this sentence.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<(), InconsistencyError> {
        self.check_mine(cell)?;
        if self.cells.remove(&cell) {
            self.count -= 1;
        }
        Ok(())
    }

    /// `cell` is safe: drop it, the count is unchanged. No-op if the cell is
    /// not part of this sentence.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<(), InconsistencyError> {
        self.check_safe(cell)?;
        self.cells.remove(&cell);
        Ok(())
    }

    /// Check if this sentence's cells are a subset of `other`'s
    ///
    /// Equivalent cell sets are subsets of each other.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.cells.is_subset(&other.cells)
    }

    /// If this sentence is a subset of `other`, return a new sentence over the
    /// cells of `other` that are not in `self`, holding the balance of mines.
    pub fn subtract_from(&self, other: &Self) -> Result<Self, InconsistencyError> {
        if !self.is_subset_of(other) {
            return Err(InconsistencyError::new("Subtraction of non-subset sentence"));
        }
        let count = other.count.checked_sub(self.count).ok_or_else(|| {
            InconsistencyError::new("Subset sentence holds more mines than its superset")
        })?;
        let cells = other.cells.difference(&self.cells).copied();
        Self::new(cells, count).map_err(|_| {
            InconsistencyError::new("Superset sentence holds too many mines outside its subset")
        })
    }
}
impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}} = {}", self.cells.iter().join(", "), self.count)
    }
}
