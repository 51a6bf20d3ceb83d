//! Choosing the next cell to probe from what the knowledge base has proven.
//!
//! Selection never touches the knowledge base; the only state consumed is the
//! caller's random source. Candidates are listed row-major before a random one
//! is drawn, so a seeded source always replays the same moves.

use itertools::Itertools;
use rand::Rng;
use tracing::debug;

use crate::internal_util::pick;
use crate::solve::{Cell, KnowledgeBase};

impl KnowledgeBase {
    /// Cells proven safe that have not been played yet, row-major
    pub fn safe_moves(&self) -> Vec<Cell> {
        self.safes()
            .iter()
            .copied()
            .filter(|c| !self.moves_made().contains(c) && !self.mines().contains(c))
            .sorted()
            .collect()
    }

    /// Cells that are neither played nor known mines, row-major; may include
    /// cells whose status is unknown.
    pub fn open_moves(&self) -> Vec<Cell> {
        self.size()
            .cells()
            .filter(|c| !self.moves_made().contains(c) && !self.mines().contains(c))
            .collect()
    }

    /// A cell known to be safe and not yet played, if there is one.
    pub fn make_safe_move(&self, rng: &mut impl Rng) -> Option<Cell> {
        let choice = pick(&self.safe_moves(), rng);
        if let Some(cell) = choice {
            debug!(%cell, "safe move");
        }
        choice
    }

    /// Any cell that has not been played and is not a known mine. Not
    /// guaranteed to be safe.
    pub fn make_random_move(&self, rng: &mut impl Rng) -> Option<Cell> {
        let choice = pick(&self.open_moves(), rng);
        if let Some(cell) = choice {
            debug!(%cell, "random move");
        }
        choice
    }
}
