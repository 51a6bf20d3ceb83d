//! A knowledge-based minesweeper player.
//!
//! Each time a cell is played the board reports how many of its neighbours
//! are mines. The [`KnowledgeBase`] turns every such report into a
//! [`Sentence`] ("exactly N of these cells are mines") and deduces new facts
//! until nothing more follows:
//!
//! - a sentence with a count of zero proves all of its cells safe;
//! - a sentence with as many mines as cells proves all of its cells mines;
//! - when one sentence's cells are a subset of another's, the difference of
//!   the two is a new sentence.
//!
//! This is not a complete solver: positions that can only be settled by
//! enumerating every consistent mine layout are left undecided.
//!
//! ```
//! use minesweeper_ai::{Agent, Cell};
//!
//! let mut agent = Agent::seeded(3, 3, 1);
//! agent.add_knowledge(Cell::new(2, 2), 0).unwrap();
//! let next = agent.make_safe_move().unwrap();
//! assert!(agent.knowledge().safes().contains(&next));
//! ```
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

mod internal_util;
pub mod solve;
pub mod util;

pub use solve::{BoardSize, Cell, InconsistencyError, KnowledgeBase, KnowledgeError, Sentence};
pub use util::{Board, BoardParseError, Minefield};

/// A knowledge base paired with the random source used to pick moves.
#[derive(Debug, Clone)]
pub struct Agent<R: Rng = SmallRng> {
    knowledge: KnowledgeBase,
    rng: R,
}
impl Agent<SmallRng> {
    /// An agent for a `height` x `width` board, drawing moves from OS entropy.
    pub fn new(height: usize, width: usize) -> Self {
        Self::with_rng(BoardSize::new(height, width), SmallRng::from_os_rng())
    }

    /// An agent whose move choices replay identically for the same `seed`.
    pub fn seeded(height: usize, width: usize, seed: u64) -> Self {
        Self::with_rng(BoardSize::new(height, width), SmallRng::seed_from_u64(seed))
    }
}
impl<R: Rng> Agent<R> {
    pub fn with_rng(size: BoardSize, rng: R) -> Self {
        Self {
            knowledge: KnowledgeBase::new(size),
            rng,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// See [`KnowledgeBase::add_knowledge`]
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) -> Result<(), KnowledgeError> {
        self.knowledge.add_knowledge(cell, count)
    }

    /// See [`KnowledgeBase::mark_mine`]
    pub fn mark_mine(&mut self, cell: Cell) -> Result<(), KnowledgeError> {
        self.knowledge.mark_mine(cell)
    }

    /// See [`KnowledgeBase::mark_safe`]
    pub fn mark_safe(&mut self, cell: Cell) -> Result<(), KnowledgeError> {
        self.knowledge.mark_safe(cell)
    }

    /// A cell proven safe that has not been played, if any.
    pub fn make_safe_move(&mut self) -> Option<Cell> {
        self.knowledge.make_safe_move(&mut self.rng)
    }

    /// Any unplayed cell not known to be a mine, if any. May be a mine.
    pub fn make_random_move(&mut self) -> Option<Cell> {
        self.knowledge.make_random_move(&mut self.rng)
    }

    /// A safe move when one is known, otherwise a random one.
    pub fn next_move(&mut self) -> Option<Cell> {
        self.make_safe_move().or_else(|| self.make_random_move())
    }
}
