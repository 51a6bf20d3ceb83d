//! The inference engine: sentences, the knowledge base that resolves them, and
//! move selection over the resulting facts.

mod knowledge;
mod select;
mod types;

pub use self::knowledge::KnowledgeBase;
pub use self::types::{BoardSize, Cell, InconsistencyError, KnowledgeError, Sentence};
