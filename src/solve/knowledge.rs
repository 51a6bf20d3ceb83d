use std::collections::HashSet;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::internal_util::neighbours;
use crate::solve::{BoardSize, Cell, InconsistencyError, KnowledgeError, Sentence};

/// Everything known about one game: the moves played, the cells proven safe
/// or mined, and the sentences that are still only partially resolved.
///
/// Every public mutator either succeeds, leaving the knowledge base at a
/// fixpoint, or fails and leaves it exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    size: BoardSize,
    moves_made: HashSet<Cell>,
    safes: HashSet<Cell>,
    mines: HashSet<Cell>,
    sentences: Vec<Sentence>,
}
impl KnowledgeBase {
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            moves_made: HashSet::new(),
            safes: HashSet::new(),
            mines: HashSet::new(),
            sentences: Vec::new(),
        }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// Cells that have already been probed
    pub fn moves_made(&self) -> &HashSet<Cell> {
        &self.moves_made
    }

    /// Cells proven to be mine-free
    pub fn safes(&self) -> &HashSet<Cell> {
        &self.safes
    }

    /// Cells proven to be mines
    pub fn mines(&self) -> &HashSet<Cell> {
        &self.mines
    }

    /// Sentences that still carry information, in insertion order
    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Has this cell been played, or proven safe or mined?
    pub fn is_resolved(&self, cell: Cell) -> bool {
        self.moves_made.contains(&cell)
            || self.safes.contains(&cell)
            || self.mines.contains(&cell)
    }

    /// The on-board cells adjacent to `cell`
    pub fn neighbours(&self, cell: Cell) -> Vec<Cell> {
        neighbours(cell, self.size)
    }

    /// Record that the board reported `count` mines around the played `cell`,
    /// then deduce everything that follows.
    ///
    /// # Errors
    ///
    /// [`KnowledgeError::OutOfBounds`] if `cell` is not on the board;
    /// [`KnowledgeError::Contradiction`] if `count` cannot be reconciled with
    /// the mines and safe cells already known. Either way nothing changes.
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) -> Result<(), KnowledgeError> {
        self.check_bounds(cell)?;
        self.transaction(|kb| {
            kb.observe(cell, count)?;
            kb.resolve_to_fixpoint()?;
            Ok(())
        })
    }

    /// Add an arbitrary constraint, then deduce everything that follows.
    ///
    /// Cells of `sentence` that are already resolved are folded in first:
    /// known safes are dropped, known mines are dropped and counted off.
    pub fn add_sentence(&mut self, sentence: Sentence) -> Result<(), KnowledgeError> {
        if let Some(&cell) = sentence.cells().iter().find(|&&c| !self.size.contains(c)) {
            return Err(self.out_of_bounds(cell));
        }
        self.transaction(|kb| {
            kb.insert(sentence)?;
            kb.resolve_to_fixpoint()?;
            Ok(())
        })
    }

    /// Manually mark `cell` as a mine (e.g. the player flagged it) and
    /// propagate that into every sentence. No further deduction is run.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<(), KnowledgeError> {
        self.check_bounds(cell)?;
        self.transaction(|kb| {
            kb.mark_mine_global(cell)?;
            kb.prune();
            Ok(())
        })
    }

    /// Manually mark `cell` as safe and propagate that into every sentence.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<(), KnowledgeError> {
        self.check_bounds(cell)?;
        self.transaction(|kb| {
            kb.mark_safe_global(cell)?;
            kb.prune();
            Ok(())
        })
    }

    /// Read off every known-safe and known-mine fact until none remain.
    ///
    /// Returns whether anything was learned.
    pub fn saturate(&mut self) -> Result<bool, KnowledgeError> {
        self.transaction(Self::saturate_in_place)
    }

    /// Run subset resolution (and saturation) to a fixpoint.
    ///
    /// Returns whether anything was learned.
    pub fn resolve(&mut self) -> Result<bool, KnowledgeError> {
        self.transaction(Self::resolve_to_fixpoint)
    }

    fn check_bounds(&self, cell: Cell) -> Result<(), KnowledgeError> {
        if self.size.contains(cell) {
            Ok(())
        } else {
            Err(self.out_of_bounds(cell))
        }
    }

    fn out_of_bounds(&self, cell: Cell) -> KnowledgeError {
        KnowledgeError::OutOfBounds {
            cell,
            size: self.size,
        }
    }

    /// Apply `update` to a copy and keep the copy only if it succeeds.
    fn transaction<T>(
        &mut self,
        update: impl FnOnce(&mut Self) -> Result<T, InconsistencyError>,
    ) -> Result<T, KnowledgeError> {
        let mut draft = self.clone();
        let result = update(&mut draft)?;
        *self = draft;
        Ok(result)
    }

    /// Add `cell` to the known mines and remove it from every sentence.
    ///
    /// Returns whether the cell was newly learned.
    fn mark_mine_global(&mut self, cell: Cell) -> Result<bool, InconsistencyError> {
        if self.safes.contains(&cell) {
            return Err(InconsistencyError::at("Cell is known to be both safe and a mine", cell));
        }
        // validate everything first so a failure leaves no sentence half-updated
        for sentence in &self.sentences {
            sentence.check_mine(cell)?;
        }
        for sentence in &mut self.sentences {
            sentence.mark_mine(cell)?;
        }
        let learned = self.mines.insert(cell);
        if learned {
            debug!(%cell, "marked mine");
        }
        Ok(learned)
    }

    /// Add `cell` to the known safes and remove it from every sentence.
    ///
    /// Returns whether the cell was newly learned.
    fn mark_safe_global(&mut self, cell: Cell) -> Result<bool, InconsistencyError> {
        if self.mines.contains(&cell) {
            return Err(InconsistencyError::at("Cell is known to be both safe and a mine", cell));
        }
        for sentence in &self.sentences {
            sentence.check_safe(cell)?;
        }
        for sentence in &mut self.sentences {
            sentence.mark_safe(cell)?;
        }
        let learned = self.safes.insert(cell);
        if learned {
            debug!(%cell, "marked safe");
        }
        Ok(learned)
    }

    /// Record the move and turn the reported count into a sentence over the
    /// neighbours that are still unresolved.
    fn observe(&mut self, cell: Cell, count: usize) -> Result<(), InconsistencyError> {
        debug!(%cell, count, "recording move");
        self.moves_made.insert(cell);
        self.mark_safe_global(cell)?;

        let adjacent = self.neighbours(cell);
        let known_mines = adjacent.iter().filter(|&c| self.mines.contains(c)).count();
        let unresolved = adjacent
            .into_iter()
            .filter(|&c| !self.is_resolved(c))
            .collect_vec();

        let count = count.checked_sub(known_mines).ok_or_else(|| {
            InconsistencyError::at("Fewer mines reported than are already known nearby", cell)
        })?;
        if count > unresolved.len() {
            return Err(InconsistencyError::at(
                "More mines reported than there are unresolved neighbours",
                cell,
            ));
        }
        if !unresolved.is_empty() {
            let sentence = Sentence::new(unresolved, count)?;
            debug!(%sentence, "adding sentence");
            self.sentences.push(sentence);
        }
        Ok(())
    }

    /// Fold already-resolved cells out of `sentence` and add what is left.
    fn insert(&mut self, mut sentence: Sentence) -> Result<(), InconsistencyError> {
        let resolved = sentence
            .cells()
            .iter()
            .copied()
            .filter(|c| self.safes.contains(c) || self.mines.contains(c))
            .collect_vec();
        for cell in resolved {
            if self.mines.contains(&cell) {
                sentence.mark_mine(cell)?;
            } else {
                sentence.mark_safe(cell)?;
            }
        }
        if !sentence.is_empty() {
            debug!(%sentence, "adding sentence");
            self.sentences.push(sentence);
        }
        Ok(())
    }

    /// Discard empty sentences and all but the first copy of duplicates.
    fn prune(&mut self) {
        self.sentences = std::mem::take(&mut self.sentences)
            .into_iter()
            .filter(|s| !s.is_empty())
            .unique()
            .collect();
    }

    fn saturate_in_place(&mut self) -> Result<bool, InconsistencyError> {
        let mut learned = false;
        loop {
            self.prune();
            let mut safes = Vec::new();
            let mut mines = Vec::new();
            for sentence in &self.sentences {
                safes.extend(sentence.known_safes());
                mines.extend(sentence.known_mines());
            }
            if safes.is_empty() && mines.is_empty() {
                break;
            }
            trace!(safes = safes.len(), mines = mines.len(), "saturation pass");
            // each mark removes its cell from every sentence, so every pass
            // shrinks the sentences and the loop terminates
            for cell in safes {
                self.mark_safe_global(cell)?;
            }
            for cell in mines {
                self.mark_mine_global(cell)?;
            }
            learned = true;
        }
        Ok(learned)
    }

    /// For every pair of sentences where one's cells are contained in the
    /// other's, the difference sentence; only those not already known.
    fn infer_sentences(&self) -> Result<Vec<Sentence>, InconsistencyError> {
        let known = self.sentences.iter().collect::<HashSet<_>>();
        let mut inferred = Vec::new();
        for (a, b) in self.sentences.iter().tuple_combinations() {
            if a.cells() == b.cells() {
                if a.count() != b.count() {
                    return Err(InconsistencyError::new(
                        "Two sentences over the same cells disagree on the count",
                    ));
                }
                continue;
            }
            for (sub, sup) in [(a, b), (b, a)] {
                if !sub.is_subset_of(sup) {
                    continue;
                }
                let derived = sub.subtract_from(sup)?;
                if !derived.is_empty() && !known.contains(&derived) {
                    trace!(%derived, from = %sup, by = %sub, "resolved");
                    inferred.push(derived);
                }
            }
        }
        Ok(inferred.into_iter().unique().collect())
    }

    fn resolve_to_fixpoint(&mut self) -> Result<bool, InconsistencyError> {
        let mut learned = self.saturate_in_place()?;
        loop {
            let inferred = self.infer_sentences()?;
            if inferred.is_empty() {
                break;
            }
            for sentence in inferred {
                debug!(%sentence, "inferred sentence");
                self.sentences.push(sentence);
            }
            self.saturate_in_place()?;
            learned = true;
        }
        Ok(learned)
    }
}
