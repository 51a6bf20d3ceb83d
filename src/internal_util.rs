use std::cmp::min;

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::solve::{BoardSize, Cell};

/// The up to 8 cells sharing an edge or corner with `cell` that lie on the
/// board, row-major.
pub(crate) fn neighbours(Cell { row, col }: Cell, size: BoardSize) -> Vec<Cell> {
    if size.height == 0 || size.width == 0 {
        return Vec::new();
    }
    let mut adjacent = Vec::with_capacity(8);
    for r in row.saturating_sub(1)..=min(row + 1, size.height - 1) {
        for c in col.saturating_sub(1)..=min(col + 1, size.width - 1) {
            if r == row && c == col {
                continue;
            }
            adjacent.push(Cell::new(r, c));
        }
    }
    adjacent
}

/// Choose an arbitrary item from `candidates`, or `None` if there are none.
///
/// `candidates` should be in a deterministic order so that a seeded `rng`
/// reproduces the same choice.
pub(crate) fn pick<T: Copy>(candidates: &[T], rng: &mut impl Rng) -> Option<T> {
    candidates.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn interior_cell_has_eight_neighbours() {
        let found = neighbours(Cell::new(1, 1), BoardSize::new(3, 3));
        assert_eq!(found.len(), 8);
        assert!(!found.contains(&Cell::new(1, 1)));
    }

    #[test]
    fn corner_and_edge_cells_are_clipped() {
        let size = BoardSize::new(4, 5);
        assert_eq!(
            neighbours(Cell::new(0, 0), size),
            vec![Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)],
        );
        assert_eq!(neighbours(Cell::new(3, 4), size).len(), 3);
        assert_eq!(neighbours(Cell::new(0, 2), size).len(), 5);
    }

    #[test]
    fn degenerate_boards() {
        assert!(neighbours(Cell::new(0, 0), BoardSize::new(1, 1)).is_empty());
        assert_eq!(
            neighbours(Cell::new(0, 1), BoardSize::new(1, 3)),
            vec![Cell::new(0, 0), Cell::new(0, 2)],
        );
    }

    #[test]
    fn pick_is_reproducible() {
        let candidates = [1, 2, 3, 4, 5, 6, 7];
        let mut a = SmallRng::seed_from_u64(7);
        let mut b = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(pick(&candidates, &mut a), pick(&candidates, &mut b));
        }
        assert_eq!(pick::<u8>(&[], &mut a), None);
    }
}
