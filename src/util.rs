use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use crate::internal_util::neighbours;
use crate::solve::{BoardSize, Cell};

/// The game board as the engine sees it: fixed dimensions, and for any played
/// cell the number of mines among its neighbours. The engine never asks which
/// cells are mines.
pub trait Board {
    fn size(&self) -> BoardSize;

    /// Number of mines adjacent to `cell`, not counting `cell` itself
    fn nearby_mines(&self, cell: Cell) -> usize;
}

/// Why an ASCII minefield could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardParseError {
    #[error("board must have at least one row")]
    NoRows,
    #[error("board must be rectangular (row {row} has length {found}, expected {expected})")]
    NotRectangular {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("invalid character '{ch}' at ({row}, {col})")]
    InvalidCharacter { ch: char, row: usize, col: usize },
}

/// Simple ground-truth minefield (no game logic!)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minefield {
    mines: HashSet<Cell>,
    size: BoardSize,
}
impl Minefield {
    /// Create a minefield from an ASCII-encoded description, where:
    /// - `*` is a mine
    /// - `.` is a clear cell
    /// - Trailing or leading whitespace is ignored
    ///
    /// # Errors
    ///
    /// If the board is not rectangular, has no rows, or
    /// contains any other character, an error is returned.
    pub fn new(encoded: &str) -> Result<Self, BoardParseError> {
        let lines = encoded.trim().lines().map(str::trim).collect::<Vec<_>>();
        let height = lines.len();
        if height == 0 {
            return Err(BoardParseError::NoRows);
        }
        // the first line is non-empty after trimming
        let width = lines[0].chars().count();
        let mut mines = HashSet::new();
        for (row, line) in lines.into_iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(BoardParseError::NotRectangular {
                    row,
                    found,
                    expected: width,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                match ch {
                    '*' => {
                        mines.insert(Cell::new(row, col));
                    },
                    '.' => (),
                    _ => {
                        return Err(BoardParseError::InvalidCharacter {
                            ch,
                            row,
                            col,
                        });
                    },
                }
            }
        }
        Ok(Self {
            mines,
            size: BoardSize::new(height, width),
        })
    }

    pub fn height(&self) -> usize {
        self.size.height
    }

    pub fn width(&self) -> usize {
        self.size.width
    }

    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    pub fn mines(&self) -> &HashSet<Cell> {
        &self.mines
    }

    /// The game is won once exactly the mines have been flagged.
    pub fn won(&self, flagged: &HashSet<Cell>) -> bool {
        flagged == &self.mines
    }
}
impl Board for Minefield {
    fn size(&self) -> BoardSize {
        self.size
    }

    fn nearby_mines(&self, cell: Cell) -> usize {
        neighbours(cell, self.size)
            .into_iter()
            .filter(|&c| self.is_mine(c))
            .count()
    }
}
impl fmt::Display for Minefield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size.height {
            for col in 0..self.size.width {
                let ch = if self.is_mine(Cell::new(row, col)) { '*' } else { '.' };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const FIELD: &str = "
        *...
        ..*.
        ....
    ";

    #[test]
    fn parses_mines() {
        let field = Minefield::new(FIELD).unwrap();
        assert_eq!(field.size(), BoardSize::new(3, 4));
        assert_eq!(
            field.mines(),
            &HashSet::from([Cell::new(0, 0), Cell::new(1, 2)]),
        );
        assert!(field.is_mine(Cell::new(1, 2)));
        assert!(!field.is_mine(Cell::new(2, 3)));
    }

    #[test]
    fn counts_neighbouring_mines() {
        let field = Minefield::new(FIELD).unwrap();
        assert_eq!(field.nearby_mines(Cell::new(0, 1)), 2);
        assert_eq!(field.nearby_mines(Cell::new(1, 1)), 2);
        assert_eq!(field.nearby_mines(Cell::new(2, 0)), 0);
        assert_eq!(field.nearby_mines(Cell::new(2, 3)), 1);
        // a mine does not count itself
        assert_eq!(field.nearby_mines(Cell::new(0, 0)), 0);
    }

    #[test]
    fn display_round_trips() {
        let field = Minefield::new(FIELD).unwrap();
        assert_eq!(field.to_string(), "*...\n..*.\n....\n");
        assert_eq!(Minefield::new(&field.to_string()).unwrap(), field);
    }

    #[test]
    fn won_requires_exact_flags() {
        let field = Minefield::new(FIELD).unwrap();
        let mut flagged = HashSet::from([Cell::new(0, 0)]);
        assert!(!field.won(&flagged));
        flagged.insert(Cell::new(1, 2));
        assert!(field.won(&flagged));
        flagged.insert(Cell::new(2, 2));
        assert!(!field.won(&flagged));
    }

    #[test]
    fn rejects_malformed_boards() {
        assert_eq!(Minefield::new("  \n "), Err(BoardParseError::NoRows));
        assert_eq!(
            Minefield::new("...\n..\n..."),
            Err(BoardParseError::NotRectangular {
                row: 1,
                found: 2,
                expected: 3,
            }),
        );
        assert_eq!(
            Minefield::new("..\n.x"),
            Err(BoardParseError::InvalidCharacter {
                ch: 'x',
                row: 1,
                col: 1,
            }),
        );
    }
}
