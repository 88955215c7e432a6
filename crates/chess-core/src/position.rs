//! Board coordinate representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A square on the chess board, addressed by 1-indexed row and column.
///
/// Row 1 is White's back rank and column 1 is the a-file, so `a1` is
/// `(1, 1)` and `h8` is `(8, 8)`. Values outside `1..=8` cannot be
/// constructed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// Creates a position, returning `None` if either coordinate is off the board.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row >= 1 && row <= 8 && col >= 1 && col <= 8 {
            Some(Position { row, col })
        } else {
            None
        }
    }

    /// Creates a position from a dense index (0-63, a1 = 0, h1 = 7, h8 = 63).
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 64 {
            Some(Position {
                row: (index / 8) as u8 + 1,
                col: (index % 8) as u8 + 1,
            })
        } else {
            None
        }
    }

    /// Parses a position from algebraic notation (e.g., "e4").
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return None;
        }
        Position::new(rank - b'0', file - b'a' + 1)
    }

    /// Returns the row (1-8).
    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    /// Returns the column (1-8).
    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Returns the dense index (0-63).
    #[inline]
    pub const fn index(self) -> usize {
        (self.row as usize - 1) * 8 + (self.col as usize - 1)
    }

    /// Returns the position shifted by the given row and column deltas, if still on the board.
    #[inline]
    pub fn offset(self, drow: i8, dcol: i8) -> Option<Self> {
        let row = (self.row as i8).checked_add(drow)?;
        let col = (self.col as i8).checked_add(dcol)?;
        if (1..=8).contains(&row) && (1..=8).contains(&col) {
            Some(Position {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Returns the file letter ('a'-'h').
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.col - 1) as char
    }

    /// Returns the algebraic notation for this position.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.row)
    }

    /// Iterates over all 64 positions in index order (a1, b1, ..., h8).
    pub fn all() -> impl Iterator<Item = Position> {
        (0..64).filter_map(Position::from_index)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_algebraic())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

impl TryFrom<String> for Position {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Position::from_algebraic(&value).ok_or_else(|| format!("invalid square '{}'", value))
    }
}

impl From<Position> for String {
    fn from(pos: Position) -> Self {
        pos.to_algebraic()
    }
}
