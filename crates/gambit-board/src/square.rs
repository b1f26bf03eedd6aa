//! Board squares in the game model's own coordinates.

use std::fmt;
use std::str::FromStr;

use crate::BoardError;

/// Number of ranks (and files) on the board.
pub const BOARD_SIZE: u8 = 8;

/// A square on the board: file 0 is `a`, rank 0 is `1`.
///
/// Indexing follows the usual little-endian rank-file layout, so `a1` is
/// index 0, `h1` is 7 and `h8` is 63.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Creates a square, or `None` if either coordinate is off the board.
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        (file < BOARD_SIZE && rank < BOARD_SIZE).then_some(Self { file, rank })
    }

    /// Creates a square from its 0–63 index.
    pub fn from_index(index: usize) -> Option<Self> {
        let size = usize::from(BOARD_SIZE);
        (index < size * size).then(|| Self {
            file: (index % size) as u8,
            rank: (index / size) as u8,
        })
    }

    /// Like [`Square::from_index`], but reduces out-of-range indices modulo
    /// 64 instead of failing. For engine squares that are valid by
    /// construction.
    pub(crate) fn from_index_wrapping(index: usize) -> Self {
        let size = usize::from(BOARD_SIZE);
        let index = index % (size * size);
        Self {
            file: (index % size) as u8,
            rank: (index / size) as u8,
        }
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    pub fn index(self) -> usize {
        usize::from(self.rank) * usize::from(BOARD_SIZE) + usize::from(self.file)
    }

    /// `true` for light squares (`a1` is dark).
    pub fn is_light(self) -> bool {
        (self.file + self.rank) % 2 == 1
    }

    /// The coordinate as written in move strings, e.g. `e4`.
    pub fn to_algebraic(self) -> String {
        self.to_string()
    }

    pub fn file_char(self) -> char {
        char::from(b'a' + self.file)
    }

    pub fn rank_char(self) -> char {
        char::from(b'1' + self.rank)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BoardError::InvalidSquare(s.to_string());
        match s.as_bytes() {
            [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => {
                Square::new(file - b'a', rank - b'1').ok_or_else(invalid)
            }
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_algebraic() {
        assert_eq!(Square::new(0, 0).unwrap().to_algebraic(), "a1");
        assert_eq!(Square::new(4, 3).unwrap().to_algebraic(), "e4");
        assert_eq!(Square::new(7, 7).unwrap().to_algebraic(), "h8");
    }

    #[test]
    fn test_square_rejects_off_board() {
        assert!(Square::new(8, 0).is_none());
        assert!(Square::new(0, 8).is_none());
        assert!(Square::from_index(64).is_none());
    }

    #[test]
    fn test_square_index_round_trip() {
        let sq = Square::from_index(60).unwrap();
        assert_eq!(sq.to_algebraic(), "e8");
        assert_eq!(sq.index(), 60);
    }

    #[test]
    fn test_square_parse() {
        let sq: Square = "g7".parse().unwrap();
        assert_eq!((sq.file(), sq.rank()), (6, 6));
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a10".parse::<Square>().is_err());
    }

    #[test]
    fn test_square_color() {
        assert!(!Square::new(0, 0).unwrap().is_light());
        assert!(Square::new(7, 0).unwrap().is_light());
    }
}
