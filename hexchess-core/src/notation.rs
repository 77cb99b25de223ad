//! Fixed-width move notation `OOFFNNRR[P]`
//!
//! Two digits each for the old file (1-based), old rank, new file and new
//! rank, then an optional promotion digit (1=queen, 2=rook, 3=bishop,
//! 4=knight). `f5-f6` is `06050606`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Hex, Position};
use crate::error::{HexChessError, Result};
use crate::pieces::PieceKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Notation {
    pub from: Position,
    pub to: Position,
    pub promotion: Option<PieceKind>,
}

impl Notation {
    pub fn new(from: Position, to: Position, promotion: Option<PieceKind>) -> Self {
        Self { from, to, promotion }
    }

    /// `None` if either cell is off the board
    pub fn from_hexes(from: Hex, to: Hex, promotion: Option<PieceKind>) -> Option<Self> {
        Some(Self::new(Position::from_hex(from)?, Position::from_hex(to)?, promotion))
    }
}

fn pair(s: &str, at: usize) -> Option<u8> {
    s.get(at..at + 2)?.parse().ok()
}

impl FromStr for Notation {
    type Err = HexChessError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| HexChessError::InvalidNotation {
            notation: s.to_string(),
            reason: reason.to_string(),
        };

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected digits only"));
        }
        if s.len() != 8 && s.len() != 9 {
            return Err(invalid("expected 8 or 9 digits"));
        }

        let cell = |at: usize| -> Result<Position> {
            let file = pair(s, at).ok_or_else(|| invalid("bad file"))?;
            let rank = pair(s, at + 2).ok_or_else(|| invalid("bad rank"))?;
            if file == 0 {
                return Err(invalid("file 00"));
            }
            Position::new(file - 1, rank).map_err(|e| invalid(&e.to_string()))
        };

        let from = cell(0)?;
        let to = cell(4)?;

        let promotion = match s.get(8..9) {
            None => None,
            Some(digit) => {
                let code: u8 = digit.parse().map_err(|_| invalid("bad promotion digit"))?;
                Some(
                    PieceKind::from_promotion_code(code)
                        .ok_or_else(|| invalid("promotion code must be 1-4"))?,
                )
            }
        };

        Ok(Self { from, to, promotion })
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}{:02}{:02}{:02}",
            self.from.file() + 1,
            self.from.rank(),
            self.to.file() + 1,
            self.to.rank()
        )?;
        if let Some(code) = self.promotion.and_then(PieceKind::promotion_code) {
            write!(f, "{}", code)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Notation {
    type Error = HexChessError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Notation> for String {
    fn from(notation: Notation) -> Self {
        notation.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let n: Notation = "06050606".parse().unwrap();
        assert_eq!(n.from.to_string(), "f5");
        assert_eq!(n.to.to_string(), "f6");
        assert_eq!(n.promotion, None);
        assert_eq!(n.to_string(), "06050606");
    }

    #[test]
    fn test_parse_promotion() {
        let n: Notation = "080808091".parse().unwrap();
        assert_eq!(n.from.to_string(), "h8");
        assert_eq!(n.to.to_string(), "h9");
        assert_eq!(n.promotion, Some(PieceKind::Queen));
        assert_eq!(n.to_string(), "080808091");

        let knight: Notation = "060206014".parse().unwrap();
        assert_eq!(knight.promotion, Some(PieceKind::Knight));
    }

    #[test]
    fn test_two_digit_ranks() {
        let n: Notation = "06110610".parse().unwrap();
        assert_eq!(n.from.to_string(), "f11");
        assert_eq!(n.to.to_string(), "f10");
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in [
            "",
            "0605060",
            "0605060612",
            "06050a06",
            "00050606",
            "12010101",
            "01070101",
            "060506060",
            "060506065",
            "+6050606",
        ] {
            assert!(
                matches!(bad.parse::<Notation>(), Err(HexChessError::InvalidNotation { .. })),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_serde_as_string() {
        let n: Notation = "02010203".parse().unwrap();
        assert_eq!(serde_json::to_string(&n).unwrap(), "\"02010203\"");
        let back: Notation = serde_json::from_str("\"02010203\"").unwrap();
        assert_eq!(back, n);
        assert!(serde_json::from_str::<Notation>("\"99999999\"").is_err());
    }

    #[test]
    fn test_from_hexes() {
        let n = Notation::from_hexes(Hex::new(0, 1), Hex::new(0, 0), None).unwrap();
        assert_eq!(n.to_string(), "06050606");
        assert!(Notation::from_hexes(Hex::new(6, 0), Hex::new(0, 0), None).is_none());
    }
}
