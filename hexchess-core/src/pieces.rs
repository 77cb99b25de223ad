//! Piece type definitions
//!
//! Every kind shares one generation skeleton: a vector table plus a movement
//! type. Tables are written for White; Black multiplies each vector by its
//! color scalar (-1), which is exactly the board's point symmetry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::Hex;
use crate::error::HexChessError;

/// Stable identity of a piece for the lifetime of a game
pub type PieceId = u16;

/// Player color. The discriminants are the wire values (0 = black, 1 = white).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Black = 0,
    White = 1,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// +1 for White, -1 for Black
    pub fn color_scalar(self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    /// One step up the file from this side's point of view
    pub fn forward(self) -> (i8, i8) {
        let (dq, dr) = PAWN_ADVANCE;
        let s = self.color_scalar();
        (dq * s, dr * s)
    }
}

/// Movement type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveType {
    Step,   // One application of each vector
    Slide,  // Repeat each vector until blocked
    March,  // Pawn: advance, double advance from start, capture sideways-forward
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    pub fn name(self) -> &'static str {
        get_piece_type(self).name
    }

    /// Digit used as the notation suffix (1=queen, 2=rook, 3=bishop, 4=knight)
    pub fn promotion_code(self) -> Option<u8> {
        match self {
            PieceKind::Queen => Some(1),
            PieceKind::Rook => Some(2),
            PieceKind::Bishop => Some(3),
            PieceKind::Knight => Some(4),
            PieceKind::Pawn | PieceKind::King => None,
        }
    }

    pub fn from_promotion_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PieceKind::Queen),
            2 => Some(PieceKind::Rook),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Knight),
            _ => None,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for PieceKind {
    type Err = HexChessError;

    /// Accepts the full name or the usual letter (`q`, `r`, `b`, `n`, `k`, `p`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pawn" | "p" => Ok(PieceKind::Pawn),
            "knight" | "n" => Ok(PieceKind::Knight),
            "bishop" | "b" => Ok(PieceKind::Bishop),
            "rook" | "r" => Ok(PieceKind::Rook),
            "queen" | "q" => Ok(PieceKind::Queen),
            "king" | "k" => Ok(PieceKind::King),
            _ => Err(HexChessError::InvalidSetup(format!("unknown piece kind: {}", s))),
        }
    }
}

// ============================================================================
// VECTOR TABLES (White's point of view)
// ============================================================================

/// Edge neighbours: rook lines
pub const ORTHOGONALS: [(i8, i8); 6] = [
    (-1, 0),
    (0, -1),
    (1, -1),
    (1, 0),
    (0, 1),
    (-1, 1),
];

/// Vertex neighbours: bishop lines
pub const DIAGONALS: [(i8, i8); 6] = [
    (-2, 1),
    (-1, -1),
    (1, -2),
    (2, -1),
    (1, 1),
    (-1, 2),
];

/// Queen and king: orthogonals then diagonals
pub const ROYAL: [(i8, i8); 12] = [
    (-1, 0),
    (0, -1),
    (1, -1),
    (1, 0),
    (0, 1),
    (-1, 1),
    (-2, 1),
    (-1, -1),
    (1, -2),
    (2, -1),
    (1, 1),
    (-1, 2),
];

/// One orthogonal step then one diagonal step away from the start
pub const KNIGHT_JUMPS: [(i8, i8); 12] = [
    (-3, 1),
    (-2, -1),
    (-1, -2),
    (1, -3),
    (2, -3),
    (3, -2),
    (3, -1),
    (2, 1),
    (1, 2),
    (-1, 3),
    (-2, 3),
    (-3, 2),
];

/// Capture-left, capture-right
pub const PAWN_CAPTURES: [(i8, i8); 2] = [(-1, 0), (1, -1)];

/// Forward one
pub const PAWN_ADVANCE: (i8, i8) = (0, -1);

/// Opening pawn cells: b1 c2 d3 e4 f5 g4 h3 i2 j1
pub const WHITE_PAWN_STARTS: [Hex; 9] = [
    Hex::new(-4, 5),
    Hex::new(-3, 4),
    Hex::new(-2, 3),
    Hex::new(-1, 2),
    Hex::new(0, 1),
    Hex::new(1, 1),
    Hex::new(2, 1),
    Hex::new(3, 1),
    Hex::new(4, 1),
];

/// Opening pawn cells: b7 c7 d7 e7 f7 g7 h7 i7 j7
pub const BLACK_PAWN_STARTS: [Hex; 9] = [
    Hex::new(-4, -1),
    Hex::new(-3, -1),
    Hex::new(-2, -1),
    Hex::new(-1, -1),
    Hex::new(0, -1),
    Hex::new(1, -2),
    Hex::new(2, -3),
    Hex::new(3, -4),
    Hex::new(4, -5),
];

pub fn pawn_starts(side: Side) -> &'static [Hex] {
    match side {
        Side::White => &WHITE_PAWN_STARTS,
        Side::Black => &BLACK_PAWN_STARTS,
    }
}

pub fn is_pawn_start(side: Side, hex: Hex) -> bool {
    pawn_starts(side).contains(&hex)
}

/// Piece type definition
#[derive(Clone, Debug)]
pub struct PieceType {
    pub kind: PieceKind,
    pub name: &'static str,
    pub symbol: char,
    pub move_type: MoveType,
    /// Movement vectors; for the pawn these are its capture vectors
    pub vectors: &'static [(i8, i8)],
}

impl PieceType {
    const fn new(
        kind: PieceKind,
        name: &'static str,
        symbol: char,
        move_type: MoveType,
        vectors: &'static [(i8, i8)],
    ) -> Self {
        Self {
            kind,
            name,
            symbol,
            move_type,
            vectors,
        }
    }
}

/// All six piece types, indexed by `PieceKind as usize`
pub static PIECE_TYPES: [PieceType; 6] = [
    PieceType::new(PieceKind::Pawn, "pawn", 'p', MoveType::March, &PAWN_CAPTURES),
    PieceType::new(PieceKind::Knight, "knight", 'n', MoveType::Step, &KNIGHT_JUMPS),
    PieceType::new(PieceKind::Bishop, "bishop", 'b', MoveType::Slide, &DIAGONALS),
    PieceType::new(PieceKind::Rook, "rook", 'r', MoveType::Slide, &ORTHOGONALS),
    PieceType::new(PieceKind::Queen, "queen", 'q', MoveType::Slide, &ROYAL),
    PieceType::new(PieceKind::King, "king", 'k', MoveType::Step, &ROYAL),
];

pub fn get_piece_type(kind: PieceKind) -> &'static PieceType {
    &PIECE_TYPES[kind as usize]
}

/// A piece on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub side: Side,
    pub position: Hex,
    /// Cell before the most recent move (equal to `position` until it moves)
    pub previous: Hex,
}

impl Piece {
    pub fn new(id: PieceId, kind: PieceKind, side: Side, position: Hex) -> Self {
        Self {
            id,
            kind,
            side,
            position,
            previous: position,
        }
    }

    pub fn piece_type(&self) -> &'static PieceType {
        get_piece_type(self.kind)
    }

    /// Letter for text boards: uppercase for White
    pub fn symbol(&self) -> char {
        let symbol = self.piece_type().symbol;
        match self.side {
            Side::White => symbol.to_ascii_uppercase(),
            Side::Black => symbol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::position_to_axial;

    #[test]
    fn test_piece_lookup() {
        for kind in PieceKind::ALL {
            assert_eq!(get_piece_type(kind).kind, kind);
        }
        assert_eq!("queen".parse::<PieceKind>().unwrap(), PieceKind::Queen);
        assert_eq!("N".parse::<PieceKind>().unwrap(), PieceKind::Knight);
        assert!("wizard".parse::<PieceKind>().is_err());
    }

    #[test]
    fn test_promotion_codes() {
        for code in 1..=4 {
            let kind = PieceKind::from_promotion_code(code).unwrap();
            assert_eq!(kind.promotion_code(), Some(code));
        }
        assert!(PieceKind::from_promotion_code(0).is_none());
        assert!(PieceKind::from_promotion_code(5).is_none());
        assert!(PieceKind::King.promotion_code().is_none());
        assert!(PieceKind::Pawn.promotion_code().is_none());
    }

    #[test]
    fn test_royal_is_union() {
        for v in ORTHOGONALS.iter().chain(DIAGONALS.iter()) {
            assert!(ROYAL.contains(v));
        }
    }

    #[test]
    fn test_vector_sets_are_symmetric() {
        // Mirroring Black's tables is a no-op except for the pawn
        for table in [&ORTHOGONALS[..], &DIAGONALS[..], &KNIGHT_JUMPS[..]] {
            for &(dq, dr) in table {
                assert!(table.contains(&(-dq, -dr)));
            }
        }
        assert!(!PAWN_CAPTURES.contains(&(1, 0)));
    }

    #[test]
    fn test_pawn_starts_match_names() {
        let white = ["b1", "c2", "d3", "e4", "f5", "g4", "h3", "i2", "j1"];
        let black = ["b7", "c7", "d7", "e7", "f7", "g7", "h7", "i7", "j7"];
        for (name, hex) in white.iter().zip(WHITE_PAWN_STARTS.iter()) {
            assert_eq!(position_to_axial(name).unwrap(), *hex, "{}", name);
        }
        for (name, hex) in black.iter().zip(BLACK_PAWN_STARTS.iter()) {
            assert_eq!(position_to_axial(name).unwrap(), *hex, "{}", name);
        }
        // Point symmetry
        for (w, b) in WHITE_PAWN_STARTS.iter().zip(BLACK_PAWN_STARTS.iter().rev()) {
            assert_eq!(*b, Hex::new(-w.q, -w.r));
        }
    }

    #[test]
    fn test_sides() {
        assert_eq!(Side::White.opponent(), Side::Black);
        assert_eq!(Side::White.forward(), (0, -1));
        assert_eq!(Side::Black.forward(), (0, 1));
    }
}
