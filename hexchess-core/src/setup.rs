//! Setup - starting position definition

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Hex, Position};
use crate::error::{HexChessError, Result};
use crate::game::GameState;
use crate::pieces::{PieceKind, Side};

/// Glinski's opening array
pub static STANDARD_LAYOUT: [(Side, PieceKind, Hex); 36] = [
    // White back pieces
    (Side::White, PieceKind::Queen, Hex::new(-1, 5)),  // e1
    (Side::White, PieceKind::King, Hex::new(1, 4)),    // g1
    (Side::White, PieceKind::Bishop, Hex::new(0, 5)),  // f1
    (Side::White, PieceKind::Bishop, Hex::new(0, 4)),  // f2
    (Side::White, PieceKind::Bishop, Hex::new(0, 3)),  // f3
    (Side::White, PieceKind::Knight, Hex::new(-2, 5)), // d1
    (Side::White, PieceKind::Knight, Hex::new(2, 3)),  // h1
    (Side::White, PieceKind::Rook, Hex::new(-3, 5)),   // c1
    (Side::White, PieceKind::Rook, Hex::new(3, 2)),    // i1
    // White pawns
    (Side::White, PieceKind::Pawn, Hex::new(-4, 5)),   // b1
    (Side::White, PieceKind::Pawn, Hex::new(-3, 4)),   // c2
    (Side::White, PieceKind::Pawn, Hex::new(-2, 3)),   // d3
    (Side::White, PieceKind::Pawn, Hex::new(-1, 2)),   // e4
    (Side::White, PieceKind::Pawn, Hex::new(0, 1)),    // f5
    (Side::White, PieceKind::Pawn, Hex::new(1, 1)),    // g4
    (Side::White, PieceKind::Pawn, Hex::new(2, 1)),    // h3
    (Side::White, PieceKind::Pawn, Hex::new(3, 1)),    // i2
    (Side::White, PieceKind::Pawn, Hex::new(4, 1)),    // j1
    // Black back pieces
    (Side::Black, PieceKind::Queen, Hex::new(-1, -4)), // e10
    (Side::Black, PieceKind::King, Hex::new(1, -5)),   // g10
    (Side::Black, PieceKind::Bishop, Hex::new(0, -5)), // f11
    (Side::Black, PieceKind::Bishop, Hex::new(0, -4)), // f10
    (Side::Black, PieceKind::Bishop, Hex::new(0, -3)), // f9
    (Side::Black, PieceKind::Knight, Hex::new(-2, -3)), // d9
    (Side::Black, PieceKind::Knight, Hex::new(2, -5)), // h9
    (Side::Black, PieceKind::Rook, Hex::new(-3, -2)),  // c8
    (Side::Black, PieceKind::Rook, Hex::new(3, -5)),   // i8
    // Black pawns
    (Side::Black, PieceKind::Pawn, Hex::new(-4, -1)),  // b7
    (Side::Black, PieceKind::Pawn, Hex::new(-3, -1)),  // c7
    (Side::Black, PieceKind::Pawn, Hex::new(-2, -1)),  // d7
    (Side::Black, PieceKind::Pawn, Hex::new(-1, -1)),  // e7
    (Side::Black, PieceKind::Pawn, Hex::new(0, -1)),   // f7
    (Side::Black, PieceKind::Pawn, Hex::new(1, -2)),   // g7
    (Side::Black, PieceKind::Pawn, Hex::new(2, -3)),   // h7
    (Side::Black, PieceKind::Pawn, Hex::new(3, -4)),   // i7
    (Side::Black, PieceKind::Pawn, Hex::new(4, -5)),   // j7
];

/// One piece of a setup
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub side: Side,
    pub kind: PieceKind,
    pub position: Position,
}

/// A starting position: who moves first and where everything stands
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setup {
    pub name: String,
    pub to_move: Side,
    pub pieces: Vec<Placement>,
}

impl Setup {
    /// Glinski's opening array, White to move
    pub fn standard() -> Self {
        let pieces = STANDARD_LAYOUT
            .iter()
            .filter_map(|&(side, kind, hex)| {
                Position::from_hex(hex).map(|position| Placement { side, kind, position })
            })
            .collect();

        Self {
            name: "glinski".to_string(),
            to_move: Side::White,
            pieces,
        }
    }

    /// Build the board. Fails on doubled cells; king counts are checked by
    /// [`GameState::from_setup`].
    pub fn to_board(&self) -> Result<Board> {
        let mut board = Board::new();
        for placement in &self.pieces {
            board.place_piece(placement.side, placement.kind, placement.position.to_hex())?;
        }
        Ok(board)
    }

    /// Convert to GameState
    pub fn to_game_state(&self) -> Result<GameState> {
        GameState::from_setup(self)
    }

    /// Inverse of [`Setup::to_board`], in roster order
    pub fn from_board(name: &str, board: &Board, to_move: Side) -> Result<Self> {
        let pieces = board
            .pieces()
            .map(|piece| {
                let position = Position::from_hex(piece.position)
                    .ok_or_else(|| HexChessError::InvalidPosition(piece.position.to_key()))?;
                Ok(Placement {
                    side: piece.side,
                    kind: piece.kind,
                    position,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            to_move,
            pieces,
        })
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading setup {}", path.display()))?;
        let setup = serde_json::from_str(&content)
            .with_context(|| format!("parsing setup {}", path.display()))?;
        Ok(setup)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("writing setup {}", path.display()))?;
        Ok(())
    }
}

impl Default for Setup {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout_on_board() {
        for &(_, _, hex) in STANDARD_LAYOUT.iter() {
            assert!(hex.is_valid(), "{}", hex);
        }
        let setup = Setup::standard();
        assert_eq!(setup.pieces.len(), 36);
        assert_eq!(setup.to_board().unwrap(), Board::standard());
    }

    #[test]
    fn test_layout_mirrors() {
        let (white, black): (Vec<(Side, PieceKind, Hex)>, Vec<(Side, PieceKind, Hex)>) =
            STANDARD_LAYOUT.iter().copied().partition(|entry| entry.0 == Side::White);
        assert_eq!(white.len(), black.len());
        // Queen and king keep their files, so under the point reflection they swap
        for &(_, kind, hex) in &white {
            let mirrored = Hex::new(-hex.q, -hex.r);
            let expected = match kind {
                PieceKind::Queen => PieceKind::King,
                PieceKind::King => PieceKind::Queen,
                other => other,
            };
            assert!(
                black.iter().any(|&(_, k, h)| k == expected && h == mirrored),
                "{:?} at {} has no mirror",
                kind,
                hex
            );
        }
    }

    #[test]
    fn test_json_shape() {
        let setup = Setup {
            name: "tiny".to_string(),
            to_move: Side::Black,
            pieces: vec![Placement {
                side: Side::White,
                kind: PieceKind::King,
                position: "g1".parse().unwrap(),
            }],
        };
        let json = serde_json::to_value(&setup).unwrap();
        assert_eq!(json["to_move"], "black");
        assert_eq!(json["pieces"][0]["position"], "g1");
        assert_eq!(json["pieces"][0]["kind"], "king");

        let back: Setup = serde_json::from_value(json).unwrap();
        assert_eq!(back, setup);
    }

    #[test]
    fn test_rejects_bad_position_in_json() {
        let json = r#"{"name":"x","to_move":"white","pieces":[{"side":"white","kind":"king","position":"k9"}]}"#;
        assert!(serde_json::from_str::<Setup>(json).is_err());
    }

    #[test]
    fn test_doubled_cell() {
        let mut setup = Setup::standard();
        let first = setup.pieces[0];
        setup.pieces.push(first);
        assert!(matches!(setup.to_board(), Err(HexChessError::InvalidSetup(_))));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("hexchess-setup-{}.json", std::process::id()));
        let setup = Setup::standard();
        setup.save(&path).unwrap();
        let loaded = Setup::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, setup);
    }

    #[test]
    fn test_from_board() {
        let board = Board::standard();
        let setup = Setup::from_board("copy", &board, Side::White).unwrap();
        assert_eq!(setup.to_board().unwrap(), board);
    }
}
