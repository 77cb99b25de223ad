//! Hex board geometry with axial coordinates
//!
//! Glinski's board is the radius-5 hexagon: 11 files `a`..`k`, 91 cells.
//! File `i` (0-based) holds `6 + i` ranks for `i < 6` and `16 - i` after.
//! Rank 1 sits at the bottom of every file, so "up the file" is `(0, -1)`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{HexChessError, Result};
use crate::pieces::{Piece, PieceId, PieceKind, Side};
use crate::setup::STANDARD_LAYOUT;

/// Board radius (distance from center to edge)
pub const BOARD_RADIUS: i8 = 5;

/// Number of files (`a`..`k`)
pub const FILE_COUNT: u8 = 11;

/// Number of cells on the board
pub const TILE_COUNT: usize = 91;

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i8,
    pub r: i8,
}

impl Hex {
    pub const fn new(q: i8, r: i8) -> Self {
        Self { q, r }
    }

    /// Check if this hex is on the board
    pub fn is_valid(&self) -> bool {
        let (q, r) = (self.q as i16, self.r as i16);
        let radius = BOARD_RADIUS as i16;
        q.abs() <= radius && r.abs() <= radius && (q + r).abs() <= radius
    }

    /// `self + vector * times`, no bounds check
    pub fn step(self, (dq, dr): (i8, i8), times: i8) -> Hex {
        Hex::new(
            self.q.saturating_add(dq.saturating_mul(times)),
            self.r.saturating_add(dr.saturating_mul(times)),
        )
    }

    /// The `"q,r"` key string
    pub fn to_key(&self) -> String {
        self.to_string()
    }

    /// Parse a `"q,r"` key string
    pub fn from_key(key: &str) -> Result<Hex> {
        let invalid = || HexChessError::InvalidPosition(key.to_string());
        let (q, r) = key.split_once(',').ok_or_else(invalid)?;
        let q = q.trim().parse::<i8>().map_err(|_| invalid())?;
        let r = r.trim().parse::<i8>().map_err(|_| invalid())?;
        Ok(Hex::new(q, r))
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

/// Pure vector addition; validity is the board lookup's job
pub fn axial_add(hex: Hex, vector: (i8, i8)) -> Hex {
    hex.step(vector, 1)
}

/// Nearest hex to a fractional axial point.
///
/// Rounds both components, then lets the component with the larger rounding
/// error absorb half of the other one.
pub fn round_axial(q: f64, r: f64) -> Hex {
    let q_grid = q.round();
    let r_grid = r.round();
    let dq = q - q_grid;
    let dr = r - r_grid;

    if dq.abs() >= dr.abs() {
        Hex::new((q_grid + (dq + 0.5 * dr).round()) as i8, r_grid as i8)
    } else {
        Hex::new(q_grid as i8, (r_grid + (dr + 0.5 * dq).round()) as i8)
    }
}

/// Parse a position string such as `"f5"` into its axial cell
pub fn position_to_axial(position: &str) -> Result<Hex> {
    Ok(position.parse::<Position>()?.to_hex())
}

/// Ranks on a file (0-based file index, must be < 11)
pub fn rank_count(file: u8) -> u8 {
    if file < 6 {
        6 + file
    } else {
        16 - file
    }
}

// ============================================================================
// POSITION (file letter + rank)
// ============================================================================

/// A board cell named by file and rank, e.g. `f11`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Position {
    file: u8,
    rank: u8,
}

impl Position {
    /// `file` is 0-based (`a` = 0), `rank` is 1-based
    pub fn new(file: u8, rank: u8) -> Result<Self> {
        if file >= FILE_COUNT || rank == 0 || rank > rank_count(file) {
            return Err(HexChessError::InvalidPosition(format!(
                "file {} rank {}",
                file + 1,
                rank
            )));
        }
        Ok(Self { file, rank })
    }

    pub fn file(&self) -> u8 {
        self.file
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn file_letter(&self) -> char {
        (b'a' + self.file) as char
    }

    pub fn to_hex(self) -> Hex {
        let file = self.file as i8;
        let rank = self.rank as i8;
        let q = file - 5;
        let r = if file < 6 {
            6 - rank
        } else {
            6 - (file - 5) - rank
        };
        Hex::new(q, r)
    }

    /// Inverse of [`Position::to_hex`]; `None` off the board
    pub fn from_hex(hex: Hex) -> Option<Self> {
        if !hex.is_valid() {
            return None;
        }
        Some(Self {
            file: (hex.q + 5) as u8,
            rank: (6 - hex.r - hex.q.max(0)) as u8,
        })
    }
}

impl FromStr for Position {
    type Err = HexChessError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || HexChessError::InvalidPosition(s.to_string());

        let letter = s.chars().next().ok_or_else(invalid)?;
        if !('a'..='k').contains(&letter) {
            return Err(invalid());
        }

        // 1 or 2 digits, no leading zero
        let digits = &s[1..];
        if digits.is_empty()
            || digits.len() > 2
            || digits.starts_with('0')
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let rank: u8 = digits.parse().map_err(|_| invalid())?;
        Position::new(letter as u8 - b'a', rank).map_err(|_| invalid())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_letter(), self.rank)
    }
}

impl TryFrom<String> for Position {
    type Error = HexChessError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Position> for String {
    fn from(position: Position) -> Self {
        position.to_string()
    }
}

// ============================================================================
// TILES AND OCCUPANCY
// ============================================================================

/// One of the 91 fixed cells
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    hex: Hex,
    position: Position,
    shade: u8,
    occupant: Option<PieceId>,
}

impl Tile {
    pub fn hex(&self) -> Hex {
        self.hex
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Base colour class 0..=2; neighbouring tiles never share one
    pub fn shade(&self) -> u8 {
        self.shade
    }

    pub fn occupant(&self) -> Option<PieceId> {
        self.occupant
    }
}

/// Board topology plus the piece roster.
///
/// A tile's occupant and the roster are only ever changed together.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    tiles: Vec<Tile>,
    index: FxHashMap<Hex, usize>,
    pieces: BTreeMap<PieceId, Piece>,
    next_id: PieceId,
}

impl Board {
    /// Empty board with all 91 tiles
    pub fn new() -> Self {
        let mut tiles = Vec::with_capacity(TILE_COUNT);
        let mut index = FxHashMap::default();

        for file in 0..FILE_COUNT {
            for rank in (1..=rank_count(file)).rev() {
                let position = Position { file, rank };
                let hex = position.to_hex();
                index.insert(hex, tiles.len());
                tiles.push(Tile {
                    hex,
                    position,
                    shade: (hex.r - hex.q + 1).rem_euclid(3) as u8,
                    occupant: None,
                });
            }
        }

        Self {
            tiles,
            index,
            pieces: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Board with Glinski's opening array
    pub fn standard() -> Self {
        let mut board = Self::new();
        for &(side, kind, hex) in STANDARD_LAYOUT.iter() {
            board.spawn(side, kind, hex);
        }
        board
    }

    // ========================================================================
    // LOOKUP
    // ========================================================================

    /// `None` means off-board
    pub fn get_tile(&self, hex: Hex) -> Option<&Tile> {
        self.index.get(&hex).map(|&i| &self.tiles[i])
    }

    fn tile_mut(&mut self, hex: Hex) -> Option<&mut Tile> {
        let i = *self.index.get(&hex)?;
        self.tiles.get_mut(i)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.iter()
    }

    /// Piece standing on `hex`
    pub fn occupant(&self, hex: Hex) -> Option<&Piece> {
        self.get_tile(hex)
            .and_then(|tile| tile.occupant)
            .and_then(|id| self.pieces.get(&id))
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.values()
    }

    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.values().filter(move |p| p.side == side)
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Linear scan for the side's king
    pub fn get_king_tile(&self, side: Side) -> Option<&Tile> {
        self.tiles.iter().find(|tile| {
            tile.occupant
                .and_then(|id| self.pieces.get(&id))
                .is_some_and(|p| p.side == side && p.kind == PieceKind::King)
        })
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Add a new piece on an empty, on-board cell
    pub fn place_piece(&mut self, side: Side, kind: PieceKind, hex: Hex) -> Result<PieceId> {
        let tile = self
            .get_tile(hex)
            .ok_or_else(|| HexChessError::InvalidPosition(hex.to_key()))?;
        if tile.occupant.is_some() {
            return Err(HexChessError::InvalidSetup(format!(
                "{} is already occupied",
                tile.position
            )));
        }
        Ok(self.spawn(side, kind, hex))
    }

    /// Detach a piece from both the roster and its tile
    pub fn remove_piece(&mut self, id: PieceId) -> Option<Piece> {
        let piece = self.pieces.remove(&id)?;
        if let Some(tile) = self.tile_mut(piece.position) {
            if tile.occupant == Some(id) {
                tile.occupant = None;
            }
        }
        Some(piece)
    }

    pub(crate) fn spawn(&mut self, side: Side, kind: PieceKind, hex: Hex) -> PieceId {
        let id = self.next_id;
        self.next_id += 1;
        self.restore_piece(Piece::new(id, kind, side, hex));
        id
    }

    /// Put a previously removed piece back, id and all
    pub(crate) fn restore_piece(&mut self, piece: Piece) {
        if let Some(tile) = self.tile_mut(piece.position) {
            debug_assert!(tile.occupant.is_none(), "restoring onto an occupied tile");
            tile.occupant = Some(piece.id);
        }
        self.pieces.insert(piece.id, piece);
    }

    /// Move a piece to an (already vacated) tile. Returns the old cell.
    pub(crate) fn relocate(&mut self, id: PieceId, to: Hex, previous: Hex) -> Option<Hex> {
        let piece = self.pieces.get_mut(&id)?;
        let from = piece.position;
        piece.position = to;
        piece.previous = previous;

        if let Some(tile) = self.tile_mut(from) {
            tile.occupant = None;
        }
        if let Some(tile) = self.tile_mut(to) {
            tile.occupant = Some(id);
        }
        Some(from)
    }

    /// Swap a piece for a fresh one of `kind` on the same cell
    pub(crate) fn promote(&mut self, id: PieceId, kind: PieceKind) -> Option<PieceId> {
        let old = self.remove_piece(id)?;
        let new_id = self.next_id;
        self.next_id += 1;

        let mut piece = Piece::new(new_id, kind, old.side, old.position);
        piece.previous = old.previous;
        self.restore_piece(piece);
        Some(new_id)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::ORTHOGONALS;
    use std::collections::HashSet;

    #[test]
    fn test_hex_validity() {
        assert!(Hex::new(0, 0).is_valid());
        assert!(Hex::new(5, 0).is_valid());
        assert!(Hex::new(0, -5).is_valid());
        assert!(Hex::new(-5, 5).is_valid());
        assert!(!Hex::new(6, 0).is_valid());
        assert!(!Hex::new(3, 3).is_valid()); // q + r = 6 > 5
        assert!(!Hex::new(6, 6).is_valid());
    }

    #[test]
    fn test_tile_count_and_distinct() {
        let board = Board::new();
        assert_eq!(board.tiles().count(), TILE_COUNT);

        let hexes: HashSet<Hex> = board.tiles().map(|t| t.hex()).collect();
        assert_eq!(hexes.len(), TILE_COUNT);

        let keys: HashSet<String> = board.tiles().map(|t| t.hex().to_key()).collect();
        assert_eq!(keys.len(), TILE_COUNT);

        // Lookup succeeds exactly on the hexagon
        for q in -8..=8 {
            for r in -8..=8 {
                let hex = Hex::new(q, r);
                assert_eq!(board.get_tile(hex).is_some(), hex.is_valid(), "{}", hex);
            }
        }
        assert!(board.get_tile(Hex::new(6, 6)).is_none());
    }

    #[test]
    fn test_position_to_axial() {
        assert_eq!(position_to_axial("a1").unwrap(), Hex::new(-5, 5));
        assert_eq!(position_to_axial("a6").unwrap(), Hex::new(-5, 0));
        assert_eq!(position_to_axial("f1").unwrap(), Hex::new(0, 5));
        assert_eq!(position_to_axial("f6").unwrap(), Hex::new(0, 0));
        assert_eq!(position_to_axial("f11").unwrap(), Hex::new(0, -5));
        assert_eq!(position_to_axial("g1").unwrap(), Hex::new(1, 4));
        assert_eq!(position_to_axial("g10").unwrap(), Hex::new(1, -5));
        assert_eq!(position_to_axial("k1").unwrap(), Hex::new(5, 0));
        assert_eq!(position_to_axial("k6").unwrap(), Hex::new(5, -5));
    }

    #[test]
    fn test_invalid_positions() {
        for bad in ["", "f", "a7", "k7", "l1", "f12", "f0", "F5", "f05", "f111", "5f", "f-1", "é1"] {
            assert!(
                matches!(position_to_axial(bad), Err(HexChessError::InvalidPosition(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_position_round_trip() {
        let board = Board::new();
        for tile in board.tiles() {
            let name = tile.position().to_string();
            let hex = position_to_axial(&name).unwrap();
            assert_eq!(hex, tile.hex());
            assert_eq!(Position::from_hex(hex).unwrap().to_string(), name);
            assert_eq!(round_axial(hex.q as f64, hex.r as f64), hex);
            assert_eq!(round_axial(hex.q as f64 + 0.2, hex.r as f64 - 0.1), hex);
        }
        assert!(Position::from_hex(Hex::new(4, 4)).is_none());
    }

    #[test]
    fn test_round_axial() {
        assert_eq!(round_axial(0.6, 0.0), Hex::new(1, 0));
        assert_eq!(round_axial(0.3, 0.3), Hex::new(0, 0));
        assert_eq!(round_axial(-0.1, -0.3), Hex::new(0, 0));
        assert_eq!(round_axial(2.9, -1.1), Hex::new(3, -1));
    }

    #[test]
    fn test_hex_keys() {
        assert_eq!(Hex::new(-3, 2).to_key(), "-3,2");
        assert_eq!(Hex::from_key("-3,2").unwrap(), Hex::new(-3, 2));
        assert!(Hex::from_key("3;2").is_err());
        assert!(Hex::from_key("a,2").is_err());
    }

    #[test]
    fn test_neighbours_have_different_shades() {
        let board = Board::new();
        for tile in board.tiles() {
            for v in ORTHOGONALS {
                if let Some(next) = board.get_tile(axial_add(tile.hex(), v)) {
                    assert_ne!(tile.shade(), next.shade(), "{} / {}", tile.position(), next.position());
                }
            }
        }
        assert_eq!(board.get_tile(Hex::new(0, 0)).unwrap().shade(), 1);
    }

    #[test]
    fn test_standard_board() {
        let board = Board::standard();
        assert_eq!(board.piece_count(), 36);
        assert_eq!(board.pieces_of(Side::White).count(), 18);
        assert_eq!(board.pieces_of(Side::Black).count(), 18);

        let white_king = board.get_king_tile(Side::White).unwrap();
        assert_eq!(white_king.position().to_string(), "g1");
        let black_king = board.get_king_tile(Side::Black).unwrap();
        assert_eq!(black_king.position().to_string(), "g10");

        // Tile and roster agree
        for piece in board.pieces() {
            assert_eq!(board.get_tile(piece.position).unwrap().occupant(), Some(piece.id));
        }
    }

    #[test]
    fn test_place_and_remove() {
        let mut board = Board::new();
        let hex = Hex::new(0, 0);
        let id = board.place_piece(Side::White, PieceKind::Rook, hex).unwrap();
        assert_eq!(board.occupant(hex).unwrap().kind, PieceKind::Rook);

        assert!(matches!(
            board.place_piece(Side::Black, PieceKind::Rook, hex),
            Err(HexChessError::InvalidSetup(_))
        ));
        assert!(matches!(
            board.place_piece(Side::Black, PieceKind::Rook, Hex::new(6, 6)),
            Err(HexChessError::InvalidPosition(_))
        ));

        let removed = board.remove_piece(id).unwrap();
        assert_eq!(removed.position, hex);
        assert!(board.occupant(hex).is_none());
        assert!(board.get_tile(hex).unwrap().occupant().is_none());
        assert!(board.remove_piece(id).is_none());
        assert!(board.get_king_tile(Side::White).is_none());
    }
}
