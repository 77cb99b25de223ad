//! Pseudo-legal move generation
//!
//! One generator serves every kind: it reads the piece's vector table and
//! movement type from [`crate::pieces::PIECE_TYPES`]. Results respect
//! movement and capture rules but may still leave the mover's king in check;
//! [`crate::simulate`] filters those out.

use serde::{Deserialize, Serialize};

use crate::board::{axial_add, Board, Hex};
use crate::pieces::{is_pawn_start, MoveType, Piece, PieceId, PieceKind, Side};

/// The move that was just played
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMove {
    pub piece: PieceId,
    pub kind: PieceKind,
    pub side: Side,
    pub from: Hex,
    pub to: Hex,
}

impl LastMove {
    /// A pawn that just advanced two cells from its start, as seen by its own side
    pub fn is_pawn_double_step(&self) -> bool {
        if self.kind != PieceKind::Pawn || !is_pawn_start(self.side, self.from) {
            return false;
        }
        self.from.step(self.side.forward(), 2) == self.to
    }
}

/// Game context the generators may read. Passed explicitly; never stored on pieces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveContext {
    pub last_move: Option<LastMove>,
}

impl MoveContext {
    pub fn new(last_move: Option<LastMove>) -> Self {
        Self { last_move }
    }
}

/// A candidate destination
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Destination {
    pub to: Hex,
    /// Cell of the pawn removed by an en-passant capture
    pub en_passant: Option<Hex>,
}

impl Destination {
    pub fn plain(to: Hex) -> Self {
        Self { to, en_passant: None }
    }
}

/// The pawn a capture onto `target` would take en passant, if any.
///
/// Requires the last move to be an opposing pawn's double step whose passed
/// cell is `target`; the victim is the cell that pawn landed on.
pub fn en_passant_victim(capturer: Side, target: Hex, ctx: &MoveContext) -> Option<Hex> {
    let last = ctx.last_move?;
    if last.side == capturer || !last.is_pawn_double_step() {
        return None;
    }
    let passed = last.from.step(last.side.forward(), 1);
    if passed != target {
        return None;
    }
    // One step past the target, in the capturer's forward direction
    debug_assert_eq!(last.to, target.step(capturer.forward(), -1));
    Some(last.to)
}

/// Every pseudo-legal destination of `piece`
pub fn pseudo_legal_moves(board: &Board, piece: &Piece, ctx: &MoveContext) -> Vec<Destination> {
    let piece_type = piece.piece_type();
    match piece_type.move_type {
        MoveType::Step => step_moves(board, piece, piece_type.vectors),
        MoveType::Slide => slide_moves(board, piece, piece_type.vectors),
        MoveType::March => pawn_moves(board, piece, ctx),
    }
}

/// Apply a White-oriented vector for `side`
pub fn oriented(side: Side, (dq, dr): (i8, i8)) -> (i8, i8) {
    let s = side.color_scalar();
    (dq * s, dr * s)
}

fn step_moves(board: &Board, piece: &Piece, vectors: &[(i8, i8)]) -> Vec<Destination> {
    let mut moves = Vec::with_capacity(vectors.len());
    for &v in vectors {
        let target = axial_add(piece.position, oriented(piece.side, v));
        let Some(tile) = board.get_tile(target) else {
            continue;
        };
        match tile.occupant().and_then(|id| board.piece(id)) {
            Some(other) if other.side == piece.side => {}
            _ => moves.push(Destination::plain(target)),
        }
    }
    moves
}

fn slide_moves(board: &Board, piece: &Piece, vectors: &[(i8, i8)]) -> Vec<Destination> {
    let mut moves = Vec::new();
    for &v in vectors {
        let dir = oriented(piece.side, v);
        let mut current = piece.position;
        loop {
            current = axial_add(current, dir);
            let Some(tile) = board.get_tile(current) else {
                break;
            };
            match tile.occupant().and_then(|id| board.piece(id)) {
                None => moves.push(Destination::plain(current)),
                Some(other) => {
                    if other.side != piece.side {
                        moves.push(Destination::plain(current));
                    }
                    break;
                }
            }
        }
    }
    moves
}

fn pawn_moves(board: &Board, piece: &Piece, ctx: &MoveContext) -> Vec<Destination> {
    let mut moves = Vec::with_capacity(4);

    // Captures: enemy on the target, or an empty passed cell en passant
    for &v in piece.piece_type().vectors {
        let target = axial_add(piece.position, oriented(piece.side, v));
        let Some(tile) = board.get_tile(target) else {
            continue;
        };
        match tile.occupant().and_then(|id| board.piece(id)) {
            Some(other) if other.side != piece.side => moves.push(Destination::plain(target)),
            Some(_) => {}
            None => {
                if let Some(victim) = en_passant_victim(piece.side, target, ctx) {
                    moves.push(Destination {
                        to: target,
                        en_passant: Some(victim),
                    });
                }
            }
        }
    }

    // Advances: any occupant blocks, and a blocked single step blocks the double
    let forward = piece.side.forward();
    let max_steps = if is_pawn_start(piece.side, piece.position) { 2 } else { 1 };
    for steps in 1..=max_steps {
        let target = piece.position.step(forward, steps);
        match board.get_tile(target) {
            Some(tile) if tile.occupant().is_none() => moves.push(Destination::plain(target)),
            _ => break,
        }
    }

    moves
}
