//! Check detection by reverse probing from the king's cell
//!
//! For each attacker kind we walk its capture vectors backwards from the
//! target: an attacker at `K - v` with vector `v` would land on `K`. Steppers
//! look one cell away; sliders walk until the first occupant.

use crate::board::{axial_add, Board, Hex};
use crate::movegen::oriented;
use crate::pieces::{get_piece_type, MoveType, PieceKind, Side};

/// Is `target` attacked by any piece of `attacker`?
pub fn is_attacked(board: &Board, target: Hex, attacker: Side) -> bool {
    PieceKind::ALL.iter().any(|&kind| attacked_by_kind(board, target, attacker, kind))
}

fn attacked_by_kind(board: &Board, target: Hex, attacker: Side, kind: PieceKind) -> bool {
    let piece_type = get_piece_type(kind);
    let is_hit = |hex: Hex| {
        board
            .occupant(hex)
            .is_some_and(|p| p.side == attacker && p.kind == kind)
    };

    for &v in piece_type.vectors {
        let (dq, dr) = oriented(attacker, v);
        let back = (-dq, -dr);

        match piece_type.move_type {
            // Pawn vectors are its capture vectors
            MoveType::Step | MoveType::March => {
                if is_hit(axial_add(target, back)) {
                    return true;
                }
            }
            MoveType::Slide => {
                let mut current = target;
                loop {
                    current = axial_add(current, back);
                    if board.get_tile(current).is_none() {
                        break;
                    }
                    if board.occupant(current).is_some() {
                        if is_hit(current) {
                            return true;
                        }
                        break;
                    }
                }
            }
        }
    }
    false
}

/// Is `side`'s king attacked? A missing king counts as not in check.
pub fn team_in_check(board: &Board, side: Side) -> bool {
    match board.get_king_tile(side) {
        Some(tile) => is_attacked(board, tile.hex(), side.opponent()),
        None => {
            tracing::warn!(?side, "no king on the board");
            false
        }
    }
}
