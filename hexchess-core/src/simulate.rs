//! Move simulation with an explicit undo record
//!
//! Legality is decided by playing the move on the live board, asking
//! [`team_in_check`], and unwinding. [`MoveDelta`] holds everything needed to
//! put the board back exactly as it was.

use crate::board::{Board, Hex};
use crate::check::team_in_check;
use crate::movegen::{pseudo_legal_moves, Destination, MoveContext};
use crate::pieces::{Piece, PieceId, PieceKind};

/// What one applied move changed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveDelta {
    pub piece: PieceId,
    pub from: Hex,
    pub to: Hex,
    /// The mover's `previous` before the move
    pub prior_previous: Hex,
    /// Piece that stood on `to`
    pub captured: Option<Piece>,
    /// Pawn taken en passant (not on `to`)
    pub en_passant_captured: Option<Piece>,
}

impl MoveDelta {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some() || self.en_passant_captured.is_some()
    }
}

/// Play `dest` for piece `id`. Returns `None` (board untouched) if the piece
/// is gone or the destination is off-board.
pub fn apply_move(board: &mut Board, id: PieceId, dest: Destination) -> Option<MoveDelta> {
    let piece = *board.piece(id)?;
    board.get_tile(dest.to)?;

    let captured = board
        .occupant(dest.to)
        .map(|p| p.id)
        .and_then(|victim| board.remove_piece(victim));

    let en_passant_captured = dest
        .en_passant
        .and_then(|cell| board.occupant(cell))
        .filter(|p| p.side != piece.side && p.kind == PieceKind::Pawn)
        .map(|p| p.id)
        .and_then(|victim| board.remove_piece(victim));

    board.relocate(id, dest.to, piece.position);

    Some(MoveDelta {
        piece: id,
        from: piece.position,
        to: dest.to,
        prior_previous: piece.previous,
        captured,
        en_passant_captured,
    })
}

/// Reverse [`apply_move`]
pub fn undo_move(board: &mut Board, delta: MoveDelta) {
    board.relocate(delta.piece, delta.from, delta.prior_previous);
    if let Some(piece) = delta.captured {
        board.restore_piece(piece);
    }
    if let Some(piece) = delta.en_passant_captured {
        board.restore_piece(piece);
    }
}

/// Would this move leave the mover's own king safe? The board is restored
/// before returning.
pub fn is_legal(board: &mut Board, id: PieceId, dest: Destination) -> bool {
    let Some(side) = board.piece(id).map(|p| p.side) else {
        return false;
    };
    let Some(delta) = apply_move(board, id, dest) else {
        return false;
    };
    let safe = !team_in_check(board, side);
    undo_move(board, delta);
    safe
}

/// Pseudo-legal moves of `id` filtered through [`is_legal`]
pub fn legal_destinations(board: &mut Board, id: PieceId, ctx: &MoveContext) -> Vec<Destination> {
    let Some(piece) = board.piece(id).copied() else {
        return Vec::new();
    };
    pseudo_legal_moves(board, &piece, ctx)
        .into_iter()
        .filter(|&dest| is_legal(board, id, dest))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::position_to_axial;
    use crate::movegen::LastMove;
    use crate::pieces::Side;

    fn hex(name: &str) -> Hex {
        position_to_axial(name).unwrap()
    }

    /// Middlegame-ish position with captures available for every kind
    fn busy_board() -> Board {
        let mut board = Board::new();
        let layout = [
            (Side::White, PieceKind::King, "g1"),
            (Side::White, PieceKind::Queen, "e4"),
            (Side::White, PieceKind::Rook, "c1"),
            (Side::White, PieceKind::Bishop, "f3"),
            (Side::White, PieceKind::Knight, "h3"),
            (Side::White, PieceKind::Pawn, "f6"),
            (Side::White, PieceKind::Pawn, "d5"),
            (Side::Black, PieceKind::King, "g10"),
            (Side::Black, PieceKind::Queen, "e7"),
            (Side::Black, PieceKind::Rook, "c6"),
            (Side::Black, PieceKind::Bishop, "f8"),
            (Side::Black, PieceKind::Knight, "h6"),
            (Side::Black, PieceKind::Pawn, "g5"),
            (Side::Black, PieceKind::Pawn, "e6"),
        ];
        for (side, kind, name) in layout {
            board.place_piece(side, kind, hex(name)).unwrap();
        }
        board
    }

    #[test]
    fn test_is_legal_leaves_board_untouched() {
        let mut board = busy_board();
        let snapshot = board.clone();
        let ids: Vec<PieceId> = board.pieces().map(|p| p.id).collect();

        let mut checked = 0;
        let mut captures = 0;
        for id in ids {
            let piece = *board.piece(id).unwrap();
            for dest in pseudo_legal_moves(&board, &piece, &MoveContext::default()) {
                if board.occupant(dest.to).is_some() {
                    captures += 1;
                }
                is_legal(&mut board, id, dest);
                assert_eq!(board, snapshot, "{:?} to {}", piece.kind, dest.to);
                checked += 1;
            }
        }
        assert!(checked > 50);
        assert!(captures > 3);
    }

    #[test]
    fn test_apply_and_undo_capture() {
        let mut board = busy_board();
        let snapshot = board.clone();
        let queen = board.occupant(hex("e4")).unwrap().id;

        // e4 -> e6 takes the black pawn
        let delta = apply_move(&mut board, queen, Destination::plain(hex("e6"))).unwrap();
        assert!(delta.is_capture());
        assert_eq!(delta.captured.unwrap().kind, PieceKind::Pawn);
        assert_eq!(board.occupant(hex("e6")).unwrap().id, queen);
        assert_eq!(board.piece(queen).unwrap().previous, hex("e4"));
        assert!(board.occupant(hex("e4")).is_none());
        assert_eq!(board.piece_count(), snapshot.piece_count() - 1);

        undo_move(&mut board, delta);
        assert_eq!(board, snapshot);
    }

    #[test]
    fn test_en_passant_apply_and_undo() {
        let mut board = Board::new();
        board.place_piece(Side::White, PieceKind::King, hex("a1")).unwrap();
        board.place_piece(Side::Black, PieceKind::King, hex("k6")).unwrap();
        let pawn = board.place_piece(Side::White, PieceKind::Pawn, hex("f6")).unwrap();
        let victim = board.place_piece(Side::Black, PieceKind::Pawn, hex("g5")).unwrap();
        let snapshot = board.clone();

        let dest = Destination {
            to: hex("g6"),
            en_passant: Some(hex("g5")),
        };
        let delta = apply_move(&mut board, pawn, dest).unwrap();
        assert!(delta.captured.is_none());
        assert_eq!(delta.en_passant_captured.unwrap().id, victim);
        assert!(board.piece(victim).is_none());
        assert!(board.occupant(hex("g5")).is_none());

        undo_move(&mut board, delta);
        assert_eq!(board, snapshot);
    }

    #[test]
    fn test_pinned_piece_has_no_legal_moves() {
        let mut board = Board::new();
        board.place_piece(Side::White, PieceKind::King, hex("f1")).unwrap();
        let knight = board.place_piece(Side::White, PieceKind::Knight, hex("f3")).unwrap();
        board.place_piece(Side::Black, PieceKind::Rook, hex("f9")).unwrap();
        board.place_piece(Side::Black, PieceKind::King, hex("a6")).unwrap();

        let ctx = MoveContext::default();
        let piece = *board.piece(knight).unwrap();
        assert!(!pseudo_legal_moves(&board, &piece, &ctx).is_empty());
        assert!(legal_destinations(&mut board, knight, &ctx).is_empty());
    }

    #[test]
    fn test_king_cannot_step_into_check() {
        let mut board = Board::new();
        let king = board.place_piece(Side::White, PieceKind::King, hex("f6")).unwrap();
        board.place_piece(Side::Black, PieceKind::Rook, hex("e10")).unwrap();
        board.place_piece(Side::Black, PieceKind::King, hex("a6")).unwrap();

        let legal = legal_destinations(&mut board, king, &MoveContext::default());
        assert!(!legal.is_empty());
        assert!(legal.iter().all(|d| d.to.q != -1), "stepped onto file e");
    }

    #[test]
    fn test_en_passant_that_exposes_king_is_illegal() {
        // Both pawns stand between the white king and the black rook
        let mut board = Board::new();
        board.place_piece(Side::White, PieceKind::King, Hex::new(-4, 0)).unwrap();
        let pawn = board.place_piece(Side::White, PieceKind::Pawn, Hex::new(0, 0)).unwrap();
        let victim = board.place_piece(Side::Black, PieceKind::Pawn, Hex::new(1, 0)).unwrap();
        board.place_piece(Side::Black, PieceKind::Rook, Hex::new(4, 0)).unwrap();
        board.place_piece(Side::Black, PieceKind::King, hex("f11")).unwrap();

        let ctx = MoveContext::new(Some(LastMove {
            piece: victim,
            kind: PieceKind::Pawn,
            side: Side::Black,
            from: hex("g7"),
            to: hex("g5"),
        }));
        let piece = *board.piece(pawn).unwrap();
        let pseudo = pseudo_legal_moves(&board, &piece, &ctx);
        assert!(pseudo.iter().any(|d| d.en_passant == Some(hex("g5"))));

        // The plain advance keeps the black pawn on the line; the capture does not
        let snapshot = board.clone();
        let legal = legal_destinations(&mut board, pawn, &ctx);
        assert!(legal.iter().all(|d| d.en_passant.is_none()));
        assert_eq!(legal, vec![Destination::plain(Hex::new(0, -1))]);
        assert_eq!(board, snapshot);
    }
}
