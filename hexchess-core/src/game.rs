//! Game state machine
//!
//! `Active -> (move) -> Active | PromotionPending -> (choice) -> Active ... -> GameOver`
//!
//! The state is not reentrant: callers serialise access (see the server's
//! mutex). Illegal move attempts come back as [`MoveStatus::Rejected`] and
//! leave everything untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Hex};
use crate::check::team_in_check;
use crate::error::{HexChessError, Result};
use crate::movegen::{Destination, LastMove, MoveContext};
use crate::notation::Notation;
use crate::pieces::{PieceId, PieceKind, Side};
use crate::setup::Setup;
use crate::simulate::{apply_move, legal_destinations};

// ============================================================================
// CORE TYPES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Active,
    PromotionPending,
    GameOver,
}

/// How a finished game ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    Checkmate { winner: Side },
    Stalemate,
}

/// Why a move attempt was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    GameOver,
    PromotionPending,
    UnknownPiece,
    WrongSide,
    IllegalDestination,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rejection::GameOver => "the game is over",
            Rejection::PromotionPending => "a promotion choice is pending",
            Rejection::UnknownPiece => "no such piece",
            Rejection::WrongSide => "not that side's turn",
            Rejection::IllegalDestination => "destination is not a legal move",
        };
        f.write_str(text)
    }
}

/// Result of [`GameState::move_piece`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveStatus {
    Rejected(Rejection),
    Completed,
    AwaitingPromotion,
}

/// A pawn standing on its last rank, waiting for a kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPromotion {
    pub piece: PieceId,
    pub side: Side,
    pub from: Hex,
    pub to: Hex,
}

/// One fully legal move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalMove {
    pub piece: PieceId,
    pub kind: PieceKind,
    pub from: Hex,
    pub to: Hex,
    pub en_passant: Option<Hex>,
}

impl LegalMove {
    /// Notation without a promotion digit
    pub fn notation(&self) -> Option<Notation> {
        Notation::from_hexes(self.from, self.to, None)
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    board: Board,
    turn: Side,

    /// Half-moves played
    ply: u32,
    in_check: bool,
    pending_promotion: Option<PendingPromotion>,
    outcome: Option<Outcome>,
    last_move: Option<LastMove>,
    history: Vec<Notation>,

    /// Where replays start from
    origin: Board,
    origin_turn: Side,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Standard opening array, White to move
    pub fn new() -> Self {
        Self::start(Board::standard(), Side::White)
    }

    /// Custom starting position. Each side needs exactly one king and the side
    /// not to move may not be in check.
    pub fn with_board(board: Board, to_move: Side) -> Result<Self> {
        for side in [Side::White, Side::Black] {
            let kings = board
                .pieces_of(side)
                .filter(|p| p.kind == PieceKind::King)
                .count();
            match kings {
                0 => return Err(HexChessError::MissingKing(side)),
                1 => {}
                n => {
                    return Err(HexChessError::InvalidSetup(format!(
                        "{:?} has {} kings",
                        side, n
                    )))
                }
            }
        }
        if team_in_check(&board, to_move.opponent()) {
            return Err(HexChessError::InvalidSetup(format!(
                "{:?} is in check but it is {:?}'s move",
                to_move.opponent(),
                to_move
            )));
        }
        Ok(Self::start(board, to_move))
    }

    pub fn from_setup(setup: &Setup) -> Result<Self> {
        Self::with_board(setup.to_board()?, setup.to_move)
    }

    fn start(board: Board, turn: Side) -> Self {
        let mut game = Self {
            origin: board.clone(),
            origin_turn: turn,
            board,
            turn,
            ply: 0,
            in_check: false,
            pending_promotion: None,
            outcome: None,
            last_move: None,
            history: Vec::new(),
        };
        game.refresh_status();
        game
    }

    /// Back to the standard opening array
    pub fn reset_board(&mut self) {
        *self = Self::new();
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move
    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn ply(&self) -> u32 {
        self.ply
    }

    /// Full-move number, starting at 1. A move number covers one White move
    /// and the Black reply, so a game opened by Black bumps it after ply 1.
    pub fn move_number(&self) -> u32 {
        let offset = match self.origin_turn {
            Side::White => 0,
            Side::Black => 1,
        };
        1 + (self.ply + offset) / 2
    }

    /// Is the side to move in check? While a promotion is pending this is the
    /// mover's own (always safe) king.
    pub fn in_check(&self) -> bool {
        self.in_check
    }

    pub fn pending_promotion(&self) -> Option<&PendingPromotion> {
        self.pending_promotion.as_ref()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn winner(&self) -> Option<Side> {
        match self.outcome {
            Some(Outcome::Checkmate { winner }) => Some(winner),
            _ => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn phase(&self) -> GamePhase {
        if self.outcome.is_some() {
            GamePhase::GameOver
        } else if self.pending_promotion.is_some() {
            GamePhase::PromotionPending
        } else {
            GamePhase::Active
        }
    }

    pub fn last_move(&self) -> Option<&LastMove> {
        self.last_move.as_ref()
    }

    /// Every closed move so far, in order
    pub fn history(&self) -> &[Notation] {
        &self.history
    }

    pub fn move_context(&self) -> MoveContext {
        MoveContext::new(self.last_move)
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// Legal destinations of one piece (either side)
    pub fn get_piece_moves(&mut self, id: PieceId) -> Vec<Destination> {
        let ctx = self.move_context();
        legal_destinations(&mut self.board, id, &ctx)
    }

    /// Every legal move of `side`
    pub fn get_all_legal_moves(&mut self, side: Side) -> Vec<LegalMove> {
        let ctx = self.move_context();
        let roster: Vec<_> = self
            .board
            .pieces_of(side)
            .map(|p| (p.id, p.kind, p.position))
            .collect();

        let mut moves = Vec::new();
        for (id, kind, from) in roster {
            for dest in legal_destinations(&mut self.board, id, &ctx) {
                moves.push(LegalMove {
                    piece: id,
                    kind,
                    from,
                    to: dest.to,
                    en_passant: dest.en_passant,
                });
            }
        }
        moves
    }

    /// Legal moves of the side to move
    pub fn legal_moves(&mut self) -> Vec<LegalMove> {
        self.get_all_legal_moves(self.turn)
    }

    fn has_legal_move(&mut self, side: Side) -> bool {
        let ctx = self.move_context();
        let ids: Vec<PieceId> = self.board.pieces_of(side).map(|p| p.id).collect();
        ids.into_iter()
            .any(|id| !legal_destinations(&mut self.board, id, &ctx).is_empty())
    }

    // ========================================================================
    // MOVE APPLICATION
    // ========================================================================

    /// Move piece `id` to `to` if that is legal for the side to move
    pub fn move_piece(&mut self, id: PieceId, to: Hex) -> MoveStatus {
        if self.outcome.is_some() {
            return self.reject(id, to, Rejection::GameOver);
        }
        if self.pending_promotion.is_some() {
            return self.reject(id, to, Rejection::PromotionPending);
        }
        let Some(piece) = self.board.piece(id).copied() else {
            return self.reject(id, to, Rejection::UnknownPiece);
        };
        if piece.side != self.turn {
            return self.reject(id, to, Rejection::WrongSide);
        }

        let Some(dest) = self.get_piece_moves(id).into_iter().find(|d| d.to == to) else {
            return self.reject(id, to, Rejection::IllegalDestination);
        };
        let Some(notation) = Notation::from_hexes(piece.position, to, None) else {
            return self.reject(id, to, Rejection::IllegalDestination);
        };
        let Some(delta) = apply_move(&mut self.board, id, dest) else {
            return self.reject(id, to, Rejection::IllegalDestination);
        };

        tracing::debug!(%notation, capture = delta.is_capture(), "move applied");
        let last = LastMove {
            piece: id,
            kind: piece.kind,
            side: piece.side,
            from: delta.from,
            to: delta.to,
        };

        if piece.kind == PieceKind::Pawn && self.is_last_rank(piece.side, to) {
            tracing::debug!(%notation, "pawn reached last rank, awaiting promotion");
            self.pending_promotion = Some(PendingPromotion {
                piece: id,
                side: piece.side,
                from: delta.from,
                to: delta.to,
            });
            self.last_move = Some(last);
            self.in_check = team_in_check(&self.board, self.turn);
            return MoveStatus::AwaitingPromotion;
        }

        self.close_move(last, notation);
        MoveStatus::Completed
    }

    /// Replace the pawn waiting on its last rank. Returns the new piece's id.
    pub fn promote_piece(&mut self, id: PieceId, kind: PieceKind) -> Result<PieceId> {
        let pending = self
            .pending_promotion
            .ok_or_else(|| HexChessError::InvalidPromotion("no promotion pending".to_string()))?;
        if pending.piece != id {
            return Err(HexChessError::InvalidPromotion(format!(
                "piece {} is not the promoting pawn",
                id
            )));
        }
        if kind.promotion_code().is_none() {
            return Err(HexChessError::InvalidPromotion(format!("cannot promote to {}", kind)));
        }
        let notation = Notation::from_hexes(pending.from, pending.to, Some(kind))
            .ok_or_else(|| HexChessError::InvalidPosition(pending.to.to_key()))?;
        let new_id = self
            .board
            .promote(id, kind)
            .ok_or_else(|| HexChessError::InvalidPromotion(format!("piece {} is gone", id)))?;

        self.pending_promotion = None;
        tracing::info!(side = ?pending.side, %kind, %notation, "pawn promoted");

        let last = LastMove {
            piece: new_id,
            kind: PieceKind::Pawn,
            side: pending.side,
            from: pending.from,
            to: pending.to,
        };
        self.close_move(last, notation);
        Ok(new_id)
    }

    /// Resolve the pending promotion without knowing the pawn's id
    pub fn choose_promotion(&mut self, kind: PieceKind) -> Result<PieceId> {
        let pending = self
            .pending_promotion
            .ok_or_else(|| HexChessError::InvalidPromotion("no promotion pending".to_string()))?;
        self.promote_piece(pending.piece, kind)
    }

    /// Apply one wire move. On error nothing has changed.
    pub fn apply_notation(&mut self, notation: &Notation) -> Result<MoveStatus> {
        let from = notation.from.to_hex();
        let to = notation.to.to_hex();
        let illegal = |reason: String| HexChessError::IllegalMove {
            from: notation.from.to_string(),
            to: notation.to.to_string(),
            reason,
        };

        if let Some(rejection) = self.blocking_rejection() {
            return Err(illegal(rejection.to_string()));
        }
        let piece = self
            .board
            .occupant(from)
            .copied()
            .ok_or_else(|| illegal("no piece on the source cell".to_string()))?;
        if piece.side != self.turn {
            return Err(illegal(Rejection::WrongSide.to_string()));
        }
        if !self.get_piece_moves(piece.id).iter().any(|d| d.to == to) {
            return Err(illegal(Rejection::IllegalDestination.to_string()));
        }

        let promotes = piece.kind == PieceKind::Pawn && self.is_last_rank(piece.side, to);
        match (promotes, notation.promotion) {
            (true, None) => {
                return Err(HexChessError::InvalidPromotion(format!(
                    "{} needs a promotion digit",
                    notation
                )))
            }
            (false, Some(_)) => {
                return Err(HexChessError::InvalidPromotion(format!(
                    "{} is not a promotion",
                    notation
                )))
            }
            _ => {}
        }

        // A promoting move always carries its digit by now
        match (self.move_piece(piece.id, to), notation.promotion) {
            (MoveStatus::Rejected(rejection), _) => Err(illegal(rejection.to_string())),
            (MoveStatus::AwaitingPromotion, Some(kind)) => {
                self.promote_piece(piece.id, kind)?;
                Ok(MoveStatus::Completed)
            }
            (status, _) => Ok(status),
        }
    }

    /// Rebuild the game by replaying `moves` from this game's starting
    /// position. Every move is validated; on failure `self` is unchanged.
    pub fn load_state<S: AsRef<str>>(&mut self, moves: &[S]) -> Result<()> {
        let mut replay = Self::start(self.origin.clone(), self.origin_turn);

        for (index, raw) in moves.iter().enumerate() {
            let raw = raw.as_ref();
            let notation: Notation = raw.parse()?;
            replay
                .apply_notation(&notation)
                .map_err(|e| HexChessError::ReplayDesync {
                    index,
                    notation: raw.to_string(),
                    reason: e.to_string(),
                })?;
            tracing::debug!(index, %notation, "replayed");
        }

        *self = replay;
        Ok(())
    }

    // ========================================================================
    // BOOKKEEPING
    // ========================================================================

    /// A pawn of `side` on `hex` has nowhere further up the file to go
    fn is_last_rank(&self, side: Side, hex: Hex) -> bool {
        self.board.get_tile(hex.step(side.forward(), 1)).is_none()
    }

    fn blocking_rejection(&self) -> Option<Rejection> {
        if self.outcome.is_some() {
            Some(Rejection::GameOver)
        } else if self.pending_promotion.is_some() {
            Some(Rejection::PromotionPending)
        } else {
            None
        }
    }

    fn reject(&self, id: PieceId, to: Hex, rejection: Rejection) -> MoveStatus {
        tracing::debug!(piece = id, to = %to, %rejection, "move rejected");
        MoveStatus::Rejected(rejection)
    }

    fn close_move(&mut self, last: LastMove, notation: Notation) {
        self.history.push(notation);
        self.last_move = Some(last);
        self.turn = self.turn.opponent();
        self.ply += 1;
        self.refresh_status();
    }

    /// Recompute check and game end for the side to move
    fn refresh_status(&mut self) {
        self.in_check = team_in_check(&self.board, self.turn);
        if self.has_legal_move(self.turn) {
            return;
        }

        let outcome = if self.in_check {
            Outcome::Checkmate {
                winner: self.turn.opponent(),
            }
        } else {
            Outcome::Stalemate
        };
        tracing::info!(?outcome, ply = self.ply, "game over");
        self.outcome = Some(outcome);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
