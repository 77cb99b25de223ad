//! Game API routes
//!
//! Moves travel as fixed-width notation. A pawn move onto its last rank sent
//! without a promotion digit stops at `awaiting_promotion`; the client then
//! posts the chosen kind to `/api/game/promote`.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use hexchess_core::{
    GamePhase, GameState, HexChessError, MoveStatus, Notation, Outcome, PieceKind, Position, Side,
};

use crate::errors::ApiError;
use crate::routes::board::PieceView;
use crate::state::ServerState;

// ============================================================================
// RESPONSES
// ============================================================================

#[derive(Serialize)]
pub struct PromotionView {
    pub from: Option<Position>,
    pub to: Option<Position>,
    pub side: Side,
}

/// Snapshot of the shared game
#[derive(Serialize)]
pub struct GameView {
    pub turn: Side,
    pub phase: GamePhase,
    pub ply: u32,
    pub move_number: u32,
    pub in_check: bool,
    pub outcome: Option<Outcome>,
    pub winner: Option<Side>,
    pub pending_promotion: Option<PromotionView>,
    pub history: Vec<Notation>,
    pub pieces: Vec<PieceView>,
}

impl GameView {
    pub fn new(game: &GameState) -> Self {
        Self {
            turn: game.turn(),
            phase: game.phase(),
            ply: game.ply(),
            move_number: game.move_number(),
            in_check: game.in_check(),
            outcome: game.outcome(),
            winner: game.winner(),
            pending_promotion: game.pending_promotion().map(|p| PromotionView {
                from: Position::from_hex(p.from),
                to: Position::from_hex(p.to),
                side: p.side,
            }),
            history: game.history().to_vec(),
            pieces: game.board().pieces().map(PieceView::new).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct MoveResponse {
    pub status: MoveStatus,
    pub game: GameView,
}

#[derive(Serialize)]
pub struct DestinationView {
    pub to: Option<Position>,
    pub key: String,
    pub en_passant: bool,
    pub notation: Option<Notation>,
}

#[derive(Serialize)]
pub struct PieceMovesResponse {
    pub piece: PieceView,
    pub moves: Vec<DestinationView>,
}

// ============================================================================
// REQUESTS
// ============================================================================

#[derive(Deserialize)]
pub struct MovesQuery {
    pub position: String,
}

#[derive(Deserialize)]
pub struct MoveRequest {
    pub notation: String,
}

#[derive(Deserialize)]
pub struct PromoteRequest {
    pub kind: PieceKind,
}

#[derive(Deserialize)]
pub struct LoadRequest {
    pub moves: Vec<String>,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// Current game snapshot
pub async fn get_game(State(state): State<Arc<ServerState>>) -> Result<Json<GameView>, ApiError> {
    let game = state.lock_game()?;
    Ok(Json(GameView::new(&game)))
}

/// Legal destinations of the piece on `?position=`
pub async fn get_piece_moves(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<MovesQuery>,
) -> Result<Json<PieceMovesResponse>, ApiError> {
    let position: Position = query.position.parse()?;
    let mut game = state.lock_game()?;

    let piece = game
        .board()
        .occupant(position.to_hex())
        .copied()
        .ok_or_else(|| ApiError::NotFound(format!("no piece on {}", position)))?;

    let moves = game
        .get_piece_moves(piece.id)
        .into_iter()
        .map(|dest| DestinationView {
            to: Position::from_hex(dest.to),
            key: dest.to.to_key(),
            en_passant: dest.en_passant.is_some(),
            notation: Notation::from_hexes(piece.position, dest.to, None),
        })
        .collect();

    Ok(Json(PieceMovesResponse {
        piece: PieceView::new(&piece),
        moves,
    }))
}

/// Apply one move given as notation
pub async fn make_move(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let notation: Notation = req.notation.trim().parse()?;
    let mut game = state.lock_game()?;

    let status = match notation.promotion {
        Some(_) => game.apply_notation(&notation)?,
        // Without a digit a promoting pawn waits for /promote
        None => {
            let id = game
                .board()
                .occupant(notation.from.to_hex())
                .map(|p| p.id)
                .ok_or_else(|| HexChessError::IllegalMove {
                    from: notation.from.to_string(),
                    to: notation.to.to_string(),
                    reason: "no piece on the source cell".to_string(),
                })?;
            match game.move_piece(id, notation.to.to_hex()) {
                MoveStatus::Rejected(rejection) => {
                    return Err(ApiError::IllegalMove(format!(
                        "illegal move {} -> {}: {}",
                        notation.from, notation.to, rejection
                    )))
                }
                status => status,
            }
        }
    };

    tracing::debug!(%notation, ?status, "move applied");
    Ok(Json(MoveResponse {
        status,
        game: GameView::new(&game),
    }))
}

/// Resolve a pending promotion
pub async fn promote(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<PromoteRequest>,
) -> Result<Json<GameView>, ApiError> {
    let mut game = state.lock_game()?;
    game.choose_promotion(req.kind)?;
    Ok(Json(GameView::new(&game)))
}

/// Replace the game with a replay of a full history
pub async fn load_game(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<LoadRequest>,
) -> Result<Json<GameView>, ApiError> {
    let mut game = state.lock_game()?;
    game.load_state(&req.moves)?;
    tracing::info!(moves = req.moves.len(), "game resynchronised");
    Ok(Json(GameView::new(&game)))
}

/// Back to the opening array
pub async fn reset_game(State(state): State<Arc<ServerState>>) -> Result<Json<GameView>, ApiError> {
    let mut game = state.lock_game()?;
    game.reset_board();
    tracing::info!("game reset");
    Ok(Json(GameView::new(&game)))
}
