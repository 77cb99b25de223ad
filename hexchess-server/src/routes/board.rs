//! Board geometry endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use hexchess_core::board::{BOARD_RADIUS, TILE_COUNT};
use hexchess_core::{Piece, PieceId, PieceKind, Position, Side};

use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Serialize)]
pub struct BoardInfo {
    pub radius: i8,
    pub tile_count: usize,
    pub tiles: Vec<TileView>,
}

#[derive(Serialize)]
pub struct TileView {
    /// Axial `"q,r"` key
    pub key: String,
    pub q: i8,
    pub r: i8,
    pub position: Position,
    pub shade: u8,
    pub occupant: Option<PieceView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PieceView {
    pub id: PieceId,
    pub kind: PieceKind,
    pub side: Side,
    /// Text-board letter, uppercase for White
    pub symbol: char,
    pub position: Option<Position>,
    pub key: String,
}

impl PieceView {
    pub fn new(piece: &Piece) -> Self {
        Self {
            id: piece.id,
            kind: piece.kind,
            side: piece.side,
            symbol: piece.symbol(),
            position: Position::from_hex(piece.position),
            key: piece.position.to_key(),
        }
    }
}

/// Get board geometry with the current occupants
pub async fn get_board(State(state): State<Arc<ServerState>>) -> Result<Json<BoardInfo>, ApiError> {
    let game = state.lock_game()?;
    let board = game.board();

    let tiles = board
        .tiles()
        .map(|tile| TileView {
            key: tile.hex().to_key(),
            q: tile.hex().q,
            r: tile.hex().r,
            position: tile.position(),
            shade: tile.shade(),
            occupant: tile
                .occupant()
                .and_then(|id| board.piece(id))
                .map(PieceView::new),
        })
        .collect();

    Ok(Json(BoardInfo {
        radius: BOARD_RADIUS,
        tile_count: TILE_COUNT,
        tiles,
    }))
}
