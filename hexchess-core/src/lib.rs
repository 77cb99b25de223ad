//! HEXCHESS Core - Glinski hexagonal chess rules engine
//!
//! This crate provides the core game logic:
//! - Board geometry (91-cell hexagon, axial coordinates, file/rank names)
//! - Piece kinds and their vector tables
//! - Pseudo-legal move generation and check detection
//! - Simulate-and-unwind legality filtering
//! - Game state machine with promotion, checkmate and stalemate
//! - Fixed-width move notation and validated replay
//! - Pointer input adapter for UIs

pub mod error;
pub mod board;
pub mod pieces;
pub mod movegen;
pub mod check;
pub mod simulate;
pub mod notation;
pub mod game;
pub mod setup;
pub mod input;

// Re-exports for convenient access
pub use board::{axial_add, position_to_axial, round_axial, Board, Hex, Position, Tile, BOARD_RADIUS};
pub use check::{is_attacked, team_in_check};
pub use error::{HexChessError, Result};
pub use game::{GamePhase, GameState, LegalMove, MoveStatus, Outcome, PendingPromotion, Rejection};
pub use input::{Command, InputController, InputEvent, Layout, Point};
pub use movegen::{pseudo_legal_moves, Destination, LastMove, MoveContext};
pub use notation::Notation;
pub use pieces::{get_piece_type, Piece, PieceId, PieceKind, PieceType, Side, PIECE_TYPES};
pub use setup::{Placement, Setup};
pub use simulate::{is_legal, legal_destinations, MoveDelta};
