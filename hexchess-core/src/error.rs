//! Error taxonomy for the rules engine
//!
//! Geometry and parsing failures are typed errors raised at the boundary.
//! Ordinary illegal move attempts are *not* errors inside the engine; they
//! come back as [`crate::game::MoveStatus::Rejected`] and only turn into
//! [`HexChessError::IllegalMove`] on the notation path.

use thiserror::Error;

use crate::pieces::Side;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HexChessError {
    /// Malformed or off-board position string (or axial key)
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// Move notation that is not `OOFFNNRR[P]`
    #[error("invalid notation {notation:?}: {reason}")]
    InvalidNotation { notation: String, reason: String },

    /// Requested move is not in the legal set
    #[error("illegal move {from} -> {to}: {reason}")]
    IllegalMove {
        from: String,
        to: String,
        reason: String,
    },

    /// A side has no king on the board
    #[error("{0:?} has no king on the board")]
    MissingKing(Side),

    /// A replayed history diverged from the rules
    #[error("replay desync at move {index} ({notation}): {reason}")]
    ReplayDesync {
        index: usize,
        notation: String,
        reason: String,
    },

    #[error("invalid promotion: {0}")]
    InvalidPromotion(String),

    #[error("invalid setup: {0}")]
    InvalidSetup(String),
}

pub type Result<T> = std::result::Result<T, HexChessError>;
