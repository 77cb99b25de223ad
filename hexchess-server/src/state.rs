//! Server state management
//!
//! One game shared by every client. The core is not reentrant, so all access
//! goes through the mutex.

use std::sync::{Mutex, MutexGuard};

use hexchess_core::GameState;

use crate::errors::ApiError;

/// Server-wide shared state
pub struct ServerState {
    pub game: Mutex<GameState>,
}

impl ServerState {
    pub fn new() -> Self {
        Self::with_game(GameState::new())
    }

    pub fn with_game(game: GameState) -> Self {
        Self {
            game: Mutex::new(game),
        }
    }

    pub fn lock_game(&self) -> Result<MutexGuard<'_, GameState>, ApiError> {
        self.game
            .lock()
            .map_err(|_| ApiError::Internal("game lock poisoned".to_string()))
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
