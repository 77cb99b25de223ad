//! Pointer input adapter
//!
//! A UI pushes [`Command`]s as events arrive and calls
//! [`InputController::drain`] once per tick. Pixel coordinates are mapped to
//! cells with a flat-topped [`Layout`].

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::board::{round_axial, Hex};
use crate::game::{GameState, MoveStatus};
use crate::pieces::{PieceId, PieceKind};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Flat-topped hex layout: `origin` is the pixel centre of f6, `size` the
/// centre-to-corner radius
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub origin: Point,
    pub size: f64,
}

impl Layout {
    pub fn new(origin: Point, size: f64) -> Self {
        Self { origin, size }
    }

    /// Nearest cell to a pixel; may be off the board
    pub fn pixel_to_axial(&self, point: Point) -> Hex {
        let x = point.x - self.origin.x;
        let y = point.y - self.origin.y;
        let q = (2.0 / 3.0 * x) / self.size;
        let r = (-1.0 / 3.0 * x + SQRT_3 / 3.0 * y) / self.size;
        round_axial(q, r)
    }

    /// Pixel centre of a cell
    pub fn axial_to_pixel(&self, hex: Hex) -> Point {
        let q = hex.q as f64;
        let r = hex.r as f64;
        Point {
            x: self.origin.x + self.size * 1.5 * q,
            y: self.origin.y + self.size * SQRT_3 * (r + q / 2.0),
        }
    }
}

/// One queued user intent
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    SelectAt(Point),
    ReleaseAt(Point),
    ChoosePromotion(PieceKind),
}

/// What draining a command did
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Selected(PieceId),
    /// Pointer pressed where there is nothing of the side to move
    NothingSelected,
    Moved(MoveStatus),
    /// Released without a selection
    Ignored,
    Promoted(PieceId),
    PromotionRefused,
}

#[derive(Clone, Debug)]
pub struct InputController {
    layout: Layout,
    selected: Option<PieceId>,
    queue: VecDeque<Command>,
}

impl InputController {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            selected: None,
            queue: VecDeque::new(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn selected(&self) -> Option<PieceId> {
        self.selected
    }

    pub fn push(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Select the piece of the side to move under `point`
    pub fn select_at(&mut self, game: &GameState, point: Point) -> Option<PieceId> {
        let hex = self.layout.pixel_to_axial(point);
        self.selected = game
            .board()
            .occupant(hex)
            .filter(|p| p.side == game.turn())
            .map(|p| p.id);
        self.selected
    }

    /// Try to move the selected piece to the cell under `point`. The
    /// selection is cleared either way; `None` if nothing was selected.
    pub fn release_at(&mut self, game: &mut GameState, point: Point) -> Option<MoveStatus> {
        let id = self.selected.take()?;
        let hex = self.layout.pixel_to_axial(point);
        Some(game.move_piece(id, hex))
    }

    /// Apply every queued command in order
    pub fn drain(&mut self, game: &mut GameState) -> Vec<InputEvent> {
        let mut events = Vec::with_capacity(self.queue.len());
        while let Some(command) = self.queue.pop_front() {
            let event = match command {
                Command::SelectAt(point) => match self.select_at(game, point) {
                    Some(id) => InputEvent::Selected(id),
                    None => InputEvent::NothingSelected,
                },
                Command::ReleaseAt(point) => match self.release_at(game, point) {
                    Some(status) => InputEvent::Moved(status),
                    None => InputEvent::Ignored,
                },
                Command::ChoosePromotion(kind) => match game.choose_promotion(kind) {
                    Ok(id) => InputEvent::Promoted(id),
                    Err(e) => {
                        tracing::debug!(error = %e, "promotion choice refused");
                        InputEvent::PromotionRefused
                    }
                },
            };
            events.push(event);
        }
        events
    }
}
