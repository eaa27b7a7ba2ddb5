//! Dragging a shape.

use super::InteractionState;
use crate::canvas::Canvas;
use crate::history::Command;
use crate::shapes::ShapeId;
use kurbo::{Point, Vec2};

#[derive(Debug, Clone, PartialEq)]
pub struct MovingState {
    id: ShapeId,
    last: Point,
    /// Sum of every applied delta.
    total: Vec2,
}

impl MovingState {
    pub(super) fn new(id: ShapeId, start: Point) -> Self {
        Self {
            id,
            last: start,
            total: Vec2::ZERO,
        }
    }

    pub fn shape_id(&self) -> ShapeId {
        self.id
    }

    pub fn total(&self) -> Vec2 {
        self.total
    }

    pub(super) fn drag(mut self, canvas: &mut Canvas, position: Point) -> InteractionState {
        let delta = position - self.last;
        if let Some(shape) = canvas.document.get_mut(self.id) {
            shape.move_by(delta);
        }
        self.total += delta;
        self.last = position;
        InteractionState::Moving(self)
    }

    /// Record the whole drag as one move.
    pub(super) fn release(self, canvas: &mut Canvas) -> InteractionState {
        if self.total != Vec2::ZERO && canvas.document.contains(self.id) {
            canvas.push_command(Command::Move {
                id: self.id,
                delta: self.total,
            });
        }
        InteractionState::Idle
    }
}
