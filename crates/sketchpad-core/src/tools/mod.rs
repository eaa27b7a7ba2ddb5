//! Tools and the pointer interaction state machine.

mod creating;
mod idle;
mod moving;
mod resizing;

pub use creating::CreatingState;
pub use moving::MovingState;
pub use resizing::ResizingState;

use crate::canvas::Canvas;
use crate::input::MouseButton;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    RoundedRectangle,
    Ellipse,
    Hexagon,
    Line,
    Freehand,
    Text,
}

impl ToolKind {
    pub const ALL: [ToolKind; 8] = [
        ToolKind::Select,
        ToolKind::Rectangle,
        ToolKind::RoundedRectangle,
        ToolKind::Ellipse,
        ToolKind::Hexagon,
        ToolKind::Line,
        ToolKind::Freehand,
        ToolKind::Text,
    ];

    /// Tools that create a shape by dragging.
    pub fn is_creation_tool(&self) -> bool {
        !matches!(self, ToolKind::Select | ToolKind::Text)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Rectangle => "rectangle",
            ToolKind::RoundedRectangle => "rounded rectangle",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Hexagon => "hexagon",
            ToolKind::Line => "line",
            ToolKind::Freehand => "freehand",
            ToolKind::Text => "text",
        }
    }
}

/// What the pointer is doing right now. Exactly one state is active.
///
/// Every handler consumes the current state and returns the next one.
#[derive(Debug, Clone, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Dragging out a new shape; the preview lives on the canvas.
    Creating(CreatingState),
    /// Dragging the selected shape.
    Moving(MovingState),
    /// Dragging a handle of the selected shape.
    Resizing(ResizingState),
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Creating(_) => "creating",
            InteractionState::Moving(_) => "moving",
            InteractionState::Resizing(_) => "resizing",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    pub(crate) fn pointer_down(self, canvas: &mut Canvas, position: Point, button: MouseButton) -> Self {
        match self {
            InteractionState::Idle => idle::press(canvas, position, button),
            // A press mid-gesture changes nothing
            busy => busy,
        }
    }

    pub(crate) fn pointer_move(self, canvas: &mut Canvas, position: Point, primary_held: bool) -> Self {
        if !primary_held {
            return self;
        }
        match self {
            InteractionState::Idle => InteractionState::Idle,
            InteractionState::Creating(state) => state.drag(canvas, position),
            InteractionState::Moving(state) => state.drag(canvas, position),
            InteractionState::Resizing(state) => state.drag(canvas, position),
        }
    }

    pub(crate) fn pointer_up(self, canvas: &mut Canvas, position: Point, button: MouseButton) -> Self {
        if !button.is_primary() {
            return self;
        }
        match self {
            InteractionState::Idle => InteractionState::Idle,
            InteractionState::Creating(state) => state.release(canvas, position),
            InteractionState::Moving(state) => state.release(canvas),
            InteractionState::Resizing(state) => state.release(canvas),
        }
    }
}
