//! Reversible edits.

use super::ShapeProperties;
use crate::canvas::CanvasDocument;
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect, Vec2};

/// What replaying a command does to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionUpdate {
    /// Select this shape, or nothing.
    Set(Option<ShapeId>),
    /// Clear the selection if it points at this shape.
    ClearIf(ShapeId),
}

/// Exact geometry before and after a resize, for shapes whose
/// `set_from_bounds` is not an exact inverse.
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeGeometry {
    /// Replay through `set_from_bounds`.
    Bounds,
    Line {
        before: (Point, Point),
        after: (Point, Point),
    },
    Freehand {
        before: Vec<Point>,
        after: Vec<Point>,
    },
}

impl ResizeGeometry {
    /// Snapshot `shape` as it was when the resize started. Finish with
    /// [`ResizeGeometry::finish`] once the gesture ends.
    pub fn start(shape: &Shape) -> Self {
        match shape {
            Shape::Line(line) => ResizeGeometry::Line {
                before: (line.start, line.end),
                after: (line.start, line.end),
            },
            Shape::Freehand(freehand) => ResizeGeometry::Freehand {
                before: freehand.points.clone(),
                after: freehand.points.clone(),
            },
            _ => ResizeGeometry::Bounds,
        }
    }

    /// Record the final geometry of `shape`.
    pub fn finish(self, shape: &Shape) -> Self {
        match (self, shape) {
            (ResizeGeometry::Line { before, .. }, Shape::Line(line)) => ResizeGeometry::Line {
                before,
                after: (line.start, line.end),
            },
            (ResizeGeometry::Freehand { before, .. }, Shape::Freehand(freehand)) => {
                ResizeGeometry::Freehand {
                    before,
                    after: freehand.points.clone(),
                }
            }
            (geometry, _) => geometry,
        }
    }
}

/// A reversible edit holding everything it needs to replay itself.
///
/// Commands are replayed strictly in stack order, so the document always
/// holds the state a command expects when it is undone or redone.
#[derive(Debug, Clone)]
pub enum Command {
    /// `shape` was inserted at `index` in paint order.
    AddShape { shape: Shape, index: usize },
    /// `shape` was removed from `index` in paint order.
    RemoveShape { shape: Shape, index: usize },
    Move { id: ShapeId, delta: Vec2 },
    Resize {
        id: ShapeId,
        old_box: Rect,
        new_box: Rect,
        geometry: ResizeGeometry,
    },
    PropertyChange {
        id: ShapeId,
        before: ShapeProperties,
        after: ShapeProperties,
    },
    /// Every shape in paint order, and the selection at the time.
    ClearAll {
        shapes: Vec<Shape>,
        selection: Option<ShapeId>,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddShape { .. } => "add shape",
            Command::RemoveShape { .. } => "remove shape",
            Command::Move { .. } => "move",
            Command::Resize { .. } => "resize",
            Command::PropertyChange { .. } => "property change",
            Command::ClearAll { .. } => "clear all",
        }
    }

    /// Re-apply the edit.
    pub fn redo(&self, document: &mut CanvasDocument) -> SelectionUpdate {
        match self {
            Command::AddShape { shape, index } => {
                document.insert_at(*index, shape.clone());
                SelectionUpdate::Set(Some(shape.id()))
            }
            Command::RemoveShape { shape, .. } => {
                document.remove(shape.id());
                SelectionUpdate::ClearIf(shape.id())
            }
            Command::Move { id, delta } => {
                if let Some(shape) = document.get_mut(*id) {
                    shape.move_by(*delta);
                }
                SelectionUpdate::Set(Some(*id))
            }
            Command::Resize {
                id,
                new_box,
                geometry,
                ..
            } => {
                if let Some(shape) = document.get_mut(*id) {
                    apply_resize(shape, *new_box, geometry, false);
                }
                SelectionUpdate::Set(Some(*id))
            }
            Command::PropertyChange { id, after, .. } => {
                if let Some(shape) = document.get_mut(*id) {
                    after.apply_to(shape);
                }
                SelectionUpdate::Set(Some(*id))
            }
            Command::ClearAll { .. } => {
                document.clear();
                SelectionUpdate::Set(None)
            }
        }
    }

    /// Revert the edit.
    pub fn undo(&self, document: &mut CanvasDocument) -> SelectionUpdate {
        match self {
            Command::AddShape { shape, .. } => {
                document.remove(shape.id());
                SelectionUpdate::ClearIf(shape.id())
            }
            Command::RemoveShape { shape, index } => {
                document.insert_at(*index, shape.clone());
                SelectionUpdate::Set(Some(shape.id()))
            }
            Command::Move { id, delta } => {
                if let Some(shape) = document.get_mut(*id) {
                    shape.move_by(-*delta);
                }
                SelectionUpdate::Set(Some(*id))
            }
            Command::Resize {
                id,
                old_box,
                geometry,
                ..
            } => {
                if let Some(shape) = document.get_mut(*id) {
                    apply_resize(shape, *old_box, geometry, true);
                }
                SelectionUpdate::Set(Some(*id))
            }
            Command::PropertyChange { id, before, .. } => {
                if let Some(shape) = document.get_mut(*id) {
                    before.apply_to(shape);
                }
                SelectionUpdate::Set(Some(*id))
            }
            Command::ClearAll { shapes, selection } => {
                document.clear();
                for shape in shapes {
                    document.add(shape.clone());
                }
                SelectionUpdate::Set(*selection)
            }
        }
    }
}

fn apply_resize(shape: &mut Shape, rect: Rect, geometry: &ResizeGeometry, use_before: bool) {
    match (geometry, shape) {
        (ResizeGeometry::Line { before, after }, Shape::Line(line)) => {
            let (start, end) = if use_before { *before } else { *after };
            line.start = start;
            line.end = end;
        }
        (ResizeGeometry::Freehand { before, after }, Shape::Freehand(freehand)) => {
            freehand.points = if use_before { before.clone() } else { after.clone() };
        }
        (_, shape) => shape.set_from_bounds(rect),
    }
}
