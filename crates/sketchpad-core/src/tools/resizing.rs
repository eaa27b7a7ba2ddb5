//! Dragging a handle of the selected shape.

use super::InteractionState;
use crate::canvas::Canvas;
use crate::history::{Command, ResizeGeometry};
use crate::selection::{HandleKind, ResizeAnchors};
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect};

/// Freehand boxes thinner than this cannot be scaled from.
const MIN_REMAP_EXTENT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct ResizingState {
    id: ShapeId,
    handle: HandleKind,
    anchors: ResizeAnchors,
    old_box: Rect,
    geometry: ResizeGeometry,
}

impl ResizingState {
    pub(super) fn begin(shape: &Shape, handle: HandleKind) -> Self {
        let old_box = shape.bounds();
        Self {
            id: shape.id(),
            handle,
            anchors: ResizeAnchors::from_rect(old_box),
            old_box,
            geometry: ResizeGeometry::start(shape),
        }
    }

    pub fn shape_id(&self) -> ShapeId {
        self.id
    }

    pub fn handle(&self) -> HandleKind {
        self.handle
    }

    pub(super) fn drag(self, canvas: &mut Canvas, position: Point) -> InteractionState {
        if let Some(shape) = canvas.document.get_mut(self.id) {
            match (self.handle, shape) {
                (HandleKind::LineStart, Shape::Line(line)) => line.start = position,
                (HandleKind::LineEnd, Shape::Line(line)) => line.end = position,
                (HandleKind::LineStart | HandleKind::LineEnd, _) => {}
                (handle, Shape::Freehand(freehand)) => {
                    // Always scale from the captured stroke so repeated moves
                    // do not compound rounding
                    if let ResizeGeometry::Freehand { before, .. } = &self.geometry {
                        if self.old_box.width() > MIN_REMAP_EXTENT
                            && self.old_box.height() > MIN_REMAP_EXTENT
                        {
                            let target = self.anchors.resize(handle, position);
                            freehand.remap_from(before, self.old_box, target);
                        }
                    }
                }
                (handle, shape) => shape.set_from_bounds(self.anchors.resize(handle, position)),
            }
        }
        InteractionState::Resizing(self)
    }

    /// Record the resize if the shape changed.
    pub(super) fn release(self, canvas: &mut Canvas) -> InteractionState {
        let Some(shape) = canvas.document.get(self.id) else {
            return InteractionState::Idle;
        };
        let new_box = shape.bounds();
        let geometry = self.geometry.finish(shape);
        let reshaped = match &geometry {
            ResizeGeometry::Bounds => false,
            ResizeGeometry::Line { before, after } => before != after,
            ResizeGeometry::Freehand { before, after } => before != after,
        };
        if new_box != self.old_box || reshaped {
            canvas.push_command(Command::Resize {
                id: self.id,
                old_box: self.old_box,
                new_box,
                geometry,
            });
        }
        InteractionState::Idle
    }
}
