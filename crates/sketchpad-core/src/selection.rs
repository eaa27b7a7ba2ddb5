//! Selection handles, handle hit-testing and resize geometry.

use crate::shapes::Shape;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Handle size in pixels.
pub const HANDLE_SIZE: f64 = 8.0;
/// Half-width of the square a press must land in to grab a handle.
pub const HANDLE_HIT_TOLERANCE: f64 = HANDLE_SIZE + 4.0;

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner handle of a bounding box.
    Corner(Corner),
    /// Edge midpoint handle of a bounding box.
    Edge(Edge),
    /// First endpoint of a line.
    LineStart,
    /// Second endpoint of a line.
    LineEnd,
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Pointer cursor a host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CursorKind {
    Arrow,
    /// Over a shape body that can be dragged.
    Move,
    /// Diagonal resize running top-left to bottom-right.
    ResizeNwSe,
    /// Diagonal resize running top-right to bottom-left.
    ResizeNeSw,
    ResizeHorizontal,
    ResizeVertical,
    Crosshair,
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Square hit box, inclusive on both axes.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point.x - self.position.x).abs() <= tolerance
            && (point.y - self.position.y).abs() <= tolerance
    }
}

/// Get the selection handles for a shape, in hit-test priority order.
///
/// Lines expose their two endpoints, text has no handles, and every other
/// shape gets the eight box handles.
pub fn get_handles(shape: &Shape) -> Vec<Handle> {
    match shape {
        Shape::Line(line) => vec![
            Handle::new(line.start, HandleKind::LineStart),
            Handle::new(line.end, HandleKind::LineEnd),
        ],
        Shape::Text(_) => Vec::new(),
        _ => box_handles(shape.bounds()),
    }
}

/// The eight box handles, ordered TL, T, TR, L, R, BL, B, BR.
fn box_handles(bounds: Rect) -> Vec<Handle> {
    let center = bounds.center();
    vec![
        Handle::new(Point::new(bounds.x0, bounds.y0), HandleKind::Corner(Corner::TopLeft)),
        Handle::new(Point::new(center.x, bounds.y0), HandleKind::Edge(Edge::Top)),
        Handle::new(Point::new(bounds.x1, bounds.y0), HandleKind::Corner(Corner::TopRight)),
        Handle::new(Point::new(bounds.x0, center.y), HandleKind::Edge(Edge::Left)),
        Handle::new(Point::new(bounds.x1, center.y), HandleKind::Edge(Edge::Right)),
        Handle::new(Point::new(bounds.x0, bounds.y1), HandleKind::Corner(Corner::BottomLeft)),
        Handle::new(Point::new(center.x, bounds.y1), HandleKind::Edge(Edge::Bottom)),
        Handle::new(Point::new(bounds.x1, bounds.y1), HandleKind::Corner(Corner::BottomRight)),
    ]
}

/// Find which handle (if any) is hit at the given point. The first match in
/// [`get_handles`] order wins.
pub fn hit_test_handles(shape: &Shape, point: Point) -> Option<HandleKind> {
    get_handles(shape)
        .into_iter()
        .find(|handle| handle.hit_test(point, HANDLE_HIT_TOLERANCE))
        .map(|handle| handle.kind)
}

pub fn cursor_for_handle(kind: HandleKind) -> CursorKind {
    match kind {
        HandleKind::Corner(Corner::TopLeft | Corner::BottomRight) => CursorKind::ResizeNwSe,
        HandleKind::Corner(Corner::TopRight | Corner::BottomLeft) => CursorKind::ResizeNeSw,
        HandleKind::Edge(Edge::Top | Edge::Bottom) => CursorKind::ResizeVertical,
        HandleKind::Edge(Edge::Left | Edge::Right) => CursorKind::ResizeHorizontal,
        HandleKind::LineStart | HandleKind::LineEnd => CursorKind::Crosshair,
    }
}

/// Box edges captured when a resize starts.
///
/// Each move replaces only the edges the handle drags; the others keep their
/// captured values for the whole gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeAnchors {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ResizeAnchors {
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            left: rect.x0,
            top: rect.y0,
            right: rect.x1,
            bottom: rect.y1,
        }
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.right, self.bottom)
    }

    /// The normalized box after dragging `handle` to `cursor`.
    /// Line endpoint handles leave the box unchanged.
    pub fn resize(&self, handle: HandleKind, cursor: Point) -> Rect {
        let mut edges = *self;
        match handle {
            HandleKind::Corner(Corner::TopLeft) => {
                edges.left = cursor.x;
                edges.top = cursor.y;
            }
            HandleKind::Corner(Corner::TopRight) => {
                edges.right = cursor.x;
                edges.top = cursor.y;
            }
            HandleKind::Corner(Corner::BottomLeft) => {
                edges.left = cursor.x;
                edges.bottom = cursor.y;
            }
            HandleKind::Corner(Corner::BottomRight) => {
                edges.right = cursor.x;
                edges.bottom = cursor.y;
            }
            HandleKind::Edge(Edge::Top) => edges.top = cursor.y,
            HandleKind::Edge(Edge::Bottom) => edges.bottom = cursor.y,
            HandleKind::Edge(Edge::Left) => edges.left = cursor.x,
            HandleKind::Edge(Edge::Right) => edges.right = cursor.x,
            HandleKind::LineStart | HandleKind::LineEnd => {}
        }
        edges.to_rect().abs()
    }
}
