//! Rectangle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, rect_contains_inclusive};
use crate::svg::{num, paint};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle.
///
/// Width and height may be negative while a creation drag is in progress;
/// [`Rectangle::as_rect`] always returns the normalized box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            style: ShapeStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let rect = Rect::from_points(p1, p2);
        Self::new(rect.origin(), rect.width(), rect.height())
    }

    /// Get the rectangle as a normalized kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
        .abs()
    }

    /// Rewrite position and size so that width and height are non-negative.
    pub fn normalize(&mut self) {
        let rect = self.as_rect();
        self.set_from_bounds(rect);
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point) -> bool {
        rect_contains_inclusive(self.as_rect(), point)
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn set_from_bounds(&mut self, rect: Rect) {
        let rect = rect.abs();
        self.position = rect.origin();
        self.width = rect.width();
        self.height = rect.height();
    }

    fn to_svg(&self) -> String {
        let rect = self.as_rect();
        format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}"{}{} stroke-width="{}"/>"#,
            num(rect.x0),
            num(rect.y0),
            num(rect.width()),
            num(rect.height()),
            paint("fill", self.style.fill),
            paint("stroke", self.style.stroke),
            num(self.style.stroke_width),
        )
    }
}
