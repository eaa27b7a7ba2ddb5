//! Ellipse shape. Circles are ellipses with equal radii.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::svg::{num, paint};
use kurbo::{BezPath, Ellipse as KurboEllipse, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned ellipse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ellipse {
    pub(crate) id: ShapeId,
    /// Center point.
    pub center: Point,
    /// Horizontal radius.
    pub radius_x: f64,
    /// Vertical radius.
    pub radius_y: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Ellipse {
    /// Create a new ellipse.
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius_x,
            radius_y,
            style: ShapeStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Create a circle.
    pub fn circle(center: Point, radius: f64) -> Self {
        Self::new(center, radius, radius)
    }

    /// Create an ellipse from a bounding rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.center(), rect.width() / 2.0, rect.height() / 2.0)
    }

    /// Get as a kurbo Ellipse.
    pub fn as_kurbo(&self) -> KurboEllipse {
        KurboEllipse::new(self.center, (self.radius_x.abs(), self.radius_y.abs()), 0.0)
    }
}

impl ShapeTrait for Ellipse {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let (rx, ry) = (self.radius_x.abs(), self.radius_y.abs());
        Rect::new(
            self.center.x - rx,
            self.center.y - ry,
            self.center.x + rx,
            self.center.y + ry,
        )
    }

    fn hit_test(&self, point: Point) -> bool {
        if self.radius_x <= 0.0 || self.radius_y <= 0.0 {
            return false;
        }
        let dx = (point.x - self.center.x) / self.radius_x;
        let dy = (point.y - self.center.y) / self.radius_y;
        dx * dx + dy * dy <= 1.0
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn move_by(&mut self, delta: Vec2) {
        self.center += delta;
    }

    fn set_from_bounds(&mut self, rect: Rect) {
        let rect = rect.abs();
        self.center = rect.center();
        self.radius_x = rect.width() / 2.0;
        self.radius_y = rect.height() / 2.0;
    }

    fn to_svg(&self) -> String {
        format!(
            r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}"{}{} stroke-width="{}"/>"#,
            num(self.center.x),
            num(self.center.y),
            num(self.radius_x.abs()),
            num(self.radius_y.abs()),
            paint("fill", self.style.fill),
            paint("stroke", self.style.stroke),
            num(self.style.stroke_width),
        )
    }
}
