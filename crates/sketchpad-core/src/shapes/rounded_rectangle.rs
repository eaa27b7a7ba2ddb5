//! Rectangle with elliptical corners.

use super::{ShapeId, ShapeStyle, ShapeTrait, rect_contains_inclusive};
use crate::svg::{num, paint};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cubic control-point factor for a quarter ellipse.
const KAPPA: f64 = 0.552_284_749_831;

/// A rectangle with rounded corners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundedRectangle {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Horizontal corner radius.
    pub corner_rx: f64,
    /// Vertical corner radius.
    pub corner_ry: f64,
    pub style: ShapeStyle,
}

impl RoundedRectangle {
    pub fn new(position: Point, width: f64, height: f64, corner_radius: f64) -> Self {
        let radius = corner_radius.max(0.0);
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            corner_rx: radius,
            corner_ry: radius,
            style: ShapeStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// The radius shown in the property panel.
    pub fn corner_radius(&self) -> f64 {
        self.corner_rx
    }

    /// Set both corner radii.
    pub fn set_corner_radius(&mut self, radius: f64) {
        let radius = radius.max(0.0);
        self.corner_rx = radius;
        self.corner_ry = radius;
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
        .abs()
    }

    pub fn normalize(&mut self) {
        let rect = self.as_rect();
        self.set_from_bounds(rect);
    }
}

impl ShapeTrait for RoundedRectangle {
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
        let rect = self.as_rect();
        let rx = self.corner_rx.clamp(0.0, rect.width() / 2.0);
        let ry = self.corner_ry.clamp(0.0, rect.height() / 2.0);
        if rx <= 0.0 || ry <= 0.0 {
            return rect.to_path(0.1);
        }
        let (x0, y0, x1, y1) = (rect.x0, rect.y0, rect.x1, rect.y1);
        let (kx, ky) = (KAPPA * rx, KAPPA * ry);
        let mut path = BezPath::new();
        path.move_to((x0 + rx, y0));
        path.line_to((x1 - rx, y0));
        path.curve_to((x1 - rx + kx, y0), (x1, y0 + ry - ky), (x1, y0 + ry));
        path.line_to((x1, y1 - ry));
        path.curve_to((x1, y1 - ry + ky), (x1 - rx + kx, y1), (x1 - rx, y1));
        path.line_to((x0 + rx, y1));
        path.curve_to((x0 + rx - kx, y1), (x0, y1 - ry + ky), (x0, y1 - ry));
        path.line_to((x0, y0 + ry));
        path.curve_to((x0, y0 + ry - ky), (x0 + rx - kx, y0), (x0 + rx, y0));
        path.close_path();
        path
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
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" ry="{}"{}{} stroke-width="{}"/>"#,
            num(rect.x0),
            num(rect.y0),
            num(rect.width()),
            num(rect.height()),
            num(self.corner_rx),
            num(self.corner_ry),
            paint("fill", self.style.fill),
            paint("stroke", self.style.stroke),
            num(self.style.stroke_width),
        )
    }
}
