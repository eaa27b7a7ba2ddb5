//! Hexagon shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::svg::{num, paint, points_attr};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use uuid::Uuid;

/// A hexagon inscribed in the ellipse given by its center and radii.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hexagon {
    pub(crate) id: ShapeId,
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
    /// Rotates the vertices by 30°. Does not change the bounding box.
    pub pointy_top: bool,
    pub style: ShapeStyle,
}

impl Hexagon {
    pub fn new(center: Point, radius_x: f64, radius_y: f64, pointy_top: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius_x,
            radius_y,
            pointy_top,
            style: ShapeStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// The six vertices, starting at angle 0° (flat) or 30° (pointy).
    pub fn vertices(&self) -> [Point; 6] {
        let offset = if self.pointy_top { PI / 6.0 } else { 0.0 };
        std::array::from_fn(|i| {
            let angle = (60.0 * i as f64).to_radians() + offset;
            Point::new(
                self.center.x + self.radius_x * angle.cos(),
                self.center.y + self.radius_y * angle.sin(),
            )
        })
    }

    pub fn orientation_name(&self) -> &'static str {
        if self.pointy_top { "pointy" } else { "flat" }
    }
}

/// Odd-even polygon containment.
fn polygon_contains(vertices: &[Point], point: Point) -> bool {
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (a, b) = (vertices[i], vertices[j]);
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

impl ShapeTrait for Hexagon {
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
        polygon_contains(&self.vertices(), point)
    }

    fn to_path(&self) -> BezPath {
        let vertices = self.vertices();
        let mut path = BezPath::new();
        path.move_to(vertices[0]);
        for v in &vertices[1..] {
            path.line_to(*v);
        }
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
            r#"<polygon data-shape="hexagon" data-cx="{}" data-cy="{}" data-rx="{}" data-ry="{}" data-orientation="{}" points="{}"{}{} stroke-width="{}"/>"#,
            num(self.center.x),
            num(self.center.y),
            num(self.radius_x),
            num(self.radius_y),
            self.orientation_name(),
            points_attr(&self.vertices()),
            paint("fill", self.style.fill),
            paint("stroke", self.style.stroke),
            num(self.style.stroke_width),
        )
    }
}
