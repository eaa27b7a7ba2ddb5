//! Freehand stroke.

use super::{ShapeId, ShapeStyle, ShapeTrait, point_to_polyline_dist};
use crate::svg::{num, paint, points_attr};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An open polyline drawn by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Freehand {
    pub(crate) id: ShapeId,
    /// Sampled points in drawing order.
    pub points: Vec<Point>,
    /// Style properties. The fill is ignored.
    pub style: ShapeStyle,
}

impl Freehand {
    pub const HIT_TOLERANCE: f64 = 6.0;

    /// Create an empty stroke.
    pub fn new() -> Self {
        Self::from_points(Vec::new())
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            style: ShapeStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Append a sampled point.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Replace the points with `original` mapped from `from` into `to` by
    /// normalized position.
    pub fn remap_from(&mut self, original: &[Point], from: Rect, to: Rect) {
        let (fw, fh) = (from.width(), from.height());
        self.points = original
            .iter()
            .map(|p| {
                let tx = (p.x - from.x0) / fw;
                let ty = (p.y - from.y0) / fh;
                Point::new(to.x0 + tx * to.width(), to.y0 + ty * to.height())
            })
            .collect();
    }
}

impl Default for Freehand {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeTrait for Freehand {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p))
    }

    fn hit_test(&self, point: Point) -> bool {
        point_to_polyline_dist(point, &self.points) <= Self::HIT_TOLERANCE
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if let Some((first, rest)) = self.points.split_first() {
            path.move_to(*first);
            for p in rest {
                path.line_to(*p);
            }
        }
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn move_by(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }

    /// Strokes thinner than one pixel in either direction are left alone.
    fn set_from_bounds(&mut self, rect: Rect) {
        let current = self.bounds();
        if current.width() < 1.0 || current.height() < 1.0 {
            return;
        }
        let original = std::mem::take(&mut self.points);
        self.remap_from(&original, current, rect.abs());
    }

    fn to_svg(&self) -> String {
        format!(
            r#"<polyline data-shape="freehand" points="{}" fill="none"{} stroke-width="{}" stroke-linecap="round" stroke-linejoin="round"/>"#,
            points_attr(&self.points),
            paint("stroke", self.style.stroke),
            num(self.style.stroke_width),
        )
    }
}
