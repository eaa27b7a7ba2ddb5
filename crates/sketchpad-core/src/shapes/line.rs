//! Straight line segment.

use super::{ShapeId, ShapeStyle, ShapeTrait, point_to_segment_dist};
use crate::svg::{num, paint};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight line between two endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ShapeId,
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Style properties. The fill is ignored.
    pub style: ShapeStyle,
}

impl Line {
    /// Hits must lie strictly closer than this to the segment.
    pub const HIT_TOLERANCE: f64 = 5.0;

    /// Create a new line.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style: ShapeStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Length of the line.
    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }
}

impl ShapeTrait for Line {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn hit_test(&self, point: Point) -> bool {
        point_to_segment_dist(point, self.start, self.end) < Self::HIT_TOLERANCE
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn move_by(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    /// Scale both endpoints from the current box into `rect`.
    /// A flat axis keeps scale 1 so that horizontal and vertical lines survive.
    fn set_from_bounds(&mut self, rect: Rect) {
        let rect = rect.abs();
        let current = self.bounds();
        let sx = if current.width() > 1e-6 {
            rect.width() / current.width()
        } else {
            1.0
        };
        let sy = if current.height() > 1e-6 {
            rect.height() / current.height()
        } else {
            1.0
        };
        let map = |p: Point| {
            Point::new(
                rect.x0 + (p.x - current.x0) * sx,
                rect.y0 + (p.y - current.y0) * sy,
            )
        };
        self.start = map(self.start);
        self.end = map(self.end);
    }

    fn to_svg(&self) -> String {
        format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{} stroke-width="{}"/>"#,
            num(self.start.x),
            num(self.start.y),
            num(self.end.x),
            num(self.end.y),
            paint("stroke", self.style.stroke),
            num(self.style.stroke_width),
        )
    }
}
