//! Shape definitions for the drawing canvas.

mod ellipse;
mod freehand;
mod hexagon;
mod line;
mod rectangle;
mod rounded_rectangle;
mod text;

pub use ellipse::Ellipse;
pub use freehand::Freehand;
pub use hexagon::Hexagon;
pub use line::Line;
pub use rectangle::Rectangle;
pub use rounded_rectangle::RoundedRectangle;
pub use text::Text;

use crate::render::Painter;
use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RGBA8 color stored on shapes.
///
/// A color with zero alpha is the transparent sentinel; it serializes as
/// `none` and is skipped when painting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RgbaColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Alpha as a 0..1 opacity.
    pub fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Same color with the alpha taken from a 0..1 opacity.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    /// `#rrggbb`, ignoring alpha.
    pub fn to_hex_rgb(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `#rrggbbaa`.
    pub fn to_hex_rgba(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, c) in out.iter_mut().zip(digits.chars()) {
                    let v = c.to_digit(16)? as u8;
                    *slot = v * 16 + v;
                }
                Some(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }
}

impl From<Color> for RgbaColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<RgbaColor> for Color {
    fn from(color: RgbaColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties shared by every shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill color. For text this is the edit-mode highlight.
    pub fill: RgbaColor,
    /// Stroke color. For text this is the glyph color.
    pub stroke: RgbaColor,
    /// Stroke width in pixels.
    pub stroke_width: f64,
}

impl ShapeStyle {
    pub fn new(fill: RgbaColor, stroke: RgbaColor, stroke_width: f64) -> Self {
        Self {
            fill,
            stroke,
            stroke_width,
        }
    }

    /// Get the fill color as a peniko Color.
    pub fn fill_color(&self) -> Color {
        self.fill.into()
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke_color(&self) -> Color {
        self.stroke.into()
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: RgbaColor::transparent(),
            stroke: RgbaColor::black(),
            stroke_width: 1.0,
        }
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
///
/// Infinite for fewer than two points.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Interior-or-boundary containment. Zero-area boxes contain nothing.
pub(crate) fn rect_contains_inclusive(rect: Rect, point: Point) -> bool {
    let rect = rect.abs();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return false;
    }
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the normalized bounding box.
    fn bounds(&self) -> Rect;

    /// Check if a point hits this shape.
    fn hit_test(&self, point: Point) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Translate the geometry.
    fn move_by(&mut self, delta: Vec2);

    /// Fit the geometry to a bounding box. Inverse of [`ShapeTrait::bounds`].
    fn set_from_bounds(&mut self, rect: Rect);

    /// One SVG-subset element describing this shape.
    fn to_svg(&self) -> String;
}

/// Discriminant of [`Shape`], for variant checks without matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    RoundedRectangle,
    Ellipse,
    Hexagon,
    Line,
    Freehand,
    Text,
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::RoundedRectangle => "rounded rectangle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Line => "line",
            ShapeKind::Freehand => "freehand",
            ShapeKind::Text => "text",
        }
    }

    /// Lines and freehand strokes have no interior.
    pub fn is_open_path(&self) -> bool {
        matches!(self, ShapeKind::Line | ShapeKind::Freehand)
    }
}

/// Enum wrapper for all shape types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    RoundedRectangle(RoundedRectangle),
    Ellipse(Ellipse),
    Hexagon(Hexagon),
    Line(Line),
    Freehand(Freehand),
    Text(Text),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Shape::Rectangle($s) => $body,
            Shape::RoundedRectangle($s) => $body,
            Shape::Ellipse($s) => $body,
            Shape::Hexagon($s) => $body,
            Shape::Line($s) => $body,
            Shape::Freehand($s) => $body,
            Shape::Text($s) => $body,
        }
    };
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        dispatch!(self, s => s.id())
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::RoundedRectangle(_) => ShapeKind::RoundedRectangle,
            Shape::Ellipse(_) => ShapeKind::Ellipse,
            Shape::Hexagon(_) => ShapeKind::Hexagon,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Freehand(_) => ShapeKind::Freehand,
            Shape::Text(_) => ShapeKind::Text,
        }
    }

    pub fn bounds(&self) -> Rect {
        dispatch!(self, s => s.bounds())
    }

    pub fn hit_test(&self, point: Point) -> bool {
        dispatch!(self, s => s.hit_test(point))
    }

    pub fn to_path(&self) -> BezPath {
        dispatch!(self, s => s.to_path())
    }

    pub fn style(&self) -> &ShapeStyle {
        dispatch!(self, s => s.style())
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        dispatch!(self, s => s.style_mut())
    }

    pub fn move_by(&mut self, delta: Vec2) {
        dispatch!(self, s => s.move_by(delta))
    }

    pub fn set_from_bounds(&mut self, rect: Rect) {
        dispatch!(self, s => s.set_from_bounds(rect))
    }

    pub fn to_svg(&self) -> String {
        dispatch!(self, s => s.to_svg())
    }

    /// Draw the shape's current geometry and style.
    pub fn render(&self, painter: &mut dyn Painter) {
        match self {
            Shape::Text(text) => text.render(painter),
            _ => {
                let path = self.to_path();
                let style = self.style();
                if !self.kind().is_open_path() && !style.fill.is_transparent() {
                    painter.fill_path(&path, style.fill_color());
                }
                if !style.stroke.is_transparent() {
                    painter.stroke_path(&path, style.stroke_color(), style.stroke_width, false);
                }
            }
        }
    }

    /// Deep copy with a fresh identity, for the clipboard and paste.
    pub fn duplicate(&self) -> Shape {
        let mut copy = self.clone();
        copy.regenerate_id();
        copy
    }

    /// Regenerate the shape's ID with a new unique identifier.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        dispatch!(self, s => s.id = new_id)
    }

    /// Normalize negative extents left over from a creation drag.
    pub fn normalize(&mut self) {
        match self {
            Shape::Rectangle(r) => r.normalize(),
            Shape::RoundedRectangle(r) => r.normalize(),
            _ => {}
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            Shape::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_line_mut(&mut self) -> Option<&mut Line> {
        match self {
            Shape::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_freehand(&self) -> Option<&Freehand> {
        match self {
            Shape::Freehand(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_freehand_mut(&mut self) -> Option<&mut Freehand> {
        match self {
            Shape::Freehand(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_hexagon(&self) -> Option<&Hexagon> {
        match self {
            Shape::Hexagon(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_hexagon_mut(&mut self) -> Option<&mut Hexagon> {
        match self {
            Shape::Hexagon(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_rounded_rectangle(&self) -> Option<&RoundedRectangle> {
        match self {
            Shape::RoundedRectangle(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_rounded_rectangle_mut(&mut self) -> Option<&mut RoundedRectangle> {
        match self {
            Shape::RoundedRectangle(r) => Some(r),
            _ => None,
        }
    }
}
