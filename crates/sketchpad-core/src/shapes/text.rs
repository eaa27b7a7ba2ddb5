//! Text shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, rect_contains_inclusive};
use crate::render::{ApproxFontMetrics, FontMetrics, Painter, TextMetrics};
use crate::svg::{escape, num, paint};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use uuid::Uuid;

/// A measurement remembered together with the inputs it was taken for.
#[derive(Debug, Clone)]
struct CachedMetrics {
    family: String,
    size: u32,
    content: String,
    metrics: TextMetrics,
}

/// A single line of text anchored at its baseline.
#[derive(Debug, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Left end of the baseline.
    pub position: Point,
    /// The text content.
    pub content: String,
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: u32,
    /// `fill` is the edit-mode highlight, `stroke` the glyph color.
    pub style: ShapeStyle,
    /// Last measurement taken by the renderer. Ignored once the content or
    /// font no longer match; approximate metrics are used until then.
    #[serde(skip)]
    cached_metrics: RwLock<Option<CachedMetrics>>,
}

impl Clone for Text {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            position: self.position,
            content: self.content.clone(),
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            style: self.style.clone(),
            // Clone the cached value, not the lock
            cached_metrics: RwLock::new(self.cached_metrics.read().ok().and_then(|c| c.clone())),
        }
    }
}

impl Text {
    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial";
    pub const DEFAULT_FONT_SIZE: u32 = 16;
    pub const MIN_FONT_SIZE: u32 = 6;
    pub const MAX_FONT_SIZE: u32 = 200;

    /// Create a new text shape with the default font.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            font_size: Self::DEFAULT_FONT_SIZE,
            style: ShapeStyle::default(),
            cached_metrics: RwLock::new(None),
        }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_font(mut self, family: impl Into<String>, size: u32) -> Self {
        self.font_family = family.into();
        self.set_font_size(size);
        self
    }

    /// Set the font size, clamped to the supported range.
    pub fn set_font_size(&mut self, size: u32) {
        self.font_size = size.clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);
    }

    /// The string used for measuring. Empty text measures as one space.
    fn measured_text(&self) -> &str {
        if self.content.is_empty() { " " } else { &self.content }
    }

    /// Measure with `metrics` and remember the result for [`Text::metrics`].
    pub fn measure_with(&self, metrics: &dyn FontMetrics) -> TextMetrics {
        let measured = metrics.measure(
            &self.font_family,
            f64::from(self.font_size),
            self.measured_text(),
        );
        if let Ok(mut cache) = self.cached_metrics.write() {
            *cache = Some(CachedMetrics {
                family: self.font_family.clone(),
                size: self.font_size,
                content: self.content.clone(),
                metrics: measured,
            });
        }
        measured
    }

    /// Current metrics: the renderer's last measurement if it still applies,
    /// otherwise an approximation.
    pub fn metrics(&self) -> TextMetrics {
        if let Ok(cache) = self.cached_metrics.read() {
            if let Some(cached) = cache.as_ref() {
                if cached.size == self.font_size
                    && cached.family == self.font_family
                    && cached.content == self.content
                {
                    return cached.metrics;
                }
            }
        }
        ApproxFontMetrics.measure(
            &self.font_family,
            f64::from(self.font_size),
            self.measured_text(),
        )
    }

    pub(crate) fn render(&self, painter: &mut dyn Painter) {
        self.measure_with(painter.font_metrics());
        if self.content.is_empty() || self.style.stroke.is_transparent() {
            return;
        }
        painter.draw_text(
            self.position,
            &self.content,
            &self.font_family,
            f64::from(self.font_size),
            self.style.stroke_color(),
        );
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let metrics = self.metrics();
        let top = self.position.y - metrics.ascent;
        Rect::new(
            self.position.x,
            top,
            self.position.x + metrics.advance,
            top + metrics.line_height,
        )
    }

    fn hit_test(&self, point: Point) -> bool {
        rect_contains_inclusive(self.bounds(), point)
    }

    fn to_path(&self) -> BezPath {
        self.bounds().to_path(0.1)
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
        let ascent = self.metrics().ascent;
        self.position = Point::new(rect.x0, rect.y0 + ascent);
    }

    fn to_svg(&self) -> String {
        let highlight = if self.style.fill.is_transparent() {
            "none".to_string()
        } else {
            self.style.fill.to_hex_rgba()
        };
        format!(
            r#"<text data-shape="text" x="{}" y="{}" font-family="{}" font-size="{}" data-highlight-fill="{}"{} stroke-width="{}">{}</text>"#,
            num(self.position.x),
            num(self.position.y),
            escape(&self.font_family),
            self.font_size,
            highlight,
            paint("fill", self.style.stroke),
            num(self.style.stroke_width),
            escape(&self.content),
        )
    }
}
