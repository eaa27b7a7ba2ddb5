//! Rendering collaborator interface.
//!
//! The core never rasterizes anything itself. A host implements [`Painter`]
//! on top of its drawing surface and calls [`render_canvas`] each frame.

use crate::canvas::Canvas;
use crate::selection::{HANDLE_SIZE, HandleKind, get_handles};
use crate::shapes::{RgbaColor, Shape, ShapeKind};
use kurbo::{BezPath, Circle, Point, Rect, Shape as KurboShape};
use peniko::Color;

/// Font measurements for one run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Horizontal advance of the whole string.
    pub advance: f64,
    /// Distance from the top of the line box to the baseline.
    pub ascent: f64,
    /// Height of the line box.
    pub line_height: f64,
}

/// Font-metric queries supplied by the rendering backend.
pub trait FontMetrics {
    fn measure(&self, family: &str, size: f64, text: &str) -> TextMetrics;
}

/// Metrics used before a real backend has measured a text shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxFontMetrics;

impl FontMetrics for ApproxFontMetrics {
    fn measure(&self, _family: &str, size: f64, text: &str) -> TextMetrics {
        TextMetrics {
            advance: 0.6 * size * text.chars().count() as f64,
            ascent: 0.8 * size,
            line_height: 1.2 * size,
        }
    }
}

/// A drawing surface. Implementations are expected to antialias.
pub trait Painter {
    /// Metrics matching the fonts this painter draws with.
    fn font_metrics(&self) -> &dyn FontMetrics;

    fn fill_path(&mut self, path: &BezPath, color: Color);

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64, dashed: bool);

    /// Draw one line of text with its baseline starting at `baseline`.
    fn draw_text(&mut self, baseline: Point, text: &str, family: &str, size: f64, color: Color);
}

const PREVIEW_COLOR: Color = Color::from_rgba8(0, 0, 0, 255);
const SELECTION_COLOR: Color = Color::from_rgba8(0, 255, 255, 255);
const HANDLE_FILL: Color = Color::from_rgba8(211, 211, 211, 255);
const HANDLE_STROKE: Color = Color::from_rgba8(0, 0, 0, 255);
/// Text selection border used when the highlight color is transparent.
const TEXT_HIGHLIGHT_FALLBACK: RgbaColor = RgbaColor::new(0, 120, 212, 40);

/// Paint the whole canvas: committed shapes in list order, the dashed
/// creation preview, then the selection decorations.
///
/// A text shape under inline edit is skipped along with its selection
/// decorations; the host's editor widget draws it instead.
pub fn render_canvas(canvas: &Canvas, painter: &mut dyn Painter) {
    let editing = canvas.text_edit().map(|session| session.shape_id);

    for shape in canvas.document().shapes_ordered() {
        if Some(shape.id()) == editing {
            continue;
        }
        shape.render(painter);
    }

    if let Some(preview) = canvas.preview() {
        painter.stroke_path(&preview.to_path(), PREVIEW_COLOR, 1.0, true);
    }

    if editing.is_none() {
        if let Some(selected) = canvas.selected_shape() {
            render_selection(selected, painter);
        }
    }
}

/// Dashed bounds plus handles for the selected shape.
pub fn render_selection(shape: &Shape, painter: &mut dyn Painter) {
    let bounds = shape.bounds();

    if shape.kind() == ShapeKind::Text {
        let highlight = if shape.style().fill.is_transparent() {
            TEXT_HIGHLIGHT_FALLBACK
        } else {
            shape.style().fill
        };
        let border = RgbaColor {
            a: highlight.a.saturating_add(120),
            ..highlight
        };
        painter.stroke_path(&bounds.to_path(0.1), border.into(), 1.0, true);
        return;
    }

    painter.stroke_path(&bounds.to_path(0.1), SELECTION_COLOR, 1.0, true);

    let half = HANDLE_SIZE / 2.0;
    for handle in get_handles(shape) {
        let path = match handle.kind {
            HandleKind::LineStart | HandleKind::LineEnd => {
                Circle::new(handle.position, half).to_path(0.1)
            }
            _ => Rect::from_center_size(handle.position, (HANDLE_SIZE, HANDLE_SIZE)).to_path(0.1),
        };
        painter.fill_path(&path, HANDLE_FILL);
        painter.stroke_path(&path, HANDLE_STROKE, 1.0, false);
    }
}
