//! Editable-property snapshots used by the property panel and text edits.

use crate::shapes::{RgbaColor, Shape, Text};
use serde::{Deserialize, Serialize};

/// The user-editable fields of one shape.
///
/// Variant-specific fields are `Some` only when captured from a variant that
/// has them. Applying a snapshot skips every `None` field, and skips fields
/// the target variant lacks, so it is safe on any shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeProperties {
    pub fill: RgbaColor,
    pub stroke: RgbaColor,
    pub stroke_width: f64,
    pub corner_radius: Option<f64>,
    pub pointy_top: Option<bool>,
    /// Font family and size.
    pub font: Option<(String, u32)>,
    pub text: Option<String>,
}

impl ShapeProperties {
    pub fn capture(shape: &Shape) -> Self {
        let style = shape.style();
        Self {
            fill: style.fill,
            stroke: style.stroke,
            stroke_width: style.stroke_width,
            corner_radius: shape.as_rounded_rectangle().map(|r| r.corner_radius()),
            pointy_top: shape.as_hexagon().map(|h| h.pointy_top),
            font: shape.as_text().map(|t| (t.font_family.clone(), t.font_size)),
            text: shape.as_text().map(|t| t.content.clone()),
        }
    }

    pub fn apply_to(&self, shape: &mut Shape) {
        let style = shape.style_mut();
        style.fill = self.fill;
        style.stroke = self.stroke;
        style.stroke_width = self.stroke_width;

        if let (Some(radius), Some(rounded)) = (self.corner_radius, shape.as_rounded_rectangle_mut()) {
            rounded.set_corner_radius(radius);
        }
        if let (Some(pointy), Some(hex)) = (self.pointy_top, shape.as_hexagon_mut()) {
            hex.pointy_top = pointy;
        }
        if let Some(text) = shape.as_text_mut() {
            if let Some((family, size)) = &self.font {
                text.font_family = family.clone();
                text.font_size = *size;
            }
            if let Some(content) = &self.text {
                text.content = content.clone();
            }
        }
    }

    /// Copy with the interactive clamps applied: stroke width at least 1,
    /// corner radius at least 0, font size within the text limits.
    pub fn sanitized(mut self) -> Self {
        if !self.stroke_width.is_finite() || self.stroke_width < 1.0 {
            self.stroke_width = 1.0;
        }
        if let Some(radius) = self.corner_radius.as_mut() {
            if !radius.is_finite() || *radius < 0.0 {
                *radius = 0.0;
            }
        }
        if let Some((family, size)) = self.font.as_mut() {
            *size = (*size).clamp(Text::MIN_FONT_SIZE, Text::MAX_FONT_SIZE);
            if family.trim().is_empty() {
                *family = Text::DEFAULT_FONT_FAMILY.to_string();
            }
        }
        self
    }
}
