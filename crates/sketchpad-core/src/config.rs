//! Editor configuration and creation defaults.

use crate::shapes::{RgbaColor, ShapeStyle, Text};
use crate::storage::{StorageError, StorageResult};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Style and geometry that newly created shapes start with.
///
/// These only seed a new shape. Values the user later sets on a shape are
/// never overwritten from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreationDefaults {
    /// Fill for closed shapes.
    pub fill: RgbaColor,
    /// Stroke for every shape.
    pub stroke: RgbaColor,
    /// Fill carried by lines and freehand strokes.
    pub line_fill: RgbaColor,
    pub stroke_width: f64,
    pub corner_radius: f64,
    pub hex_pointy_top: bool,
    pub font_family: String,
    pub font_size: u32,
    /// Edit-mode highlight for new text.
    pub text_highlight: RgbaColor,
    /// Glyph color for new text.
    pub text_color: RgbaColor,
}

impl Default for CreationDefaults {
    fn default() -> Self {
        Self {
            fill: RgbaColor::new(255, 255, 255, 0x80),
            stroke: RgbaColor::black(),
            line_fill: RgbaColor::transparent(),
            stroke_width: 1.0,
            corner_radius: 10.0,
            hex_pointy_top: false,
            font_family: Text::DEFAULT_FONT_FAMILY.to_string(),
            font_size: Text::DEFAULT_FONT_SIZE,
            text_highlight: RgbaColor::new(0x00, 0x78, 0xd4, 0x28),
            text_color: RgbaColor::black(),
        }
    }
}

impl CreationDefaults {
    /// Copy with out-of-range values clamped.
    pub fn sanitized(mut self) -> Self {
        if !self.stroke_width.is_finite() || self.stroke_width < 1.0 {
            self.stroke_width = 1.0;
        }
        if !self.corner_radius.is_finite() || self.corner_radius < 0.0 {
            self.corner_radius = 0.0;
        }
        self.font_size = self.font_size.max(1);
        if self.font_family.trim().is_empty() {
            self.font_family = Text::DEFAULT_FONT_FAMILY.to_string();
        }
        self
    }

    /// Style for rectangles, ellipses and hexagons.
    pub fn shape_style(&self) -> ShapeStyle {
        ShapeStyle::new(self.fill, self.stroke, self.stroke_width)
    }

    /// Style for lines and freehand strokes.
    pub fn line_style(&self) -> ShapeStyle {
        ShapeStyle::new(self.line_fill, self.stroke, self.stroke_width)
    }

    pub fn text_style(&self) -> ShapeStyle {
        ShapeStyle::new(self.text_highlight, self.text_color, self.stroke_width)
    }
}

/// Persistent editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub defaults: CreationDefaults,
    /// Width written to the document wrapper.
    pub canvas_width: f64,
    /// Height written to the document wrapper.
    pub canvas_height: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            defaults: CreationDefaults::default(),
            canvas_width: 800.0,
            canvas_height: 600.0,
        }
    }
}

impl EditorConfig {
    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    /// Default location of the config file.
    ///
    /// On Unix: `~/.config/sketchpad/config.json`
    pub fn default_path() -> StorageResult<PathBuf> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine config directory".to_string()))?;
        Ok(base.join("sketchpad").join("config.json"))
    }

    /// Load a config file. Missing keys take their default values.
    pub fn load(path: &Path) -> StorageResult<Self> {
        if !path.exists() {
            return Err(StorageError::NotFound(path.display().to_string()));
        }
        let json = fs::read_to_string(path).map_err(|e| {
            StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|e| {
            StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        Ok(config.sanitized())
    }

    /// Load the config at `path`, falling back to defaults when it is absent
    /// or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(StorageError::NotFound(_)) => Self::default(),
            Err(e) => {
                log::warn!("Ignoring config file: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(path, json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    pub fn sanitized(mut self) -> Self {
        self.defaults = self.defaults.sanitized();
        if !(self.canvas_width.is_finite() && self.canvas_width > 0.0) {
            self.canvas_width = 800.0;
        }
        if !(self.canvas_height.is_finite() && self.canvas_height > 0.0) {
            self.canvas_height = 600.0;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_values() {
        let d = CreationDefaults::default();
        assert_eq!(d.fill, RgbaColor::new(255, 255, 255, 128));
        assert!(d.line_fill.is_transparent());
        assert!((d.corner_radius - 10.0).abs() < f64::EPSILON);
        assert_eq!(d.font_family, "Arial");
        assert_eq!(d.font_size, 16);
        assert!(!d.hex_pointy_top);
    }

    #[test]
    fn test_sanitized_clamps() {
        let d = CreationDefaults {
            stroke_width: 0.2,
            corner_radius: -4.0,
            font_size: 0,
            font_family: "  ".to_string(),
            ..CreationDefaults::default()
        }
        .sanitized();
        assert!((d.stroke_width - 1.0).abs() < f64::EPSILON);
        assert!(d.corner_radius.abs() < f64::EPSILON);
        assert_eq!(d.font_size, 1);
        assert_eq!(d.font_family, "Arial");
    }

    #[test]
    fn test_styles() {
        let d = CreationDefaults::default();
        assert_eq!(d.shape_style().fill, d.fill);
        assert!(d.line_style().fill.is_transparent());
        assert_eq!(d.text_style().stroke, RgbaColor::black());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");
        let mut config = EditorConfig::default();
        config.defaults.hex_pointy_top = true;
        config.defaults.font_size = 24;
        config.save(&path).unwrap();

        let loaded = EditorConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{ "defaults": { "corner_radius": 3.0 } }"#).unwrap();
        let loaded = EditorConfig::load(&path).unwrap();
        assert!((loaded.defaults.corner_radius - 3.0).abs() < f64::EPSILON);
        assert_eq!(loaded.defaults.font_family, "Arial");
        assert!((loaded.canvas_width - 800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.json");
        assert!(matches!(EditorConfig::load(&path), Err(StorageError::NotFound(_))));
        assert_eq!(EditorConfig::load_or_default(&path), EditorConfig::default());
    }

    #[test]
    fn test_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            EditorConfig::load(&path),
            Err(StorageError::Serialization(_))
        ));
    }
}
