//! SVG-subset codec.
//!
//! Documents are a flat `<svg>` wrapper holding one element per shape. Only
//! the attributes the editor writes itself are understood on the way back in;
//! anything else is skipped.

mod parse;

pub use parse::parse_document;

use crate::shapes::{RgbaColor, Shape};
use kurbo::{Point, Size};
use thiserror::Error;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Codec errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SvgError {
    #[error("Document contains no recognizable shapes")]
    Empty,
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("Malformed document: {0}")]
    Malformed(String),
}

pub type SvgResult<T> = Result<T, SvgError>;

/// Serialize shapes, in paint order, into a complete document.
pub fn serialize_shapes(shapes: &[&Shape], size: Size) -> String {
    let mut out = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"{}\">\n",
        num(size.width),
        num(size.height),
        SVG_NAMESPACE
    );
    for shape in shapes {
        out.push_str("  ");
        out.push_str(&shape.to_svg());
        out.push('\n');
    }
    out.push_str("</svg>\n");
    out
}

/// Concatenated element text of `shapes`, without the wrapper.
///
/// Two documents with equal fingerprints serialize identically.
pub fn fingerprint<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> String {
    shapes.into_iter().map(Shape::to_svg).collect()
}

/// Format a coordinate with at most six decimals and no trailing zeros.
pub fn num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut s = format!("{:.6}", value);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// ` name="#rrggbb"` plus ` name-opacity=".."` for translucent colors, or
/// ` name="none"` for the transparent sentinel. Leading space included.
pub fn paint(name: &str, color: RgbaColor) -> String {
    if color.is_transparent() {
        return format!(r#" {}="none""#, name);
    }
    let mut out = format!(r#" {}="{}""#, name, color.to_hex_rgb());
    if !color.is_opaque() {
        out.push_str(&format!(r#" {}-opacity="{:.4}""#, name, color.opacity()));
    }
    out
}

/// `x,y x,y ...`
pub fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", num(p.x), num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape text for use in element content or attribute values.
pub fn escape(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{
        Ellipse, Freehand, Hexagon, Line, Rectangle, RoundedRectangle, ShapeStyle, Text,
    };

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(1.0 / 3.0), "0.333333");
        assert_eq!(num(-0.0000001), "0");
        assert_eq!(num(-2.25), "-2.25");
        assert_eq!(num(f64::NAN), "0");
    }

    #[test]
    fn test_paint() {
        assert_eq!(paint("fill", RgbaColor::transparent()), r#" fill="none""#);
        assert_eq!(paint("stroke", RgbaColor::black()), r##" stroke="#000000""##);
        assert_eq!(
            paint("fill", RgbaColor::new(255, 255, 255, 0x80)),
            r##" fill="#ffffff" fill-opacity="0.5020""##
        );
    }

    #[test]
    fn test_escape_markup() {
        assert_eq!(
            escape(r#"a < b & "c" > 'd'"#),
            "a &lt; b &amp; &quot;c&quot; &gt; &apos;d&apos;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_points_attr() {
        let pts = [Point::new(1.0, 2.5), Point::new(-3.0, 4.0)];
        assert_eq!(points_attr(&pts), "1,2.5 -3,4");
        assert_eq!(points_attr(&[]), "");
    }

    #[test]
    fn test_serialize_wrapper() {
        let rect = Shape::Rectangle(Rectangle::new(Point::new(1.0, 2.0), 3.0, 4.0));
        let doc = serialize_shapes(&[&rect], Size::new(800.0, 600.0));
        let mut lines = doc.lines();
        assert_eq!(
            lines.next(),
            Some(r#"<svg width="800" height="600" xmlns="http://www.w3.org/2000/svg">"#)
        );
        assert!(lines.next().unwrap().starts_with("  <rect "));
        assert_eq!(lines.next(), Some("</svg>"));
    }

    fn styled() -> ShapeStyle {
        ShapeStyle::new(
            RgbaColor::new(255, 255, 255, 0x80),
            RgbaColor::rgb(0x12, 0x34, 0x56),
            3.0,
        )
    }

    #[test]
    fn test_round_trip_every_variant() {
        let shapes = vec![
            Shape::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 50.0, 30.0).with_style(styled())),
            Shape::RoundedRectangle(
                RoundedRectangle::new(Point::new(5.0, 6.0), 40.0, 20.0, 7.0).with_style(styled()),
            ),
            Shape::Ellipse(Ellipse::new(Point::new(100.0, 80.0), 20.0, 12.5).with_style(styled())),
            Shape::Hexagon(Hexagon::new(Point::new(50.0, 50.0), 30.0, 20.0, true).with_style(styled())),
            Shape::Line(Line::new(Point::new(0.0, 0.0), Point::new(30.0, 40.0))),
            Shape::Freehand(Freehand::from_points(vec![
                Point::new(0.0, 0.0),
                Point::new(10.5, 5.0),
                Point::new(20.0, 20.0),
            ])),
            Shape::Text(
                Text::new(Point::new(5.0, 30.0), "a <b> & c".to_string())
                    .with_font("Courier New", 24)
                    .with_style(ShapeStyle::new(
                        RgbaColor::new(0x00, 0x78, 0xd4, 0x28),
                        RgbaColor::rgb(200, 0, 0),
                        1.0,
                    )),
            ),
        ];
        let refs: Vec<&Shape> = shapes.iter().collect();
        let doc = serialize_shapes(&refs, Size::new(800.0, 600.0));

        let parsed = parse_document(&doc).unwrap();
        assert_eq!(parsed.len(), shapes.len());
        for (before, after) in shapes.iter().zip(&parsed) {
            assert_eq!(before.kind(), after.kind());
            assert_eq!(before.to_svg(), after.to_svg());
            assert_eq!(before.style(), after.style(), "{:?}", before.kind());
        }

        let reparsed: Vec<&Shape> = parsed.iter().collect();
        assert_eq!(serialize_shapes(&reparsed, Size::new(800.0, 600.0)), doc);
    }

    #[test]
    fn test_round_trip_transparent_stroke() {
        let shape = Shape::Ellipse(Ellipse::circle(Point::new(0.0, 0.0), 5.0).with_style(
            ShapeStyle::new(RgbaColor::rgb(1, 2, 3), RgbaColor::transparent(), 1.0),
        ));
        let doc = serialize_shapes(&[&shape], Size::new(10.0, 10.0));
        let parsed = parse_document(&doc).unwrap();
        assert!(parsed[0].style().stroke.is_transparent());
        assert_eq!(parsed[0].style().fill, RgbaColor::rgb(1, 2, 3));
    }
}
