//! Element reader for the SVG subset.

use super::{SvgError, SvgResult};
use crate::shapes::{
    Ellipse, Freehand, Hexagon, Line, Rectangle, RgbaColor, RoundedRectangle, Shape, ShapeStyle,
    Text,
};
use kurbo::Point;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, BytesText, Event};
use std::collections::HashMap;

/// One start tag with its decoded attributes and, for `<text>`, its content.
#[derive(Debug)]
struct Element {
    name: String,
    attrs: HashMap<String, String>,
    body: Option<String>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> SvgResult<Self> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attrs = HashMap::new();
        for attr in start.attributes() {
            let attr = attr
                .map_err(|err| SvgError::Malformed(format!("bad attribute on <{}>: {}", name, err)))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = match attr.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(err) => {
                    log::debug!("Keeping raw '{}' on <{}>: {}", key, name, err);
                    String::from_utf8_lossy(&attr.value).into_owned()
                }
            };
            attrs.insert(key, value);
        }
        Ok(Self {
            name,
            attrs,
            body: None,
        })
    }

    fn has(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    fn str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Numeric attribute, or `fallback` when missing or unparsable.
    fn number(&self, key: &str, fallback: f64) -> f64 {
        self.str(key)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(fallback)
    }

    /// `name` plus its `name-opacity` companion, or `fallback` when absent.
    fn color(&self, name: &str, fallback: RgbaColor) -> RgbaColor {
        let Some(value) = self.str(name) else {
            return fallback;
        };
        let Some(color) = parse_color(value) else {
            log::debug!("Unrecognized {} color '{}' on <{}>", name, value, self.name);
            return fallback;
        };
        if color.is_transparent() {
            return color;
        }
        let opacity_key = format!("{}-opacity", name);
        match self.str(&opacity_key).and_then(|v| v.trim().parse::<f64>().ok()) {
            Some(opacity) if opacity.is_finite() => color.with_opacity(opacity),
            _ => color,
        }
    }

    fn stroke_width(&self) -> f64 {
        self.number("stroke-width", 1.0)
    }

    /// Style of a closed shape. Missing paint falls back to black.
    fn closed_style(&self) -> ShapeStyle {
        ShapeStyle::new(
            self.color("fill", RgbaColor::black()),
            self.color("stroke", RgbaColor::black()),
            self.stroke_width(),
        )
    }

    /// Style of an open path, which never fills unless told to.
    fn open_style(&self) -> ShapeStyle {
        ShapeStyle::new(
            self.color("fill", RgbaColor::transparent()),
            self.color("stroke", RgbaColor::black()),
            self.stroke_width(),
        )
    }
}

/// Parse a document written by [`super::serialize_shapes`].
///
/// Elements outside the subset are skipped. A document that yields no shapes
/// is an error so callers never replace a drawing with nothing.
pub fn parse_document(content: &str) -> SvgResult<Vec<Shape>> {
    if content.trim().is_empty() {
        return Err(SvgError::Empty);
    }

    let elements = scan(content)?;
    if !elements.iter().any(|e| e.name == "svg") {
        return Err(SvgError::Malformed("missing <svg> element".to_string()));
    }

    let mut shapes = Vec::new();
    for element in &elements {
        if let Some(shape) = build_shape(element)? {
            shapes.push(shape);
        }
    }

    if shapes.is_empty() {
        return Err(SvgError::Empty);
    }
    log::debug!("Parsed {} shapes from {} elements", shapes.len(), elements.len());
    Ok(shapes)
}

fn scan(content: &str) -> SvgResult<Vec<Element>> {
    let mut reader = Reader::from_str(content);
    let mut elements = Vec::new();

    loop {
        let event = reader.read_event().map_err(|err| malformed(&reader, err))?;
        match event {
            Event::Start(start) => {
                let mut element = Element::from_start(&start)?;
                if element.name == "text" {
                    element.body = Some(read_text_body(&mut reader)?);
                }
                elements.push(element);
            }
            Event::Empty(start) => elements.push(Element::from_start(&start)?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(elements)
}

/// Character data up to the matching `</text>`. Nested markup is flattened.
fn read_text_body(reader: &mut Reader<&[u8]>) -> SvgResult<String> {
    let mut body = String::new();
    let mut depth = 0usize;
    loop {
        let event = reader.read_event().map_err(|err| malformed(reader, err))?;
        match event {
            Event::Text(text) => body.push_str(&decode_text(&text)),
            Event::CData(data) => body.push_str(&String::from_utf8_lossy(&data)),
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => return Ok(body),
            Event::End(_) => depth -= 1,
            Event::Eof => {
                return Err(SvgError::Malformed("unterminated <text> element".to_string()));
            }
            _ => {}
        }
    }
}

/// Unescaped text, or the raw bytes when an entity is not one of XML's own.
fn decode_text(text: &BytesText<'_>) -> String {
    match text.unescape() {
        Ok(decoded) => decoded.into_owned(),
        Err(err) => {
            log::debug!("Keeping raw text content: {}", err);
            String::from_utf8_lossy(text).into_owned()
        }
    }
}

fn malformed(reader: &Reader<&[u8]>, err: quick_xml::Error) -> SvgError {
    SvgError::Malformed(format!("at byte {}: {}", reader.buffer_position(), err))
}

/// `#rgb`, `#rrggbb`, `#rrggbbaa`, `none`, or a handful of named colors.
fn parse_color(value: &str) -> Option<RgbaColor> {
    let value = value.trim();
    if value.starts_with('#') {
        return RgbaColor::from_hex(value);
    }
    match value.to_ascii_lowercase().as_str() {
        "none" | "transparent" => Some(RgbaColor::transparent()),
        "black" => Some(RgbaColor::black()),
        "white" => Some(RgbaColor::white()),
        "red" => Some(RgbaColor::rgb(255, 0, 0)),
        "green" => Some(RgbaColor::rgb(0, 128, 0)),
        "blue" => Some(RgbaColor::rgb(0, 0, 255)),
        "gray" | "grey" => Some(RgbaColor::rgb(128, 128, 128)),
        _ => None,
    }
}

fn parse_points(value: &str) -> Vec<Point> {
    value
        .split_whitespace()
        .filter_map(|pair| {
            let (x, y) = pair.split_once(',')?;
            let x = x.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
            let y = y.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
            Some(Point::new(x, y))
        })
        .collect()
}

fn build_shape(e: &Element) -> SvgResult<Option<Shape>> {
    let shape = match e.name.as_str() {
        "rect" => {
            let position = Point::new(e.number("x", 0.0), e.number("y", 0.0));
            let width = e.number("width", 0.0);
            let height = e.number("height", 0.0);
            let rx = e.number("rx", 0.0);
            let ry = e.number("ry", 0.0);
            if rx > 0.0 || ry > 0.0 {
                let mut rounded = RoundedRectangle::new(position, width, height, 0.0)
                    .with_style(e.closed_style());
                rounded.corner_rx = rx.max(0.0);
                rounded.corner_ry = ry.max(0.0);
                Shape::RoundedRectangle(rounded)
            } else {
                Shape::Rectangle(Rectangle::new(position, width, height).with_style(e.closed_style()))
            }
        }
        "circle" => {
            let center = Point::new(e.number("cx", 0.0), e.number("cy", 0.0));
            Shape::Ellipse(Ellipse::circle(center, e.number("r", 0.0)).with_style(e.closed_style()))
        }
        "ellipse" => {
            let center = Point::new(e.number("cx", 0.0), e.number("cy", 0.0));
            Shape::Ellipse(
                Ellipse::new(center, e.number("rx", 0.0), e.number("ry", 0.0))
                    .with_style(e.closed_style()),
            )
        }
        "line" => Shape::Line(
            Line::new(
                Point::new(e.number("x1", 0.0), e.number("y1", 0.0)),
                Point::new(e.number("x2", 0.0), e.number("y2", 0.0)),
            )
            .with_style(e.open_style()),
        ),
        "polyline" if e.str("data-shape") == Some("freehand") => {
            let points = e.str("points").ok_or(SvgError::MissingAttribute {
                element: "polyline",
                attribute: "points",
            })?;
            Shape::Freehand(Freehand::from_points(parse_points(points)).with_style(e.open_style()))
        }
        "polygon" if e.str("data-shape") == Some("hexagon") => {
            let center = Point::new(e.number("data-cx", 0.0), e.number("data-cy", 0.0));
            let pointy_top = e.str("data-orientation") == Some("pointy");
            Shape::Hexagon(
                Hexagon::new(center, e.number("data-rx", 0.0), e.number("data-ry", 0.0), pointy_top)
                    .with_style(e.closed_style()),
            )
        }
        "text" => Shape::Text(build_text(e)),
        _ => {
            if matches!(e.name.as_str(), "polyline" | "polygon") {
                log::debug!("Skipping <{}> without a recognized data-shape", e.name);
            }
            return Ok(None);
        }
    };
    Ok(Some(shape))
}

fn build_text(e: &Element) -> Text {
    let fill = e.color("fill", RgbaColor::black());
    // Glyph color lives in stroke when present, otherwise in fill
    let glyph = if e.has("stroke") {
        e.color("stroke", RgbaColor::black())
    } else {
        fill
    };
    let highlight = match e.str("data-highlight-fill") {
        Some(value) => parse_color(value).unwrap_or(fill),
        None => fill,
    };

    let family = e
        .str("font-family")
        .filter(|f| !f.trim().is_empty())
        .unwrap_or(Text::DEFAULT_FONT_FAMILY);
    let size = e.number("font-size", f64::from(Text::DEFAULT_FONT_SIZE)).round().max(0.0) as u32;

    let content = e.body.clone().unwrap_or_default();
    Text::new(Point::new(e.number("x", 0.0), e.number("y", 0.0)), content)
        .with_font(family, size)
        .with_style(ShapeStyle::new(highlight, glyph, e.stroke_width()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;

    fn wrap(body: &str) -> String {
        format!(
            "<svg width=\"100\" height=\"100\" xmlns=\"http://www.w3.org/2000/svg\">\n{}\n</svg>",
            body
        )
    }

    #[test]
    fn test_attribute_quoting() {
        let elements = scan(
            r#"<rect x='1' y="2.5" label="a &amp; b" title="x > y" data-note='say "hi"'/>"#,
        )
        .unwrap();
        assert_eq!(elements.len(), 1);
        let rect = &elements[0];
        assert_eq!(rect.name, "rect");
        assert_eq!(rect.str("x"), Some("1"));
        assert_eq!(rect.str("y"), Some("2.5"));
        assert_eq!(rect.str("label"), Some("a & b"));
        assert_eq!(rect.str("title"), Some("x > y"));
        assert_eq!(rect.str("data-note"), Some(r#"say "hi""#));
    }

    #[test]
    fn test_single_quoted_attributes_are_all_read() {
        let shapes = parse_document(&wrap(
            r##"<rect x='3' y='4' width='10' height='5' fill='#ff0000' stroke-width='2'/>"##,
        ))
        .unwrap();
        assert_eq!(shapes[0].bounds(), kurbo::Rect::new(3.0, 4.0, 13.0, 9.0));
        assert_eq!(shapes[0].style().fill, RgbaColor::rgb(255, 0, 0));
        assert!((shapes[0].style().stroke_width - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_angle_bracket_in_attribute_value() {
        let shapes = parse_document(&wrap(
            r#"<text x="2" y="20" font-family="a>b">ok</text>"#,
        ))
        .unwrap();
        let text = shapes[0].as_text().unwrap();
        assert_eq!(text.font_family, "a>b");
        assert_eq!(text.content, "ok");
    }

    #[test]
    fn test_unknown_entity_kept_raw() {
        let shapes = parse_document(&wrap(r#"<text x="0" y="10">AT&amp;T &copy;</text>"#)).unwrap();
        assert_eq!(shapes[0].as_text().unwrap().content, "AT&amp;T &copy;");
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_document(""), Err(SvgError::Empty)));
        assert!(matches!(parse_document("   \n"), Err(SvgError::Empty)));
        assert!(matches!(parse_document(&wrap("")), Err(SvgError::Empty)));
    }

    #[test]
    fn test_missing_root_is_malformed() {
        assert!(matches!(
            parse_document(r#"<rect x="0" y="0" width="5" height="5"/>"#),
            Err(SvgError::Malformed(_))
        ));
    }

    #[test]
    fn test_unterminated_tag() {
        assert!(matches!(
            parse_document("<svg><rect x=\"1\""),
            Err(SvgError::Malformed(_))
        ));
    }

    #[test]
    fn test_circle_and_defaults() {
        let shapes = parse_document(&wrap(r#"<circle cx="10" cy="20" r="5"/>"#)).unwrap();
        assert_eq!(shapes.len(), 1);
        let bounds = shapes[0].bounds();
        assert!((bounds.x0 - 5.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 25.0).abs() < f64::EPSILON);
        // SVG default paint
        assert_eq!(shapes[0].style().fill, RgbaColor::black());
        assert!((shapes[0].style().stroke_width - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unparsable_number_uses_default() {
        let shapes =
            parse_document(&wrap(r#"<rect x="abc" y="3" width="10" height="4" stroke-width="?"/>"#))
                .unwrap();
        assert!((shapes[0].bounds().x0).abs() < f64::EPSILON);
        assert!((shapes[0].style().stroke_width - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rect_with_radius_is_rounded() {
        let shapes = parse_document(&wrap(
            r#"<rect x="0" y="0" width="40" height="20" rx="4" ry="6"/>"#,
        ))
        .unwrap();
        let rounded = shapes[0].as_rounded_rectangle().unwrap();
        assert!((rounded.corner_rx - 4.0).abs() < f64::EPSILON);
        assert!((rounded.corner_ry - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_opacity_rounds_to_alpha() {
        let shapes = parse_document(&wrap(
            r##"<rect x="0" y="0" width="4" height="4" fill="#ff0000" fill-opacity="0.5"/>"##,
        ))
        .unwrap();
        assert_eq!(shapes[0].style().fill, RgbaColor::new(255, 0, 0, 128));
    }

    #[test]
    fn test_untagged_polyline_is_skipped() {
        let doc = wrap(
            r#"<polyline points="0,0 1,1"/>
  <line x1="0" y1="0" x2="5" y2="5"/>"#,
        );
        let shapes = parse_document(&doc).unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].kind(), ShapeKind::Line);
        assert!(shapes[0].style().fill.is_transparent());
    }

    #[test]
    fn test_freehand_without_points() {
        assert_eq!(
            parse_document(&wrap(r#"<polyline data-shape="freehand"/>"#)).unwrap_err(),
            SvgError::MissingAttribute {
                element: "polyline",
                attribute: "points",
            }
        );
    }

    #[test]
    fn test_hexagon_orientation() {
        let shapes = parse_document(&wrap(
            r#"<polygon data-shape="hexagon" data-cx="5" data-cy="5" data-rx="3" data-ry="2" data-orientation="pointy" points=""/>"#,
        ))
        .unwrap();
        let hex = shapes[0].as_hexagon().unwrap();
        assert!(hex.pointy_top);
        assert!((hex.radius_y - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_text_glyph_prefers_stroke() {
        let shapes = parse_document(&wrap(
            r##"<text x="1" y="20" fill="#00ff00" stroke="#0000ff">Hi &amp; bye</text>"##,
        ))
        .unwrap();
        let text = shapes[0].as_text().unwrap();
        assert_eq!(text.content, "Hi & bye");
        assert_eq!(text.style.stroke, RgbaColor::rgb(0, 0, 255));
        // No highlight attribute: fill doubles as highlight
        assert_eq!(text.style.fill, RgbaColor::rgb(0, 255, 0));
        assert_eq!(text.font_family, "Arial");
        assert_eq!(text.font_size, 16);
    }

    #[test]
    fn test_text_highlight_none() {
        let shapes = parse_document(&wrap(
            r##"<text x="1" y="20" font-size="500" data-highlight-fill="none" fill="#112233">x</text>"##,
        ))
        .unwrap();
        let text = shapes[0].as_text().unwrap();
        assert!(text.style.fill.is_transparent());
        assert_eq!(text.style.stroke, RgbaColor::rgb(0x11, 0x22, 0x33));
        assert_eq!(text.font_size, Text::MAX_FONT_SIZE);
    }

    #[test]
    fn test_self_closing_text_is_empty() {
        let shapes = parse_document(&wrap(r#"<text x="0" y="10"/>"#)).unwrap();
        assert_eq!(shapes[0].as_text().unwrap().content, "");
    }

    #[test]
    fn test_comments_and_prolog_are_skipped() {
        let doc = format!(
            "<?xml version=\"1.0\"?>\n<!-- a > b -->\n{}",
            wrap(r#"<ellipse cx="0" cy="0" rx="2" ry="1"/>"#)
        );
        assert_eq!(parse_document(&doc).unwrap().len(), 1);
    }
}
