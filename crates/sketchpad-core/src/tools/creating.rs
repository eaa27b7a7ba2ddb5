//! Dragging out a new shape.

use super::{InteractionState, ToolKind};
use crate::canvas::Canvas;
use crate::config::CreationDefaults;
use crate::history::Command;
use crate::shapes::{Ellipse, Freehand, Hexagon, Line, Rectangle, RoundedRectangle, Shape};
use kurbo::Point;

/// Boxes this small on release are treated as stray clicks.
const MIN_CREATE_EXTENT: f64 = 2.0;

/// Gesture data while a creation tool drags. The shape itself is the
/// canvas preview.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatingState {
    tool: ToolKind,
    start: Point,
}

impl CreatingState {
    /// Seed the preview for `tool` at `start`.
    pub(super) fn begin(canvas: &mut Canvas, tool: ToolKind, start: Point) -> InteractionState {
        match initial_preview(tool, start, &canvas.defaults) {
            Some(preview) => {
                log::debug!("Creating {} at ({}, {})", tool.name(), start.x, start.y);
                canvas.preview = Some(preview);
                InteractionState::Creating(Self { tool, start })
            }
            None => InteractionState::Idle,
        }
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub(super) fn drag(self, canvas: &mut Canvas, position: Point) -> InteractionState {
        if let Some(preview) = canvas.preview.as_mut() {
            update_preview(preview, self.start, position);
        }
        InteractionState::Creating(self)
    }

    /// Commit the preview if it is big enough, otherwise drop it.
    pub(super) fn release(self, canvas: &mut Canvas, position: Point) -> InteractionState {
        let Some(mut shape) = canvas.preview.take() else {
            return InteractionState::Idle;
        };
        update_preview(&mut shape, self.start, position);
        shape.normalize();

        if !meets_commit_threshold(&shape) {
            log::debug!("Discarding {} below the minimum size", self.tool.name());
            return InteractionState::Idle;
        }

        let id = shape.id();
        let index = canvas.document.len();
        canvas.document.add(shape.clone());
        canvas.set_selection(Some(id));
        canvas.push_command(Command::AddShape { shape, index });
        InteractionState::Idle
    }
}

fn initial_preview(tool: ToolKind, start: Point, defaults: &CreationDefaults) -> Option<Shape> {
    let shape = match tool {
        ToolKind::Rectangle => {
            Shape::Rectangle(Rectangle::new(start, 0.0, 0.0).with_style(defaults.shape_style()))
        }
        ToolKind::RoundedRectangle => Shape::RoundedRectangle(
            RoundedRectangle::new(start, 0.0, 0.0, defaults.corner_radius)
                .with_style(defaults.shape_style()),
        ),
        ToolKind::Ellipse => {
            Shape::Ellipse(Ellipse::circle(start, 0.0).with_style(defaults.shape_style()))
        }
        ToolKind::Hexagon => Shape::Hexagon(
            Hexagon::new(start, 0.0, 0.0, defaults.hex_pointy_top)
                .with_style(defaults.shape_style()),
        ),
        ToolKind::Line => Shape::Line(Line::new(start, start).with_style(defaults.line_style())),
        ToolKind::Freehand => Shape::Freehand(
            Freehand::from_points(vec![start]).with_style(defaults.line_style()),
        ),
        ToolKind::Select | ToolKind::Text => return None,
    };
    Some(shape)
}

/// Reshape the preview for the pointer at `current`.
fn update_preview(shape: &mut Shape, start: Point, current: Point) {
    let delta = current - start;
    match shape {
        Shape::Rectangle(rect) => {
            rect.width = delta.x;
            rect.height = delta.y;
        }
        Shape::RoundedRectangle(rect) => {
            rect.width = delta.x;
            rect.height = delta.y;
        }
        // Circle centered on the press point
        Shape::Ellipse(ellipse) => {
            let radius = delta.hypot();
            ellipse.radius_x = radius;
            ellipse.radius_y = radius;
        }
        Shape::Hexagon(hexagon) => {
            hexagon.radius_x = delta.x.abs();
            hexagon.radius_y = delta.y.abs();
        }
        Shape::Line(line) => line.end = current,
        Shape::Freehand(freehand) => {
            if freehand.points.last() != Some(&current) {
                freehand.add_point(current);
            }
        }
        Shape::Text(_) => {}
    }
}

/// Closed shapes need both dimensions over the minimum, open paths either.
fn meets_commit_threshold(shape: &Shape) -> bool {
    let bounds = shape.bounds();
    let (w, h) = (bounds.width(), bounds.height());
    if shape.kind().is_open_path() {
        w > MIN_CREATE_EXTENT || h > MIN_CREATE_EXTENT
    } else {
        w > MIN_CREATE_EXTENT && h > MIN_CREATE_EXTENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;
    use kurbo::Rect;

    fn drag(tool: ToolKind, from: Point, to: Point) -> Canvas {
        let mut canvas = Canvas::new();
        canvas.set_tool(tool);
        canvas.pointer_down(from, MouseButton::Left);
        canvas.pointer_move(to, true);
        canvas.pointer_up(to, MouseButton::Left);
        canvas
    }

    #[test]
    fn test_rectangle_drag_normalizes() {
        let canvas = drag(ToolKind::Rectangle, Point::new(100.0, 100.0), Point::new(40.0, 70.0));
        let shape = canvas.selected_shape().unwrap();
        assert_eq!(shape.bounds(), Rect::new(40.0, 70.0, 100.0, 100.0));
        assert_eq!(canvas.history().undo_len(), 1);
        assert!(canvas.preview().is_none());
    }

    #[test]
    fn test_ellipse_radius_follows_distance() {
        let canvas = drag(ToolKind::Ellipse, Point::new(50.0, 50.0), Point::new(53.0, 54.0));
        let shape = canvas.selected_shape().unwrap();
        assert_eq!(shape.bounds(), Rect::new(45.0, 45.0, 55.0, 55.0));
    }

    #[test]
    fn test_hexagon_radii_from_delta() {
        let canvas = drag(ToolKind::Hexagon, Point::new(50.0, 50.0), Point::new(20.0, 90.0));
        let hexagon = canvas.selected_shape().unwrap().as_hexagon().unwrap().clone();
        assert_eq!(hexagon.center, Point::new(50.0, 50.0));
        assert!((hexagon.radius_x - 30.0).abs() < f64::EPSILON);
        assert!((hexagon.radius_y - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rounded_rectangle_uses_default_radius() {
        let canvas = drag(
            ToolKind::RoundedRectangle,
            Point::new(0.0, 0.0),
            Point::new(80.0, 60.0),
        );
        let rect = canvas.selected_shape().unwrap().as_rounded_rectangle().unwrap().clone();
        assert!((rect.corner_radius() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tiny_closed_shape_is_discarded() {
        let canvas = drag(ToolKind::Rectangle, Point::new(10.0, 10.0), Point::new(50.0, 12.0));
        assert!(canvas.document().is_empty());
        assert!(!canvas.history().can_undo());
        assert!(canvas.preview().is_none());
        assert!(canvas.interaction_state().is_idle());
    }

    #[test]
    fn test_flat_line_is_kept() {
        let canvas = drag(ToolKind::Line, Point::new(10.0, 10.0), Point::new(50.0, 10.0));
        let line = canvas.selected_shape().unwrap().as_line().unwrap().clone();
        assert_eq!(line.start, Point::new(10.0, 10.0));
        assert_eq!(line.end, Point::new(50.0, 10.0));
    }

    #[test]
    fn test_freehand_collects_points() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Freehand);
        canvas.pointer_down(Point::new(0.0, 0.0), MouseButton::Left);
        canvas.pointer_move(Point::new(5.0, 5.0), true);
        canvas.pointer_move(Point::new(10.0, 3.0), true);
        canvas.pointer_up(Point::new(10.0, 3.0), MouseButton::Left);

        let stroke = canvas.selected_shape().unwrap().as_freehand().unwrap().clone();
        assert_eq!(stroke.points.len(), 3);
        assert_eq!(stroke.points[2], Point::new(10.0, 3.0));
    }

    #[test]
    fn test_new_shapes_use_defaults() {
        let mut canvas = Canvas::new();
        let mut defaults = canvas.defaults().clone();
        defaults.stroke_width = 4.0;
        canvas.set_defaults(defaults);
        canvas.set_tool(ToolKind::Rectangle);
        canvas.pointer_down(Point::new(0.0, 0.0), MouseButton::Left);
        canvas.pointer_up(Point::new(30.0, 30.0), MouseButton::Left);
        assert!((canvas.selected_shape().unwrap().style().stroke_width - 4.0).abs() < f64::EPSILON);
    }
}
