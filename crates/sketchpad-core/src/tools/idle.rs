//! Press handling while nothing is being dragged.

use super::{CreatingState, InteractionState, MovingState, ResizingState, ToolKind};
use crate::canvas::Canvas;
use crate::input::MouseButton;
use crate::selection::hit_test_handles;
use crate::shapes::{Shape, Text};
use kurbo::Point;

/// Decide what a primary press starts. Checked in order: a handle of the
/// selected shape, the topmost shape under the pointer, the text tool, then
/// the creation tools.
pub(super) fn press(canvas: &mut Canvas, position: Point, button: MouseButton) -> InteractionState {
    if !button.is_primary() {
        return InteractionState::Idle;
    }

    if let Some(selected) = canvas.selected_shape() {
        if let Some(handle) = hit_test_handles(selected, position) {
            return InteractionState::Resizing(ResizingState::begin(selected, handle));
        }
    }

    if let Some(id) = canvas.document.shape_at(position) {
        canvas.set_selection(Some(id));
        return InteractionState::Moving(MovingState::new(id, position));
    }

    if canvas.tool == ToolKind::Text {
        let defaults = &canvas.defaults;
        let draft = Text::new(position, String::new())
            .with_font(defaults.font_family.clone(), defaults.font_size)
            .with_style(defaults.text_style());
        let id = draft.id;
        canvas.document.add(Shape::Text(draft));
        canvas.set_selection(Some(id));
        canvas.begin_draft_text_edit(id);
        return InteractionState::Idle;
    }

    canvas.set_selection(None);

    let tool = canvas.tool;
    if tool.is_creation_tool() {
        CreatingState::begin(canvas, tool, position)
    } else {
        InteractionState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{Corner, HandleKind};
    use crate::shapes::Rectangle;

    fn canvas_with_rect() -> (Canvas, crate::shapes::ShapeId) {
        let mut canvas = Canvas::new();
        let rect = Shape::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0));
        let id = rect.id();
        canvas.document.add(rect);
        (canvas, id)
    }

    #[test]
    fn test_press_on_shape_starts_move() {
        let (mut canvas, id) = canvas_with_rect();
        canvas.pointer_down(Point::new(50.0, 50.0), MouseButton::Left);
        assert_eq!(canvas.selection(), Some(id));
        assert_eq!(canvas.interaction_state().name(), "moving");
    }

    #[test]
    fn test_press_on_handle_starts_resize() {
        let (mut canvas, id) = canvas_with_rect();
        canvas.set_selection(Some(id));
        canvas.pointer_down(Point::new(101.0, 99.0), MouseButton::Left);
        match canvas.interaction_state() {
            InteractionState::Resizing(state) => {
                assert_eq!(state.handle(), HandleKind::Corner(Corner::BottomRight));
            }
            other => panic!("expected resizing, got {}", other.name()),
        }
    }

    #[test]
    fn test_handle_wins_over_other_shape() {
        let (mut canvas, id) = canvas_with_rect();
        let other = Shape::Rectangle(Rectangle::new(Point::new(90.0, 90.0), 50.0, 50.0));
        canvas.document.add(other);
        canvas.set_selection(Some(id));
        canvas.pointer_down(Point::new(100.0, 100.0), MouseButton::Left);
        assert_eq!(canvas.interaction_state().name(), "resizing");
        assert_eq!(canvas.selection(), Some(id));
    }

    #[test]
    fn test_empty_press_in_select_mode_clears_selection() {
        let (mut canvas, id) = canvas_with_rect();
        canvas.set_selection(Some(id));
        canvas.pointer_down(Point::new(500.0, 500.0), MouseButton::Left);
        assert_eq!(canvas.selection(), None);
        assert!(canvas.interaction_state().is_idle());
        assert!(canvas.preview().is_none());
    }

    #[test]
    fn test_text_tool_creates_draft() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Text);
        canvas.pointer_down(Point::new(300.0, 300.0), MouseButton::Left);

        assert!(canvas.interaction_state().is_idle());
        let session = canvas.text_edit().unwrap();
        assert!(session.is_draft);
        assert_eq!(canvas.selection(), Some(session.shape_id));
        assert_eq!(canvas.document().len(), 1);
        // Drafts are not recorded until committed
        assert!(!canvas.history().can_undo());
    }

    #[test]
    fn test_text_tool_press_on_shape_moves_it() {
        let (mut canvas, id) = canvas_with_rect();
        canvas.set_tool(ToolKind::Text);
        canvas.pointer_down(Point::new(10.0, 10.0), MouseButton::Left);
        assert_eq!(canvas.selection(), Some(id));
        assert!(canvas.text_edit().is_none());
    }
}
