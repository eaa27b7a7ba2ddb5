//! Inline text editing.

use super::Canvas;
use crate::history::{Command, ShapeProperties};
use crate::shapes::{Shape, ShapeId};
use kurbo::Rect;

/// Smallest editor box the host should show.
const MIN_EDITOR_WIDTH: f64 = 120.0;
const MIN_EDITOR_HEIGHT: f64 = 24.0;

/// A text shape being edited in place. The shape keeps its committed
/// content until the session ends; typing only changes `buffer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEditSession {
    pub shape_id: ShapeId,
    pub buffer: String,
    /// Content when the session began.
    pub original_text: String,
    /// Created by the text tool and not yet recorded in history.
    pub is_draft: bool,
}

impl Canvas {
    pub fn text_edit(&self) -> Option<&TextEditSession> {
        self.text_edit.as_ref()
    }

    pub fn is_editing_text(&self) -> bool {
        self.text_edit.is_some()
    }

    /// Start editing an existing text shape, committing any other edit first.
    pub fn begin_text_edit(&mut self, id: ShapeId) {
        if self.text_edit.as_ref().is_some_and(|s| s.shape_id == id) {
            return;
        }
        self.commit_text_edit();
        self.start_session(id, false);
    }

    pub(crate) fn begin_draft_text_edit(&mut self, id: ShapeId) {
        self.commit_text_edit();
        self.start_session(id, true);
    }

    fn start_session(&mut self, id: ShapeId, is_draft: bool) {
        let Some(content) = self
            .document
            .get(id)
            .and_then(Shape::as_text)
            .map(|text| text.content.clone())
        else {
            return;
        };
        self.set_selection(Some(id));
        log::debug!("Editing text {}", id);
        self.text_edit = Some(TextEditSession {
            shape_id: id,
            buffer: content.clone(),
            original_text: content,
            is_draft,
        });
    }

    /// Replace the whole buffer, for hosts whose editor widget owns the text.
    pub fn set_text_edit_buffer(&mut self, text: impl Into<String>) {
        if let Some(session) = self.text_edit.as_mut() {
            session.buffer = text.into();
        }
    }

    pub(crate) fn text_edit_push(&mut self, c: char) {
        if let Some(session) = self.text_edit.as_mut() {
            session.buffer.push(c);
        }
    }

    pub(crate) fn text_edit_backspace(&mut self) {
        if let Some(session) = self.text_edit.as_mut() {
            session.buffer.pop();
        }
    }

    /// End the session and record it.
    ///
    /// An empty draft disappears without a trace. A non-empty draft is
    /// recorded as a new shape. Emptying an existing text keeps the original
    /// content, and any other change is recorded as a property change.
    pub fn commit_text_edit(&mut self) {
        let Some(session) = self.text_edit.take() else {
            return;
        };
        let id = session.shape_id;
        let Some(shape) = self.document.get_mut(id).filter(|s| s.as_text().is_some()) else {
            return;
        };

        if session.is_draft {
            if session.buffer.is_empty() {
                self.document.remove(id);
                if self.selection == Some(id) {
                    self.set_selection(None);
                }
                return;
            }
            if let Some(text) = shape.as_text_mut() {
                text.content = session.buffer;
            }
            let shape = shape.clone();
            if let Some(index) = self.document.index_of(id) {
                log::debug!("Committed new text {}", id);
                self.push_command(Command::AddShape { shape, index });
            }
            return;
        }

        if session.buffer.is_empty() || session.buffer == session.original_text {
            return;
        }
        let before = ShapeProperties::capture(shape);
        if let Some(text) = shape.as_text_mut() {
            text.content = session.buffer;
        }
        let after = ShapeProperties::capture(shape);
        self.push_command(Command::PropertyChange { id, before, after });
    }

    /// Where the host should place its editor widget, in canvas coordinates.
    pub fn text_edit_anchor(&self) -> Option<Rect> {
        let session = self.text_edit.as_ref()?;
        let bounds = self.document.get(session.shape_id)?.bounds();
        let x = bounds.x0.floor() - 2.0;
        let y = bounds.y0.floor() - 2.0;
        let width = (bounds.width().ceil() + 12.0).max(MIN_EDITOR_WIDTH);
        let height = (bounds.height().ceil() + 8.0).max(MIN_EDITOR_HEIGHT);
        Some(Rect::new(x, y, x + width, y + height))
    }
}
