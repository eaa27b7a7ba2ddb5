//! The editing surface: document, selection, tools and history together.

mod document;
mod file_ops;
mod text_edit;

pub use document::CanvasDocument;
pub use file_ops::{UnsavedChangesPrompt, UnsavedChoice};
pub use text_edit::TextEditSession;

use crate::config::{CreationDefaults, EditorConfig};
use crate::history::{Command, History, SelectionUpdate, ShapeProperties};
use crate::input::{Key, KeyEvent, MouseButton, PointerEvent};
use crate::selection::{CursorKind, cursor_for_handle, hit_test_handles};
use crate::shapes::{Shape, ShapeId};
use crate::tools::{InteractionState, ToolKind};
use kurbo::{Point, Size};
use std::path::PathBuf;

/// Notifications for the host, drained with [`Canvas::take_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasEvent {
    SelectionChanged(Option<ShapeId>),
    /// The document started or stopped differing from the last save.
    ModifiedChanged(bool),
}

/// An open property-panel drag, such as a stroke-width slider.
#[derive(Debug, Clone)]
struct PropertySession {
    id: ShapeId,
    before: ShapeProperties,
}

/// Runtime canvas state.
///
/// Every edit made through the canvas is applied to the document first and
/// then recorded in the history, so undo always sees the document a command
/// left behind.
#[derive(Debug)]
pub struct Canvas {
    pub(crate) document: CanvasDocument,
    selection: Option<ShapeId>,
    /// Shape being dragged out by a creation tool. Never part of the document.
    pub(crate) preview: Option<Shape>,
    clipboard: Option<Shape>,
    state: InteractionState,
    history: History,
    text_edit: Option<TextEditSession>,
    property_session: Option<PropertySession>,
    pub(crate) tool: ToolKind,
    pub(crate) defaults: CreationDefaults,
    file_path: Option<PathBuf>,
    /// Document fingerprint at the last save, open or new.
    saved_snapshot: String,
    modified: bool,
    canvas_size: Size,
    last_pointer: Point,
    events: Vec<CanvasEvent>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a new canvas with an empty document and default settings.
    pub fn new() -> Self {
        Self::with_config(&EditorConfig::default())
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        let document = CanvasDocument::new();
        Self {
            saved_snapshot: document.fingerprint(),
            document,
            selection: None,
            preview: None,
            clipboard: None,
            state: InteractionState::Idle,
            history: History::new(),
            text_edit: None,
            property_session: None,
            tool: ToolKind::default(),
            defaults: config.defaults.clone().sanitized(),
            file_path: None,
            modified: false,
            canvas_size: config.canvas_size(),
            last_pointer: Point::ZERO,
            events: Vec::new(),
        }
    }

    pub fn document(&self) -> &CanvasDocument {
        &self.document
    }

    pub fn selection(&self) -> Option<ShapeId> {
        self.selection
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selection.and_then(|id| self.document.get(id))
    }

    pub fn preview(&self) -> Option<&Shape> {
        self.preview.as_ref()
    }

    pub fn clipboard(&self) -> Option<&Shape> {
        self.clipboard.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn interaction_state(&self) -> &InteractionState {
        &self.state
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn defaults(&self) -> &CreationDefaults {
        &self.defaults
    }

    /// Replace the values new shapes start with. Existing shapes keep theirs.
    pub fn set_defaults(&mut self, defaults: CreationDefaults) {
        self.defaults = defaults.sanitized();
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    pub fn last_pointer(&self) -> Point {
        self.last_pointer
    }

    /// Select a shape, or nothing. Unknown ids clear the selection.
    pub fn set_selection(&mut self, id: Option<ShapeId>) {
        let id = id.filter(|id| self.document.contains(*id));
        if self.selection != id {
            self.selection = id;
            self.events.push(CanvasEvent::SelectionChanged(id));
        }
    }

    /// Drain pending notifications.
    pub fn take_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.commit_text_edit();
        if self.tool != tool {
            log::debug!("Tool changed to {}", tool.name());
            self.tool = tool;
        }
    }

    // --- Pointer and keyboard ---

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => self.pointer_down(position, button),
            PointerEvent::Move {
                position,
                primary_held,
            } => self.pointer_move(position, primary_held),
            PointerEvent::Up { position, button } => self.pointer_up(position, button),
            PointerEvent::DoubleClick { position, button } => self.double_click(position, button),
        }
    }

    pub fn pointer_down(&mut self, position: Point, button: MouseButton) {
        self.commit_text_edit();
        self.last_pointer = position;
        let state = std::mem::take(&mut self.state);
        self.state = state.pointer_down(self, position, button);
    }

    pub fn pointer_move(&mut self, position: Point, primary_held: bool) {
        self.last_pointer = position;
        let state = std::mem::take(&mut self.state);
        self.state = state.pointer_move(self, position, primary_held);
    }

    pub fn pointer_up(&mut self, position: Point, button: MouseButton) {
        self.last_pointer = position;
        let state = std::mem::take(&mut self.state);
        self.state = state.pointer_up(self, position, button);
    }

    /// Double-clicking a text shape starts editing it.
    pub fn double_click(&mut self, position: Point, button: MouseButton) {
        self.last_pointer = position;
        if !button.is_primary() || !self.state.is_idle() {
            return;
        }
        if let Some(id) = self.document.text_at(position) {
            self.begin_text_edit(id);
        }
    }

    pub fn key_down(&mut self, event: KeyEvent) {
        if let Some(shortcut) = event.shortcut() {
            // History and clipboard edits wait until any drag is released
            if !self.state.is_idle() {
                return;
            }
            self.commit_text_edit();
            match shortcut {
                'z' if event.modifiers.shift => {
                    self.redo();
                }
                'z' => {
                    self.undo();
                }
                'y' => {
                    self.redo();
                }
                'x' => self.cut(),
                'c' => self.copy(),
                'v' => self.paste(),
                _ => {}
            }
            return;
        }

        if self.text_edit.is_some() {
            match event.key {
                Key::Enter | Key::Escape => self.commit_text_edit(),
                Key::Backspace => self.text_edit_backspace(),
                Key::Char(c) if c >= ' ' => self.text_edit_push(c),
                _ => {}
            }
            return;
        }

        if matches!(event.key, Key::Delete | Key::Backspace) {
            self.delete_selected();
        }
    }

    /// Cursor to show with the pointer at `position`.
    pub fn cursor_at(&self, position: Point) -> CursorKind {
        match &self.state {
            InteractionState::Creating(_) => CursorKind::Crosshair,
            InteractionState::Moving(_) => CursorKind::Move,
            InteractionState::Resizing(state) => cursor_for_handle(state.handle()),
            InteractionState::Idle => {
                if let Some(handle) = self
                    .selected_shape()
                    .and_then(|shape| hit_test_handles(shape, position))
                {
                    cursor_for_handle(handle)
                } else if self.document.shape_at(position).is_some() {
                    CursorKind::Move
                } else {
                    CursorKind::Arrow
                }
            }
        }
    }

    // --- History ---

    /// Record an edit that has already been applied to the document.
    pub fn push_command(&mut self, command: Command) {
        if self.history.push(command) {
            self.sync_modified();
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        self.commit_text_edit();
        let Some(entry) = self.history.begin_undo() else {
            return false;
        };
        let update = entry.command.undo(&mut self.document);
        self.history.finish_undo(entry);
        self.apply_selection_update(update);
        self.sync_modified();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.commit_text_edit();
        let Some(entry) = self.history.begin_redo() else {
            return false;
        };
        let update = entry.command.redo(&mut self.document);
        self.history.finish_redo(entry);
        self.apply_selection_update(update);
        self.sync_modified();
        true
    }

    fn apply_selection_update(&mut self, update: SelectionUpdate) {
        match update {
            SelectionUpdate::Set(id) => self.set_selection(id),
            SelectionUpdate::ClearIf(id) => {
                if self.selection == Some(id) {
                    self.set_selection(None);
                }
            }
        }
    }

    // --- Edits ---

    /// Remove the selected shape. Ignored while a drag is in progress.
    pub fn delete_selected(&mut self) {
        if !self.state.is_idle() {
            return;
        }
        let Some(id) = self.selection else {
            return;
        };
        if let Some((index, shape)) = self.document.remove(id) {
            self.set_selection(None);
            self.push_command(Command::RemoveShape { shape, index });
        }
    }

    /// Copy the selected shape. The clipboard keeps its own copy.
    pub fn copy(&mut self) {
        if let Some(shape) = self.selected_shape() {
            self.clipboard = Some(shape.duplicate());
        }
    }

    pub fn cut(&mut self) {
        if self.selection.is_some() && self.state.is_idle() {
            self.copy();
            self.delete_selected();
        }
    }

    /// Paste a fresh copy of the clipboard centered on the last pointer
    /// position.
    pub fn paste(&mut self) {
        let Some(mut shape) = self.clipboard.as_ref().map(Shape::duplicate) else {
            return;
        };
        let center = shape.bounds().center();
        shape.move_by(self.last_pointer - center);

        let id = shape.id();
        let index = self.document.len();
        self.document.add(shape.clone());
        self.set_selection(Some(id));
        self.push_command(Command::AddShape { shape, index });
    }

    /// Remove every shape as one undoable step.
    pub fn clear_all(&mut self) {
        self.commit_text_edit();
        if self.document.is_empty() {
            return;
        }
        let shapes: Vec<Shape> = self.document.shapes_ordered().cloned().collect();
        let selection = self.selection;
        self.document.clear();
        self.set_selection(None);
        self.push_command(Command::ClearAll { shapes, selection });
    }

    // --- Property panel ---

    /// Editable properties of the selected shape.
    pub fn selected_properties(&self) -> Option<ShapeProperties> {
        self.selected_shape().map(ShapeProperties::capture)
    }

    /// Apply panel values to the selected shape as one undoable step.
    pub fn apply_properties(&mut self, properties: ShapeProperties) {
        let Some(id) = self.selection else {
            return;
        };
        let Some(shape) = self.document.get_mut(id) else {
            return;
        };
        let before = ShapeProperties::capture(shape);
        properties.sanitized().apply_to(shape);
        let after = ShapeProperties::capture(shape);
        if before != after {
            self.push_command(Command::PropertyChange { id, before, after });
        }
    }

    /// Start a live edit; previews until [`Canvas::end_property_edit`]
    /// record a single step.
    pub fn begin_property_edit(&mut self) {
        if let Some(shape) = self.selected_shape() {
            self.property_session = Some(PropertySession {
                id: shape.id(),
                before: ShapeProperties::capture(shape),
            });
        }
    }

    pub fn preview_properties(&mut self, properties: ShapeProperties) {
        let Some(session) = &self.property_session else {
            return;
        };
        if let Some(shape) = self.document.get_mut(session.id) {
            properties.sanitized().apply_to(shape);
        }
    }

    pub fn end_property_edit(&mut self) {
        let Some(PropertySession { id, before }) = self.property_session.take() else {
            return;
        };
        let Some(shape) = self.document.get(id) else {
            return;
        };
        let after = ShapeProperties::capture(shape);
        if before != after {
            self.push_command(Command::PropertyChange { id, before, after });
        }
    }

    /// Seed the creation defaults from the selected shape's style.
    pub fn sync_defaults_from_selection(&mut self) {
        let Some(shape) = self.selected_shape() else {
            return;
        };
        let mut defaults = self.defaults.clone();
        let style = shape.style();
        match shape {
            Shape::Line(_) | Shape::Freehand(_) => {
                defaults.stroke = style.stroke;
                defaults.line_fill = style.fill;
                defaults.stroke_width = style.stroke_width;
            }
            Shape::Text(text) => {
                defaults.text_color = style.stroke;
                defaults.text_highlight = style.fill;
                defaults.font_family = text.font_family.clone();
                defaults.font_size = text.font_size;
            }
            Shape::RoundedRectangle(rect) => {
                defaults.fill = style.fill;
                defaults.stroke = style.stroke;
                defaults.stroke_width = style.stroke_width;
                defaults.corner_radius = rect.corner_radius();
            }
            Shape::Hexagon(hexagon) => {
                defaults.fill = style.fill;
                defaults.stroke = style.stroke;
                defaults.stroke_width = style.stroke_width;
                defaults.hex_pointy_top = hexagon.pointy_top;
            }
            Shape::Rectangle(_) | Shape::Ellipse(_) => {
                defaults.fill = style.fill;
                defaults.stroke = style.stroke;
                defaults.stroke_width = style.stroke_width;
            }
        }
        self.set_defaults(defaults);
    }

    // --- Dirty tracking ---

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Recompute the modified flag, notifying only when it flips.
    pub fn sync_modified(&mut self) {
        let modified = self.document.fingerprint() != self.saved_snapshot;
        if modified != self.modified {
            self.modified = modified;
            self.events.push(CanvasEvent::ModifiedChanged(modified));
        }
    }

    /// Drop the gesture, preview and sessions in progress.
    fn reset_interaction(&mut self) {
        self.state = InteractionState::Idle;
        self.preview = None;
        self.text_edit = None;
        self.property_session = None;
    }
}
