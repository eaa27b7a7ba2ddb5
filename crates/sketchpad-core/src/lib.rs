//! Sketchpad Core Library
//!
//! Platform-agnostic core of a small vector drawing editor: shapes, an
//! undoable command history, the pointer state machine, and the SVG-subset
//! file format. Hosts feed in pointer and key events, paint through
//! [`render::Painter`], and answer file dialogs through
//! [`canvas::UnsavedChangesPrompt`].

pub mod canvas;
pub mod config;
pub mod history;
pub mod input;
pub mod render;
pub mod selection;
pub mod shapes;
pub mod storage;
pub mod svg;
pub mod tools;

pub use canvas::{Canvas, CanvasDocument, CanvasEvent, TextEditSession, UnsavedChangesPrompt, UnsavedChoice};
pub use config::{CreationDefaults, EditorConfig};
pub use history::{Command, History, ShapeProperties};
pub use input::{ClickTracker, Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use render::{FontMetrics, Painter, render_canvas};
pub use selection::{CursorKind, HandleKind};
pub use shapes::{RgbaColor, Shape, ShapeId, ShapeKind, ShapeStyle};
pub use storage::{StorageError, StorageResult};
pub use svg::{SvgError, parse_document, serialize_shapes};
pub use tools::{InteractionState, ToolKind};
