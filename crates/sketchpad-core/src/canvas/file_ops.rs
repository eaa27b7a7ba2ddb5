//! Saving, opening and replacing the document.

use super::{Canvas, CanvasDocument};
use crate::shapes::Shape;
use crate::storage::{StorageError, StorageResult, read_document, write_document};
use crate::svg::serialize_shapes;
use std::path::{Path, PathBuf};

/// Answer to "the document has unsaved changes".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsavedChoice {
    Save,
    Discard,
    Cancel,
}

/// Host dialogs the canvas needs for file operations.
pub trait UnsavedChangesPrompt {
    /// Ask what to do with unsaved changes before `action` (such as "close").
    fn confirm_unsaved(&mut self, action: &str) -> UnsavedChoice;

    /// Ask for a path to save to. `None` means the user cancelled.
    fn pick_save_path(&mut self) -> Option<PathBuf>;
}

impl Canvas {
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// The document as file text.
    pub fn serialize(&self) -> String {
        let shapes: Vec<&Shape> = self.document.shapes_ordered().collect();
        serialize_shapes(&shapes, self.canvas_size)
    }

    /// Save to the current path, asking for one if the document has none.
    pub fn save(&mut self, prompt: &mut dyn UnsavedChangesPrompt) -> StorageResult<()> {
        let path = match self.file_path.clone() {
            Some(path) => path,
            None => prompt.pick_save_path().ok_or(StorageError::NoFilePath)?,
        };
        self.save_as(path)
    }

    /// Save to `path` and make it the document's path.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> StorageResult<()> {
        self.commit_text_edit();
        let path = path.as_ref();
        if let Err(err) = write_document(path, &self.serialize()) {
            log::warn!("Save failed: {}", err);
            return Err(err);
        }
        log::info!("Saved {} shapes to {}", self.document.len(), path.display());
        self.file_path = Some(path.to_path_buf());
        self.saved_snapshot = self.document.fingerprint();
        self.sync_modified();
        Ok(())
    }

    /// Replace the document with the file at `path`.
    ///
    /// A file that cannot be read or parsed leaves everything untouched.
    pub fn open(
        &mut self,
        path: impl AsRef<Path>,
        prompt: &mut dyn UnsavedChangesPrompt,
    ) -> StorageResult<()> {
        let path = path.as_ref();
        self.resolve_unsaved("open", prompt)?;

        let shapes = match read_document(path) {
            Ok(shapes) => shapes,
            Err(err) => {
                log::warn!("Could not open {}: {}", path.display(), err);
                return Err(err);
            }
        };
        log::info!("Opened {} shapes from {}", shapes.len(), path.display());

        self.reset_interaction();
        self.history.reset();
        self.set_selection(None);
        self.document = CanvasDocument::from_shapes(shapes);
        self.clipboard = None;
        self.file_path = Some(path.to_path_buf());
        self.saved_snapshot = self.document.fingerprint();
        self.sync_modified();
        Ok(())
    }

    /// Start over with an empty, untitled document.
    pub fn new_document(&mut self, prompt: &mut dyn UnsavedChangesPrompt) -> StorageResult<()> {
        self.resolve_unsaved("start a new document", prompt)?;
        log::info!("New document");

        self.reset_interaction();
        self.history.reset();
        self.set_selection(None);
        self.document.clear();
        self.clipboard = None;
        self.file_path = None;
        self.saved_snapshot = self.document.fingerprint();
        self.sync_modified();
        Ok(())
    }

    /// Whether the host may close. Unsaved changes are saved or discarded
    /// as the user chooses; a failed save keeps the window open.
    pub fn request_close(&mut self, prompt: &mut dyn UnsavedChangesPrompt) -> bool {
        self.resolve_unsaved("close", prompt).is_ok()
    }

    fn resolve_unsaved(
        &mut self,
        action: &str,
        prompt: &mut dyn UnsavedChangesPrompt,
    ) -> StorageResult<()> {
        self.commit_text_edit();
        if !self.modified {
            return Ok(());
        }
        match prompt.confirm_unsaved(action) {
            UnsavedChoice::Save => self.save(prompt),
            UnsavedChoice::Discard => Ok(()),
            UnsavedChoice::Cancel => Err(StorageError::Cancelled),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::canvas::CanvasEvent;
    use crate::input::MouseButton;
    use crate::tools::ToolKind;
    use kurbo::Point;
    use tempfile::TempDir;

    /// Answers every question the same way and counts how often it was asked.
    pub(crate) struct ScriptedPrompt {
        pub choice: UnsavedChoice,
        pub save_path: Option<PathBuf>,
        pub asked: usize,
    }

    impl ScriptedPrompt {
        pub(crate) fn new(choice: UnsavedChoice) -> Self {
            Self {
                choice,
                save_path: None,
                asked: 0,
            }
        }
    }

    impl UnsavedChangesPrompt for ScriptedPrompt {
        fn confirm_unsaved(&mut self, _action: &str) -> UnsavedChoice {
            self.asked += 1;
            self.choice
        }

        fn pick_save_path(&mut self) -> Option<PathBuf> {
            self.save_path.clone()
        }
    }

    fn draw_rect(canvas: &mut Canvas) {
        canvas.set_tool(ToolKind::Rectangle);
        canvas.pointer_down(Point::new(10.0, 10.0), MouseButton::Left);
        canvas.pointer_move(Point::new(60.0, 40.0), true);
        canvas.pointer_up(Point::new(60.0, 40.0), MouseButton::Left);
    }

    #[test]
    fn test_save_and_open_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("drawing.svg");
        let mut canvas = Canvas::new();
        draw_rect(&mut canvas);
        canvas.save_as(&path).unwrap();
        assert!(!canvas.is_modified());

        let mut reopened = Canvas::new();
        let mut prompt = ScriptedPrompt::new(UnsavedChoice::Cancel);
        reopened.open(&path, &mut prompt).unwrap();
        assert_eq!(reopened.document().fingerprint(), canvas.document().fingerprint());
        assert_eq!(reopened.file_path(), Some(path.as_path()));
        assert!(!reopened.is_modified());
        assert!(!reopened.can_undo());
        assert_eq!(prompt.asked, 0);
    }

    #[test]
    fn test_open_clears_clipboard_and_selection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.svg");
        let mut canvas = Canvas::new();
        draw_rect(&mut canvas);
        canvas.save_as(&path).unwrap();
        canvas.copy();
        assert!(canvas.clipboard().is_some());
        assert!(canvas.selection().is_some());

        let mut prompt = ScriptedPrompt::new(UnsavedChoice::Cancel);
        canvas.open(&path, &mut prompt).unwrap();
        assert!(canvas.clipboard().is_none());
        assert_eq!(canvas.selection(), None);
        assert!(!canvas.can_undo());
        assert!(!canvas.can_redo());
        assert_eq!(canvas.history().current_state_id(), 0);
    }

    #[test]
    fn test_save_without_path_asks() {
        let dir = TempDir::new().unwrap();
        let mut canvas = Canvas::new();
        draw_rect(&mut canvas);

        let mut prompt = ScriptedPrompt::new(UnsavedChoice::Save);
        assert!(matches!(canvas.save(&mut prompt), Err(StorageError::NoFilePath)));
        assert!(canvas.is_modified());

        prompt.save_path = Some(dir.path().join("picked.svg"));
        canvas.save(&mut prompt).unwrap();
        assert!(canvas.file_path().is_some());
        assert!(!canvas.is_modified());
    }

    #[test]
    fn test_modified_events_flip_once() {
        let dir = TempDir::new().unwrap();
        let mut canvas = Canvas::new();
        draw_rect(&mut canvas);
        canvas.save_as(dir.path().join("a.svg")).unwrap();
        let events = canvas.take_events();
        let flips: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, CanvasEvent::ModifiedChanged(_)))
            .collect();
        assert_eq!(
            flips,
            vec![&CanvasEvent::ModifiedChanged(true), &CanvasEvent::ModifiedChanged(false)]
        );

        canvas.undo();
        assert!(canvas.is_modified());
        canvas.redo();
        assert!(!canvas.is_modified());
    }

    #[test]
    fn test_failed_open_keeps_document() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("bad.svg");
        std::fs::write(&bad, "<svg></svg>").unwrap();

        let mut canvas = Canvas::new();
        draw_rect(&mut canvas);
        let before = canvas.document().fingerprint();
        let mut prompt = ScriptedPrompt::new(UnsavedChoice::Discard);

        assert!(canvas.open(&bad, &mut prompt).is_err());
        assert!(canvas.open(dir.path().join("missing.svg"), &mut prompt).is_err());
        assert_eq!(canvas.document().fingerprint(), before);
        assert!(canvas.can_undo());
        assert!(canvas.file_path().is_none());
    }

    #[test]
    fn test_new_document_cancel_keeps_everything() {
        let mut canvas = Canvas::new();
        draw_rect(&mut canvas);
        let mut prompt = ScriptedPrompt::new(UnsavedChoice::Cancel);
        assert!(matches!(
            canvas.new_document(&mut prompt),
            Err(StorageError::Cancelled)
        ));
        assert_eq!(canvas.document().len(), 1);
        assert_eq!(prompt.asked, 1);
    }

    #[test]
    fn test_new_document_discard_resets() {
        let mut canvas = Canvas::new();
        draw_rect(&mut canvas);
        canvas.copy();
        let mut prompt = ScriptedPrompt::new(UnsavedChoice::Discard);
        canvas.new_document(&mut prompt).unwrap();

        assert!(canvas.document().is_empty());
        assert!(!canvas.can_undo());
        assert!(canvas.clipboard().is_none());
        assert!(!canvas.is_modified());
        assert_eq!(canvas.selection(), None);
    }

    #[test]
    fn test_close_with_failed_save_is_refused() {
        let mut canvas = Canvas::new();
        draw_rect(&mut canvas);
        // Save chosen but no path picked
        let mut prompt = ScriptedPrompt::new(UnsavedChoice::Save);
        assert!(!canvas.request_close(&mut prompt));

        let mut prompt = ScriptedPrompt::new(UnsavedChoice::Discard);
        assert!(canvas.request_close(&mut prompt));
    }

    #[test]
    fn test_clean_document_closes_without_asking() {
        let mut canvas = Canvas::new();
        let mut prompt = ScriptedPrompt::new(UnsavedChoice::Cancel);
        assert!(canvas.request_close(&mut prompt));
        assert_eq!(prompt.asked, 0);
    }
}
