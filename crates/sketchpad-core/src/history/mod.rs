//! Undo/redo history with a monotonic state-id timeline.

mod command;
mod properties;

pub use command::{Command, ResizeGeometry, SelectionUpdate};
pub use properties::ShapeProperties;

/// One recorded edit and the state ids on either side of it.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub command: Command,
    /// State id before the command was applied.
    pub prev_state_id: u64,
    /// State id after the command was applied.
    pub next_state_id: u64,
}

/// Linear undo/redo stacks.
///
/// Pushing a command discards the redo branch. While an entry is being
/// replayed, pushes are ignored so a replay can never record itself.
#[derive(Debug, Clone)]
pub struct History {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    current_state_id: u64,
    next_state_id: u64,
    replaying: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            current_state_id: 0,
            next_state_id: 1,
            replaying: false,
        }
    }

    /// Drop every entry and restart the timeline.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Record an already-applied command. Returns false when ignored
    /// because a replay is in progress.
    pub fn push(&mut self, command: Command) -> bool {
        if self.replaying {
            log::debug!("Ignoring {} pushed during replay", command.name());
            return false;
        }
        let entry = HistoryEntry {
            command,
            prev_state_id: self.current_state_id,
            next_state_id: self.next_state_id,
        };
        self.next_state_id += 1;
        self.current_state_id = entry.next_state_id;
        log::debug!(
            "Pushed {} (state {} -> {})",
            entry.command.name(),
            entry.prev_state_id,
            entry.next_state_id
        );
        self.undo.push(entry);
        self.redo.clear();
        true
    }

    /// Start undoing the newest entry. The caller reverts it, then hands it
    /// back through [`History::finish_undo`].
    pub fn begin_undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.undo.pop()?;
        self.replaying = true;
        Some(entry)
    }

    pub fn finish_undo(&mut self, entry: HistoryEntry) {
        self.replaying = false;
        self.current_state_id = entry.prev_state_id;
        log::debug!("Undid {} (now at state {})", entry.command.name(), self.current_state_id);
        self.redo.push(entry);
    }

    /// Start redoing the newest undone entry. Hand it back through
    /// [`History::finish_redo`].
    pub fn begin_redo(&mut self) -> Option<HistoryEntry> {
        let entry = self.redo.pop()?;
        self.replaying = true;
        Some(entry)
    }

    pub fn finish_redo(&mut self, entry: HistoryEntry) {
        self.replaying = false;
        self.current_state_id = entry.next_state_id;
        log::debug!("Redid {} (now at state {})", entry.command.name(), self.current_state_id);
        self.undo.push(entry);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn current_state_id(&self) -> u64 {
        self.current_state_id
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    /// Newest undoable entry.
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.undo.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, Shape};
    use kurbo::{Point, Vec2};

    fn move_cmd() -> Command {
        let id = Shape::Rectangle(Rectangle::new(Point::ZERO, 1.0, 1.0)).id();
        Command::Move {
            id,
            delta: Vec2::new(1.0, 0.0),
        }
    }

    #[test]
    fn test_state_ids_increase() {
        let mut history = History::new();
        assert_eq!(history.current_state_id(), 0);
        history.push(move_cmd());
        history.push(move_cmd());
        assert_eq!(history.current_state_id(), 2);
        assert_eq!(history.last().unwrap().prev_state_id, 1);
    }

    #[test]
    fn test_undo_redo_moves_entries() {
        let mut history = History::new();
        history.push(move_cmd());
        history.push(move_cmd());

        let entry = history.begin_undo().unwrap();
        assert!(history.is_replaying());
        history.finish_undo(entry);
        assert!(!history.is_replaying());
        assert_eq!(history.current_state_id(), 1);
        assert_eq!(history.redo_len(), 1);

        let entry = history.begin_redo().unwrap();
        history.finish_redo(entry);
        assert_eq!(history.current_state_id(), 2);
        assert_eq!(history.undo_len(), 2);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = History::new();
        history.push(move_cmd());
        let entry = history.begin_undo().unwrap();
        history.finish_undo(entry);
        assert!(history.can_redo());

        history.push(move_cmd());
        assert!(!history.can_redo());
        // Ids never go back, even after an undo
        assert_eq!(history.current_state_id(), 2);
    }

    #[test]
    fn test_push_ignored_during_replay() {
        let mut history = History::new();
        history.push(move_cmd());
        let entry = history.begin_undo().unwrap();
        assert!(!history.push(move_cmd()));
        history.finish_undo(entry);
        assert_eq!(history.undo_len(), 0);
        assert_eq!(history.redo_len(), 1);
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut history = History::new();
        assert!(history.begin_undo().is_none());
        assert!(history.begin_redo().is_none());
        assert!(!history.is_replaying());
    }

    #[test]
    fn test_reset() {
        let mut history = History::new();
        history.push(move_cmd());
        history.reset();
        assert!(!history.can_undo());
        assert_eq!(history.current_state_id(), 0);
        history.push(move_cmd());
        assert_eq!(history.current_state_id(), 1);
    }
}
