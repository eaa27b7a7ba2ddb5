//! Input events delivered by the host surface.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Only the primary button drives gestures.
    pub fn is_primary(&self) -> bool {
        matches!(self, MouseButton::Left)
    }
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn ctrl_shift() -> Self {
        Self {
            ctrl: true,
            shift: true,
            ..Self::NONE
        }
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
        /// Whether the primary button is held during the move.
        primary_held: bool,
    },
    /// Delivered by the host in place of the second press of a double click.
    DoubleClick {
        position: Point,
        button: MouseButton,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::DoubleClick { position, .. } => position,
        }
    }
}

/// Keys the editor reacts to. Everything else arrives as [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Enter,
    Escape,
    /// A printable character, or a letter pressed with a shortcut modifier.
    Char(char),
    Other,
}

/// Key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// The shortcut letter, lowercased, when a command modifier is held.
    pub fn shortcut(&self) -> Option<char> {
        match self.key {
            Key::Char(c) if self.modifiers.command() => Some(c.to_ascii_lowercase()),
            _ => None,
        }
    }
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME: Duration = Duration::from_millis(500);
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Turns raw presses into [`PointerEvent::DoubleClick`] for hosts whose
/// windowing layer does not report double clicks itself.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last_click: Option<(Instant, Point)>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a primary press made at `now`. The second press of a pair
    /// becomes a double click; a third starts a new pair.
    pub fn press(&mut self, position: Point, button: MouseButton, now: Instant) -> PointerEvent {
        if !button.is_primary() {
            return PointerEvent::Down { position, button };
        }
        if let Some((last_time, last_pos)) = self.last_click {
            let elapsed = now.saturating_duration_since(last_time);
            if elapsed < DOUBLE_CLICK_TIME && (position - last_pos).hypot() < DOUBLE_CLICK_DISTANCE {
                self.last_click = None;
                return PointerEvent::DoubleClick { position, button };
            }
        }
        self.last_click = Some((now, position));
        PointerEvent::Down { position, button }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_requires_command() {
        let plain = KeyEvent::plain(Key::Char('z'));
        assert_eq!(plain.shortcut(), None);
        let undo = KeyEvent::new(Key::Char('Z'), Modifiers::ctrl_shift());
        assert_eq!(undo.shortcut(), Some('z'));
        let meta = KeyEvent::new(
            Key::Char('c'),
            Modifiers {
                meta: true,
                ..Modifiers::NONE
            },
        );
        assert_eq!(meta.shortcut(), Some('c'));
    }

    #[test]
    fn test_pointer_position() {
        let event = PointerEvent::Move {
            position: Point::new(3.0, 4.0),
            primary_held: false,
        };
        assert_eq!(event.position(), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_double_click_detection() {
        let mut tracker = ClickTracker::new();
        let pos = Point::new(100.0, 100.0);
        let t0 = Instant::now();

        let first = tracker.press(pos, MouseButton::Left, t0);
        assert!(matches!(first, PointerEvent::Down { .. }));

        let second = tracker.press(pos, MouseButton::Left, t0 + Duration::from_millis(200));
        assert!(matches!(second, PointerEvent::DoubleClick { .. }));

        // A third press starts over
        let third = tracker.press(pos, MouseButton::Left, t0 + Duration::from_millis(300));
        assert!(matches!(third, PointerEvent::Down { .. }));
    }

    #[test]
    fn test_double_click_too_far_or_slow() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();
        tracker.press(Point::new(100.0, 100.0), MouseButton::Left, t0);
        let far = tracker.press(Point::new(200.0, 200.0), MouseButton::Left, t0);
        assert!(matches!(far, PointerEvent::Down { .. }));

        let slow = tracker.press(
            Point::new(200.0, 200.0),
            MouseButton::Left,
            t0 + Duration::from_millis(900),
        );
        assert!(matches!(slow, PointerEvent::Down { .. }));
    }

    #[test]
    fn test_secondary_button_never_double_clicks() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();
        let pos = Point::new(1.0, 1.0);
        tracker.press(pos, MouseButton::Right, t0);
        let second = tracker.press(pos, MouseButton::Right, t0);
        assert!(matches!(second, PointerEvent::Down { .. }));
    }
}
