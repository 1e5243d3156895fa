//! Platform-agnostic input event types.
//!
//! A front end maps its native input to these enums. The browser core and
//! controller never see raw window-system events.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// A platform-agnostic input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed at an absolute surface position (mouse or touch).
    PointerDown { x: f32, y: f32 },
    /// Wheel scrolled by a number of lines. Positive values scroll
    /// toward the top of the document.
    Scroll { delta_lines: f32 },
    /// Display surface resized.
    Resize { width: f32, height: f32 },
    /// Character typed.
    TextInput(char),
    /// Non-text key pressed.
    KeyPress(Key),
    /// User requested quit (window close, etc.).
    Quit,
}

impl InputEvent {
    /// Pointer position carried by the event, if any.
    pub fn point(&self) -> Option<Point> {
        match *self {
            InputEvent::PointerDown { x, y } => Some(Point::new(x, y)),
            _ => None,
        }
    }
}

/// Editing and navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Backspace,
    Delete,
    Tab,
    Escape,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_down_event() {
        let e = InputEvent::PointerDown { x: 240.0, y: 136.0 };
        assert_eq!(e.point(), Some(Point::new(240.0, 136.0)));
    }

    #[test]
    fn non_pointer_events_have_no_point() {
        assert_eq!(InputEvent::Scroll { delta_lines: 1.0 }.point(), None);
        assert_eq!(InputEvent::TextInput('a').point(), None);
        assert_eq!(InputEvent::Quit.point(), None);
    }

    #[test]
    fn scroll_events_compare_by_delta() {
        let up = InputEvent::Scroll { delta_lines: 1.0 };
        let down = InputEvent::Scroll { delta_lines: -1.0 };
        assert_ne!(up, down);
        assert_eq!(up, InputEvent::Scroll { delta_lines: 1.0 });
    }

    #[test]
    fn text_input_unicode() {
        let e = InputEvent::TextInput('\u{1F600}');
        if let InputEvent::TextInput(ch) = e {
            assert_eq!(ch, '\u{1F600}');
        }
    }

    #[test]
    fn key_hash_distinct() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Key::Up);
        set.insert(Key::Down);
        set.insert(Key::Up);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn key_serde_roundtrip() {
        let json = serde_json::to_string(&Key::PageDown).unwrap();
        assert_eq!(json, "\"PageDown\"");
        let k: Key = serde_json::from_str(&json).unwrap();
        assert_eq!(k, Key::PageDown);
    }
}
