//! Pointer events delivered to tools.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Pointer event in screen coordinates.
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
    },
}

impl PointerEvent {
    /// Screen position carried by the event.
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position } => position,
        }
    }

    /// Button that changed state, if any.
    pub fn button(&self) -> Option<MouseButton> {
        match *self {
            PointerEvent::Down { button, .. } | PointerEvent::Up { button, .. } => Some(button),
            PointerEvent::Move { .. } => None,
        }
    }

    /// A press followed by a release at the same position.
    pub fn click(position: Point, button: MouseButton) -> [PointerEvent; 2] {
        [
            PointerEvent::Down { position, button },
            PointerEvent::Up { position, button },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_accessors() {
        let up = PointerEvent::Up {
            position: Point::new(3.0, 4.0),
            button: MouseButton::Right,
        };
        assert_eq!(up.position(), Point::new(3.0, 4.0));
        assert_eq!(up.button(), Some(MouseButton::Right));

        let mv = PointerEvent::Move { position: Point::ZERO };
        assert_eq!(mv.button(), None);
    }

    #[test]
    fn test_click_is_press_then_release() {
        let [down, up] = PointerEvent::click(Point::new(1.0, 1.0), MouseButton::Left);
        assert!(matches!(down, PointerEvent::Down { .. }));
        assert!(matches!(up, PointerEvent::Up { .. }));
    }

    #[test]
    fn test_button_serializes_lowercase() {
        let json = serde_json::to_string(&MouseButton::Right).unwrap();
        assert_eq!(json, "\"right\"");
    }
}
