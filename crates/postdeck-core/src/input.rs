//! Input events delivered to the editor by the view layer.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::layers::LayerId;

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What the pointer was over when it went down, as hit-tested by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerTarget {
    /// Empty canvas.
    Canvas,
    Layer(LayerId),
    /// The resize handle of a layer.
    ResizeHandle(LayerId),
}

/// Event routed through [`Editor::handle_event`](crate::Editor::handle_event).
/// Pointer positions are in client (viewport) coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditorEvent {
    PointerDown {
        position: Point,
        target: PointerTarget,
        modifiers: Modifiers,
    },
    PointerMove {
        position: Point,
    },
    PointerUp {
        position: Point,
    },
    /// The platform cancelled the pointer stream.
    PointerCancel,
    /// The window lost focus; any release is lost.
    WindowBlur,
    KeyDown {
        key: String,
        modifiers: Modifiers,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_modifier() {
        assert!(!Modifiers::default().command());
        assert!(Modifiers { ctrl: true, ..Modifiers::default() }.command());
        assert!(Modifiers { meta: true, ..Modifiers::default() }.command());
        assert!(!Modifiers { shift: true, alt: true, ..Modifiers::default() }.command());
    }
}
