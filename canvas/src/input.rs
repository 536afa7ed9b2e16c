//! Input model: mouse buttons, keys, selection, and the gesture state machine.
//!
//! `InteractionState` is the active gesture tracked between pointer-down and
//! pointer-up. Each variant carries the context captured at press time so
//! that every pointer-move can recompute geometry from the current pointer
//! position alone, never from accumulated deltas.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::ElementId;
use crate::geometry::{Point, Rect, Size};
use crate::hit::ResizeHandle;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// The id of the currently selected element, if any.
    pub selected_id: Option<ElementId>,
}

/// Internal state for the interaction state machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving an element across the slide.
    Dragging {
        /// Id of the element being dragged.
        id: ElementId,
        /// Pointer position minus the element's top-left corner at press time, in inches.
        offset: Point,
        /// Element rectangle at press time, restored if the gesture is cancelled.
        start: Rect,
    },
    /// The user is resizing an element by one of its corner handles.
    Resizing {
        /// Id of the element being resized.
        id: ElementId,
        /// Which corner handle was grabbed.
        handle: ResizeHandle,
        /// The opposite corner in inches; it must not move.
        anchor: Point,
        /// Pointer position at press time, in canvas pixels.
        start_pointer_px: Point,
        /// Element size at press time, in inches.
        start_size: Size,
    },
}

impl InteractionState {
    /// The element the active gesture operates on.
    #[must_use]
    pub fn element_id(&self) -> Option<&ElementId> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, .. } | Self::Resizing { id, .. } => Some(id),
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The element rectangle at the start of the gesture.
    #[must_use]
    pub fn start_rect(&self) -> Option<Rect> {
        match self {
            Self::Idle => None,
            Self::Dragging { start, .. } => Some(*start),
            Self::Resizing { handle, anchor, start_size, .. } => {
                let x = if handle.moves_left_edge() { anchor.x - start_size.width } else { anchor.x };
                let y = if handle.moves_top_edge() { anchor.y - start_size.height } else { anchor.y };
                Some(Rect::new(x, y, start_size.width, start_size.height))
            }
        }
    }
}
