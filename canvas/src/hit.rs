#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{ElementId, ElementStore};
use crate::geometry::{CanvasView, Point, Rect};

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeHandle),
}

/// The four corner resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl ResizeHandle {
    pub const ALL: [Self; 4] = [Self::Nw, Self::Ne, Self::Sw, Self::Se];

    /// Whether dragging this handle moves the left edge.
    #[must_use]
    pub fn moves_left_edge(self) -> bool {
        matches!(self, Self::Nw | Self::Sw)
    }

    /// Whether dragging this handle moves the top edge.
    #[must_use]
    pub fn moves_top_edge(self) -> bool {
        matches!(self, Self::Nw | Self::Ne)
    }

    /// The corner of `rect` this handle sits on.
    #[must_use]
    pub fn corner(self, rect: &Rect) -> Point {
        let x = if self.moves_left_edge() { rect.x } else { rect.right() };
        let y = if self.moves_top_edge() { rect.y } else { rect.bottom() };
        Point::new(x, y)
    }

    /// The opposite corner, which stays fixed while this handle is dragged.
    #[must_use]
    pub fn anchor(self, rect: &Rect) -> Point {
        let x = if self.moves_left_edge() { rect.right() } else { rect.x };
        let y = if self.moves_top_edge() { rect.bottom() } else { rect.y };
        Point::new(x, y)
    }

    /// CSS cursor shown while hovering or dragging this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Nw | Self::Se => "nwse-resize",
            Self::Ne | Self::Sw => "nesw-resize",
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// Find what is under `slide_pt` (inches).
///
/// The selected element's corner handles are checked first, using a square
/// slop of `HANDLE_RADIUS_PX` converted through the current pixels-per-inch.
/// Bodies are then checked topmost-first.
#[must_use]
pub fn hit_test(slide_pt: Point, store: &ElementStore, view: &CanvasView, selected: Option<&ElementId>) -> Option<Hit> {
    if let Some(element) = selected.and_then(|id| store.get(id)) {
        let slop = view.px_to_in(HANDLE_RADIUS_PX);
        for handle in ResizeHandle::ALL {
            let corner = handle.corner(&element.rect);
            if (slide_pt.x - corner.x).abs() <= slop && (slide_pt.y - corner.y).abs() <= slop {
                return Some(Hit { element_id: element.id.clone(), part: HitPart::ResizeHandle(handle) });
            }
        }
    }

    store
        .topmost_at(slide_pt)
        .map(|element| Hit { element_id: element.id.clone(), part: HitPart::Body })
}
