use crate::consts::{MIN_DIM_IN, SLIDE_HEIGHT_IN, SLIDE_WIDTH_IN};
use crate::doc::{
    Binding, BindingChoices, ElementId, ElementKind, GeometryPatch, LayoutDocument, LayoutElement, StoreError,
    StylePatch,
};
use crate::geometry::{CanvasBounds, CanvasSize, CanvasView, Point, Rect, Size, clamp_span};
use crate::hit::{HitPart, ResizeHandle, hit_test};
use crate::input::{Button, InteractionState, Key, UiState};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

const CURSOR_DEFAULT: &str = "default";
const CURSOR_MOVE: &str = "move";

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectionChanged(Option<ElementId>),
    ElementAdded(ElementId),
    ElementRemoved(ElementId),
    /// Live geometry change during a gesture or from an inspector edit.
    GeometryChanged { id: ElementId, rect: Rect },
    /// Final geometry of a drag or resize gesture that moved the element.
    GeometryCommitted { id: ElementId, rect: Rect },
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: the document, the derived canvas view, selection, and
/// the active gesture.
///
/// The caller owns this value and threads it through its event handlers;
/// nothing here is global.
#[derive(Debug, Clone, Default)]
pub struct EngineCore {
    pub doc: LayoutDocument,
    pub view: CanvasView,
    pub ui: UiState,
    pub input: InteractionState,
}

impl EngineCore {
    /// Engine over a freshly seeded document with default canvas bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine over a freshly seeded document with custom canvas bounds.
    #[must_use]
    pub fn with_bounds(bounds: CanvasBounds) -> Self {
        Self { view: CanvasView::new(bounds), ..Self::default() }
    }

    // --- Data inputs ---

    /// Replace the whole document, dropping selection and any gesture.
    pub fn load_document(&mut self, doc: LayoutDocument) -> Vec<Action> {
        self.doc = doc;
        self.input = InteractionState::Idle;
        let mut actions = Vec::new();
        self.select(None, &mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Viewport ---

    /// Recompute canvas size and pixels-per-inch for a new viewport.
    pub fn set_viewport(&mut self, viewport_width: f64, viewport_height: f64) -> CanvasSize {
        self.view.resize(viewport_width, viewport_height)
    }

    // --- Store operations ---

    /// Add a user element and select it.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from the store; nothing changes on error.
    pub fn add_element(&mut self, kind: ElementKind, choices: &BindingChoices<'_>) -> Result<Vec<Action>, StoreError> {
        let id = self.doc.elements.add(kind, choices)?;
        let mut actions = vec![Action::ElementAdded(id.clone())];
        self.select(Some(id), &mut actions);
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    /// Remove a user element, clearing the selection if it pointed at it.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from the store; nothing changes on error.
    pub fn remove_element(&mut self, id: &ElementId) -> Result<Vec<Action>, StoreError> {
        self.doc.elements.remove(id)?;
        if self.input.element_id() == Some(id) {
            self.input = InteractionState::Idle;
        }
        let mut actions = vec![Action::ElementRemoved(id.clone())];
        if self.ui.selected_id.as_ref() == Some(id) {
            self.select(None, &mut actions);
        }
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    /// Apply an inspector geometry edit (clamped, never rejected).
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] for unknown ids.
    pub fn update_geometry(&mut self, id: &ElementId, patch: &GeometryPatch) -> Result<Vec<Action>, StoreError> {
        let rect = self.doc.elements.update_geometry(id, patch)?;
        Ok(vec![Action::GeometryChanged { id: id.clone(), rect }, Action::RenderNeeded])
    }

    /// Apply a text style edit.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from the store.
    pub fn update_style(&mut self, id: &ElementId, patch: &StylePatch) -> Result<Vec<Action>, StoreError> {
        self.doc.elements.update_style(id, patch)?;
        Ok(vec![Action::RenderNeeded])
    }

    /// Rebind a free-text or extra-image element.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from the store.
    pub fn update_binding(&mut self, id: &ElementId, binding: Binding) -> Result<Vec<Action>, StoreError> {
        self.doc.elements.update_binding(id, binding)?;
        Ok(vec![Action::RenderNeeded])
    }

    /// Toggle aspect-ratio preservation on an image element.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from the store.
    pub fn set_maintain_aspect_ratio(&mut self, id: &ElementId, keep: bool) -> Result<Vec<Action>, StoreError> {
        self.doc.elements.set_maintain_aspect_ratio(id, keep)?;
        Ok(vec![Action::RenderNeeded])
    }

    // --- Input events ---

    /// Pointer pressed at `screen_pt` (canvas-local pixels).
    ///
    /// Hits on the selected element's corner handles start a resize; hits on
    /// a body select the element and start a drag; empty space clears the
    /// selection.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        self.input = InteractionState::Idle;

        let mut actions = Vec::new();
        let slide_pt = self.view.screen_to_slide(screen_pt);
        match hit_test(slide_pt, &self.doc.elements, &self.view, self.ui.selected_id.as_ref()) {
            Some(hit) => match hit.part {
                HitPart::Body => {
                    self.select(Some(hit.element_id.clone()), &mut actions);
                    self.begin_drag(&hit.element_id, slide_pt);
                    actions.push(Action::SetCursor(CURSOR_MOVE.to_owned()));
                }
                HitPart::ResizeHandle(handle) => {
                    self.begin_resize(&hit.element_id, handle, screen_pt);
                    actions.push(Action::SetCursor(handle.cursor().to_owned()));
                }
            },
            None => self.select(None, &mut actions),
        }
        actions
    }

    /// Pointer pressed on a handle the host rendered itself.
    ///
    /// Selects the element and starts a resize from `handle`. Unknown ids are
    /// ignored.
    pub fn on_handle_down(&mut self, id: &ElementId, handle: ResizeHandle, screen_pt: Point) -> Vec<Action> {
        self.input = InteractionState::Idle;
        if self.doc.elements.get(id).is_none() {
            return Vec::new();
        }
        let mut actions = Vec::new();
        self.select(Some(id.clone()), &mut actions);
        self.begin_resize(id, handle, screen_pt);
        actions.push(Action::SetCursor(handle.cursor().to_owned()));
        actions
    }

    /// Pointer moved to `screen_pt` (canvas-local pixels).
    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        match self.input.clone() {
            InteractionState::Idle => vec![Action::SetCursor(self.hover_cursor(screen_pt).to_owned())],
            InteractionState::Dragging { id, offset, .. } => {
                let Some(element) = self.doc.elements.get(&id) else {
                    self.input = InteractionState::Idle;
                    return Vec::new();
                };
                let size = element.rect.size();
                let pointer = self.view.screen_to_slide(screen_pt);
                let rect = drag_rect(pointer, offset, size);
                self.apply_rect(&id, rect)
            }
            InteractionState::Resizing { id, handle, anchor, start_pointer_px, start_size } => {
                let delta = Point::new(
                    self.view.px_to_in(screen_pt.x - start_pointer_px.x),
                    self.view.px_to_in(screen_pt.y - start_pointer_px.y),
                );
                let rect = resize_rect(handle, anchor, start_size, delta);
                self.apply_rect(&id, rect)
            }
        }
    }

    /// Pointer released. Ends any gesture without changing geometry.
    ///
    /// A release with no gesture in progress is ignored.
    pub fn on_pointer_up(&mut self, _screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let gesture = std::mem::take(&mut self.input);
        let Some(id) = gesture.element_id() else {
            return Vec::new();
        };

        let mut actions = Vec::new();
        if let (Some(start), Some(element)) = (gesture.start_rect(), self.doc.elements.get(id)) {
            if element.rect != start {
                actions.push(Action::GeometryCommitted { id: id.clone(), rect: element.rect });
            }
        }
        actions.push(Action::SetCursor(CURSOR_DEFAULT.to_owned()));
        actions
    }

    /// Key pressed.
    ///
    /// `Escape` cancels an active gesture (restoring its start rectangle) or
    /// clears the selection; `Delete`/`Backspace` removes the selected
    /// element when it is removable.
    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if key.is_escape() {
            return self.cancel_gesture_or_deselect();
        }
        if key.is_delete() && self.input.is_idle() {
            let Some(id) = self.ui.selected_id.clone() else {
                return Vec::new();
            };
            let removable = self
                .doc
                .elements
                .get(&id)
                .is_some_and(|el| el.kind().is_removable());
            if removable {
                return self.remove_element(&id).unwrap_or_default();
            }
        }
        Vec::new()
    }

    // --- Queries ---

    /// The currently selected element, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&ElementId> {
        self.ui.selected_id.as_ref()
    }

    /// Look up an element by id.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&LayoutElement> {
        self.doc.elements.get(id)
    }

    /// The current document.
    #[must_use]
    pub fn document(&self) -> &LayoutDocument {
        &self.doc
    }

    /// The current canvas size.
    #[must_use]
    pub fn canvas_size(&self) -> CanvasSize {
        self.view.size()
    }

    // --- Internals ---

    fn select(&mut self, id: Option<ElementId>, actions: &mut Vec<Action>) {
        if self.ui.selected_id != id {
            self.ui.selected_id.clone_from(&id);
            actions.push(Action::SelectionChanged(id));
            actions.push(Action::RenderNeeded);
        }
    }

    fn begin_drag(&mut self, id: &ElementId, slide_pt: Point) {
        let Some(element) = self.doc.elements.get(id) else {
            return;
        };
        let start = element.rect;
        let offset = Point::new(slide_pt.x - start.x, slide_pt.y - start.y);
        self.input = InteractionState::Dragging { id: id.clone(), offset, start };
    }

    fn begin_resize(&mut self, id: &ElementId, handle: ResizeHandle, screen_pt: Point) {
        let Some(element) = self.doc.elements.get(id) else {
            return;
        };
        self.input = InteractionState::Resizing {
            id: id.clone(),
            handle,
            anchor: handle.anchor(&element.rect),
            start_pointer_px: screen_pt,
            start_size: element.rect.size(),
        };
    }

    fn apply_rect(&mut self, id: &ElementId, rect: Rect) -> Vec<Action> {
        let before = self.doc.elements.get(id).map(|el| el.rect);
        match self.doc.elements.update_geometry(id, &GeometryPatch::rect(rect)) {
            Ok(after) if before != Some(after) => {
                vec![Action::GeometryChanged { id: id.clone(), rect: after }, Action::RenderNeeded]
            }
            Ok(_) => Vec::new(),
            Err(_) => {
                self.input = InteractionState::Idle;
                Vec::new()
            }
        }
    }

    fn cancel_gesture_or_deselect(&mut self) -> Vec<Action> {
        let gesture = std::mem::take(&mut self.input);
        let mut actions = Vec::new();
        match (gesture.element_id(), gesture.start_rect()) {
            (Some(id), Some(start)) => {
                actions.extend(self.apply_rect(id, start));
                actions.push(Action::SetCursor(CURSOR_DEFAULT.to_owned()));
            }
            _ => self.select(None, &mut actions),
        }
        actions
    }

    fn hover_cursor(&self, screen_pt: Point) -> &'static str {
        let slide_pt = self.view.screen_to_slide(screen_pt);
        match hit_test(slide_pt, &self.doc.elements, &self.view, self.ui.selected_id.as_ref()) {
            Some(hit) => match hit.part {
                HitPart::Body => CURSOR_MOVE,
                HitPart::ResizeHandle(handle) => handle.cursor(),
            },
            None => CURSOR_DEFAULT,
        }
    }
}

/// New rectangle for a drag: pointer minus press offset, each axis clamped
/// so the element stays on the slide at its current size.
#[must_use]
pub fn drag_rect(pointer: Point, offset: Point, size: Size) -> Rect {
    let x = clamp_span(pointer.x - offset.x, 0.0, SLIDE_WIDTH_IN - size.width);
    let y = clamp_span(pointer.y - offset.y, 0.0, SLIDE_HEIGHT_IN - size.height);
    Rect::new(x, y, size.width, size.height)
}

/// New rectangle for a corner resize.
///
/// `anchor` is the corner opposite `handle` and never moves. On an axis where
/// the handle moves the near edge (`nw`/`sw` horizontally, `nw`/`ne`
/// vertically) the dimension is clamped to `[MIN_DIM_IN, anchor]` and the
/// origin recomputed as `anchor - dimension`; otherwise the origin is the
/// anchor and the dimension is clamped to `[MIN_DIM_IN, slide - anchor]`.
#[must_use]
pub fn resize_rect(handle: ResizeHandle, anchor: Point, start: Size, delta: Point) -> Rect {
    let (x, width) = resize_axis(handle.moves_left_edge(), anchor.x, start.width, delta.x, SLIDE_WIDTH_IN);
    let (y, height) = resize_axis(handle.moves_top_edge(), anchor.y, start.height, delta.y, SLIDE_HEIGHT_IN);
    Rect::new(x, y, width, height)
}

fn resize_axis(moves_near_edge: bool, anchor: f64, start_len: f64, delta: f64, slide_len: f64) -> (f64, f64) {
    if moves_near_edge {
        let len = clamp_span(start_len - delta, MIN_DIM_IN, anchor);
        (anchor - len, len)
    } else {
        let len = clamp_span(start_len + delta, MIN_DIM_IN, slide_len - anchor);
        (anchor, len)
    }
}
