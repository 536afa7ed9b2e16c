//! Document model: layout elements, their kind-specific content, and the store.
//!
//! This module defines what sits on the slide (`LayoutElement`, `ElementKind`,
//! `ElementContent`), sparse-update types for incremental edits
//! (`GeometryPatch`, `StylePatch`), and the ordered runtime store that owns
//! every live element (`ElementStore`). A `LayoutDocument` pairs the store
//! with the document-scope spreadsheet bindings.
//!
//! Every geometry mutation passes through [`Rect::clamped`], so the slide
//! invariants hold after any store operation regardless of input.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{
    BODY_FONT_SIZE_PT, EXTRA_IMAGE_SIZE_IN, FREE_TEXT_SIZE_IN, INK_COLOR, MAX_FONT_SIZE_PT, MIN_FONT_SIZE_PT,
    MUTED_INK_COLOR, NEW_ELEMENT_CASCADE_IN, NEW_ELEMENT_ORIGIN_IN, TITLE_FONT_SIZE_PT,
};
use crate::geometry::{Point, Rect};

// =============================================================
// Identity
// =============================================================

/// Opaque element identifier, stable for the element's lifetime.
///
/// Ids read from a saved payload are kept verbatim; new elements get a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// A fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================
// Kind
// =============================================================

/// The kind of a layout element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    /// Slide title, bound to the document's title column.
    Title,
    /// Optional description line, bound to the document's description column.
    Description,
    /// Image slot for the run's rendered image.
    RunImage,
    /// Image slot for the matched drawing.
    DrawingImage,
    /// User-added text box bound to a spreadsheet column.
    FreeText,
    /// User-added image box bound to a drawing folder.
    ExtraImage,
}

impl ElementKind {
    /// Every kind, in seed order followed by the user kinds.
    pub const ALL: [Self; 6] =
        [Self::Title, Self::RunImage, Self::DrawingImage, Self::Description, Self::FreeText, Self::ExtraImage];

    /// The fixed kinds created when a document is seeded, in paint order.
    pub const FIXED: [Self; 4] = [Self::Title, Self::RunImage, Self::DrawingImage, Self::Description];

    /// Whether users may add and remove elements of this kind.
    #[must_use]
    pub fn is_removable(self) -> bool {
        matches!(self, Self::FreeText | Self::ExtraImage)
    }

    /// Whether the kind belongs to the seeded, non-removable set.
    #[must_use]
    pub fn is_fixed(self) -> bool {
        !self.is_removable()
    }

    /// Whether the kind carries a text style.
    #[must_use]
    pub fn is_text(self) -> bool {
        matches!(self, Self::Title | Self::Description | Self::FreeText)
    }

    /// Whether the kind carries an aspect-ratio flag.
    #[must_use]
    pub fn is_image(self) -> bool {
        matches!(self, Self::RunImage | Self::DrawingImage | Self::ExtraImage)
    }

    /// The wire name used in transport payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::RunImage => "runImage",
            Self::DrawingImage => "drawingImage",
            Self::FreeText => "freeText",
            Self::ExtraImage => "extraImage",
        }
    }

    /// Parse a wire name. Unknown names yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::RunImage => "run image",
            Self::DrawingImage => "drawing image",
            Self::FreeText => "free text",
            Self::ExtraImage => "extra image",
        };
        f.write_str(label)
    }
}

// =============================================================
// Content
// =============================================================

/// Font settings for text kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_size_pt: f64,
    pub bold: bool,
    /// `#RRGGBB` color string.
    pub color_hex: String,
}

impl TextStyle {
    #[must_use]
    pub fn body() -> Self {
        Self { font_size_pt: BODY_FONT_SIZE_PT, bold: false, color_hex: INK_COLOR.to_owned() }
    }

    #[must_use]
    pub fn title() -> Self {
        Self { font_size_pt: TITLE_FONT_SIZE_PT, bold: true, color_hex: INK_COLOR.to_owned() }
    }

    #[must_use]
    pub fn description() -> Self {
        Self { font_size_pt: BODY_FONT_SIZE_PT, bold: false, color_hex: MUTED_INK_COLOR.to_owned() }
    }
}

/// What an element is bound to, for kinds with an explicit binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// A spreadsheet column name (free text).
    Column(String),
    /// A drawing-folder identifier (extra image).
    Folder(String),
}

/// Kind-specific element content. Each variant carries only its own fields.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementContent {
    Title { style: TextStyle },
    Description { style: TextStyle },
    RunImage { maintain_aspect_ratio: bool },
    DrawingImage { maintain_aspect_ratio: bool },
    FreeText { style: TextStyle, column: String },
    ExtraImage { folder_id: String, maintain_aspect_ratio: bool },
}

impl ElementContent {
    /// Seed content for a kind: default style, empty binding, aspect kept.
    #[must_use]
    pub fn default_for(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Title => Self::Title { style: TextStyle::title() },
            ElementKind::Description => Self::Description { style: TextStyle::description() },
            ElementKind::RunImage => Self::RunImage { maintain_aspect_ratio: true },
            ElementKind::DrawingImage => Self::DrawingImage { maintain_aspect_ratio: true },
            ElementKind::FreeText => Self::FreeText { style: TextStyle::body(), column: String::new() },
            ElementKind::ExtraImage => Self::ExtraImage { folder_id: String::new(), maintain_aspect_ratio: true },
        }
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Title { .. } => ElementKind::Title,
            Self::Description { .. } => ElementKind::Description,
            Self::RunImage { .. } => ElementKind::RunImage,
            Self::DrawingImage { .. } => ElementKind::DrawingImage,
            Self::FreeText { .. } => ElementKind::FreeText,
            Self::ExtraImage { .. } => ElementKind::ExtraImage,
        }
    }

    #[must_use]
    pub fn style(&self) -> Option<&TextStyle> {
        match self {
            Self::Title { style } | Self::Description { style } | Self::FreeText { style, .. } => Some(style),
            _ => None,
        }
    }

    fn style_mut(&mut self) -> Option<&mut TextStyle> {
        match self {
            Self::Title { style } | Self::Description { style } | Self::FreeText { style, .. } => Some(style),
            _ => None,
        }
    }

    #[must_use]
    pub fn binding(&self) -> Option<Binding> {
        match self {
            Self::FreeText { column, .. } => Some(Binding::Column(column.clone())),
            Self::ExtraImage { folder_id, .. } => Some(Binding::Folder(folder_id.clone())),
            _ => None,
        }
    }

    #[must_use]
    pub fn maintain_aspect_ratio(&self) -> Option<bool> {
        match self {
            Self::RunImage { maintain_aspect_ratio }
            | Self::DrawingImage { maintain_aspect_ratio }
            | Self::ExtraImage { maintain_aspect_ratio, .. } => Some(*maintain_aspect_ratio),
            _ => None,
        }
    }
}

/// One positioned, sized placeholder on the slide.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutElement {
    pub id: ElementId,
    /// Placement in slide inches. Always satisfies the slide invariants.
    pub rect: Rect,
    pub content: ElementContent,
}

impl LayoutElement {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.content.kind()
    }

    /// A fresh element of a fixed kind at its seed placement.
    #[must_use]
    pub fn seed(kind: ElementKind) -> Self {
        Self { id: ElementId::generate(), rect: seed_rect(kind), content: ElementContent::default_for(kind) }
    }
}

/// Default placement for a kind.
///
/// Fixed kinds have their reference-layout slot; user kinds get their
/// default size at the first cascade position.
#[must_use]
pub fn seed_rect(kind: ElementKind) -> Rect {
    let (origin_x, origin_y) = NEW_ELEMENT_ORIGIN_IN;
    match kind {
        ElementKind::Title => Rect::new(1.0, 0.3, 8.0, 0.9),
        ElementKind::RunImage => Rect::new(0.5, 1.5, 4.25, 4.75),
        ElementKind::DrawingImage => Rect::new(5.25, 1.5, 4.25, 4.75),
        ElementKind::Description => Rect::new(0.5, 6.5, 9.0, 0.75),
        ElementKind::FreeText => Rect::new(origin_x, origin_y, FREE_TEXT_SIZE_IN.0, FREE_TEXT_SIZE_IN.1),
        ElementKind::ExtraImage => Rect::new(origin_x, origin_y, EXTRA_IMAGE_SIZE_IN.0, EXTRA_IMAGE_SIZE_IN.1),
    }
}

/// Clamp a font size into the accepted range.
#[must_use]
pub fn clamp_font_size(pt: f64) -> f64 {
    crate::geometry::clamp_span(pt, MIN_FONT_SIZE_PT, MAX_FONT_SIZE_PT)
}

/// Whether `raw` is a `#RRGGBB` color.
#[must_use]
pub fn is_hex_color(raw: &str) -> bool {
    raw.len() == 7 && raw.starts_with('#') && raw[1..].chars().all(|c| c.is_ascii_hexdigit())
}

// =============================================================
// Sparse updates
// =============================================================

/// Sparse geometry update. Only present fields are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeometryPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl GeometryPatch {
    /// A patch that moves the origin only.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Self::default() }
    }

    /// A patch that replaces the whole rectangle.
    #[must_use]
    pub fn rect(rect: Rect) -> Self {
        Self { x: Some(rect.x), y: Some(rect.y), width: Some(rect.width), height: Some(rect.height) }
    }

    /// Overlay the patch on `rect`. Non-finite values keep the current field.
    #[must_use]
    pub fn apply_to(&self, rect: Rect) -> Rect {
        let pick = |incoming: Option<f64>, current: f64| incoming.filter(|v| v.is_finite()).unwrap_or(current);
        Rect {
            x: pick(self.x, rect.x),
            y: pick(self.y, rect.y),
            width: pick(self.width, rect.width),
            height: pick(self.height, rect.height),
        }
    }
}

/// Sparse text-style update. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylePatch {
    pub font_size_pt: Option<f64>,
    pub bold: Option<bool>,
    pub color_hex: Option<String>,
}

/// Targets a new free-text or extra-image element can bind to.
#[derive(Debug, Clone, Copy, Default)]
pub struct BindingChoices<'a> {
    /// Columns of the currently selected sheet.
    pub columns: &'a [String],
    /// Drawing-folder identifiers.
    pub folders: &'a [String],
}

// =============================================================
// Errors
// =============================================================

/// Refused store operations. The store is unchanged whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("element not found: {0}")]
    NotFound(ElementId),

    #[error("{0} elements are part of the fixed layout and cannot be added or removed")]
    FixedKind(ElementKind),

    #[error("nothing available to bind a new {0} element to")]
    BindingUnavailable(ElementKind),

    #[error("{field} does not apply to {kind} elements")]
    NotApplicable { kind: ElementKind, field: &'static str },

    #[error("invalid color {0:?}; expected #RRGGBB")]
    InvalidColor(String),
}

impl StoreError {
    /// Stable machine-readable code for the host UI.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_ELEMENT_NOT_FOUND",
            Self::FixedKind(_) => "E_FIXED_KIND",
            Self::BindingUnavailable(_) => "E_BINDING_UNAVAILABLE",
            Self::NotApplicable { .. } => "E_NOT_APPLICABLE",
            Self::InvalidColor(_) => "E_INVALID_COLOR",
        }
    }
}

// =============================================================
// Store
// =============================================================

/// Ordered store of layout elements. Insertion order is paint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementStore {
    elements: Vec<LayoutElement>,
}

impl ElementStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { elements: Vec::new() }
    }

    /// Create a store holding the default four-element layout.
    #[must_use]
    pub fn seeded() -> Self {
        Self { elements: ElementKind::FIXED.into_iter().map(LayoutElement::seed).collect() }
    }

    /// Build a store from elements that already satisfy every invariant.
    pub(crate) fn from_normalized(elements: Vec<LayoutElement>) -> Self {
        Self { elements }
    }

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&LayoutElement> {
        self.elements.iter().find(|el| &el.id == id)
    }

    fn get_mut(&mut self, id: &ElementId) -> Result<&mut LayoutElement, StoreError> {
        self.elements
            .iter_mut()
            .find(|el| &el.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Elements in paint order (first is drawn beneath the rest).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LayoutElement> {
        self.elements.iter()
    }

    /// The first element of `kind`, if any.
    #[must_use]
    pub fn find_kind(&self, kind: ElementKind) -> Option<&LayoutElement> {
        self.elements.iter().find(|el| el.kind() == kind)
    }

    /// The topmost element whose rectangle contains `pt` (inches).
    #[must_use]
    pub fn topmost_at(&self, pt: Point) -> Option<&LayoutElement> {
        self.elements.iter().rev().find(|el| el.rect.contains(pt))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Add a user element bound to the first available column or folder.
    ///
    /// # Errors
    ///
    /// [`StoreError::FixedKind`] for seeded kinds and
    /// [`StoreError::BindingUnavailable`] when there is nothing to bind to.
    pub fn add(&mut self, kind: ElementKind, choices: &BindingChoices<'_>) -> Result<ElementId, StoreError> {
        let content = match kind {
            ElementKind::FreeText => {
                let column = choices
                    .columns
                    .first()
                    .ok_or(StoreError::BindingUnavailable(kind))?;
                ElementContent::FreeText { style: TextStyle::body(), column: column.clone() }
            }
            ElementKind::ExtraImage => {
                let folder_id = choices
                    .folders
                    .first()
                    .ok_or(StoreError::BindingUnavailable(kind))?;
                ElementContent::ExtraImage { folder_id: folder_id.clone(), maintain_aspect_ratio: true }
            }
            fixed => return Err(StoreError::FixedKind(fixed)),
        };

        let mut id = ElementId::generate();
        while self.get(&id).is_some() {
            id = ElementId::generate();
        }

        let user_count = self.elements.iter().filter(|el| el.kind().is_removable()).count();
        #[allow(clippy::cast_precision_loss)]
        let step = user_count as f64 * NEW_ELEMENT_CASCADE_IN;
        let base = seed_rect(kind);
        let rect = Rect::new(base.x + step, base.y + step, base.width, base.height).clamped();

        self.elements.push(LayoutElement { id: id.clone(), rect, content });
        Ok(id)
    }

    /// Remove a user element, returning it.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] for unknown ids and [`StoreError::FixedKind`]
    /// for seeded kinds.
    pub fn remove(&mut self, id: &ElementId) -> Result<LayoutElement, StoreError> {
        let index = self
            .elements
            .iter()
            .position(|el| &el.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let kind = self.elements[index].kind();
        if kind.is_fixed() {
            return Err(StoreError::FixedKind(kind));
        }
        Ok(self.elements.remove(index))
    }

    /// Apply a sparse geometry update, then clamp into the slide.
    ///
    /// Returns the resulting rectangle.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] for unknown ids.
    pub fn update_geometry(&mut self, id: &ElementId, patch: &GeometryPatch) -> Result<Rect, StoreError> {
        let element = self.get_mut(id)?;
        element.rect = patch.apply_to(element.rect).clamped();
        Ok(element.rect)
    }

    /// Replace the text style fields present in `patch`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotApplicable`] for image kinds and
    /// [`StoreError::InvalidColor`] for malformed colors.
    pub fn update_style(&mut self, id: &ElementId, patch: &StylePatch) -> Result<(), StoreError> {
        if let Some(color) = &patch.color_hex {
            if !is_hex_color(color) {
                return Err(StoreError::InvalidColor(color.clone()));
            }
        }
        let element = self.get_mut(id)?;
        let kind = element.kind();
        let style = element
            .content
            .style_mut()
            .ok_or(StoreError::NotApplicable { kind, field: "text style" })?;
        if let Some(pt) = patch.font_size_pt.filter(|pt| pt.is_finite()) {
            style.font_size_pt = clamp_font_size(pt);
        }
        if let Some(bold) = patch.bold {
            style.bold = bold;
        }
        if let Some(color) = &patch.color_hex {
            style.color_hex.clone_from(color);
        }
        Ok(())
    }

    /// Replace the element's column or folder binding.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotApplicable`] when the binding type does not match
    /// the element kind.
    pub fn update_binding(&mut self, id: &ElementId, binding: Binding) -> Result<(), StoreError> {
        let element = self.get_mut(id)?;
        let kind = element.kind();
        match (&mut element.content, binding) {
            (ElementContent::FreeText { column, .. }, Binding::Column(new)) => *column = new,
            (ElementContent::ExtraImage { folder_id, .. }, Binding::Folder(new)) => *folder_id = new,
            (_, Binding::Column(_)) => return Err(StoreError::NotApplicable { kind, field: "column binding" }),
            (_, Binding::Folder(_)) => return Err(StoreError::NotApplicable { kind, field: "folder binding" }),
        }
        Ok(())
    }

    /// Toggle aspect-ratio preservation for an image element.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotApplicable`] for text kinds.
    pub fn set_maintain_aspect_ratio(&mut self, id: &ElementId, keep: bool) -> Result<(), StoreError> {
        let element = self.get_mut(id)?;
        let kind = element.kind();
        match &mut element.content {
            ElementContent::RunImage { maintain_aspect_ratio }
            | ElementContent::DrawingImage { maintain_aspect_ratio }
            | ElementContent::ExtraImage { maintain_aspect_ratio, .. } => {
                *maintain_aspect_ratio = keep;
                Ok(())
            }
            _ => Err(StoreError::NotApplicable { kind, field: "aspect ratio" }),
        }
    }
}

// =============================================================
// Document
// =============================================================

/// Document-scope spreadsheet selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentBindings {
    /// Selected sheet name. Empty when nothing is selected yet.
    pub sheet_name: String,
    /// Column feeding the title element.
    pub title_column: String,
    /// Column feeding the description element, if any.
    pub description_column: Option<String>,
    /// Column used to pair spreadsheet rows with image folders.
    pub match_column: String,
}

/// The whole design unit: ordered elements plus spreadsheet bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutDocument {
    pub bindings: DocumentBindings,
    pub elements: ElementStore,
}

impl Default for LayoutDocument {
    fn default() -> Self {
        Self::seeded()
    }
}

impl LayoutDocument {
    /// A new document with the default four-element layout and no bindings.
    #[must_use]
    pub fn seeded() -> Self {
        Self { bindings: DocumentBindings::default(), elements: ElementStore::seeded() }
    }
}
