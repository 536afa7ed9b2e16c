//! Settings codec: converts a `LayoutDocument` to and from its transport payload.
//!
//! Encoding goes through serde-derived wire structs with a stable camelCase
//! layout. Decoding deliberately does not: saved payloads are untrusted, so
//! `from_transport_payload` reads one field at a time through [`Fields`] and
//! falls back to the seed value for anything missing or mistyped. The result
//! always satisfies the document invariants.

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::doc::{
    DocumentBindings, ElementContent, ElementId, ElementKind, ElementStore, LayoutDocument, LayoutElement, TextStyle,
    clamp_font_size, is_hex_color, seed_rect,
};
use crate::geometry::Rect;

/// Errors from the text-level entry points and from building a generation request.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required binding `{0}`")]
    MissingBinding(&'static str),
}

impl CodecError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Json(_) => "E_PAYLOAD_JSON",
            Self::MissingBinding(_) => "E_MISSING_BINDING",
        }
    }
}

// =============================================================
// Wire types
// =============================================================

/// Serialized form of a layout document and its bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportPayload {
    pub sheet_name: String,
    pub title_column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_column: Option<String>,
    pub match_column: String,
    pub elements: Vec<TransportElement>,
}

/// Serialized form of one element. Kind-specific fields are omitted when
/// they do not apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportElement {
    pub id: ElementId,
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size_pt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintain_aspect_ratio: Option<bool>,
}

impl From<&LayoutElement> for TransportElement {
    fn from(element: &LayoutElement) -> Self {
        let style = element.content.style();
        let (column, folder_id) = match &element.content {
            ElementContent::FreeText { column, .. } => (Some(column.clone()), None),
            ElementContent::ExtraImage { folder_id, .. } => (None, Some(folder_id.clone())),
            _ => (None, None),
        };
        Self {
            id: element.id.clone(),
            kind: element.kind(),
            x: element.rect.x,
            y: element.rect.y,
            width: element.rect.width,
            height: element.rect.height,
            font_size_pt: style.map(|s| s.font_size_pt),
            bold: style.map(|s| s.bold),
            color_hex: style.map(|s| s.color_hex.clone()),
            column,
            folder_id,
            maintain_aspect_ratio: element.content.maintain_aspect_ratio(),
        }
    }
}

/// Body submitted to the generation service.
///
/// Same shape as [`TransportPayload`], but only constructible from a
/// document whose sheet, title column and match column are all chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationRequest(TransportPayload);

impl GenerationRequest {
    /// Build a request from the current document.
    ///
    /// # Errors
    ///
    /// [`CodecError::MissingBinding`] when a required selection is empty.
    pub fn from_document(doc: &LayoutDocument) -> Result<Self, CodecError> {
        let bindings = &doc.bindings;
        if bindings.sheet_name.trim().is_empty() {
            return Err(CodecError::MissingBinding("sheetName"));
        }
        if bindings.title_column.trim().is_empty() {
            return Err(CodecError::MissingBinding("titleColumn"));
        }
        if bindings.match_column.trim().is_empty() {
            return Err(CodecError::MissingBinding("matchColumn"));
        }
        Ok(Self(to_transport_payload(doc)))
    }

    #[must_use]
    pub fn payload(&self) -> &TransportPayload {
        &self.0
    }
}

// =============================================================
// Encoding
// =============================================================

/// Snapshot a document into its wire form, elements in paint order.
#[must_use]
pub fn to_transport_payload(doc: &LayoutDocument) -> TransportPayload {
    let bindings = &doc.bindings;
    TransportPayload {
        sheet_name: bindings.sheet_name.clone(),
        title_column: bindings.title_column.clone(),
        description_column: bindings.description_column.clone(),
        match_column: bindings.match_column.clone(),
        elements: doc.elements.iter().map(TransportElement::from).collect(),
    }
}

/// Snapshot a document as a JSON value.
///
/// # Errors
///
/// [`CodecError::Json`] if serialization fails.
pub fn to_json(doc: &LayoutDocument) -> Result<Value, CodecError> {
    Ok(serde_json::to_value(to_transport_payload(doc))?)
}

// =============================================================
// Decoding
// =============================================================

/// Parse payload text and hydrate a document from it.
///
/// # Errors
///
/// [`CodecError::Json`] only when the text is not JSON at all; every
/// structural problem inside valid JSON is recovered.
pub fn from_json_str(raw: &str) -> Result<LayoutDocument, CodecError> {
    let value: Value = serde_json::from_str(raw)?;
    Ok(from_transport_payload(&value))
}

/// Hydrate a document from a saved payload.
///
/// - bindings missing or mistyped become empty (description: absent);
/// - elements with unknown kinds are skipped;
/// - a second element of a fixed kind is dropped, first one wins;
/// - a missing title is re-seeded at its default slot;
/// - missing or duplicate ids get fresh ones, other ids are preserved;
/// - geometry and style fall back per field to the seed values and are
///   clamped into range.
#[must_use]
pub fn from_transport_payload(value: &Value) -> LayoutDocument {
    let root = Fields::new(value);
    let bindings = DocumentBindings {
        sheet_name: root.string("sheetName").unwrap_or_default(),
        title_column: root.string("titleColumn").unwrap_or_default(),
        description_column: root.string("descriptionColumn").filter(|c| !c.is_empty()),
        match_column: root.string("matchColumn").unwrap_or_default(),
    };

    let raw_elements = value
        .get("elements")
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice);

    let mut elements: Vec<LayoutElement> = Vec::with_capacity(raw_elements.len());
    let mut seen_ids: HashSet<ElementId> = HashSet::new();
    for raw in raw_elements {
        let Some(mut element) = decode_element(raw) else {
            continue;
        };
        let kind = element.kind();
        if kind.is_fixed() && elements.iter().any(|el| el.kind() == kind) {
            continue;
        }
        if seen_ids.contains(&element.id) {
            element.id = fresh_id(&seen_ids);
        }
        seen_ids.insert(element.id.clone());
        elements.push(element);
    }

    if !elements.iter().any(|el| el.kind() == ElementKind::Title) {
        let mut title = LayoutElement::seed(ElementKind::Title);
        title.id = fresh_id(&seen_ids);
        elements.insert(0, title);
    }

    LayoutDocument { bindings, elements: ElementStore::from_normalized(elements) }
}

fn fresh_id(taken: &HashSet<ElementId>) -> ElementId {
    let mut id = ElementId::generate();
    while taken.contains(&id) {
        id = ElementId::generate();
    }
    id
}

fn decode_element(raw: &Value) -> Option<LayoutElement> {
    let fields = Fields::new(raw);
    let kind = fields.string("kind").as_deref().and_then(ElementKind::parse)?;

    let id = fields
        .id("id")
        .filter(|id| !id.is_empty())
        .map_or_else(ElementId::generate, ElementId::new);

    let seed = seed_rect(kind);
    let rect = Rect::new(
        fields.number("x").unwrap_or(seed.x),
        fields.number("y").unwrap_or(seed.y),
        fields.number("width").unwrap_or(seed.width),
        fields.number("height").unwrap_or(seed.height),
    )
    .clamped();

    let keep_aspect = fields.boolean("maintainAspectRatio").unwrap_or(true);
    let content = match ElementContent::default_for(kind) {
        ElementContent::Title { style } => ElementContent::Title { style: decode_style(&fields, style) },
        ElementContent::Description { style } => ElementContent::Description { style: decode_style(&fields, style) },
        ElementContent::FreeText { style, .. } => ElementContent::FreeText {
            style: decode_style(&fields, style),
            column: fields.string("column").unwrap_or_default(),
        },
        ElementContent::RunImage { .. } => ElementContent::RunImage { maintain_aspect_ratio: keep_aspect },
        ElementContent::DrawingImage { .. } => ElementContent::DrawingImage { maintain_aspect_ratio: keep_aspect },
        ElementContent::ExtraImage { .. } => ElementContent::ExtraImage {
            folder_id: fields.id("folderId").unwrap_or_default(),
            maintain_aspect_ratio: keep_aspect,
        },
    };

    Some(LayoutElement { id, rect, content })
}

fn decode_style(fields: &Fields<'_>, fallback: TextStyle) -> TextStyle {
    TextStyle {
        font_size_pt: fields
            .number("fontSizePt")
            .map_or(fallback.font_size_pt, clamp_font_size),
        bold: fields.boolean("bold").unwrap_or(fallback.bold),
        color_hex: fields
            .string("colorHex")
            .filter(|c| is_hex_color(c))
            .unwrap_or(fallback.color_hex),
    }
}

/// Typed, forgiving access to fields of a JSON object.
///
/// Every accessor returns `None` when the field is absent or of the wrong
/// type, so callers pick their own fallback.
struct Fields<'a> {
    value: &'a Value,
}

impl<'a> Fields<'a> {
    fn new(value: &'a Value) -> Self {
        Self { value }
    }

    fn string(&self, key: &str) -> Option<String> {
        self.value.get(key).and_then(Value::as_str).map(str::to_owned)
    }

    /// A string, or a number rendered as a string (ids and folder ids).
    fn id(&self, key: &str) -> Option<String> {
        match self.value.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.value
            .get(key)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
    }

    fn boolean(&self, key: &str) -> Option<bool> {
        self.value.get(key).and_then(Value::as_bool)
    }
}
