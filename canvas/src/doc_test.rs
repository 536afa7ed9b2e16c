#![allow(clippy::float_cmp)]

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::consts::{MIN_DIM_IN, SLIDE_HEIGHT_IN, SLIDE_WIDTH_IN};

fn columns() -> Vec<String> {
    vec!["Sample".to_owned(), "Notes".to_owned()]
}

fn folders() -> Vec<String> {
    vec!["folder-7".to_owned()]
}

fn add_free_text(store: &mut ElementStore) -> ElementId {
    let cols = columns();
    store
        .add(ElementKind::FreeText, &BindingChoices { columns: &cols, folders: &[] })
        .unwrap()
}

fn id_of(store: &ElementStore, kind: ElementKind) -> ElementId {
    store.find_kind(kind).unwrap().id.clone()
}

// =============================================================
// ElementKind
// =============================================================

#[test]
fn kind_wire_names_roundtrip() {
    for kind in ElementKind::ALL {
        assert_eq!(ElementKind::parse(kind.as_str()), Some(kind));
    }
    assert_eq!(ElementKind::parse("rect"), None);
}

#[test]
fn kind_serde_matches_wire_name() {
    for kind in ElementKind::ALL {
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, format!("\"{}\"", kind.as_str()));
    }
}

#[test]
fn kind_classification() {
    assert!(ElementKind::FreeText.is_removable());
    assert!(ElementKind::ExtraImage.is_removable());
    for kind in ElementKind::FIXED {
        assert!(kind.is_fixed());
    }
    assert!(ElementKind::Description.is_text());
    assert!(!ElementKind::RunImage.is_text());
    assert!(ElementKind::ExtraImage.is_image());
    assert!(!ElementKind::Title.is_image());
}

#[test]
fn kind_display_is_human_readable() {
    assert_eq!(ElementKind::FreeText.to_string(), "free text");
    assert_eq!(ElementKind::DrawingImage.to_string(), "drawing image");
}

// =============================================================
// Content
// =============================================================

#[test]
fn content_accessors_follow_kind() {
    let text = ElementContent::default_for(ElementKind::FreeText);
    assert!(text.style().is_some());
    assert_eq!(text.binding(), Some(Binding::Column(String::new())));
    assert_eq!(text.maintain_aspect_ratio(), None);

    let image = ElementContent::default_for(ElementKind::RunImage);
    assert!(image.style().is_none());
    assert_eq!(image.binding(), None);
    assert_eq!(image.maintain_aspect_ratio(), Some(true));

    for kind in ElementKind::ALL {
        assert_eq!(ElementContent::default_for(kind).kind(), kind);
    }
}

#[test]
fn seed_rects_are_inside_slide() {
    for kind in ElementKind::ALL {
        let rect = seed_rect(kind);
        assert!(rect.is_within_slide(), "{kind:?} {rect:?}");
        assert_eq!(rect.clamped(), rect);
    }
}

#[test]
fn hex_color_validation() {
    assert!(is_hex_color("#1F1A17"));
    assert!(is_hex_color("#abcdef"));
    assert!(!is_hex_color("1F1A17"));
    assert!(!is_hex_color("#1F1A1"));
    assert!(!is_hex_color("#GGGGGG"));
    assert!(!is_hex_color("#ÿÿÿ"));
}

#[test]
fn font_size_clamps() {
    assert_eq!(clamp_font_size(1.0), 6.0);
    assert_eq!(clamp_font_size(500.0), 144.0);
    assert_eq!(clamp_font_size(18.0), 18.0);
}

// =============================================================
// Seeded store
// =============================================================

#[test]
fn seeded_store_has_four_fixed_elements() {
    let store = ElementStore::seeded();
    assert_eq!(store.len(), 4);
    let kinds: Vec<ElementKind> = store.iter().map(LayoutElement::kind).collect();
    assert_eq!(kinds, ElementKind::FIXED.to_vec());
}

#[test]
fn seeded_ids_are_unique() {
    let store = ElementStore::seeded();
    let ids: HashSet<&ElementId> = store.iter().map(|el| &el.id).collect();
    assert_eq!(ids.len(), 4);
}

#[test]
fn new_store_is_empty() {
    assert!(ElementStore::new().is_empty());
}

#[test]
fn topmost_at_prefers_later_elements() {
    let mut store = ElementStore::seeded();
    let text = add_free_text(&mut store);
    // Cascade origin (1.0, 2.0) overlaps the run image.
    let hit = store.topmost_at(Point::new(1.5, 2.2)).unwrap();
    assert_eq!(hit.id, text);
    let below = store.topmost_at(Point::new(0.6, 5.0)).unwrap();
    assert_eq!(below.kind(), ElementKind::RunImage);
    assert!(store.topmost_at(Point::new(9.9, 7.4)).is_none());
}

// =============================================================
// add
// =============================================================

#[test]
fn add_free_text_binds_first_column() {
    let mut store = ElementStore::seeded();
    let id = add_free_text(&mut store);
    let el = store.get(&id).unwrap();
    assert_eq!(el.content.binding(), Some(Binding::Column("Sample".to_owned())));
    assert_eq!(el.rect, seed_rect(ElementKind::FreeText));
    assert_eq!(store.len(), 5);
}

#[test]
fn add_extra_image_binds_first_folder() {
    let mut store = ElementStore::seeded();
    let f = folders();
    let id = store
        .add(ElementKind::ExtraImage, &BindingChoices { columns: &[], folders: &f })
        .unwrap();
    let el = store.get(&id).unwrap();
    assert_eq!(el.content.binding(), Some(Binding::Folder("folder-7".to_owned())));
    assert_eq!(el.content.maintain_aspect_ratio(), Some(true));
}

#[test]
fn add_without_columns_is_refused() {
    let mut store = ElementStore::seeded();
    let before = store.clone();
    let err = store
        .add(ElementKind::FreeText, &BindingChoices::default())
        .unwrap_err();
    assert_eq!(err, StoreError::BindingUnavailable(ElementKind::FreeText));
    assert_eq!(store, before);
}

#[test]
fn add_without_folders_is_refused() {
    let mut store = ElementStore::seeded();
    let cols = columns();
    let before = store.clone();
    let err = store
        .add(ElementKind::ExtraImage, &BindingChoices { columns: &cols, folders: &[] })
        .unwrap_err();
    assert_eq!(err, StoreError::BindingUnavailable(ElementKind::ExtraImage));
    assert_eq!(err.error_code(), "E_BINDING_UNAVAILABLE");
    assert_eq!(store, before);
}

#[test]
fn add_fixed_kind_is_refused() {
    let mut store = ElementStore::seeded();
    let cols = columns();
    let err = store
        .add(ElementKind::Title, &BindingChoices { columns: &cols, folders: &[] })
        .unwrap_err();
    assert_eq!(err, StoreError::FixedKind(ElementKind::Title));
    assert_eq!(store.len(), 4);
}

#[test]
fn add_cascades_successive_elements() {
    let mut store = ElementStore::seeded();
    let a = add_free_text(&mut store);
    let b = add_free_text(&mut store);
    let ra = store.get(&a).unwrap().rect;
    let rb = store.get(&b).unwrap().rect;
    assert_eq!(rb.x - ra.x, 0.25);
    assert_eq!(rb.y - ra.y, 0.25);
    assert_ne!(a, b);
}

#[test]
fn add_many_stays_in_bounds() {
    let mut store = ElementStore::seeded();
    for _ in 0..60 {
        add_free_text(&mut store);
    }
    assert!(store.iter().all(|el| el.rect.is_within_slide()));
}

// =============================================================
// remove
// =============================================================

#[test]
fn remove_user_element() {
    let mut store = ElementStore::seeded();
    let id = add_free_text(&mut store);
    let removed = store.remove(&id).unwrap();
    assert_eq!(removed.id, id);
    assert!(store.get(&id).is_none());
    assert_eq!(store.len(), 4);
}

#[test]
fn remove_fixed_element_is_refused() {
    let mut store = ElementStore::seeded();
    for kind in ElementKind::FIXED {
        let id = id_of(&store, kind);
        assert_eq!(store.remove(&id), Err(StoreError::FixedKind(kind)));
    }
    assert_eq!(store.len(), 4);
}

#[test]
fn remove_unknown_id_is_not_found() {
    let mut store = ElementStore::seeded();
    let id = ElementId::new("missing");
    assert_eq!(store.remove(&id), Err(StoreError::NotFound(id)));
}

// =============================================================
// update_geometry
// =============================================================

#[test]
fn update_geometry_applies_partial_fields() {
    let mut store = ElementStore::seeded();
    let id = id_of(&store, ElementKind::RunImage);
    let rect = store
        .update_geometry(&id, &GeometryPatch { width: Some(3.0), ..GeometryPatch::default() })
        .unwrap();
    assert_eq!(rect, Rect::new(0.5, 1.5, 3.0, 4.75));
}

#[test]
fn update_geometry_clamps_out_of_range() {
    let mut store = ElementStore::seeded();
    let id = id_of(&store, ElementKind::RunImage);
    let rect = store
        .update_geometry(&id, &GeometryPatch::position(20.0, -5.0))
        .unwrap();
    assert_eq!(rect.x, SLIDE_WIDTH_IN - 4.25);
    assert_eq!(rect.y, 0.0);
}

#[test]
fn update_geometry_negative_size_clamps_to_minimum() {
    let mut store = ElementStore::seeded();
    let id = id_of(&store, ElementKind::Title);
    let rect = store
        .update_geometry(&id, &GeometryPatch { width: Some(-2.0), height: Some(0.0), ..GeometryPatch::default() })
        .unwrap();
    assert_eq!(rect.width, MIN_DIM_IN);
    assert_eq!(rect.height, MIN_DIM_IN);
}

#[test]
fn update_geometry_ignores_non_finite_fields() {
    let mut store = ElementStore::seeded();
    let id = id_of(&store, ElementKind::Title);
    let before = store.get(&id).unwrap().rect;
    let rect = store
        .update_geometry(&id, &GeometryPatch { x: Some(f64::NAN), y: Some(f64::INFINITY), ..GeometryPatch::default() })
        .unwrap();
    assert_eq!(rect, before);
}

#[test]
fn update_geometry_unknown_id() {
    let mut store = ElementStore::seeded();
    let result = store.update_geometry(&ElementId::new("nope"), &GeometryPatch::position(1.0, 1.0));
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[test]
fn bounds_invariant_holds_for_random_update_sequences() {
    let mut rng = StdRng::seed_from_u64(0x51DE);
    let mut store = ElementStore::seeded();
    add_free_text(&mut store);
    let ids: Vec<ElementId> = store.iter().map(|el| el.id.clone()).collect();

    for _ in 0..5_000 {
        let id = &ids[rng.random_range(0..ids.len())];
        let mut field = || rng.random_bool(0.6).then(|| rng.random_range(-30.0..30.0));
        let patch = GeometryPatch { x: field(), y: field(), width: field(), height: field() };
        store.update_geometry(id, &patch).unwrap();

        for el in store.iter() {
            let r = el.rect;
            assert!(r.x >= 0.0 && r.y >= 0.0, "{r:?}");
            assert!(r.right() <= SLIDE_WIDTH_IN + 1e-9, "{r:?}");
            assert!(r.bottom() <= SLIDE_HEIGHT_IN + 1e-9, "{r:?}");
            assert!(r.width >= MIN_DIM_IN && r.height >= MIN_DIM_IN, "{r:?}");
        }
    }
}

// =============================================================
// update_style / update_binding / aspect ratio
// =============================================================

#[test]
fn update_style_replaces_present_fields() {
    let mut store = ElementStore::seeded();
    let id = id_of(&store, ElementKind::Title);
    store
        .update_style(&id, &StylePatch { bold: Some(false), color_hex: Some("#FF0000".to_owned()), ..StylePatch::default() })
        .unwrap();
    let style = store.get(&id).unwrap().content.style().unwrap().clone();
    assert!(!style.bold);
    assert_eq!(style.color_hex, "#FF0000");
    assert_eq!(style.font_size_pt, 28.0);
}

#[test]
fn update_style_clamps_font_size() {
    let mut store = ElementStore::seeded();
    let id = id_of(&store, ElementKind::Description);
    store
        .update_style(&id, &StylePatch { font_size_pt: Some(1000.0), ..StylePatch::default() })
        .unwrap();
    assert_eq!(store.get(&id).unwrap().content.style().unwrap().font_size_pt, 144.0);
}

#[test]
fn update_style_does_not_touch_geometry() {
    let mut store = ElementStore::seeded();
    let id = id_of(&store, ElementKind::Title);
    let before = store.get(&id).unwrap().rect;
    store
        .update_style(&id, &StylePatch { font_size_pt: Some(40.0), ..StylePatch::default() })
        .unwrap();
    assert_eq!(store.get(&id).unwrap().rect, before);
}

#[test]
fn update_style_on_image_is_not_applicable() {
    let mut store = ElementStore::seeded();
    let id = id_of(&store, ElementKind::RunImage);
    let err = store
        .update_style(&id, &StylePatch { bold: Some(true), ..StylePatch::default() })
        .unwrap_err();
    assert_eq!(err, StoreError::NotApplicable { kind: ElementKind::RunImage, field: "text style" });
}

#[test]
fn update_style_rejects_bad_color() {
    let mut store = ElementStore::seeded();
    let id = id_of(&store, ElementKind::Title);
    let err = store
        .update_style(&id, &StylePatch { color_hex: Some("red".to_owned()), bold: Some(false), ..StylePatch::default() })
        .unwrap_err();
    assert_eq!(err, StoreError::InvalidColor("red".to_owned()));
    assert!(store.get(&id).unwrap().content.style().unwrap().bold);
}

#[test]
fn update_binding_rebinds_free_text() {
    let mut store = ElementStore::seeded();
    let id = add_free_text(&mut store);
    store
        .update_binding(&id, Binding::Column("Notes".to_owned()))
        .unwrap();
    assert_eq!(store.get(&id).unwrap().content.binding(), Some(Binding::Column("Notes".to_owned())));
}

#[test]
fn update_binding_wrong_type_is_refused() {
    let mut store = ElementStore::seeded();
    let id = add_free_text(&mut store);
    let err = store
        .update_binding(&id, Binding::Folder("f".to_owned()))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotApplicable { kind: ElementKind::FreeText, .. }));

    let title = id_of(&store, ElementKind::Title);
    assert!(store.update_binding(&title, Binding::Column("x".to_owned())).is_err());
}

#[test]
fn aspect_ratio_toggle_on_images_only() {
    let mut store = ElementStore::seeded();
    let image = id_of(&store, ElementKind::DrawingImage);
    store.set_maintain_aspect_ratio(&image, false).unwrap();
    assert_eq!(store.get(&image).unwrap().content.maintain_aspect_ratio(), Some(false));

    let title = id_of(&store, ElementKind::Title);
    assert!(store.set_maintain_aspect_ratio(&title, false).is_err());
}

// =============================================================
// LayoutDocument
// =============================================================

#[test]
fn document_default_is_seeded_without_bindings() {
    let doc = LayoutDocument::default();
    assert_eq!(doc.elements.len(), 4);
    assert_eq!(doc.bindings, DocumentBindings::default());
    assert!(doc.bindings.description_column.is_none());
}
