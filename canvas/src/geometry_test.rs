#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn no_chrome(min: f64, max: f64) -> CanvasBounds {
    CanvasBounds {
        reserved_left_px: 0.0,
        reserved_right_px: 0.0,
        reserved_top_px: 0.0,
        reserved_bottom_px: 0.0,
        min_width_px: min,
        max_width_px: max,
    }
}

// --- Rect ---

#[test]
fn rect_edges() {
    let r = Rect::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(r.right(), 4.0);
    assert_eq!(r.bottom(), 6.0);
    assert_eq!(r.origin(), Point::new(1.0, 2.0));
    assert_eq!(r.size(), Size::new(3.0, 4.0));
}

#[test]
fn rect_contains_is_edge_inclusive() {
    let r = Rect::new(1.0, 1.0, 2.0, 2.0);
    assert!(r.contains(Point::new(1.0, 1.0)));
    assert!(r.contains(Point::new(3.0, 3.0)));
    assert!(r.contains(Point::new(2.0, 2.0)));
    assert!(!r.contains(Point::new(3.01, 2.0)));
    assert!(!r.contains(Point::new(0.99, 2.0)));
}

#[test]
fn clamped_valid_rect_is_unchanged() {
    let r = Rect::new(0.5, 1.5, 4.25, 4.75);
    assert_eq!(r.clamped(), r);
}

#[test]
fn clamped_negative_origin_moves_to_zero() {
    let r = Rect::new(-3.0, -1.0, 2.0, 1.0).clamped();
    assert_eq!(r.x, 0.0);
    assert_eq!(r.y, 0.0);
    assert_eq!(r.width, 2.0);
    assert_eq!(r.height, 1.0);
}

#[test]
fn clamped_overflow_pulls_origin_back() {
    let r = Rect::new(9.0, 7.0, 2.0, 1.0).clamped();
    assert_eq!(r.x, 8.0);
    assert_eq!(r.y, 6.5);
}

#[test]
fn clamped_tiny_size_grows_to_minimum() {
    let r = Rect::new(1.0, 1.0, 0.1, -4.0).clamped();
    assert_eq!(r.width, MIN_DIM_IN);
    assert_eq!(r.height, MIN_DIM_IN);
}

#[test]
fn clamped_huge_size_fills_slide() {
    let r = Rect::new(3.0, 3.0, 50.0, 50.0).clamped();
    assert_eq!(r, Rect::new(0.0, 0.0, SLIDE_WIDTH_IN, SLIDE_HEIGHT_IN));
}

#[test]
fn clamped_non_finite_values_recover() {
    let r = Rect::new(f64::NAN, f64::INFINITY, f64::NAN, f64::NEG_INFINITY).clamped();
    assert!(r.is_within_slide());
    assert_eq!(r.x, 0.0);
    assert_eq!(r.width, MIN_DIM_IN);
    assert_eq!(r.height, MIN_DIM_IN);
    assert_eq!(r.y, SLIDE_HEIGHT_IN - MIN_DIM_IN);
}

#[test]
fn is_within_slide_rejects_overflow() {
    assert!(!Rect::new(9.0, 0.0, 2.0, 1.0).is_within_slide());
    assert!(!Rect::new(0.0, 0.0, 0.4, 1.0).is_within_slide());
    assert!(Rect::new(0.0, 0.0, 10.0, 7.5).is_within_slide());
}

// --- clamp_span ---

#[test]
fn clamp_span_inverted_range_collapses_to_min() {
    assert_eq!(clamp_span(3.0, 2.0, 1.0), 2.0);
}

#[test]
fn clamp_span_nan_maps_to_min() {
    assert_eq!(clamp_span(f64::NAN, 0.5, 4.0), 0.5);
}

// --- compute_canvas_size ---

#[test]
fn canvas_is_four_by_three() {
    let size = compute_canvas_size(1280.0, 960.0, &CanvasBounds::default());
    assert!(approx_eq(size.pixel_width / size.pixel_height, ASPECT_RATIO));
    assert!(approx_eq(ASPECT_RATIO, 4.0 / 3.0));
}

#[test]
fn canvas_width_constrained_fit() {
    let size = compute_canvas_size(1280.0, 960.0, &CanvasBounds::default());
    // 1280 - 320 - 280 = 680 wide; 960 - 64 - 96 = 800 tall allows 1066 wide.
    assert_eq!(size.pixel_width, 680.0);
    assert_eq!(size.pixel_height, 510.0);
    assert_eq!(size.pixels_per_inch, 68.0);
}

#[test]
fn canvas_height_constrained_fit() {
    let size = compute_canvas_size(2000.0, 760.0, &CanvasBounds::default());
    // 760 - 160 = 600 tall → 800 wide, tighter than 1400.
    assert_eq!(size.pixel_width, 800.0);
    assert_eq!(size.pixel_height, 600.0);
}

#[test]
fn canvas_floors_to_whole_pixels() {
    let size = compute_canvas_size(1000.7, 10_000.0, &no_chrome(100.0, 5000.0));
    assert_eq!(size.pixel_width, 1000.0);
}

#[test]
fn canvas_clamps_to_minimum_width() {
    let size = compute_canvas_size(300.0, 200.0, &CanvasBounds::default());
    assert_eq!(size.pixel_width, DEFAULT_MIN_CANVAS_WIDTH_PX);
    assert_eq!(size.pixel_height, DEFAULT_MIN_CANVAS_WIDTH_PX * 0.75);
}

#[test]
fn canvas_clamps_to_maximum_width() {
    let size = compute_canvas_size(10_000.0, 10_000.0, &CanvasBounds::default());
    assert_eq!(size.pixel_width, DEFAULT_MAX_CANVAS_WIDTH_PX);
}

#[test]
fn canvas_non_finite_viewport_uses_minimum() {
    let size = compute_canvas_size(f64::NAN, f64::NAN, &CanvasBounds::default());
    assert_eq!(size.pixel_width, DEFAULT_MIN_CANVAS_WIDTH_PX);
}

#[test]
fn canvas_zero_minimum_never_yields_zero_ppi() {
    let size = compute_canvas_size(0.0, 0.0, &no_chrome(0.0, 100.0));
    assert!(size.pixels_per_inch > 0.0);
}

#[test]
fn pixels_per_inch_times_slide_width_is_exact() {
    let bounds = no_chrome(1.0, 100_000.0);
    let mut w = 1.0;
    while w < 20_000.0 {
        for h in [1.0, 333.0, 767.5, 4096.0, 99_999.0] {
            let size = compute_canvas_size(w, h, &bounds);
            assert_eq!(size.pixels_per_inch * SLIDE_WIDTH_IN, size.pixel_width, "viewport {w}x{h}");
        }
        w = w * 1.37 + 3.0;
    }
}

// --- CanvasView ---

#[test]
fn view_default_is_minimum_width() {
    let view = CanvasView::default();
    assert_eq!(view.size().pixel_width, DEFAULT_MIN_CANVAS_WIDTH_PX);
    assert_eq!(view.bounds(), CanvasBounds::default());
}

#[test]
fn view_resize_recomputes_ppi() {
    let mut view = CanvasView::default();
    view.resize(1280.0, 960.0);
    assert_eq!(view.pixels_per_inch(), 68.0);
    view.resize(1600.0, 960.0);
    assert_eq!(view.pixels_per_inch(), 100.0);
}

#[test]
fn view_conversions_roundtrip() {
    let mut view = CanvasView::default();
    view.resize(1280.0, 960.0);
    assert_eq!(view.px_to_in(136.0), 2.0);
    assert_eq!(view.in_to_px(2.5), 170.0);
    let slide = view.screen_to_slide(Point::new(68.0, 102.0));
    assert_eq!(slide, Point::new(1.0, 1.5));
    assert_eq!(view.slide_to_screen(slide), Point::new(68.0, 102.0));
}
