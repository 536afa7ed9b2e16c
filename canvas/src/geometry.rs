//! Geometry model: slide-space rectangles and the responsive canvas size.
//!
//! Everything an element knows about its placement is stored in inches. The
//! only bridge to screen pixels is [`CanvasSize::pixels_per_inch`], which is
//! recomputed from scratch every time the hosting viewport changes size.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::consts::{
    DEFAULT_MAX_CANVAS_WIDTH_PX, DEFAULT_MIN_CANVAS_WIDTH_PX, DEFAULT_RESERVED_BOTTOM_PX, DEFAULT_RESERVED_LEFT_PX,
    DEFAULT_RESERVED_RIGHT_PX, DEFAULT_RESERVED_TOP_PX, MIN_DIM_IN, SLIDE_HEIGHT_IN, SLIDE_WIDTH_IN,
};

/// Width over height of the physical slide (4:3).
pub const ASPECT_RATIO: f64 = SLIDE_WIDTH_IN / SLIDE_HEIGHT_IN;

/// A point in either canvas pixel space or slide inch space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in slide inches, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (`x + width`).
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether `pt` lies inside the rectangle, edges inclusive.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.right() && pt.y >= self.y && pt.y <= self.bottom()
    }

    /// Bring the rectangle inside the slide.
    ///
    /// Size is clamped first to `[MIN_DIM_IN, slide dimension]`, then the
    /// origin to `[0, slide dimension - size]`. Non-finite sizes collapse to
    /// the minimum and non-finite origins to zero.
    #[must_use]
    pub fn clamped(self) -> Self {
        let width = clamp_span(self.width, MIN_DIM_IN, SLIDE_WIDTH_IN);
        let height = clamp_span(self.height, MIN_DIM_IN, SLIDE_HEIGHT_IN);
        let x = clamp_span(self.x, 0.0, SLIDE_WIDTH_IN - width);
        let y = clamp_span(self.y, 0.0, SLIDE_HEIGHT_IN - height);
        Self { x, y, width, height }
    }

    /// Whether every slide invariant holds, allowing for float rounding.
    #[must_use]
    pub fn is_within_slide(&self) -> bool {
        const TOLERANCE: f64 = 1e-9;
        self.x >= -TOLERANCE
            && self.y >= -TOLERANCE
            && self.width >= MIN_DIM_IN - TOLERANCE
            && self.height >= MIN_DIM_IN - TOLERANCE
            && self.right() <= SLIDE_WIDTH_IN + TOLERANCE
            && self.bottom() <= SLIDE_HEIGHT_IN + TOLERANCE
    }
}

/// Clamp `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics: an inverted range collapses to
/// `min`, and `NaN` maps to `min`.
#[must_use]
pub fn clamp_span(value: f64, min: f64, max: f64) -> f64 {
    let max = max.max(min);
    if value.is_nan() || value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Space reserved around the canvas plus the allowed canvas width range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    pub reserved_left_px: f64,
    pub reserved_right_px: f64,
    pub reserved_top_px: f64,
    pub reserved_bottom_px: f64,
    pub min_width_px: f64,
    pub max_width_px: f64,
}

impl Default for CanvasBounds {
    fn default() -> Self {
        Self {
            reserved_left_px: DEFAULT_RESERVED_LEFT_PX,
            reserved_right_px: DEFAULT_RESERVED_RIGHT_PX,
            reserved_top_px: DEFAULT_RESERVED_TOP_PX,
            reserved_bottom_px: DEFAULT_RESERVED_BOTTOM_PX,
            min_width_px: DEFAULT_MIN_CANVAS_WIDTH_PX,
            max_width_px: DEFAULT_MAX_CANVAS_WIDTH_PX,
        }
    }
}

/// Rendered canvas dimensions and the pixel/inch conversion factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub pixel_width: f64,
    pub pixel_height: f64,
    pub pixels_per_inch: f64,
}

impl CanvasSize {
    /// Derive the full canvas size from a pixel width.
    ///
    /// Both pixel dimensions are computed from `pixels_per_inch`, so
    /// `pixels_per_inch * SLIDE_WIDTH_IN == pixel_width` holds exactly.
    #[must_use]
    pub fn from_width(width_px: f64) -> Self {
        let pixels_per_inch = width_px / SLIDE_WIDTH_IN;
        Self {
            pixel_width: pixels_per_inch * SLIDE_WIDTH_IN,
            pixel_height: pixels_per_inch * SLIDE_HEIGHT_IN,
            pixels_per_inch,
        }
    }
}

/// Compute the largest 4:3 canvas that fits the viewport minus its chrome.
///
/// The width-constrained and height-constrained fits are both evaluated and
/// the tighter one wins. The result is floored to whole pixels and clamped to
/// `[min_width_px, max_width_px]`; height always follows from width.
#[must_use]
pub fn compute_canvas_size(viewport_width: f64, viewport_height: f64, bounds: &CanvasBounds) -> CanvasSize {
    let min_width = bounds.min_width_px.max(1.0);
    let available_width = viewport_width - bounds.reserved_left_px - bounds.reserved_right_px;
    let available_height = viewport_height - bounds.reserved_top_px - bounds.reserved_bottom_px;

    let width_fit = available_width;
    let height_fit = available_height * SLIDE_WIDTH_IN / SLIDE_HEIGHT_IN;
    let fit = width_fit.min(height_fit);
    let fit = if fit.is_finite() { fit.floor() } else { min_width };

    CanvasSize::from_width(clamp_span(fit, min_width, bounds.max_width_px))
}

/// Derived view state: the configured bounds plus the last computed size.
#[derive(Debug, Clone, Copy)]
pub struct CanvasView {
    bounds: CanvasBounds,
    size: CanvasSize,
}

impl Default for CanvasView {
    fn default() -> Self {
        Self::new(CanvasBounds::default())
    }
}

impl CanvasView {
    /// Create a view sized for an empty viewport (i.e. at the minimum width).
    #[must_use]
    pub fn new(bounds: CanvasBounds) -> Self {
        Self { bounds, size: compute_canvas_size(0.0, 0.0, &bounds) }
    }

    /// Recompute the canvas for a new viewport size.
    pub fn resize(&mut self, viewport_width: f64, viewport_height: f64) -> CanvasSize {
        self.size = compute_canvas_size(viewport_width, viewport_height, &self.bounds);
        self.size
    }

    #[must_use]
    pub fn bounds(&self) -> CanvasBounds {
        self.bounds
    }

    #[must_use]
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    #[must_use]
    pub fn pixels_per_inch(&self) -> f64 {
        self.size.pixels_per_inch
    }

    /// Convert a pixel distance to inches.
    #[must_use]
    pub fn px_to_in(&self, px: f64) -> f64 {
        px / self.size.pixels_per_inch
    }

    /// Convert an inch distance to pixels.
    #[must_use]
    pub fn in_to_px(&self, inches: f64) -> f64 {
        inches * self.size.pixels_per_inch
    }

    /// Convert a canvas-local pixel position to slide inches.
    #[must_use]
    pub fn screen_to_slide(&self, screen: Point) -> Point {
        Point::new(self.px_to_in(screen.x), self.px_to_in(screen.y))
    }

    /// Convert a slide position in inches to canvas-local pixels.
    #[must_use]
    pub fn slide_to_screen(&self, slide: Point) -> Point {
        Point::new(self.in_to_px(slide.x), self.in_to_px(slide.y))
    }
}
