//! Shared numeric constants for the canvas crate.

// ── Slide ───────────────────────────────────────────────────────

/// Physical slide width in inches.
pub const SLIDE_WIDTH_IN: f64 = 10.0;

/// Physical slide height in inches.
pub const SLIDE_HEIGHT_IN: f64 = 7.5;

/// Smallest width or height any element may have, in inches.
pub const MIN_DIM_IN: f64 = 0.5;

// ── Canvas sizing ───────────────────────────────────────────────

/// Readability floor for the rendered canvas width, in CSS pixels.
pub const DEFAULT_MIN_CANVAS_WIDTH_PX: f64 = 480.0;

/// Upper bound for the rendered canvas width on very large viewports.
pub const DEFAULT_MAX_CANVAS_WIDTH_PX: f64 = 1600.0;

/// Width reserved for the element palette on the left.
pub const DEFAULT_RESERVED_LEFT_PX: f64 = 320.0;

/// Width reserved for the property inspector on the right.
pub const DEFAULT_RESERVED_RIGHT_PX: f64 = 280.0;

/// Height reserved for the page header.
pub const DEFAULT_RESERVED_TOP_PX: f64 = 64.0;

/// Height reserved for the action bar below the canvas.
pub const DEFAULT_RESERVED_BOTTOM_PX: f64 = 96.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels around each corner handle.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Element defaults ────────────────────────────────────────────

/// Where the first user-added element lands, in inches.
pub const NEW_ELEMENT_ORIGIN_IN: (f64, f64) = (1.0, 2.0);

/// Cascade step applied per user element already on the slide.
pub const NEW_ELEMENT_CASCADE_IN: f64 = 0.25;

/// Default free-text box size in inches.
pub const FREE_TEXT_SIZE_IN: (f64, f64) = (3.0, 0.75);

/// Default extra-image box size in inches.
pub const EXTRA_IMAGE_SIZE_IN: (f64, f64) = (3.0, 2.25);

/// Default body text size in points.
pub const BODY_FONT_SIZE_PT: f64 = 14.0;

/// Default title text size in points.
pub const TITLE_FONT_SIZE_PT: f64 = 28.0;

/// Smallest accepted font size in points.
pub const MIN_FONT_SIZE_PT: f64 = 6.0;

/// Largest accepted font size in points.
pub const MAX_FONT_SIZE_PT: f64 = 144.0;

/// Default ink color for titles and free text.
pub const INK_COLOR: &str = "#1F1A17";

/// Default color for the description line.
pub const MUTED_INK_COLOR: &str = "#4A4540";
