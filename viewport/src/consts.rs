//! Shared numeric constants for the viewport crate.

// ── Default view ────────────────────────────────────────────────

/// Fractal-space x coordinate of the initial viewport center.
pub const DEFAULT_CENTER_X: f64 = -0.637_011;

/// Fractal-space y coordinate of the initial viewport center.
pub const DEFAULT_CENTER_Y: f64 = -0.039_515_9;

/// Initial fractal units per pixel.
pub const DEFAULT_SCALE: f64 = 0.004_038_97;

// ── Input steps ─────────────────────────────────────────────────

/// Scale multiplier for one zoom-in step (< 1 shrinks the visible region).
pub const ZOOM_IN_FACTOR: f64 = 0.8;

/// Scale multiplier for one zoom-out step.
pub const ZOOM_OUT_FACTOR: f64 = 1.0 / ZOOM_IN_FACTOR;

/// Pixels scrolled per arrow-key press.
pub const SCROLL_STEP: i32 = 20;

/// Wheel rotation, in degrees, that corresponds to one zoom step.
pub const WHEEL_DEGREES_PER_STEP: f64 = 15.0;

/// Raw wheel deltas are reported in eighths of a degree.
pub const WHEEL_UNITS_PER_DEGREE: f64 = 8.0;

// ── Presentation ────────────────────────────────────────────────

/// Shown until the first raster arrives.
pub const PLACEHOLDER_TEXT: &str = "Rendering initial image, please wait...";
