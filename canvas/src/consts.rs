//! Shared numeric constants for the canvas crate.

// ── Bounding boxes ──────────────────────────────────────────────

/// Padding added around the ink when deriving a bounding box, in surface units.
pub const DEFAULT_BOUNDS_PADDING: f64 = 20.0;

// ── Selection ───────────────────────────────────────────────────

/// Smallest width/height a selection rectangle may shrink to, in surface units.
pub const MIN_SELECTION_SIZE: f64 = 20.0;

/// A rubber-band draw that moves less than this on both axes is treated as a click.
pub const CLICK_SLOP: f64 = 5.0;

/// Screen-space hit slop in pixels for selection handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Rasters ─────────────────────────────────────────────────────

/// Largest raster, in pixels, the crate will allocate for a surface or a crop.
/// 8192 × 8192 RGBA is 256 MiB.
pub const MAX_RASTER_PIXELS: u64 = 8192 * 8192;

// ── Feedback service ────────────────────────────────────────────

/// Upper bound of the feedback service's normalized coordinate space.
pub const NORMALIZED_EXTENT: f64 = 1000.0;

// ── Ink ─────────────────────────────────────────────────────────

/// Default pen width in surface units.
pub const DEFAULT_PEN_WIDTH: f64 = 4.0;

/// Default eraser width in surface units.
pub const DEFAULT_ERASER_WIDTH: f64 = 15.0;

/// Default pen color.
pub const DEFAULT_PEN_COLOR: &str = "#000000";

/// Canvas background. Eraser strokes paint with this color.
pub const CANVAS_BACKGROUND: &str = "#FFFFFF";

// ── Overlay ─────────────────────────────────────────────────────

/// Error-region fill: red at 30% opacity.
pub const OVERLAY_FILL_RGBA: [u8; 4] = [239, 68, 68, 77];

/// Error-region border: red at 80% opacity.
pub const OVERLAY_STROKE_RGBA: [u8; 4] = [239, 68, 68, 204];

/// Error-region border width in surface units.
pub const OVERLAY_STROKE_WIDTH: f32 = 2.0;
