//! Ink canvas core for handwriting feedback.
//!
//! This crate owns everything between the user's strokes and the pixels that
//! are sent for analysis: the stroke model, bounding-box geometry, the
//! selection gesture state machine, cropped raster export, and the mapping of
//! the feedback service's normalized error boxes back onto the drawing. It
//! has no async code and performs no network I/O; the `feedback` crate drives
//! it through the [`surface::DrawingSurface`] capability.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`stroke`] | Strokes, styles, and the undoable stroke store |
//! | [`geometry`] | Rectangles, bounding boxes, min-size clamping, box scaling |
//! | [`camera`] | Points and the viewport pan/zoom transform |
//! | [`hit`] | Resize-handle hit-testing against the selection |
//! | [`selection`] | Selection rectangle gesture state machine |
//! | [`render`] | Stroke rasterization and error-overlay drawing |
//! | [`surface`] | Drawing-surface capability and the reference `InkSurface` |
//! | [`export`] | Cropped PNG export of a surface region |
//! | [`remap`] | Normalized error boxes → surface coordinates |
//! | [`consts`] | Shared numeric constants (padding, minimum sizes, etc.) |

pub mod camera;
pub mod consts;
pub mod export;
pub mod geometry;
pub mod hit;
pub mod remap;
pub mod render;
pub mod selection;
pub mod stroke;
pub mod surface;
