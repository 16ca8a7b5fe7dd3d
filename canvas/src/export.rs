//! Cropped PNG export of a surface region.
//!
//! The surface is always rendered in full at its logical size, never from
//! what a viewport currently shows, so a crop taken while the page is
//! scrolled or zoomed still lines up with the stroke coordinates. The crop
//! is then copied onto a transparent target exactly the size of the
//! selection; any part of the selection outside the surface stays
//! transparent.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use image::RgbaImage;
use image::imageops::overlay;

use crate::geometry::Rect;
use crate::consts::MAX_RASTER_PIXELS;
use crate::render::{RenderError, decode_png, encode_png, fits_raster_budget};
use crate::surface::DrawingSurface;

/// Export failures. A failed export never yields a partial image.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("surface has zero size")]
    EmptySurface,
    #[error("invalid export rectangle: {0:?}")]
    InvalidRect(Rect),
    #[error("{width}x{height} raster exceeds the {max}-pixel limit")]
    TooLarge { width: u32, height: u32, max: u64 },
    #[error("raster is {actual_w}x{actual_h}, surface is {expected_w}x{expected_h}")]
    SizeMismatch { expected_w: u32, expected_h: u32, actual_w: u32, actual_h: u32 },
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
}

/// A cropped PNG and the surface rectangle it was cut from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportResult {
    /// PNG bytes.
    pub image: Vec<u8>,
    /// Exactly the rectangle passed to [`export_region`].
    pub bounds: Rect,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Crop `rect` out of the full-resolution raster of `surface`.
///
/// # Errors
///
/// See [`ExportError`].
pub fn export_region(surface: &dyn DrawingSurface, rect: Rect) -> Result<ExportResult, ExportError> {
    let (surface_w, surface_h) = surface.size();
    if surface_w == 0 || surface_h == 0 {
        return Err(ExportError::EmptySurface);
    }
    if !rect.is_finite() || !rect.has_area() {
        return Err(ExportError::InvalidRect(rect));
    }
    let (pixel_width, pixel_height) = pixel_size(rect).ok_or(ExportError::InvalidRect(rect))?;
    // Both rasters are checked before either is allocated.
    for (width, height) in [(surface_w, surface_h), (pixel_width, pixel_height)] {
        if !fits_raster_budget(width, height) {
            return Err(ExportError::TooLarge { width, height, max: MAX_RASTER_PIXELS });
        }
    }

    let full = decode_png(&surface.export_full_raster()?)?;
    if full.dimensions() != (surface_w, surface_h) {
        let (actual_w, actual_h) = full.dimensions();
        return Err(ExportError::SizeMismatch { expected_w: surface_w, expected_h: surface_h, actual_w, actual_h });
    }

    let mut target = RgbaImage::new(pixel_width, pixel_height);
    // Shift the source so the rect's origin lands on the target's (0, 0).
    #[allow(clippy::cast_possible_truncation)]
    let (dx, dy) = (-(rect.x.round() as i64), -(rect.y.round() as i64));
    overlay(&mut target, &full, dx, dy);
    let image = encode_png(&target)?;

    tracing::debug!(
        x = rect.x,
        y = rect.y,
        pixel_width,
        pixel_height,
        bytes = image.len(),
        "export: cropped region"
    );
    Ok(ExportResult { image, bounds: rect, pixel_width, pixel_height })
}

/// Whole-pixel size of `rect`, or `None` if it rounds to nothing or overflows.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixel_size(rect: Rect) -> Option<(u32, u32)> {
    let w = rect.width.round();
    let h = rect.height.round();
    let max = f64::from(u32::MAX);
    if w < 1.0 || h < 1.0 || w > max || h > max {
        return None;
    }
    Some((w as u32, h as u32))
}
