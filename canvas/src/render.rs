//! Rasterization: strokes to PNG, and error regions over a PNG.
//!
//! Drawing goes through a `tiny_skia::Pixmap`; PNG encode/decode goes
//! through the `image` crate. Pixmap storage is premultiplied RGBA, so every
//! crossing between the two converts explicitly rather than copying bytes.
//!
//! Ink is drawn as round-capped polylines at the stroke's width. A stroke with
//! a single point becomes a filled dot. Eraser strokes paint the canvas
//! background color over whatever is beneath them.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use tiny_skia::{
    Color, ColorU8, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Rect as SkRect, Stroke as SkStroke, Transform,
};

use crate::consts::{
    CANVAS_BACKGROUND, MAX_RASTER_PIXELS, OVERLAY_FILL_RGBA, OVERLAY_STROKE_RGBA, OVERLAY_STROKE_WIDTH,
};
use crate::remap::RemappedErrorRegion;
use crate::stroke::{Stroke, Tool};

/// Errors from rasterizing or re-encoding an image.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("cannot allocate a {width}x{height} pixmap")]
    Allocate { width: u32, height: u32 },
    #[error("invalid color: {0}")]
    InvalidColor(String),
    #[error("png encode failed: {0}")]
    Encode(String),
    #[error("png decode failed: {0}")]
    Decode(String),
}

/// RGBA color parsed from `#RGB`, `#RRGGBB`, or `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba8(pub [u8; 4]);

impl Rgba8 {
    /// Parse a CSS hex color. The leading `#` is optional.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidColor`] for anything that is not 3, 6,
    /// or 8 hex digits.
    pub fn parse(s: &str) -> Result<Self, RenderError> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || RenderError::InvalidColor(s.to_owned());
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&hex[i..=i].repeat(2), 16).map_err(|_| invalid());
                Ok(Self([nibble(0)?, nibble(1)?, nibble(2)?, 255]))
            }
            6 => Ok(Self([byte(0)?, byte(2)?, byte(4)?, 255])),
            8 => Ok(Self([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
            _ => Err(invalid()),
        }
    }

    fn paint(self) -> Paint<'static> {
        let [r, g, b, a] = self.0;
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;
        paint
    }
}

// =============================================================
// Strokes
// =============================================================

/// `width × height` is within [`MAX_RASTER_PIXELS`].
#[must_use]
pub fn fits_raster_budget(width: u32, height: u32) -> bool {
    u64::from(width) * u64::from(height) <= MAX_RASTER_PIXELS
}

/// Rasterize `strokes` onto a white `width × height` canvas and encode as PNG.
///
/// # Errors
///
/// Fails if the pixmap cannot be allocated (zero or oversized dimensions),
/// a stroke color does not parse, or PNG encoding fails.
pub fn render_strokes(width: u32, height: u32, strokes: &[Stroke]) -> Result<Vec<u8>, RenderError> {
    if !fits_raster_budget(width, height) {
        return Err(RenderError::Allocate { width, height });
    }
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Allocate { width, height })?;
    let background = Rgba8::parse(CANVAS_BACKGROUND)?;
    let [r, g, b, a] = background.0;
    pixmap.fill(Color::from_rgba8(r, g, b, a));

    for stroke in strokes {
        let color = match stroke.style.tool {
            Tool::Pen => Rgba8::parse(&stroke.style.color)?,
            Tool::Eraser => background,
        };
        draw_stroke(&mut pixmap, stroke, &color.paint());
    }

    encode_png(&pixmap_to_image(&pixmap))
}

#[allow(clippy::cast_possible_truncation)]
fn draw_stroke(pixmap: &mut Pixmap, stroke: &Stroke, paint: &Paint<'_>) {
    let width = stroke.style.width.max(0.0) as f32;
    let mut points = stroke.points.iter().filter(|p| p.is_finite());
    let Some(first) = points.next() else {
        return;
    };

    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    let mut is_dot = true;
    for p in points {
        pb.line_to(p.x as f32, p.y as f32);
        is_dot = false;
    }

    if is_dot {
        // A tap: tiny-skia drops zero-length paths, so draw the dot directly.
        if let Some(dot) = PathBuilder::from_circle(first.x as f32, first.y as f32, width / 2.0) {
            pixmap.fill_path(&dot, paint, FillRule::Winding, Transform::identity(), None);
        }
        return;
    }

    let Some(path) = pb.finish() else {
        return;
    };
    let sk_stroke = SkStroke { width, line_cap: LineCap::Round, line_join: LineJoin::Round, ..SkStroke::default() };
    pixmap.stroke_path(&path, paint, &sk_stroke, Transform::identity(), None);
}

// =============================================================
// Error overlay
// =============================================================

/// Draw each region as a translucent red box with a border on top of `png`.
///
/// Regions are in the image's own pixel space; parts outside it are clipped.
///
/// # Errors
///
/// Fails if `png` does not decode or the result cannot be encoded.
#[allow(clippy::cast_possible_truncation)]
pub fn draw_regions(png: &[u8], regions: &[RemappedErrorRegion]) -> Result<Vec<u8>, RenderError> {
    let base = decode_png(png)?;
    let mut pixmap = image_to_pixmap(&base)?;

    let fill = Rgba8(OVERLAY_FILL_RGBA).paint();
    let border = Rgba8(OVERLAY_STROKE_RGBA).paint();
    let sk_stroke = SkStroke { width: OVERLAY_STROKE_WIDTH, ..SkStroke::default() };

    for region in regions {
        let b = region.bounds;
        let rect = b
            .to_rect()
            .has_area()
            .then(|| SkRect::from_ltrb(b.x1 as f32, b.y1 as f32, b.x2 as f32, b.y2 as f32))
            .flatten();
        let Some(rect) = rect else {
            tracing::debug!(text = %region.text, "render: skipping degenerate region");
            continue;
        };
        pixmap.fill_rect(rect, &fill, Transform::identity(), None);
        let outline = PathBuilder::from_rect(rect);
        pixmap.stroke_path(&outline, &border, &sk_stroke, Transform::identity(), None);
    }

    encode_png(&pixmap_to_image(&pixmap))
}

// =============================================================
// Conversions
// =============================================================

/// Encode an RGBA image as PNG bytes.
///
/// # Errors
///
/// Returns [`RenderError::Encode`] if the encoder fails.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Decode PNG bytes to an RGBA image.
///
/// # Errors
///
/// Returns [`RenderError::Decode`] if the bytes are not a valid PNG.
pub fn decode_png(png: &[u8]) -> Result<RgbaImage, RenderError> {
    image::load_from_memory_with_format(png, ImageFormat::Png)
        .map(|img| img.to_rgba8())
        .map_err(|e| RenderError::Decode(e.to_string()))
}

fn image_to_pixmap(image: &RgbaImage) -> Result<Pixmap, RenderError> {
    let (width, height) = image.dimensions();
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Allocate { width, height })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

fn pixmap_to_image(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image
}
