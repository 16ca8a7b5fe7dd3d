//! Rectangle geometry in surface coordinates.
//!
//! Everything here is a pure function over plain values. Degenerate input
//! never fails: an empty stroke set has no bounding box (`None`), and
//! undersized rectangles are clamped rather than rejected.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::DEFAULT_BOUNDS_PADDING;
use crate::hit::Handle;
use crate::stroke::Stroke;

/// Axis-aligned rectangle in surface coordinates.
///
/// Used both for the derived bounding box and for the user's selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
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

    /// Rectangle spanning two corner points in any order.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self { x: a.x.min(b.x), y: a.y.min(b.y), width: (a.x - b.x).abs(), height: (a.y - b.y).abs() }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Copy shifted by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..*self }
    }

    /// Copy with negative extents flipped so `width` and `height` are non-negative.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self::from_corners(Point::new(self.x, self.y), Point::new(self.right(), self.bottom()))
    }

    /// Whether `p` lies inside or on the edge of the rectangle.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// All four fields are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Both extents are strictly positive.
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// How a bounding box is derived from ink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsPolicy {
    /// Margin added on every side of the ink, in surface units.
    pub padding: f64,
    /// When false, the origin is clamped to `(0, 0)` and the far edges are kept.
    pub allow_negative_origin: bool,
}

impl Default for BoundsPolicy {
    fn default() -> Self {
        Self { padding: DEFAULT_BOUNDS_PADDING, allow_negative_origin: true }
    }
}

/// Padded bounding box of every point of every stroke, or `None` without points.
#[must_use]
pub fn compute_bounding_box(strokes: &[Stroke], padding: f64) -> Option<Rect> {
    compute_bounding_box_with(strokes, &BoundsPolicy { padding, allow_negative_origin: true })
}

/// Bounding box under an explicit [`BoundsPolicy`]. Non-finite points are skipped.
#[must_use]
pub fn compute_bounding_box_with(strokes: &[Stroke], policy: &BoundsPolicy) -> Option<Rect> {
    let mut points = strokes
        .iter()
        .flat_map(|s| s.points.iter())
        .filter(|p| p.is_finite());
    let first = points.next()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    let pad = policy.padding;
    let mut rect = Rect::new(min_x - pad, min_y - pad, (max_x - min_x) + 2.0 * pad, (max_y - min_y) + 2.0 * pad);
    if !policy.allow_negative_origin {
        let (right, bottom) = (rect.right(), rect.bottom());
        rect.x = rect.x.max(0.0);
        rect.y = rect.y.max(0.0);
        rect.width = (right - rect.x).max(0.0);
        rect.height = (bottom - rect.y).max(0.0);
    }
    Some(rect)
}

/// Enforce a minimum size after the edges implied by `handle` were moved.
///
/// The edge opposite the dragged handle is the anchor and never moves; any
/// shortfall is absorbed by pulling the dragged edge back. An axis the handle
/// does not touch keeps its origin.
#[must_use]
pub fn clamp_min_size(rect: Rect, handle: Handle, min_w: f64, min_h: f64) -> Rect {
    let mut out = rect;
    if out.width < min_w {
        if handle.moves_left() {
            // Right edge is the anchor.
            out.x = rect.right() - min_w;
        }
        out.width = min_w;
    }
    if out.height < min_h {
        if handle.moves_top() {
            out.y = rect.bottom() - min_h;
        }
        out.height = min_h;
    }
    out
}

/// Grow a rectangle symmetrically about its center until it meets `min` on both axes.
#[must_use]
pub fn grow_to_min_size(rect: Rect, min: f64) -> Rect {
    let rect = rect.normalized();
    let center = rect.center();
    let width = rect.width.max(min);
    let height = rect.height.max(min);
    Rect::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
}

/// Scale `[x1, y1, x2, y2]` from a `[0, extent]` space onto a `width × height` space.
#[must_use]
pub fn scale_box(coords: [f64; 4], extent: f64, width: f64, height: f64) -> [f64; 4] {
    let [x1, y1, x2, y2] = coords;
    [x1 / extent * width, y1 / extent * height, x2 / extent * width, y2 / extent * height]
}
