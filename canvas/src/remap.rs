//! Map the feedback service's normalized error boxes back onto the drawing.
//!
//! The service sees only the cropped image and answers in a `0..=1000`
//! space relative to that crop. [`remap_with`] is the one place that turns a
//! [`NormalizedBox`] into a [`SurfaceBox`]: scale by the crop's size, then
//! translate by the crop's origin.

#[cfg(test)]
#[path = "remap_test.rs"]
mod remap_test;

use serde::{Deserialize, Serialize};

use crate::consts::NORMALIZED_EXTENT;
use crate::geometry::{Rect, scale_box};

/// Four coordinates in the service's `0..=1000` crop-relative space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedBox(pub [f64; 4]);

/// Absolute box in surface coordinates, as two corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl SurfaceBox {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    #[must_use]
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x1, self.y1, self.width(), self.height())
    }
}

/// One error reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedErrorRegion {
    pub box_2d: NormalizedBox,
    /// Older backend revisions call this `label`.
    #[serde(alias = "label", default)]
    pub error_text: String,
}

/// An error region placed on the drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemappedErrorRegion {
    pub bounds: SurfaceBox,
    pub text: String,
}

/// Coordinate order of `box_2d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxOrder {
    /// `[x1, y1, x2, y2]`.
    #[default]
    XyXy,
    /// `[ymin, xmin, ymax, xmax]`.
    YxYx,
}

impl BoxOrder {
    /// Reorder raw coordinates into `[x1, y1, x2, y2]`.
    #[must_use]
    pub fn to_xyxy(self, coords: [f64; 4]) -> [f64; 4] {
        match self {
            Self::XyXy => coords,
            Self::YxYx => {
                let [ymin, xmin, ymax, xmax] = coords;
                [xmin, ymin, xmax, ymax]
            }
        }
    }
}

impl std::str::FromStr for BoxOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xyxy" => Ok(Self::XyXy),
            "yxyx" => Ok(Self::YxYx),
            other => Err(format!("unknown box order: {other}")),
        }
    }
}

/// Remap `[x1, y1, x2, y2]` regions onto the surface.
#[must_use]
pub fn remap(regions: &[NormalizedErrorRegion], crop: Rect) -> Vec<RemappedErrorRegion> {
    remap_with(regions, crop, BoxOrder::XyXy)
}

/// Remap regions whose boxes use `order`.
///
/// Coordinates are clamped to `0..=1000` and corners are sorted, so the
/// result always has `x1 <= x2` and `y1 <= y2`. Non-finite coordinates
/// count as 0.
#[must_use]
pub fn remap_with(regions: &[NormalizedErrorRegion], crop: Rect, order: BoxOrder) -> Vec<RemappedErrorRegion> {
    let out: Vec<_> = regions
        .iter()
        .map(|region| {
            let [x1, y1, x2, y2] = order.to_xyxy(region.box_2d.0).map(clamp_normalized);
            let [sx1, sy1, sx2, sy2] =
                scale_box([x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2)], NORMALIZED_EXTENT, crop.width, crop.height);
            RemappedErrorRegion {
                bounds: SurfaceBox { x1: sx1 + crop.x, y1: sy1 + crop.y, x2: sx2 + crop.x, y2: sy2 + crop.y },
                text: region.error_text.clone(),
            }
        })
        .collect();
    tracing::debug!(count = out.len(), ?order, "remap: placed error regions");
    out
}

fn clamp_normalized(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, NORMALIZED_EXTENT) } else { 0.0 }
}
