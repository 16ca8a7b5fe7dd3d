#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, Point};
use crate::consts::HANDLE_RADIUS_PX;
use crate::geometry::Rect;

/// Compass position of a selection resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl Handle {
    /// All handles, clockwise from north.
    pub const ALL: [Handle; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// Dragging this handle moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    /// Dragging this handle moves the right edge.
    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    /// Dragging this handle moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    /// Dragging this handle moves the bottom edge.
    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }

    /// Handle that drags the corner nearest `to`, as seen from `from`.
    #[must_use]
    pub fn toward(from: Point, to: Point) -> Self {
        match (to.x < from.x, to.y < from.y) {
            (true, true) => Self::Nw,
            (true, false) => Self::Sw,
            (false, true) => Self::Ne,
            (false, false) => Self::Se,
        }
    }

    /// Position of this handle on `rect`.
    #[must_use]
    pub fn position(self, rect: &Rect) -> Point {
        let cx = rect.x + rect.width / 2.0;
        let cy = rect.y + rect.height / 2.0;
        match self {
            Self::N => Point::new(cx, rect.y),
            Self::Ne => Point::new(rect.right(), rect.y),
            Self::E => Point::new(rect.right(), cy),
            Self::Se => Point::new(rect.right(), rect.bottom()),
            Self::S => Point::new(cx, rect.bottom()),
            Self::Sw => Point::new(rect.x, rect.bottom()),
            Self::W => Point::new(rect.x, cy),
            Self::Nw => Point::new(rect.x, rect.y),
        }
    }

    /// CSS cursor name for hovering this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }
}

/// Which part of the selection was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    Handle(Handle),
}

/// Test what part of `rect` (if any) is under `surface_pt`.
///
/// Handles win over the body; corners win over edge midpoints. The handle
/// radius is constant in screen pixels, so it shrinks in surface units as the
/// viewport zooms in.
#[must_use]
pub fn hit_test(surface_pt: Point, rect: &Rect, camera: &Camera) -> Option<HitPart> {
    if !surface_pt.is_finite() {
        return None;
    }
    let radius = camera.screen_dist_to_surface(HANDLE_RADIUS_PX);
    let corners = [Handle::Nw, Handle::Ne, Handle::Se, Handle::Sw];
    let edges = [Handle::N, Handle::E, Handle::S, Handle::W];
    for handle in corners.into_iter().chain(edges) {
        let p = handle.position(rect);
        if (surface_pt.x - p.x).abs() <= radius && (surface_pt.y - p.y).abs() <= radius {
            return Some(HitPart::Handle(handle));
        }
    }
    rect.contains(surface_pt).then_some(HitPart::Body)
}
