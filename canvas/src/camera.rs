#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

/// A point in either viewport (screen) or surface space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite (not NaN or infinite).
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Where the drawing surface sits inside the browser viewport.
///
/// The surface is usually larger than the viewport and scrolled inside it.
/// `pan_x` / `pan_y` are the screen position of the surface origin in CSS
/// pixels (negative once scrolled right/down); `zoom` scales surface units
/// to CSS pixels. Pointer events arrive in screen space and go through
/// [`Camera::screen_to_surface`] before any hit-testing or gesture math.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Viewport scrolled by `(scroll_x, scroll_y)` CSS pixels at `zoom`.
    ///
    /// Returns `None` unless every input is finite and `zoom > 0`.
    #[must_use]
    pub fn scrolled(scroll_x: f64, scroll_y: f64, zoom: f64) -> Option<Self> {
        let camera = Self { pan_x: -scroll_x, pan_y: -scroll_y, zoom };
        camera.is_valid().then_some(camera)
    }

    /// Finite pan and a strictly positive finite zoom.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.pan_x.is_finite() && self.pan_y.is_finite() && self.zoom.is_finite() && self.zoom > 0.0
    }

    /// Map a pointer position (CSS pixels) onto the surface.
    #[must_use]
    pub fn screen_to_surface(&self, screen: Point) -> Point {
        Point::new((screen.x - self.pan_x) / self.zoom, (screen.y - self.pan_y) / self.zoom)
    }

    /// A length in CSS pixels, in surface units. Pan does not matter.
    #[must_use]
    pub fn screen_dist_to_surface(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }
}
