#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_is_finite() {
    assert!(Point::new(1.0, -2.0).is_finite());
    assert!(!Point::new(f64::NAN, 0.0).is_finite());
    assert!(!Point::new(0.0, f64::INFINITY).is_finite());
}

#[test]
fn point_serde_shape() {
    let json = serde_json::to_value(Point::new(1.5, 2.0)).unwrap();
    assert_eq!(json, serde_json::json!({ "x": 1.5, "y": 2.0 }));
}

// --- Camera defaults ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
    assert_eq!(cam.zoom, 1.0);
}

#[test]
fn camera_scrolled_negates_scroll_offsets() {
    let cam = Camera::scrolled(120.0, 40.0, 1.0).unwrap();
    assert_eq!(cam.pan_x, -120.0);
    assert_eq!(cam.pan_y, -40.0);
}

#[test]
fn camera_scrolled_rejects_bad_zoom_and_offsets() {
    assert!(Camera::scrolled(0.0, 0.0, 0.0).is_none());
    assert!(Camera::scrolled(0.0, 0.0, -1.0).is_none());
    assert!(Camera::scrolled(0.0, 0.0, f64::NAN).is_none());
    assert!(Camera::scrolled(f64::INFINITY, 0.0, 1.0).is_none());
}

#[test]
fn camera_validity() {
    assert!(Camera::default().is_valid());
    assert!(!Camera { pan_x: 0.0, pan_y: 0.0, zoom: 0.0 }.is_valid());
}

// --- screen_to_surface ---

#[test]
fn screen_to_surface_identity() {
    let cam = Camera::default();
    let p = cam.screen_to_surface(Point::new(50.0, 75.0));
    assert!(point_approx_eq(p, Point::new(50.0, 75.0)));
}

#[test]
fn screen_to_surface_with_zoom() {
    let cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 4.0 };
    let p = cam.screen_to_surface(Point::new(40.0, 80.0));
    assert!(approx_eq(p.x, 10.0));
    assert!(approx_eq(p.y, 20.0));
}

#[test]
fn screen_to_surface_scrolled_viewport() {
    // Viewport scrolled 300px right and 100px down over a larger surface.
    let cam = Camera::scrolled(300.0, 100.0, 1.0).unwrap();
    let p = cam.screen_to_surface(Point::new(10.0, 10.0));
    assert!(point_approx_eq(p, Point::new(310.0, 110.0)));
}

#[test]
fn screen_to_surface_with_pan_and_zoom() {
    let cam = Camera { pan_x: 20.0, pan_y: 10.0, zoom: 2.0 };
    let p = cam.screen_to_surface(Point::new(20.0, 10.0));
    assert!(point_approx_eq(p, Point::new(0.0, 0.0)));
}

#[test]
fn screen_to_surface_scrolled_and_zoomed_out() {
    // Zoomed out to half size and scrolled 50px: screen 100 is surface (100 + 50) / 0.5.
    let cam = Camera::scrolled(50.0, 0.0, 0.5).unwrap();
    let p = cam.screen_to_surface(Point::new(100.0, 20.0));
    assert!(point_approx_eq(p, Point::new(300.0, 40.0)));
}

// --- screen_dist_to_surface ---

#[test]
fn screen_dist_to_surface_with_zoom() {
    let cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 2.0 };
    assert!(approx_eq(cam.screen_dist_to_surface(10.0), 5.0));
}

#[test]
fn screen_dist_to_surface_ignores_pan() {
    let cam = Camera { pan_x: 999.0, pan_y: -999.0, zoom: 4.0 };
    assert!(approx_eq(cam.screen_dist_to_surface(8.0), 2.0));
}
