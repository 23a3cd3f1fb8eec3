#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Construction ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.pan(), Point::new(0.0, 0.0));
    assert_eq!(cam.zoom(), 1.0);
}

#[test]
fn camera_new_clamps_zoom_low() {
    let cam = Camera::new(Point::default(), 0.001);
    assert_eq!(cam.zoom(), MIN_ZOOM);
}

#[test]
fn camera_new_clamps_zoom_high() {
    let cam = Camera::new(Point::default(), 1000.0);
    assert_eq!(cam.zoom(), MAX_ZOOM);
}

#[test]
fn camera_non_finite_zoom_resets_to_one() {
    assert_eq!(Camera::new(Point::default(), f64::NAN).zoom(), 1.0);
    assert_eq!(Camera::new(Point::default(), f64::INFINITY).zoom(), 1.0);
}

#[test]
fn camera_zero_zoom_never_divides_by_zero() {
    let cam = Camera::new(Point::default(), 0.0);
    assert!(cam.screen_dist_to_world(15.0).is_finite());
}

#[test]
fn camera_setters() {
    let mut cam = Camera::default();
    cam.set_pan(Point::new(10.0, -5.0));
    cam.set_zoom(2.5);
    assert_eq!(cam.pan(), Point::new(10.0, -5.0));
    assert_eq!(cam.zoom(), 2.5);
    cam.set_zoom(-3.0);
    assert_eq!(cam.zoom(), MIN_ZOOM);
}

// --- screen_to_world ---

#[test]
fn screen_to_world_identity() {
    let cam = Camera::default();
    let world = cam.screen_to_world(Point::new(50.0, 75.0));
    assert!(point_approx_eq(world, Point::new(50.0, 75.0)));
}

#[test]
fn screen_to_world_with_zoom() {
    let cam = Camera::new(Point::default(), 4.0);
    let world = cam.screen_to_world(Point::new(40.0, 80.0));
    assert!(point_approx_eq(world, Point::new(10.0, 20.0)));
}

#[test]
fn screen_to_world_with_pan_and_zoom() {
    let cam = Camera::new(Point::new(50.0, 30.0), 2.0);
    let world = cam.screen_to_world(Point::new(0.0, 0.0));
    assert!(point_approx_eq(world, Point::new(-25.0, -15.0)));
}

// --- screen_dist_to_world ---

#[test]
fn screen_dist_to_world_identity_at_zoom_one() {
    assert!(approx_eq(Camera::default().screen_dist_to_world(15.0), 15.0));
}

#[test]
fn screen_dist_to_world_tightens_when_zoomed_in() {
    let cam = Camera::new(Point::default(), 5.0);
    assert!(approx_eq(cam.screen_dist_to_world(15.0), 3.0));
}

#[test]
fn screen_dist_to_world_widens_when_zoomed_out() {
    let cam = Camera::new(Point::default(), 0.5);
    assert!(approx_eq(cam.screen_dist_to_world(15.0), 30.0));
}

#[test]
fn screen_dist_to_world_ignores_pan() {
    let cam = Camera::new(Point::new(999.0, -999.0), 4.0);
    assert!(approx_eq(cam.screen_dist_to_world(8.0), 2.0));
}

// --- serde ---

#[test]
fn camera_serde_roundtrip() {
    let cam = Camera::new(Point::new(3.0, 4.0), 2.0);
    let json = serde_json::to_string(&cam).unwrap();
    let back: Camera = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cam);
}

#[test]
fn camera_deserialize_clamps_zoom() {
    let cam: Camera = serde_json::from_str(r#"{"pan":{"x":0.0,"y":0.0},"zoom":0.0}"#).unwrap();
    assert_eq!(cam.zoom(), MIN_ZOOM);
}
