#![allow(clippy::float_cmp)]

use std::f64::consts::{FRAC_PI_2, PI};

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// =============================================================
// Point
// =============================================================

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_default_is_origin() {
    assert_eq!(Point::default(), Point::new(0.0, 0.0));
}

#[test]
fn point_distance_and_length() {
    assert!(approx_eq(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0));
    assert!(approx_eq(Point::new(-3.0, 4.0).length(), 5.0));
}

#[test]
fn point_arithmetic() {
    let a = Point::new(1.0, 2.0);
    let b = Point::new(3.0, 5.0);
    assert_eq!(a + b, Point::new(4.0, 7.0));
    assert_eq!(b - a, Point::new(2.0, 3.0));
    assert_eq!(a * 2.0, Point::new(2.0, 4.0));
}

#[test]
fn point_cross_and_dot() {
    let x = Point::new(1.0, 0.0);
    let y = Point::new(0.0, 1.0);
    assert_eq!(x.cross(y), 1.0);
    assert_eq!(y.cross(x), -1.0);
    assert_eq!(x.dot(y), 0.0);
}

#[test]
fn point_serde_shape() {
    let json = serde_json::to_value(Point::new(1.5, -2.0)).unwrap();
    assert_eq!(json, serde_json::json!({ "x": 1.5, "y": -2.0 }));
}

// =============================================================
// rotate_point
// =============================================================

#[test]
fn rotate_zero_is_identity() {
    let p = Point::new(7.0, -3.0);
    assert_eq!(rotate_point(p, Point::new(1.0, 1.0), 0.0), p);
}

#[test]
fn rotate_quarter_turn_about_origin() {
    let r = rotate_point(Point::new(1.0, 0.0), Point::default(), FRAC_PI_2);
    assert!(point_approx_eq(r, Point::new(0.0, 1.0)));
}

#[test]
fn rotate_half_turn_about_center() {
    let r = rotate_point(Point::new(100.0, 50.0), Point::new(50.0, 50.0), PI);
    assert!(point_approx_eq(r, Point::new(0.0, 50.0)));
}

#[test]
fn rotate_then_unrotate_roundtrips() {
    let c = Point::new(12.0, 34.0);
    let p = Point::new(-5.0, 80.0);
    let back = rotate_point(rotate_point(p, c, 0.7), c, -0.7);
    assert!(point_approx_eq(back, p));
}

#[test]
fn rotate_center_is_fixed() {
    let c = Point::new(12.0, 34.0);
    assert!(point_approx_eq(rotate_point(c, c, 1.3), c));
}

// =============================================================
// distance_to_segment
// =============================================================

#[test]
fn segment_distance_perpendicular() {
    let d = distance_to_segment(Point::new(5.0, 3.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    assert!(approx_eq(d, 3.0));
}

#[test]
fn segment_distance_past_endpoint_uses_endpoint() {
    let d = distance_to_segment(Point::new(13.0, 4.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    assert!(approx_eq(d, 5.0));
}

#[test]
fn segment_distance_degenerate_segment() {
    let a = Point::new(2.0, 2.0);
    let d = distance_to_segment(Point::new(5.0, 6.0), a, a);
    assert!(approx_eq(d, 5.0));
}

// =============================================================
// Ray intersection
// =============================================================

#[test]
fn ray_hits_segment_ahead() {
    let t = ray_segment_intersection(
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(10.0, -5.0),
        Point::new(10.0, 5.0),
    );
    assert!(approx_eq(t.unwrap(), 10.0));
}

#[test]
fn ray_misses_segment_behind() {
    let t = ray_segment_intersection(
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(-10.0, -5.0),
        Point::new(-10.0, 5.0),
    );
    assert!(t.is_none());
}

#[test]
fn ray_parallel_to_segment_misses() {
    let t = ray_segment_intersection(
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(0.0, 1.0),
        Point::new(10.0, 1.0),
    );
    assert!(t.is_none());
}

#[test]
fn ray_polygon_exits_square() {
    let square = [
        Point::new(-1.0, -1.0),
        Point::new(1.0, -1.0),
        Point::new(1.0, 1.0),
        Point::new(-1.0, 1.0),
    ];
    let hit = ray_polygon_intersection(Point::default(), Point::new(0.0, 1.0), &square).unwrap();
    assert!(point_approx_eq(hit, Point::new(0.0, 1.0)));
}

#[test]
fn ray_polygon_through_corner() {
    let square = [
        Point::new(-1.0, -1.0),
        Point::new(1.0, -1.0),
        Point::new(1.0, 1.0),
        Point::new(-1.0, 1.0),
    ];
    let dir = Point::new(1.0, 1.0) * (1.0 / 2.0_f64.sqrt());
    let hit = ray_polygon_intersection(Point::default(), dir, &square).unwrap();
    assert!(point_approx_eq(hit, Point::new(1.0, 1.0)));
}

#[test]
fn ray_polygon_empty_is_none() {
    assert!(ray_polygon_intersection(Point::default(), Point::new(1.0, 0.0), &[]).is_none());
}

// =============================================================
// Point lists
// =============================================================

#[test]
fn normalize_points_already_normalized() {
    let pts = [Point::new(0.0, 0.0), Point::new(10.0, 5.0)];
    let (origin, out) = normalize_points(3.0, 4.0, &pts);
    assert_eq!(origin, Point::new(3.0, 4.0));
    assert_eq!(out, pts.to_vec());
}

#[test]
fn normalize_points_shifts_origin_and_points() {
    let pts = [Point::new(5.0, -2.0), Point::new(15.0, 3.0), Point::new(0.0, 0.0)];
    let (origin, out) = normalize_points(100.0, 100.0, &pts);
    assert_eq!(origin, Point::new(105.0, 98.0));
    assert_eq!(out, vec![Point::new(0.0, 0.0), Point::new(10.0, 5.0), Point::new(-5.0, 2.0)]);
}

#[test]
fn normalize_points_preserves_scene_positions() {
    let pts = [Point::new(5.0, -2.0), Point::new(15.0, 3.0)];
    let (origin, out) = normalize_points(100.0, 100.0, &pts);
    for (before, after) in pts.iter().zip(&out) {
        assert_eq!(Point::new(100.0, 100.0) + *before, origin + *after);
    }
}

#[test]
fn normalize_points_empty() {
    let (origin, out) = normalize_points(1.0, 2.0, &[]);
    assert_eq!(origin, Point::new(1.0, 2.0));
    assert!(out.is_empty());
}

#[test]
fn dimensions_from_points() {
    let pts = [Point::new(0.0, 0.0), Point::new(-10.0, 20.0), Point::new(30.0, 5.0)];
    assert_eq!(compute_dimensions_from_points(&pts), (40.0, 20.0));
}

#[test]
fn dimensions_from_single_and_empty() {
    assert_eq!(compute_dimensions_from_points(&[Point::new(4.0, 4.0)]), (0.0, 0.0));
    assert_eq!(compute_dimensions_from_points(&[]), (0.0, 0.0));
}
