//! Plane geometry shared by the proximity, synchronizer, and render layers.
//!
//! All angles are radians and rotation is rigid (no shear). Points are scene
//! coordinates unless a function says otherwise.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::consts::GEOMETRY_EPSILON;

/// A point (or offset) in scene space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Length of this point treated as a vector from the origin.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// 2D cross product (z component of the 3D cross product).
    #[must_use]
    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Rotate `point` about `center` by `angle` radians (positive is clockwise in
/// screen space, where +y points down).
#[must_use]
pub fn rotate_point(point: Point, center: Point, angle: f64) -> Point {
    if angle == 0.0 {
        return point;
    }
    let (sin, cos) = angle.sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(
        dx.mul_add(cos, -dy * sin) + center.x,
        dx.mul_add(sin, dy * cos) + center.y,
    )
}

/// Shortest distance from `p` to the segment `a`–`b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.dot(ab);
    if len2 <= GEOMETRY_EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Parameter `t >= 0` at which the ray `origin + t * dir` crosses the segment
/// `a`–`b`, or `None` when the ray misses or runs parallel to it.
#[must_use]
pub fn ray_segment_intersection(origin: Point, dir: Point, a: Point, b: Point) -> Option<f64> {
    let edge = b - a;
    let denom = dir.cross(edge);
    if denom.abs() <= GEOMETRY_EPSILON {
        return None;
    }
    let w = a - origin;
    let t = w.cross(edge) / denom;
    let s = w.cross(dir) / denom;
    let on_segment = (-GEOMETRY_EPSILON..=1.0 + GEOMETRY_EPSILON).contains(&s);
    (t >= -GEOMETRY_EPSILON && on_segment).then_some(t.max(0.0))
}

/// Nearest crossing of the ray `origin + t * dir` with the closed polygon
/// `vertices`, as a point. `None` if no edge is crossed.
#[must_use]
pub fn ray_polygon_intersection(origin: Point, dir: Point, vertices: &[Point]) -> Option<Point> {
    let n = vertices.len();
    (0..n)
        .filter_map(|i| ray_segment_intersection(origin, dir, vertices[i], vertices[(i + 1) % n]))
        .min_by(f64::total_cmp)
        .map(|t| origin + dir * t)
}

/// Shift a point list so its first point sits at the origin.
///
/// Returns the new element origin together with the translated points. The
/// scene position of every point is unchanged. An empty list is returned as is.
#[must_use]
pub fn normalize_points(x: f64, y: f64, points: &[Point]) -> (Point, Vec<Point>) {
    let Some(&first) = points.first() else {
        return (Point::new(x, y), Vec::new());
    };
    let shifted = points.iter().map(|&p| p - first).collect();
    (Point::new(x + first.x, y + first.y), shifted)
}

/// Width and height of the axis-aligned bounding box of `points`.
#[must_use]
pub fn compute_dimensions_from_points(points: &[Point]) -> (f64, f64) {
    let Some(&first) = points.first() else {
        return (0.0, 0.0);
    };
    let (min, max) = points.iter().fold((first, first), |(min, max), p| {
        (
            Point::new(min.x.min(p.x), min.y.min(p.y)),
            Point::new(max.x.max(p.x), max.y.max(p.y)),
        )
    });
    (max.x - min.x, max.y - min.y)
}
