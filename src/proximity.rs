//! Proximity detection: edge distance, fixed-point encoding, and binding
//! candidate search.
//!
//! Every function here is pure. Shapes are measured in their own unrotated
//! frame: the query point is rotated by `-angle` about the shape center first,
//! and results that are scene points are rotated back by `+angle`.
//!
//! The ellipse edge distance is an approximation. It measures from the query
//! point to the ellipse point at the same polar angle about the center, which
//! is not the nearest ellipse point when `rx != ry`. Binding thresholds are
//! tuned against this measure.

#[cfg(test)]
#[path = "proximity_test.rs"]
mod proximity_test;

use tracing::trace;

use crate::consts::{BINDING_PROXIMITY_PX, GEOMETRY_EPSILON};
use crate::doc::{ElementId, FixedPoint, Scene, Shape, ShapeKind};
use crate::geometry::{Point, distance_to_segment, ray_polygon_intersection, rotate_point};

/// A shape close enough to bind to, and where on it the endpoint would attach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoveredBinding {
    pub element_id: ElementId,
    pub fixed_point: FixedPoint,
}

// =============================================================
// Distance
// =============================================================

/// Distance from `point` to the outline of `shape`.
#[must_use]
pub fn distance_to_shape_edge(point: Point, shape: &Shape) -> f64 {
    let center = shape.center();
    let local = rotate_point(point, center, -shape.angle);
    match shape.kind {
        ShapeKind::Rectangle => distance_to_outline(local, &rectangle_vertices(shape)),
        ShapeKind::Diamond => distance_to_outline(local, &diamond_vertices(shape)),
        ShapeKind::Ellipse => {
            let rx = shape.width / 2.0;
            let ry = shape.height / 2.0;
            if rx == 0.0 || ry == 0.0 {
                return local.distance(center);
            }
            let offset = local - center;
            let theta = offset.y.atan2(offset.x);
            let edge = center + Point::new(rx * theta.cos(), ry * theta.sin());
            local.distance(edge)
        }
    }
}

fn distance_to_outline(point: Point, vertices: &[Point; 4]) -> f64 {
    (0..4)
        .map(|i| distance_to_segment(point, vertices[i], vertices[(i + 1) % 4]))
        .fold(f64::INFINITY, f64::min)
}

/// Corners of the unrotated bounding box, clockwise from top-left.
fn rectangle_vertices(shape: &Shape) -> [Point; 4] {
    let (x, y, w, h) = (shape.x, shape.y, shape.width, shape.height);
    [Point::new(x, y), Point::new(x + w, y), Point::new(x + w, y + h), Point::new(x, y + h)]
}

/// Bounding-box edge midpoints: top, right, bottom, left.
fn diamond_vertices(shape: &Shape) -> [Point; 4] {
    let c = shape.center();
    [
        Point::new(c.x, shape.y),
        Point::new(shape.x + shape.width, c.y),
        Point::new(c.x, shape.y + shape.height),
        Point::new(shape.x, c.y),
    ]
}

// =============================================================
// Fixed points
// =============================================================

/// Encode `point` as a ratio across the shape's unrotated bounding box,
/// clamped to `[0, 1]` on both axes.
#[must_use]
pub fn compute_fixed_point(point: Point, shape: &Shape) -> FixedPoint {
    let local = rotate_point(point, shape.center(), -shape.angle);
    let w = if shape.width == 0.0 { 1.0 } else { shape.width };
    let h = if shape.height == 0.0 { 1.0 } else { shape.height };
    FixedPoint::new((local.x - shape.x) / w, (local.y - shape.y) / h)
}

/// Scene position an endpoint bound at `fixed_point` should occupy: the shape
/// outline crossed by the ray from the center towards the fixed point, pushed
/// `gap` further out along that ray.
///
/// A fixed point at the exact center projects along +x.
#[must_use]
pub fn get_point_from_fixed_point(fixed_point: FixedPoint, shape: &Shape, gap: f64) -> Point {
    let center = shape.center();
    let target = Point::new(
        fixed_point.u().mul_add(shape.width, shape.x),
        fixed_point.v().mul_add(shape.height, shape.y),
    );
    let offset = target - center;
    let len = offset.length();
    let dir = if len <= GEOMETRY_EPSILON { Point::new(1.0, 0.0) } else { offset * (1.0 / len) };

    let edge = match shape.kind {
        ShapeKind::Rectangle => ray_polygon_intersection(center, dir, &rectangle_vertices(shape)).unwrap_or(center),
        ShapeKind::Diamond => ray_polygon_intersection(center, dir, &diamond_vertices(shape)).unwrap_or(center),
        ShapeKind::Ellipse => {
            let theta = dir.y.atan2(dir.x);
            center + Point::new(shape.width / 2.0 * theta.cos(), shape.height / 2.0 * theta.sin())
        }
    };

    rotate_point(edge + dir * gap, center, shape.angle)
}

// =============================================================
// Candidate search
// =============================================================

/// The closest live, bindable element whose edge is within the default
/// binding proximity (15 screen pixels) of `point` at `zoom`.
///
/// A non-positive zoom is treated as 1.
#[must_use]
pub fn get_hovered_element_for_binding(
    point: Point,
    scene: &Scene,
    zoom: f64,
    exclude_ids: &[ElementId],
) -> Option<HoveredBinding> {
    let zoom = if zoom > 0.0 { zoom } else { 1.0 };
    get_hovered_element_within(point, scene, BINDING_PROXIMITY_PX / zoom, exclude_ids)
}

/// The closest live, bindable element whose edge is within `threshold` scene
/// units of `point`, skipping `exclude_ids`.
///
/// Elements are scanned in document order and a later candidate replaces the
/// running best only when strictly closer, so the earliest element wins ties.
#[must_use]
pub fn get_hovered_element_within(
    point: Point,
    scene: &Scene,
    threshold: f64,
    exclude_ids: &[ElementId],
) -> Option<HoveredBinding> {
    let mut best: Option<(Shape, f64)> = None;
    for el in scene.elements() {
        if el.is_deleted || exclude_ids.contains(&el.id) {
            continue;
        }
        let Some(shape) = el.as_shape() else {
            continue;
        };
        let distance = distance_to_shape_edge(point, &shape);
        if distance > threshold {
            continue;
        }
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((shape, distance));
        }
    }

    let (shape, distance) = best?;
    trace!(element_id = %shape.id, distance, threshold, "binding candidate");
    Some(HoveredBinding { element_id: shape.id, fixed_point: compute_fixed_point(point, &shape) })
}
