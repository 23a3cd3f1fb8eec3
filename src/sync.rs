//! Keep bound arrow endpoints glued to their shapes.
//!
//! Call these after a shape's transform is committed for the frame. Each
//! update rewrites the arrow's point list in canonical form (point 0 at the
//! origin) and commits `x`, `y`, `points`, `width`, and `height` through a
//! single [`Scene::mutate_element`] call. Bindings themselves are never
//! changed here.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use tracing::trace;

use crate::binding::find_bindable_element;
use crate::doc::{ElementId, ElementPatch, Endpoint, Scene};
use crate::geometry::{Point, compute_dimensions_from_points, normalize_points};
use crate::proximity::get_point_from_fixed_point;

/// Move one endpoint of `arrow_id` onto `target_id` at its stored fixed point.
///
/// Returns `false` (and leaves the scene alone) when the arrow is missing, the
/// endpoint is unbound, or `target_id` is not a shape. The target is the caller's
/// choice; it need not be the shape named in the binding.
pub fn update_arrow_endpoint(
    scene: &mut Scene,
    arrow_id: &ElementId,
    endpoint: Endpoint,
    target_id: &ElementId,
    gap: f64,
) -> bool {
    let Some(arrow) = scene.get(arrow_id) else {
        return false;
    };
    let Some(binding) = arrow.binding(endpoint) else {
        return false;
    };
    let Some(shape) = scene.get(target_id).and_then(|el| el.as_shape()) else {
        return false;
    };

    let scene_point = get_point_from_fixed_point(binding.fixed_point, &shape, gap);
    let offset = Point::new(scene_point.x - arrow.x, scene_point.y - arrow.y);

    let mut points = arrow.points.clone();
    let index = match endpoint {
        Endpoint::Start => 0,
        Endpoint::End => points.len().saturating_sub(1),
    };
    match points.get_mut(index) {
        Some(p) => *p = offset,
        None => points.push(offset),
    }

    let (origin, points) = normalize_points(arrow.x, arrow.y, &points);
    let (width, height) = compute_dimensions_from_points(&points);
    let patch = ElementPatch {
        x: Some(origin.x),
        y: Some(origin.y),
        width: Some(width),
        height: Some(height),
        points: Some(points),
        ..ElementPatch::default()
    };
    trace!(%arrow_id, ?endpoint, %target_id, x = scene_point.x, y = scene_point.y, "arrow endpoint synced");
    scene.mutate_element(arrow_id, &patch)
}

/// Re-seat every arrow endpoint bound to `shape_id`. Returns how many
/// endpoints moved.
///
/// No-op when the shape is not bindable or nothing is bound to it. An arrow
/// bound at both ends to this shape has both ends updated.
pub fn update_bound_arrow_endpoints(scene: &mut Scene, shape_id: &ElementId, gap: f64) -> usize {
    if scene.get(shape_id).is_none_or(|el| !el.kind.is_bindable()) {
        return 0;
    }
    let arrow_ids: Vec<ElementId> = scene.bound_elements(shape_id).iter().map(|b| b.id).collect();

    let mut updated = 0;
    for arrow_id in &arrow_ids {
        for end in [Endpoint::Start, Endpoint::End] {
            let bound_here = scene
                .get(arrow_id)
                .and_then(|a| a.binding(end))
                .is_some_and(|b| b.element_id == *shape_id);
            if bound_here && update_arrow_endpoint(scene, arrow_id, end, shape_id, gap) {
                updated += 1;
            }
        }
    }
    updated
}

/// Re-seat both endpoints of `arrow_id` against the shapes their bindings
/// name. Endpoints whose target is gone or deleted are skipped. Returns how
/// many endpoints moved.
pub fn update_arrow_bindings(scene: &mut Scene, arrow_id: &ElementId, gap: f64) -> usize {
    let mut updated = 0;
    for end in [Endpoint::Start, Endpoint::End] {
        let target = scene
            .get(arrow_id)
            .and_then(|a| a.binding(end))
            .map(|b| b.element_id)
            .filter(|id| find_bindable_element(scene, id).is_some());
        if let Some(target) = target
            && update_arrow_endpoint(scene, arrow_id, end, &target, gap)
        {
            updated += 1;
        }
    }
    updated
}
