//! Binding state: attach and detach arrow endpoints, keeping each arrow's
//! `start_binding`/`end_binding` in agreement with the scene's bound-element
//! table.
//!
//! DESIGN
//! ======
//! Every operation is total. Missing arrows, missing shapes, and endpoints that
//! are already unbound make the call a no-op that reports `false` (or `0`),
//! so cleanup can run speculatively after any edit.
//!
//! A shape's bound list holds one entry per arrow, not per endpoint. An arrow
//! bound at both ends to the same shape has a single entry, and that entry
//! stays until neither endpoint references the shape.

#[cfg(test)]
#[path = "binding_test.rs"]
mod binding_test;

use std::collections::HashMap;

use tracing::debug;

use crate::doc::{BoundElement, Element, ElementId, ElementKind, ElementPatch, Endpoint, FixedPoint, FixedPointBinding, Scene};

/// The element for `id` if it is a live rectangle, ellipse, or diamond.
#[must_use]
pub fn find_bindable_element<'a>(scene: &'a Scene, id: &ElementId) -> Option<&'a Element> {
    scene.get(id).filter(|el| !el.is_deleted && el.kind.is_bindable())
}

fn live_arrow<'a>(scene: &'a Scene, id: &ElementId) -> Option<&'a Element> {
    scene.get(id).filter(|el| !el.is_deleted && el.kind.is_arrow())
}

/// Bind one endpoint of `arrow_id` to `shape_id` at `fixed_point`.
///
/// Returns `false` without touching the scene when the arrow is missing or
/// deleted, or when the shape is not a live bindable element. Rebinding an
/// endpoint to a different shape drops the arrow from the old shape's bound
/// list unless its other endpoint still references that shape.
pub fn bind_arrow_to_element(
    scene: &mut Scene,
    arrow_id: &ElementId,
    endpoint: Endpoint,
    shape_id: &ElementId,
    fixed_point: FixedPoint,
) -> bool {
    let Some(arrow) = live_arrow(scene, arrow_id) else {
        return false;
    };
    if find_bindable_element(scene, shape_id).is_none() {
        return false;
    }

    let previous = arrow.binding(endpoint).map(|b| b.element_id);
    let other = arrow.binding(endpoint.other()).map(|b| b.element_id);
    if let Some(old) = previous
        && old != *shape_id
        && other != Some(old)
    {
        scene.remove_bound_element(&old, arrow_id);
    }

    let binding = FixedPointBinding { element_id: *shape_id, fixed_point };
    scene.mutate_element(arrow_id, &ElementPatch::binding(endpoint, Some(binding)));
    scene.add_bound_element(*shape_id, BoundElement { id: *arrow_id, kind: ElementKind::Arrow });
    debug!(%arrow_id, ?endpoint, %shape_id, u = fixed_point.u(), v = fixed_point.v(), "arrow bound");
    true
}

/// Clear one endpoint's binding and drop the arrow from the shape's bound list
/// when the other endpoint does not reference the same shape.
///
/// Returns `false` when the arrow is missing or the endpoint is already
/// unbound. A shape that no longer exists is tolerated.
pub fn unbind_arrow_endpoint(scene: &mut Scene, arrow_id: &ElementId, endpoint: Endpoint) -> bool {
    let Some(arrow) = scene.get(arrow_id) else {
        return false;
    };
    let Some(shape_id) = arrow.binding(endpoint).map(|b| b.element_id) else {
        return false;
    };
    let other_shares_shape = arrow
        .binding(endpoint.other())
        .is_some_and(|b| b.element_id == shape_id);

    scene.mutate_element(arrow_id, &ElementPatch::binding(endpoint, None));
    if !other_shares_shape {
        scene.remove_bound_element(&shape_id, arrow_id);
    }
    debug!(%arrow_id, ?endpoint, %shape_id, "arrow endpoint unbound");
    true
}

/// Unbind both endpoints of `arrow_id`. Returns how many were cleared.
pub fn unbind_arrow(scene: &mut Scene, arrow_id: &ElementId) -> usize {
    [Endpoint::Start, Endpoint::End]
        .into_iter()
        .filter(|&end| unbind_arrow_endpoint(scene, arrow_id, end))
        .count()
}

/// Clear every arrow binding that references `shape_id` and empty the shape's
/// bound list. Returns the number of endpoints cleared.
///
/// No-op when the bound list is already empty.
pub fn unbind_all_arrows_from_shape(scene: &mut Scene, shape_id: &ElementId) -> usize {
    if scene.bound_elements(shape_id).is_empty() {
        return 0;
    }
    let cleared = clear_bindings_to(scene, shape_id);
    debug!(%shape_id, cleared, "arrows unbound from shape");
    cleared
}

/// Clear every arrow endpoint bound to `shape_id`, scanning the whole scene
/// rather than trusting the bound list, then drop the shape's row.
fn clear_bindings_to(scene: &mut Scene, shape_id: &ElementId) -> usize {
    let targets: Vec<(ElementId, Endpoint)> = scene
        .elements()
        .filter(|el| el.kind.is_arrow() && el.is_bound_to(*shape_id))
        .flat_map(|el| {
            [Endpoint::Start, Endpoint::End]
                .into_iter()
                .filter(|&end| el.binding(end).is_some_and(|b| b.element_id == *shape_id))
                .map(|end| (el.id, end))
        })
        .collect();

    for (arrow_id, end) in &targets {
        scene.mutate_element(arrow_id, &ElementPatch::binding(*end, None));
    }
    scene.take_bound_elements(shape_id);
    targets.len()
}

/// Remove every binding that involves one of `deleted_ids`.
///
/// Deleted arrows release the shapes they were attached to, and arrows bound
/// to deleted shapes lose those bindings, whether or not the shape's bound
/// list knew about them. Ids that are not in the scene are ignored.
pub fn fix_bindings_after_deletion(scene: &mut Scene, deleted_ids: &[ElementId]) {
    let mut cleared = 0;
    for id in deleted_ids {
        let Some(kind) = scene.get(id).map(|el| el.kind) else {
            continue;
        };
        if kind.is_arrow() {
            cleared += unbind_arrow(scene, id);
        } else if kind.is_bindable() {
            cleared += clear_bindings_to(scene, id);
        }
    }
    debug!(deleted = deleted_ids.len(), cleared, "bindings fixed after deletion");
}

/// Repair bindings on freshly duplicated elements.
///
/// `id_map` maps each original id to its copy. A copied arrow whose target was
/// copied in the same batch is rebound to the copy at the same fixed point.
/// A copied arrow whose target was not copied loses that binding, so the
/// original shape never gains a back-reference it did not ask for. Copies of
/// shapes start with an empty bound list.
pub fn fix_bindings_after_duplication(scene: &mut Scene, id_map: &HashMap<ElementId, ElementId>) {
    let mut rebound = 0;
    let mut dropped = 0;
    for copy_id in id_map.values() {
        let Some(copy) = scene.get(copy_id) else {
            continue;
        };
        if !copy.kind.is_arrow() {
            continue;
        }
        let bindings = [Endpoint::Start, Endpoint::End].map(|end| (end, copy.binding(end).copied()));
        for (end, binding) in bindings {
            let Some(binding) = binding else {
                continue;
            };
            let retargeted = id_map
                .get(&binding.element_id)
                .is_some_and(|new_target| bind_arrow_to_element(scene, copy_id, end, new_target, binding.fixed_point));
            if retargeted {
                rebound += 1;
            } else {
                scene.mutate_element(copy_id, &ElementPatch::binding(end, None));
                dropped += 1;
            }
        }
    }
    debug!(copies = id_map.len(), rebound, dropped, "bindings fixed after duplication");
}
