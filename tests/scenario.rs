//! End-to-end binding flows through the public API.
#![allow(clippy::float_cmp)]

use connectors::binding::{bind_arrow_to_element, unbind_all_arrows_from_shape};
use connectors::consts::BINDING_GAP;
use connectors::doc::{Element, ElementKind, ElementPatch, Endpoint, FixedPoint, Scene};
use connectors::engine::EngineCore;
use connectors::geometry::Point;
use connectors::proximity::{compute_fixed_point, get_hovered_element_for_binding};
use connectors::sync::update_bound_arrow_endpoints;

fn assert_near(actual: Point, expected: Point) {
    assert!(
        (actual.x - expected.x).abs() < 1e-9 && (actual.y - expected.y).abs() < 1e-9,
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn bound_start_follows_moved_rectangle() {
    let rect = Element::new(ElementKind::Rectangle, 0.0, 0.0, 100.0, 100.0);
    let arrow = Element::arrow(Point::new(105.0, 50.0), Point::new(300.0, 50.0));
    let (rect_id, arrow_id) = (rect.id, arrow.id);
    let mut scene = Scene::new();
    scene.load_snapshot(vec![rect, arrow]);

    assert!(bind_arrow_to_element(&mut scene, &arrow_id, Endpoint::Start, &rect_id, FixedPoint::new(1.0, 0.5)));
    scene.mutate_element(&rect_id, &ElementPatch { x: Some(50.0), y: Some(50.0), ..ElementPatch::default() });
    assert_eq!(update_bound_arrow_endpoints(&mut scene, &rect_id, BINDING_GAP), 1);

    let arrow = scene.get(&arrow_id).unwrap();
    assert_eq!(arrow.points[0], Point::new(0.0, 0.0));
    assert_near(arrow.scene_point(0).unwrap(), Point::new(155.0, 100.0));
    assert_near(arrow.scene_point(1).unwrap(), Point::new(300.0, 50.0));
}

#[test]
fn hover_then_bind_then_group_unbind() {
    let rect = Element::new(ElementKind::Rectangle, 0.0, 0.0, 100.0, 50.0);
    let a = Element::arrow(Point::new(200.0, 25.0), Point::new(300.0, 25.0));
    let b = Element::arrow(Point::new(200.0, 40.0), Point::new(300.0, 40.0));
    let (rect_id, a_id, b_id) = (rect.id, a.id, b.id);
    let mut scene = Scene::new();
    scene.load_snapshot(vec![rect, a, b]);

    let hit = get_hovered_element_for_binding(Point::new(110.0, 25.0), &scene, 1.0, &[a_id]).unwrap();
    assert_eq!(hit.element_id, rect_id);
    assert!(get_hovered_element_for_binding(Point::new(110.0, 25.0), &scene, 5.0, &[a_id]).is_none());

    bind_arrow_to_element(&mut scene, &a_id, Endpoint::Start, &rect_id, hit.fixed_point);
    bind_arrow_to_element(&mut scene, &a_id, Endpoint::Start, &rect_id, hit.fixed_point);
    bind_arrow_to_element(&mut scene, &b_id, Endpoint::End, &rect_id, FixedPoint::new(0.5, 1.0));
    assert_eq!(scene.bound_elements(&rect_id).len(), 2);

    assert_eq!(unbind_all_arrows_from_shape(&mut scene, &rect_id), 2);
    assert!(scene.bound_elements(&rect_id).is_empty());
    assert!(scene.get(&a_id).unwrap().start_binding.is_none());
    assert!(scene.get(&b_id).unwrap().end_binding.is_none());
    assert_eq!(unbind_all_arrows_from_shape(&mut scene, &rect_id), 0);
}

#[test]
fn snapshot_round_trip_rebuilds_back_references() {
    let mut core = EngineCore::new();
    let rect = Element::new(ElementKind::Ellipse, 0.0, 0.0, 100.0, 60.0);
    let arrow = Element::arrow(Point::new(200.0, 30.0), Point::new(400.0, 30.0));
    let (rect_id, arrow_id) = (rect.id, arrow.id);
    core.load_snapshot(vec![rect, arrow]);
    core.drag_endpoint(&arrow_id, Endpoint::Start, Point::new(108.0, 30.0));
    assert!(core.drop_endpoint(&arrow_id, Endpoint::Start));

    let json = serde_json::to_string(&core.scene.elements().cloned().collect::<Vec<_>>()).unwrap();
    let restored: Vec<Element> = serde_json::from_str(&json).unwrap();

    let mut other = EngineCore::new();
    other.load_snapshot(restored);
    assert_eq!(other.scene.bound_elements(&rect_id).len(), 1);
    assert_eq!(other.scene.bound_elements(&rect_id)[0].id, arrow_id);

    other.apply_update(&rect_id, &ElementPatch { x: Some(-100.0), ..ElementPatch::default() });
    let start = other.element(&arrow_id).unwrap().scene_point(0).unwrap();
    assert_near(start, Point::new(0.0 + BINDING_GAP, 30.0));
}

#[test]
fn fixed_point_clamps_far_points() {
    let rect = Element::new(ElementKind::Rectangle, 0.0, 0.0, 100.0, 100.0);
    let shape = rect.as_shape().unwrap();
    let fp = compute_fixed_point(Point::new(-50.0, 200.0), &shape);
    assert_eq!((fp.u(), fp.v()), (0.0, 1.0));
}
