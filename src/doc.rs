//! Document model: scene elements, bindings, and the in-memory scene store.
//!
//! This module defines what is on the canvas (`Element`, `ElementKind`), how an
//! arrow endpoint refers to the shape it is attached to (`FixedPointBinding`),
//! a sparse-update type for element edits (`ElementPatch`), and the runtime
//! store that owns all live elements (`Scene`).
//!
//! The back-reference from a shape to the arrows attached to it is not stored
//! on the shape. `Scene` keeps it in a relation table keyed by shape id, so
//! "which arrows are bound to X" is a single lookup and there is exactly one
//! place that can mutate it.
//!
//! Every write that other layers must observe goes through
//! [`Scene::mutate_element`], which bumps the element's `version` and records
//! the id for [`Scene::take_changed`].

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Point;

/// Unique identifier for a scene element.
pub type ElementId = Uuid;

/// The kind of a scene element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Rectangle filling its bounding box.
    Rectangle,
    /// Ellipse inscribed within the bounding box.
    Ellipse,
    /// Diamond (rhombus) with vertices at bounding-box edge midpoints.
    Diamond,
    /// Connector whose endpoints may bind to shapes.
    Arrow,
    /// Plain polyline. Never binds and is never a binding target.
    Line,
    /// Free-standing text.
    Text,
}

/// The closed set of element kinds an arrow can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Diamond,
}

impl ElementKind {
    /// The shape geometry for bindable kinds, `None` for everything else.
    #[must_use]
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Self::Rectangle => Some(ShapeKind::Rectangle),
            Self::Ellipse => Some(ShapeKind::Ellipse),
            Self::Diamond => Some(ShapeKind::Diamond),
            Self::Arrow | Self::Line | Self::Text => None,
        }
    }

    /// Whether an arrow endpoint may bind to elements of this kind.
    #[must_use]
    pub fn is_bindable(self) -> bool {
        self.shape_kind().is_some()
    }

    /// Whether elements of this kind carry bindings of their own.
    #[must_use]
    pub fn is_arrow(self) -> bool {
        self == Self::Arrow
    }
}

/// Which end of an arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    /// The opposite end of the same arrow.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// Attachment location as a ratio across a shape's unrotated bounding box.
///
/// Both components are clamped to `[0, 1]` on construction and on
/// deserialization. Non-finite input clamps to `0`. On the wire this is a
/// two-element array `[u, v]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct FixedPoint {
    u: f64,
    v: f64,
}

impl FixedPoint {
    #[must_use]
    pub fn new(u: f64, v: f64) -> Self {
        Self { u: clamp_unit(u), v: clamp_unit(v) }
    }

    #[must_use]
    pub fn u(self) -> f64 {
        self.u
    }

    #[must_use]
    pub fn v(self) -> f64 {
        self.v
    }
}

impl From<[f64; 2]> for FixedPoint {
    fn from([u, v]: [f64; 2]) -> Self {
        Self::new(u, v)
    }
}

impl From<FixedPoint> for [f64; 2] {
    fn from(fp: FixedPoint) -> Self {
        [fp.u, fp.v]
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// One arrow endpoint's attachment to a shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedPointBinding {
    /// The shape this endpoint is attached to.
    pub element_id: ElementId,
    /// Where on the shape the endpoint is attached.
    pub fixed_point: FixedPoint,
}

/// One entry of a shape's bound-element list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundElement {
    pub id: ElementId,
    pub kind: ElementKind,
}

/// A scene element as stored in the scene and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier for this element.
    pub id: ElementId,
    /// Shape, connector, or text.
    pub kind: ElementKind,
    /// Left edge of the bounding box in scene coordinates.
    pub x: f64,
    /// Top edge of the bounding box in scene coordinates.
    pub y: f64,
    /// Width of the bounding box in scene units.
    pub width: f64,
    /// Height of the bounding box in scene units.
    pub height: f64,
    /// Rotation in radians around the bounding-box center.
    pub angle: f64,
    /// Offsets from `(x, y)` for arrows and lines; the first point is `(0, 0)`.
    /// Empty for every other kind.
    #[serde(default)]
    pub points: Vec<Point>,
    /// Attachment of the first point, arrows only.
    #[serde(default)]
    pub start_binding: Option<FixedPointBinding>,
    /// Attachment of the last point, arrows only.
    #[serde(default)]
    pub end_binding: Option<FixedPointBinding>,
    /// Soft-deletion flag. Deleted elements stay in the scene for undo.
    #[serde(default)]
    pub is_deleted: bool,
    /// Monotonically increasing edit counter, bumped by [`Scene::mutate_element`].
    #[serde(default)]
    pub version: i64,
}

impl Element {
    /// A shape-style element with the given bounding box.
    #[must_use]
    pub fn new(kind: ElementKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            x,
            y,
            width,
            height,
            angle: 0.0,
            points: Vec::new(),
            start_binding: None,
            end_binding: None,
            is_deleted: false,
            version: 1,
        }
    }

    /// An unbound arrow from scene point `start` to scene point `end`.
    #[must_use]
    pub fn arrow(start: Point, end: Point) -> Self {
        let delta = end - start;
        Self {
            width: delta.x.abs(),
            height: delta.y.abs(),
            points: vec![Point::default(), delta],
            ..Self::new(ElementKind::Arrow, start.x, start.y, 0.0, 0.0)
        }
    }

    /// Center of the unrotated bounding box.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// The binding stored for `endpoint`.
    #[must_use]
    pub fn binding(&self, endpoint: Endpoint) -> Option<&FixedPointBinding> {
        match endpoint {
            Endpoint::Start => self.start_binding.as_ref(),
            Endpoint::End => self.end_binding.as_ref(),
        }
    }

    /// Whether either endpoint is bound to `shape_id`.
    #[must_use]
    pub fn is_bound_to(&self, shape_id: ElementId) -> bool {
        [Endpoint::Start, Endpoint::End]
            .into_iter()
            .any(|end| self.binding(end).is_some_and(|b| b.element_id == shape_id))
    }

    /// Scene position of the point at `index`.
    #[must_use]
    pub fn scene_point(&self, index: usize) -> Option<Point> {
        self.points
            .get(index)
            .map(|p| Point::new(self.x + p.x, self.y + p.y))
    }
}

/// Geometry of a bindable element, detached from the element itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub id: ElementId,
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
}

impl Shape {
    /// Center of the unrotated bounding box; the pivot of `angle`.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

impl Element {
    /// This element's shape geometry, if it is a bindable kind.
    #[must_use]
    pub fn as_shape(&self) -> Option<Shape> {
        let kind = self.kind.shape_kind()?;
        Some(Shape {
            id: self.id,
            kind,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            angle: self.angle,
        })
    }
}

/// Sparse update for an element. Only present fields are applied.
///
/// Binding fields are doubly optional: `Some(None)` clears the binding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub angle: Option<f64>,
    pub points: Option<Vec<Point>>,
    pub start_binding: Option<Option<FixedPointBinding>>,
    pub end_binding: Option<Option<FixedPointBinding>>,
    pub is_deleted: Option<bool>,
}

impl ElementPatch {
    /// A patch that sets (or clears) the binding of one endpoint.
    #[must_use]
    pub fn binding(endpoint: Endpoint, binding: Option<FixedPointBinding>) -> Self {
        match endpoint {
            Endpoint::Start => Self { start_binding: Some(binding), ..Self::default() },
            Endpoint::End => Self { end_binding: Some(binding), ..Self::default() },
        }
    }

    fn apply(&self, el: &mut Element) {
        if let Some(x) = self.x {
            el.x = x;
        }
        if let Some(y) = self.y {
            el.y = y;
        }
        if let Some(w) = self.width {
            el.width = w.max(0.0);
        }
        if let Some(h) = self.height {
            el.height = h.max(0.0);
        }
        if let Some(a) = self.angle {
            el.angle = a;
        }
        if let Some(ref points) = self.points {
            el.points.clone_from(points);
        }
        if let Some(b) = self.start_binding {
            el.start_binding = b;
        }
        if let Some(b) = self.end_binding {
            el.end_binding = b;
        }
        if let Some(d) = self.is_deleted {
            el.is_deleted = d;
        }
    }
}

/// In-memory store of scene elements.
///
/// Elements are kept in document order (insertion order), which is the scan
/// order for proximity search and therefore its tie-break order.
#[derive(Debug, Default)]
pub struct Scene {
    elements: HashMap<ElementId, Element>,
    order: Vec<ElementId>,
    bound: HashMap<ElementId, Vec<BoundElement>>,
    changed: Vec<ElementId>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an element. A replaced element keeps its position in
    /// document order and its old bindings are dropped from the bound-element
    /// table. The new element's bindings are not registered here; see
    /// [`Scene::register_bindings`].
    pub fn insert(&mut self, element: Element) {
        let id = element.id;
        let Some(previous) = self.elements.insert(id, element) else {
            self.order.push(id);
            return;
        };
        for end in [Endpoint::Start, Endpoint::End] {
            if let Some(b) = previous.binding(end) {
                self.remove_bound_element(&b.element_id, &id);
            }
        }
    }

    /// Remove an element by id, returning it if it was present. Its own row in
    /// the bound-element table goes with it; references held by other
    /// elements are left for the binding layer to clean up.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let removed = self.elements.remove(id)?;
        self.order.retain(|o| o != id);
        self.bound.remove(id);
        Some(removed)
    }

    /// Return a reference to an element by id.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Iterate all elements (deleted ones included) in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Replace all elements with a full snapshot and rebuild the bound-element
    /// table from the arrows' bindings.
    ///
    /// Bindings of live arrows that point at missing, deleted, or unbindable
    /// elements are dropped so the hydrated scene has no dangling references.
    pub fn load_snapshot(&mut self, elements: Vec<Element>) {
        self.elements.clear();
        self.order.clear();
        self.bound.clear();
        self.changed.clear();
        for el in elements {
            self.insert(el);
        }

        let arrows: Vec<ElementId> = self
            .elements()
            .filter(|el| el.kind.is_arrow() && !el.is_deleted)
            .map(|el| el.id)
            .collect();
        for arrow_id in arrows {
            self.register_bindings(&arrow_id);
        }
    }

    /// Add back-references for the bindings an arrow arrived with.
    ///
    /// Bindings that point at missing, deleted, or unbindable elements are
    /// dropped in place without a version bump, since they were never valid in
    /// this scene.
    pub(crate) fn register_bindings(&mut self, arrow_id: &ElementId) {
        for end in [Endpoint::Start, Endpoint::End] {
            let Some(target) = self.get(arrow_id).and_then(|a| a.binding(end)).map(|b| b.element_id) else {
                continue;
            };
            let valid = self.get(&target).is_some_and(|t| !t.is_deleted && t.kind.is_bindable());
            if valid {
                self.add_bound_element(target, BoundElement { id: *arrow_id, kind: ElementKind::Arrow });
            } else if let Some(arrow) = self.elements.get_mut(arrow_id) {
                match end {
                    Endpoint::Start => arrow.start_binding = None,
                    Endpoint::End => arrow.end_binding = None,
                }
            }
        }
    }

    /// Apply a partial update, bump the element's version, and record it as
    /// changed. Returns false if the element doesn't exist.
    pub fn mutate_element(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let Some(el) = self.elements.get_mut(id) else {
            return false;
        };
        patch.apply(el);
        el.version += 1;
        if !self.changed.contains(id) {
            self.changed.push(*id);
        }
        true
    }

    /// Drain the ids changed through [`Scene::mutate_element`] since the last
    /// call, in first-change order.
    pub fn take_changed(&mut self) -> Vec<ElementId> {
        std::mem::take(&mut self.changed)
    }

    /// Arrows currently attached to `shape_id`, in attachment order.
    #[must_use]
    pub fn bound_elements(&self, shape_id: &ElementId) -> &[BoundElement] {
        self.bound.get(shape_id).map_or(&[], Vec::as_slice)
    }

    /// Append `entry` to the shape's bound list unless its id is already
    /// present. Returns whether it was added.
    pub(crate) fn add_bound_element(&mut self, shape_id: ElementId, entry: BoundElement) -> bool {
        let row = self.bound.entry(shape_id).or_default();
        if row.iter().any(|b| b.id == entry.id) {
            return false;
        }
        row.push(entry);
        true
    }

    /// Remove `element_id` from the shape's bound list. Returns whether an
    /// entry was removed.
    pub(crate) fn remove_bound_element(&mut self, shape_id: &ElementId, element_id: &ElementId) -> bool {
        let Some(row) = self.bound.get_mut(shape_id) else {
            return false;
        };
        let before = row.len();
        row.retain(|b| b.id != *element_id);
        let removed = row.len() != before;
        if row.is_empty() {
            self.bound.remove(shape_id);
        }
        removed
    }

    /// Empty the shape's bound list, returning what it held.
    pub(crate) fn take_bound_elements(&mut self, shape_id: &ElementId) -> Vec<BoundElement> {
        self.bound.remove(shape_id).unwrap_or_default()
    }

    /// Number of elements currently in the scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the scene contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
