//! Engine facade: wires proximity, binding, sync, and highlight rendering into
//! the arrow-endpoint drag flow.
//!
//! DESIGN
//! ======
//! The host feeds document changes (`apply_*`) and endpoint drag events
//! (`drag_endpoint`, `drop_endpoint`). While an endpoint is dragged the engine
//! holds at most one [`SuggestedBinding`]; each drag event recomputes it from
//! scratch and replaces the previous one. Dropping commits the suggestion or,
//! without one, releases the endpoint.
//!
//! Every write lands in [`Scene`] through `mutate_element`, so the host can
//! drain [`EngineCore::take_changed`] after any call to learn which elements
//! need persisting and repainting. Undo grouping is the host's concern.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashMap;

use tracing::debug;
use web_sys::CanvasRenderingContext2d;

use crate::binding::{
    bind_arrow_to_element, fix_bindings_after_deletion, fix_bindings_after_duplication, unbind_arrow_endpoint,
};
use crate::camera::Camera;
use crate::config::{BindingConfig, ConfigError};
use crate::doc::{Element, ElementId, ElementPatch, Endpoint, FixedPoint, Scene};
use crate::geometry::Point;
use crate::proximity::get_hovered_element_within;
use crate::render::{RenderError, Surface, render_suggested_binding};
use crate::sync::{update_arrow_bindings, update_arrow_endpoint, update_bound_arrow_endpoints};
use crate::theme::{Theme, resolve_highlight_color};

/// The shape an in-flight endpoint drag would bind to if dropped now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuggestedBinding {
    pub arrow_id: ElementId,
    pub endpoint: Endpoint,
    pub element_id: ElementId,
    pub fixed_point: FixedPoint,
}

/// Core engine state. Independent of the browser so it can be tested natively.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub scene: Scene,
    pub camera: Camera,
    pub theme: Theme,
    config: BindingConfig,
    suggestion: Option<SuggestedBinding>,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Configuration ---

    /// Replace the binding configuration.
    ///
    /// # Errors
    ///
    /// Returns the validation error and keeps the previous config if `config`
    /// is out of range.
    pub fn set_config(&mut self, config: BindingConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if !config.binding_enabled {
            self.suggestion = None;
        }
        self.config = config;
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// Current highlight stroke color.
    #[must_use]
    pub fn highlight_color(&self) -> String {
        resolve_highlight_color(self.theme, self.config.highlight_color.as_deref())
    }

    // --- Data inputs ---

    /// Hydrate the scene from a full snapshot.
    pub fn load_snapshot(&mut self, elements: Vec<Element>) {
        self.suggestion = None;
        self.scene.load_snapshot(elements);
        debug!(count = self.scene.len(), "scene snapshot loaded");
    }

    /// Add a new element. An arrow that arrives already bound is registered
    /// with its target shapes.
    pub fn apply_create(&mut self, element: Element) {
        let id = element.id;
        let is_arrow = element.kind.is_arrow() && !element.is_deleted;
        self.scene.insert(element);
        if is_arrow {
            self.scene.register_bindings(&id);
        }
    }

    /// Apply a partial update.
    ///
    /// Binding fields are routed through the binding layer so back-references
    /// stay consistent. When a bindable shape moves, resizes, or rotates, every
    /// arrow bound to it is resynced. When a bound arrow itself moves, its bound
    /// endpoints are put back on their shapes. Setting `is_deleted` runs
    /// deletion cleanup. Returns false if the element doesn't exist.
    pub fn apply_update(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let Some(kind) = self.scene.get(id).map(|el| el.kind) else {
            return false;
        };

        let plain = ElementPatch { start_binding: None, end_binding: None, ..patch.clone() };
        if plain != ElementPatch::default() {
            self.scene.mutate_element(id, &plain);
        }

        for (end, change) in [(Endpoint::Start, patch.start_binding), (Endpoint::End, patch.end_binding)] {
            match change {
                Some(Some(b)) => {
                    bind_arrow_to_element(&mut self.scene, id, end, &b.element_id, b.fixed_point);
                }
                Some(None) => {
                    unbind_arrow_endpoint(&mut self.scene, id, end);
                }
                None => {}
            }
        }

        if patch.is_deleted == Some(true) {
            self.after_delete(id);
            return true;
        }

        let transformed = patch.x.is_some()
            || patch.y.is_some()
            || patch.width.is_some()
            || patch.height.is_some()
            || patch.angle.is_some();
        if kind.is_bindable() && transformed {
            let moved = update_bound_arrow_endpoints(&mut self.scene, id, self.config.gap);
            debug!(shape_id = %id, moved, "bound arrows resynced");
        }

        let arrow_moved = patch.x.is_some() || patch.y.is_some() || patch.points.is_some();
        if kind.is_arrow() && arrow_moved {
            let moved = update_arrow_bindings(&mut self.scene, id, self.config.gap);
            debug!(%id, moved, "arrow endpoints reseated on their shapes");
        }
        true
    }

    /// Soft-delete an element and release every binding that involves it.
    /// Returns false if the element doesn't exist.
    pub fn apply_delete(&mut self, id: &ElementId) -> bool {
        let patch = ElementPatch { is_deleted: Some(true), ..ElementPatch::default() };
        if !self.scene.mutate_element(id, &patch) {
            return false;
        }
        self.after_delete(id);
        true
    }

    /// Insert duplicated elements and repair their bindings.
    ///
    /// `id_map` maps each original id to its copy's id. Copies should arrive
    /// with the originals' binding fields; see
    /// [`fix_bindings_after_duplication`] for how they are retargeted.
    pub fn apply_duplicate(&mut self, copies: Vec<Element>, id_map: &HashMap<ElementId, ElementId>) {
        for copy in copies {
            self.scene.insert(copy);
        }
        fix_bindings_after_duplication(&mut self.scene, id_map);
    }

    fn after_delete(&mut self, id: &ElementId) {
        fix_bindings_after_deletion(&mut self.scene, &[*id]);
        if self
            .suggestion
            .is_some_and(|s| s.arrow_id == *id || s.element_id == *id)
        {
            self.suggestion = None;
        }
    }

    // --- Endpoint drag ---

    /// Re-run proximity detection for an endpoint being dragged to
    /// `screen_pt` and store the result as the current suggestion.
    ///
    /// The dragged arrow never suggests itself. Returns `None` when binding is
    /// disabled, the arrow is not live, or no shape is close enough.
    pub fn drag_endpoint(&mut self, arrow_id: &ElementId, endpoint: Endpoint, screen_pt: Point) -> Option<SuggestedBinding> {
        self.suggestion = None;
        if !self.config.binding_enabled {
            return None;
        }
        if self
            .scene
            .get(arrow_id)
            .is_none_or(|el| !el.kind.is_arrow() || el.is_deleted)
        {
            return None;
        }

        let world = self.camera.screen_to_world(screen_pt);
        let threshold = self.camera.screen_dist_to_world(self.config.proximity_px);
        let hovered = get_hovered_element_within(world, &self.scene, threshold, &[*arrow_id])?;

        let suggestion = SuggestedBinding {
            arrow_id: *arrow_id,
            endpoint,
            element_id: hovered.element_id,
            fixed_point: hovered.fixed_point,
        };
        self.suggestion = Some(suggestion);
        Some(suggestion)
    }

    /// Finish an endpoint drag.
    ///
    /// With a suggestion for this endpoint, binds it and snaps the endpoint to
    /// the shape's edge. Otherwise unbinds the endpoint. The suggestion is
    /// cleared either way. Returns whether the endpoint ended up bound.
    pub fn drop_endpoint(&mut self, arrow_id: &ElementId, endpoint: Endpoint) -> bool {
        let suggestion = self
            .suggestion
            .take()
            .filter(|s| s.arrow_id == *arrow_id && s.endpoint == endpoint);

        if let Some(s) = suggestion
            && bind_arrow_to_element(&mut self.scene, arrow_id, endpoint, &s.element_id, s.fixed_point)
        {
            update_arrow_endpoint(&mut self.scene, arrow_id, endpoint, &s.element_id, self.config.gap);
            debug!(%arrow_id, ?endpoint, shape_id = %s.element_id, "binding committed");
            return true;
        }

        if unbind_arrow_endpoint(&mut self.scene, arrow_id, endpoint) {
            debug!(%arrow_id, ?endpoint, "binding cleared on drop");
        }
        false
    }

    /// Abandon an endpoint drag without changing bindings.
    pub fn cancel_drag(&mut self) {
        self.suggestion = None;
    }

    // --- Rendering ---

    /// Draw the current suggestion's highlight, if any.
    ///
    /// # Errors
    ///
    /// Propagates [`RenderError`] from the renderer.
    pub fn render_suggestion<S: Surface + ?Sized>(&self, surface: &S) -> Result<(), RenderError> {
        let Some(element) = self.suggestion.and_then(|s| self.scene.get(&s.element_id)) else {
            return Ok(());
        };
        render_suggested_binding(surface, element, self.camera.zoom(), &self.highlight_color())
    }

    // --- Queries ---

    #[must_use]
    pub fn suggestion(&self) -> Option<SuggestedBinding> {
        self.suggestion
    }

    /// Look up an element by id.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.scene.get(id)
    }

    /// Drain ids changed since the last call.
    pub fn take_changed(&mut self) -> Vec<ElementId> {
        self.scene.take_changed()
    }
}

/// Browser engine: [`EngineCore`] plus the 2D context it paints highlights on.
pub struct Engine {
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
}

impl Engine {
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx, core: EngineCore::new() }
    }

    /// Paint the suggestion highlight onto the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a canvas call fails or the suggested element has no
    /// outline.
    pub fn render(&self) -> Result<(), RenderError> {
        self.core.render_suggestion(&self.ctx)
    }
}
