//! Rendering: the suggested-binding highlight.
//!
//! Drawing goes through the [`Surface`] trait so the outline logic can run
//! against a recording surface in tests. The browser implementation forwards
//! to [`web_sys::CanvasRenderingContext2d`]; it is the only code in the crate
//! that touches the DOM.
//!
//! The caller sets up the scene transform (pan and zoom) before calling in.
//! Sizes here are in scene units, with pixel constants divided by `zoom` so
//! the outline keeps a constant on-screen thickness and offset.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use tracing::warn;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{HIGHLIGHT_LINE_WIDTH_PX, HIGHLIGHT_PADDING_PX};
use crate::doc::{Element, ElementId, ElementKind, Scene, Shape, ShapeKind};

/// Failure while drawing one highlight.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// An element kind that reached the outline switch without a drawing
    /// routine. Indicates a kind was added to the model but not here.
    #[error("no highlight outline for element kind {0:?}")]
    UnsupportedKind(ElementKind),
    /// The 2D context rejected a call.
    #[error("canvas call failed: {0}")]
    Canvas(String),
}

impl From<JsValue> for RenderError {
    fn from(value: JsValue) -> Self {
        Self::Canvas(format!("{value:?}"))
    }
}

/// The subset of a 2D drawing context the highlight needs.
pub trait Surface {
    fn save(&self);
    fn restore(&self);
    /// # Errors
    ///
    /// Returns `Err` if the context rejects the transform.
    fn translate(&self, x: f64, y: f64) -> Result<(), RenderError>;
    /// # Errors
    ///
    /// Returns `Err` if the context rejects the transform.
    fn rotate(&self, angle: f64) -> Result<(), RenderError>;
    fn set_stroke_style(&self, color: &str);
    fn set_line_width(&self, width: f64);
    fn begin_path(&self);
    fn move_to(&self, x: f64, y: f64);
    fn line_to(&self, x: f64, y: f64);
    fn close_path(&self);
    /// Full ellipse centered at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if either radius is negative.
    fn ellipse(&self, x: f64, y: f64, rx: f64, ry: f64) -> Result<(), RenderError>;
    fn stroke_rect(&self, x: f64, y: f64, w: f64, h: f64);
    fn stroke(&self);
}

impl Surface for CanvasRenderingContext2d {
    fn save(&self) {
        Self::save(self);
    }

    fn restore(&self) {
        Self::restore(self);
    }

    fn translate(&self, x: f64, y: f64) -> Result<(), RenderError> {
        Self::translate(self, x, y)?;
        Ok(())
    }

    fn rotate(&self, angle: f64) -> Result<(), RenderError> {
        Self::rotate(self, angle)?;
        Ok(())
    }

    fn set_stroke_style(&self, color: &str) {
        self.set_stroke_style_str(color);
    }

    fn set_line_width(&self, width: f64) {
        Self::set_line_width(self, width);
    }

    fn begin_path(&self) {
        Self::begin_path(self);
    }

    fn move_to(&self, x: f64, y: f64) {
        Self::move_to(self, x, y);
    }

    fn line_to(&self, x: f64, y: f64) {
        Self::line_to(self, x, y);
    }

    fn close_path(&self) {
        Self::close_path(self);
    }

    fn ellipse(&self, x: f64, y: f64, rx: f64, ry: f64) -> Result<(), RenderError> {
        Self::ellipse(self, x, y, rx, ry, 0.0, 0.0, 2.0 * PI)?;
        Ok(())
    }

    fn stroke_rect(&self, x: f64, y: f64, w: f64, h: f64) {
        Self::stroke_rect(self, x, y, w, h);
    }

    fn stroke(&self) {
        Self::stroke(self);
    }
}

/// Stroke the suggested-binding outline around `element`.
///
/// Arrows and text draw nothing. The outline sits `6 / zoom` scene units
/// outside the shape, `2 / zoom` wide, in the shape's rotated frame. A
/// non-positive zoom is treated as 1.
///
/// # Errors
///
/// Returns [`RenderError::UnsupportedKind`] for any other kind without an
/// outline, or [`RenderError::Canvas`] if the context fails. The context state
/// is restored either way.
pub fn render_suggested_binding<S: Surface + ?Sized>(
    surface: &S,
    element: &Element,
    zoom: f64,
    color: &str,
) -> Result<(), RenderError> {
    let shape = match element.kind {
        ElementKind::Arrow | ElementKind::Text => return Ok(()),
        ElementKind::Line => return Err(RenderError::UnsupportedKind(element.kind)),
        ElementKind::Rectangle | ElementKind::Ellipse | ElementKind::Diamond => {
            element.as_shape().ok_or(RenderError::UnsupportedKind(element.kind))?
        }
    };
    let zoom = if zoom > 0.0 { zoom } else { 1.0 };

    surface.save();
    let result = stroke_outline(surface, &shape, zoom, color);
    surface.restore();
    result
}

fn stroke_outline<S: Surface + ?Sized>(surface: &S, shape: &Shape, zoom: f64, color: &str) -> Result<(), RenderError> {
    let center = shape.center();
    surface.translate(center.x, center.y)?;
    surface.rotate(shape.angle)?;
    surface.set_stroke_style(color);
    surface.set_line_width(HIGHLIGHT_LINE_WIDTH_PX / zoom);

    let padding = HIGHLIGHT_PADDING_PX / zoom;
    let hw = shape.width / 2.0 + padding;
    let hh = shape.height / 2.0 + padding;
    match shape.kind {
        ShapeKind::Rectangle => surface.stroke_rect(-hw, -hh, hw * 2.0, hh * 2.0),
        ShapeKind::Ellipse => {
            surface.begin_path();
            surface.ellipse(0.0, 0.0, hw, hh)?;
            surface.stroke();
        }
        ShapeKind::Diamond => {
            surface.begin_path();
            surface.move_to(0.0, -hh); // top
            surface.line_to(hw, 0.0); // right
            surface.line_to(0.0, hh); // bottom
            surface.line_to(-hw, 0.0); // left
            surface.close_path();
            surface.stroke();
        }
    }
    Ok(())
}

/// Draw the highlight for each of `ids`, skipping ids that are missing or
/// deleted. An element that fails to draw is logged and skipped so the rest
/// still render. Returns how many rendered without error.
pub fn draw_suggested_bindings<S: Surface + ?Sized>(
    surface: &S,
    scene: &Scene,
    ids: &[ElementId],
    zoom: f64,
    color: &str,
) -> usize {
    let mut drawn = 0;
    for id in ids {
        let Some(element) = scene.get(id).filter(|el| !el.is_deleted) else {
            continue;
        };
        match render_suggested_binding(surface, element, zoom, color) {
            Ok(()) => drawn += 1,
            Err(e) => warn!(element_id = %id, error = %e, "skipping suggested binding highlight"),
        }
    }
    drawn
}
