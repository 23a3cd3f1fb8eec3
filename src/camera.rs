//! Viewport pan and zoom, and conversion from screen to scene coordinates.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ZOOM, MIN_ZOOM};
use crate::geometry::Point;

/// Pan/zoom state of the viewport.
///
/// `pan` is in CSS pixels. `zoom` is a scale factor (1.0 = no zoom) kept
/// within [`MIN_ZOOM`]..=[`MAX_ZOOM`] so that pixel thresholds divided by it
/// stay finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCamera")]
pub struct Camera {
    pan: Point,
    zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan: Point::default(), zoom: 1.0 }
    }
}

impl Camera {
    /// Build a camera, clamping `zoom` into the supported range. A non-finite
    /// zoom falls back to 1.0.
    #[must_use]
    pub fn new(pan: Point, zoom: f64) -> Self {
        Self { pan, zoom: clamp_zoom(zoom) }
    }

    #[must_use]
    pub fn pan(&self) -> Point {
        self.pan
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    /// Convert a screen-space point (CSS pixels) to scene coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new((screen.x - self.pan.x) / self.zoom, (screen.y - self.pan.y) / self.zoom)
    }

    /// Convert a screen-space distance (pixels) to a scene-space distance.
    ///
    /// Pixel thresholds such as the binding proximity become tighter in scene
    /// units as the user zooms in.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }
}

/// Wire shape of [`Camera`]; deserialization goes through [`Camera::new`].
#[derive(Deserialize)]
struct RawCamera {
    pan: Point,
    zoom: f64,
}

impl From<RawCamera> for Camera {
    fn from(raw: RawCamera) -> Self {
        Self::new(raw.pan, raw.zoom)
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() { zoom.clamp(MIN_ZOOM, MAX_ZOOM) } else { 1.0 }
}
