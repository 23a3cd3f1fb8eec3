//! Shared numeric constants for the connectors crate.

// ── Binding ─────────────────────────────────────────────────────

/// Scene-unit gap left between a shape's edge and a bound arrow tip.
pub const BINDING_GAP: f64 = 5.0;

/// Screen-space distance in pixels within which an endpoint may bind to a shape edge.
pub const BINDING_PROXIMITY_PX: f64 = 15.0;

// ── Highlight ───────────────────────────────────────────────────

/// Screen-space padding in pixels between a shape and its suggested-binding outline.
pub const HIGHLIGHT_PADDING_PX: f64 = 6.0;

/// Screen-space stroke width in pixels of the suggested-binding outline.
pub const HIGHLIGHT_LINE_WIDTH_PX: f64 = 2.0;

// ── Numeric ─────────────────────────────────────────────────────

/// Tolerance for parallel-line and zero-length checks in scene units.
pub const GEOMETRY_EPSILON: f64 = 1e-9;

// ── Camera ──────────────────────────────────────────────────────

/// Smallest zoom factor the camera accepts.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest zoom factor the camera accepts.
pub const MAX_ZOOM: f64 = 30.0;
