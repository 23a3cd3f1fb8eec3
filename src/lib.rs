//! Arrow-to-shape binding engine for the whiteboard canvas.
//!
//! An arrow endpoint dragged near a rectangle, ellipse, or diamond is offered
//! a binding (highlighted on the canvas); dropping it there attaches the
//! endpoint at a size-independent ratio across the shape's bounding box.
//! Whenever the shape later moves, resizes, or rotates, the arrow's endpoint
//! is recomputed so it stays glued just outside the shape's edge.
//!
//! The crate is compiled to WebAssembly for the browser and natively for
//! tests. It is synchronous and single-threaded; the host calls in from its
//! pointer-event handlers and owns undo, persistence, and the paint loop.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Drag/drop flow over [`engine::EngineCore`], plus the browser [`engine::Engine`] |
//! | [`doc`] | Element model and the [`doc::Scene`] store with its bound-element table |
//! | [`proximity`] | Edge distance, fixed-point encoding, binding candidate search |
//! | [`binding`] | Bind/unbind arrow endpoints, cleanup after delete and duplicate |
//! | [`sync`] | Re-seat bound endpoints after a shape transform |
//! | [`render`] | Suggested-binding highlight over a [`render::Surface`] |
//! | [`theme`] | Light/dark theme and highlight color resolution |
//! | [`config`] | [`config::BindingConfig`] loading and validation |
//! | [`camera`] | Pan/zoom and screen-to-scene conversion |
//! | [`geometry`] | Points, rotation, segment and ray math |
//! | [`consts`] | Shared numeric constants (gap, proximity, highlight sizes, zoom limits) |

pub mod binding;
pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod proximity;
pub mod render;
pub mod sync;
pub mod theme;
