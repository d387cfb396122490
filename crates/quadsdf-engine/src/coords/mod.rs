//! Coordinate spaces shared by the quad pipeline and its callers.
//!
//! Spaces, in the order a vertex visits them:
//! - model space: whatever units the caller picks (canvas pixels for `Transform::pixels`)
//! - clip space: `[-1, 1]` on both axes, +Y up
//! - raster space: device pixels, +Y down, shifted by `-height` on Y
//! - SDF space: raster space relative to the pixel-snapped rectangle center
//!
//! Model → clip is the only caller-controlled step; the rest is fixed math in `quad::stage`.

mod canvas;
mod transform;

pub use canvas::{Canvas, MAX_CANVAS_DIMENSION};
pub use transform::Transform;
