//! Instanced-rectangle pipeline: data contract and stage math.
//!
//! Everything here is GPU-agnostic except for the vertex layout and blend state
//! descriptors. `stage` mirrors the WGSL in `render/shaders` line for line, and
//! `reference` runs that math through a small software rasterizer so the
//! pipeline can be checked without an adapter.

mod batch;
mod instance;
mod template;
mod uniforms;
mod variant;

pub mod reference;
pub mod stage;

pub use batch::QuadBatch;
pub use instance::RectInstance;
pub use template::{template_corner, QUAD_TEMPLATE, VERTICES_PER_INSTANCE};
pub use uniforms::{CanvasUniform, TransformUniform};
pub(crate) use uniforms::min_binding_size;
pub use variant::{BlendMode, QuadVariant};
