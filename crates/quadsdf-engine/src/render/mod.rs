//! GPU rendering subsystem.
//!
//! `QuadRenderer` turns `quad::QuadBatch` streams into instanced draws. It owns
//! its GPU resources (pipelines, buffers) and creates them lazily for the
//! target format it is handed.
//!
//! Convention:
//! - Instance geometry is in model units; the batch transform maps it to clip space.
//! - The canvas uniform carries the target size in device pixels.

mod ctx;
mod pipeline;
mod renderer;

pub use ctx::{RenderCtx, RenderTarget};
pub use renderer::{QuadRenderer, QuadRendererConfig};
