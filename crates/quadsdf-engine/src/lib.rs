//! quadsdf engine crate.
//!
//! Instanced rectangle rendering on wgpu with two pipeline variants: flat
//! color and SDF-antialiased coverage. Around the pipelines sit the device
//! layer (windowed and headless), a software reference rasterizer that runs
//! the same stage math on the CPU, and small logging/timing utilities.
//!
//! Typical frame:
//! 1. build `quad::QuadBatch`es (variant + transform + instances)
//! 2. `render::QuadRenderer::prepare` uploads them
//! 3. `render::QuadRenderer::render` records one instanced draw per batch

pub mod coords;
pub mod device;
pub mod logging;
pub mod paint;
pub mod quad;
pub mod render;
pub mod time;
