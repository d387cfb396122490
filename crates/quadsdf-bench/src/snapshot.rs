//! One-frame offscreen render to PNG.

use anyhow::{Context, Result};

use quadsdf_engine::coords::Canvas;
use quadsdf_engine::device::{GpuInit, HeadlessGpu, OffscreenTarget};
use quadsdf_engine::paint::Color;
use quadsdf_engine::quad::{reference, BlendMode, QuadBatch};
use quadsdf_engine::render::{QuadRenderer, QuadRendererConfig, RenderCtx, RenderTarget};

use crate::cli::{Backend, SnapshotArgs};
use crate::scene::Scene;

pub fn run(args: SnapshotArgs) -> Result<()> {
    let canvas = Canvas::new(args.width, args.height)?;
    let scene = Scene::generate(canvas, args.scene.scenario, args.scene.count, args.scene.seed);
    let batches = scene.batches(canvas, args.time);
    let blend = BlendMode::from(args.scene.blend);

    let pixels = match args.backend {
        Backend::Gpu => render_gpu(canvas, &batches, blend)?,
        Backend::Cpu => reference::rasterize(canvas, &batches, blend).to_rgba8(),
    };

    let image = image::RgbaImage::from_raw(canvas.width(), canvas.height(), pixels)
        .context("pixel buffer does not match canvas size")?;
    image
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    log::info!(
        "wrote {} ({}x{}, {} rects, {:?} backend)",
        args.output.display(),
        canvas.width(),
        canvas.height(),
        scene.len(),
        args.backend
    );
    Ok(())
}

fn render_gpu(canvas: Canvas, batches: &[QuadBatch], blend: BlendMode) -> Result<Vec<u8>> {
    let gpu = HeadlessGpu::new_blocking(&GpuInit::default())?;
    log::debug!("snapshot adapter: {:?}", gpu.adapter_info());
    let target = OffscreenTarget::new(gpu.device(), canvas);
    let ctx = RenderCtx::new(gpu.device(), gpu.queue(), OffscreenTarget::FORMAT, canvas);
    let mut renderer = QuadRenderer::new(QuadRendererConfig {
        label: "quadsdf-snapshot",
        blend,
    });

    let mut encoder = gpu
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("quadsdf snapshot encoder"),
        });
    {
        let mut rt = RenderTarget::new(&mut encoder, target.view());
        rt.clear(Color::TRANSPARENT);
        renderer.draw(&ctx, &mut rt, batches);
    }
    gpu.queue().submit(std::iter::once(encoder.finish()));

    target.read_rgba8(gpu.device(), gpu.queue())
}
