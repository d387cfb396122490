//! GPU output against the software reference.
//!
//! Every test needs a wgpu adapter; without one it logs and returns early.

use glam::Vec2;
use quadsdf_engine::coords::{Canvas, Transform};
use quadsdf_engine::device::{GpuInit, HeadlessGpu, OffscreenTarget};
use quadsdf_engine::logging::{init_logging, LoggingConfig};
use quadsdf_engine::paint::Color;
use quadsdf_engine::quad::{reference, BlendMode, QuadBatch, QuadVariant, RectInstance};
use quadsdf_engine::render::{QuadRenderer, QuadRendererConfig, RenderCtx, RenderTarget};

/// Per-channel slack for pixels on the coverage ramp (rounding on both sides).
const EDGE_TOLERANCE: u8 = 3;

fn headless() -> Option<HeadlessGpu> {
    init_logging(LoggingConfig::for_tests());
    match HeadlessGpu::new_blocking(&GpuInit::default()) {
        Ok(gpu) => Some(gpu),
        Err(err) => {
            log::warn!("no wgpu adapter, skipping GPU test: {err:#}");
            None
        }
    }
}

fn canvas() -> Canvas {
    Canvas::new(100, 100).unwrap()
}

fn render_gpu(gpu: &HeadlessGpu, canvas: Canvas, batches: &[QuadBatch], blend: BlendMode) -> Vec<u8> {
    let target = OffscreenTarget::new(gpu.device(), canvas);
    let ctx = RenderCtx::new(gpu.device(), gpu.queue(), OffscreenTarget::FORMAT, canvas);
    let mut renderer = QuadRenderer::new(QuadRendererConfig {
        blend,
        ..Default::default()
    });

    let mut encoder = gpu
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("parity") });
    {
        let mut rt = RenderTarget::new(&mut encoder, target.view());
        rt.clear(Color::TRANSPARENT);
        renderer.draw(&ctx, &mut rt, batches);
    }
    gpu.queue().submit(std::iter::once(encoder.finish()));

    target.read_rgba8(gpu.device(), gpu.queue()).unwrap()
}

fn render_cpu(canvas: Canvas, batches: &[QuadBatch], blend: BlendMode) -> Vec<u8> {
    reference::rasterize(canvas, batches, blend).to_rgba8()
}

fn assert_close(gpu: &[u8], cpu: &[u8], width: u32, tolerance: u8) {
    assert_eq!(gpu.len(), cpu.len());
    for (i, (g, c)) in gpu.chunks_exact(4).zip(cpu.chunks_exact(4)).enumerate() {
        let (x, y) = (i as u32 % width, i as u32 / width);
        for ch in 0..4 {
            assert!(
                g[ch].abs_diff(c[ch]) <= tolerance,
                "pixel ({x}, {y}) channel {ch}: gpu {g:?} cpu {c:?}"
            );
        }
    }
}

fn pixel(bytes: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * width + x) * 4) as usize;
    [bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]
}

fn square(variant: QuadVariant, inst: RectInstance) -> Vec<QuadBatch> {
    vec![QuadBatch::with_instances(variant, Transform::pixels(canvas()), vec![inst])]
}

// ── scenarios ─────────────────────────────────────────────────────────────

#[test]
fn antialiased_square_matches_reference() {
    let Some(gpu) = headless() else { return };
    let blue = Color::rgb(0.0, 0.0, 1.0);
    let batches = square(
        QuadVariant::Antialiased,
        RectInstance::from_xywh(10.0, 10.0, 20.0, 20.0, blue),
    );

    let g = render_gpu(&gpu, canvas(), &batches, BlendMode::Alpha);
    let c = render_cpu(canvas(), &batches, BlendMode::Alpha);

    assert_eq!(pixel(&g, 100, 20, 20), [0, 0, 255, 255]);
    assert_eq!(pixel(&g, 100, 5, 5), [0, 0, 0, 0]);
    assert_eq!(pixel(&g, 100, 30, 20), [0, 0, 0, 0]);
    assert_close(&g, &c, 100, EDGE_TOLERANCE);
}

#[test]
fn odd_sized_square_keeps_both_edge_ramps() {
    let Some(gpu) = headless() else { return };
    let blue = Color::rgb(0.0, 0.0, 1.0);
    let batches = square(
        QuadVariant::Antialiased,
        RectInstance::from_xywh(10.0, 10.0, 21.0, 21.0, blue),
    );

    let g = render_gpu(&gpu, canvas(), &batches, BlendMode::Alpha);
    let c = render_cpu(canvas(), &batches, BlendMode::Alpha);

    for x in [10, 30] {
        let a = pixel(&g, 100, x, 20)[3];
        assert!(a > 0 && a < 255, "column {x} has alpha {a}");
    }
    assert_eq!(pixel(&g, 100, 31, 20), [0, 0, 0, 0]);
    assert_close(&g, &c, 100, EDGE_TOLERANCE);
}

#[test]
fn flat_replace_writes_instance_color() {
    let Some(gpu) = headless() else { return };
    let color = Color::from_u8(64, 128, 192, 255);
    let batches = square(
        QuadVariant::Flat,
        RectInstance::from_xywh(10.0, 10.0, 20.0, 20.0, color),
    );

    let g = render_gpu(&gpu, canvas(), &batches, BlendMode::Replace);
    let c = render_cpu(canvas(), &batches, BlendMode::Replace);

    assert_eq!(pixel(&g, 100, 10, 10), [64, 128, 192, 255]);
    assert_eq!(pixel(&g, 100, 29, 29), [64, 128, 192, 255]);
    assert_eq!(pixel(&g, 100, 30, 30), [0, 0, 0, 0]);
    assert_close(&g, &c, 100, 0);
}

#[test]
fn degenerate_and_offscreen_instances_draw_nothing() {
    let Some(gpu) = headless() else { return };
    let batches = vec![QuadBatch::with_instances(
        QuadVariant::Antialiased,
        Transform::pixels(canvas()),
        vec![
            RectInstance::from_xywh(10.0, 10.0, 0.0, 0.0, Color::WHITE),
            RectInstance::from_xywh(1000.0, 1000.0, 20.0, 20.0, Color::WHITE),
        ],
    )];

    let g = render_gpu(&gpu, canvas(), &batches, BlendMode::Alpha);
    assert!(g.iter().all(|&b| b == 0));
}

#[test]
fn batches_keep_their_own_transforms() {
    let Some(gpu) = headless() else { return };
    let view = Transform::pixels(canvas());
    let inst = RectInstance::from_xywh(5.0, 5.0, 10.0, 10.0, Color::rgb(1.0, 0.0, 0.0));

    let batches = vec![
        QuadBatch::with_instances(QuadVariant::Flat, view, vec![inst]),
        QuadBatch::with_instances(QuadVariant::Antialiased, view.scale(Vec2::splat(3.0)), vec![inst]),
        QuadBatch::with_instances(QuadVariant::Flat, view.translate(Vec2::new(60.0, 0.0)), vec![inst]),
    ];

    let g = render_gpu(&gpu, canvas(), &batches, BlendMode::Alpha);
    let c = render_cpu(canvas(), &batches, BlendMode::Alpha);

    // Scaled copy covers 15..45 with a feathered rim.
    assert_eq!(pixel(&g, 100, 30, 30), [255, 0, 0, 255]);
    assert_eq!(pixel(&g, 100, 70, 10), [255, 0, 0, 255]);
    assert_eq!(pixel(&g, 100, 50, 50), [0, 0, 0, 0]);
    assert_close(&g, &c, 100, EDGE_TOLERANCE);
}
