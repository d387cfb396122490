//! Windowed benchmark loop.

use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use quadsdf_engine::device::{Gpu, GpuInit, SurfaceErrorAction};
use quadsdf_engine::paint::Color;
use quadsdf_engine::render::{QuadRenderer, QuadRendererConfig, RenderCtx, RenderTarget};
use quadsdf_engine::time::{FrameClock, FrameStats};

use crate::cli::RunArgs;
use crate::scene::Scene;

const CLEAR: Color = Color::rgb(0.08, 0.08, 0.1);

/// Runs the event loop until the window closes or `--frames` is reached.
pub fn run(args: RunArgs) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = BenchApp::new(args);
    event_loop
        .run_app(&mut app)
        .context("winit event loop terminated with error")?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct BenchApp {
    args: RunArgs,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    scene: Option<Scene>,
    renderer: QuadRenderer,
    clock: FrameClock,
    stats: FrameStats,
    frames: u64,
    error: Option<anyhow::Error>,
}

impl BenchApp {
    fn new(args: RunArgs) -> Self {
        let blend = args.scene.blend.into();
        Self {
            args,
            window: None,
            gpu: None,
            scene: None,
            renderer: QuadRenderer::new(QuadRendererConfig {
                label: "quadsdf-bench",
                blend,
            }),
            clock: FrameClock::new(),
            stats: FrameStats::default(),
            frames: 0,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(format!("quadsdf bench ({:?})", self.args.scene.scenario))
            .with_inner_size(LogicalSize::new(self.args.width, self.args.height));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let init = GpuInit {
            present_mode: if self.args.no_vsync {
                wgpu::PresentMode::AutoNoVsync
            } else {
                wgpu::PresentMode::AutoVsync
            },
            ..Default::default()
        };
        let gpu = pollster::block_on(Gpu::new(window.clone(), init))?;
        let canvas = gpu.canvas().context("window has zero size")?;
        window.set_title(&format!(
            "quadsdf bench ({:?}, {})",
            self.args.scene.scenario,
            gpu.adapter_info().name
        ));

        let scene = &self.args.scene;
        log::info!(
            "{} rects, scenario {:?}, seed {}, {}x{} {:?}",
            scene.count,
            scene.scenario,
            scene.seed,
            canvas.width(),
            canvas.height(),
            gpu.surface_format()
        );
        self.scene = Some(Scene::generate(canvas, scene.scenario, scene.count, scene.seed));

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.clock.reset();
        Ok(())
    }

    /// Renders one frame. Returns `false` when the loop should stop.
    fn frame(&mut self) -> bool {
        let Self {
            gpu: Some(gpu),
            scene: Some(scene),
            renderer,
            clock,
            stats,
            ..
        } = self
        else {
            return true;
        };

        // Minimized.
        let Some(canvas) = gpu.canvas() else { return true };

        let ft = clock.tick();
        let batches = scene.batches(canvas, ft.elapsed);

        let mut frame = match gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => return gpu.handle_surface_error(err) != SurfaceErrorAction::Fatal,
        };

        {
            let ctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format(), canvas);
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            target.clear(CLEAR);
            renderer.draw(&ctx, &mut target, &batches);
        }
        gpu.submit(frame);

        if let Some(report) = stats.record(ft.raw_dt, scene.len()) {
            log::info!(
                "{:.1} fps, {:.2} ms/frame, {:.2} M rects/s",
                report.frames_per_second,
                report.mean_frame_time.as_secs_f64() * 1e3,
                report.instances_per_second / 1e6,
            );
        }

        self.frames += 1;
        self.args.frames.is_none_or(|limit| self.frames < limit)
    }
}

impl ApplicationHandler for BenchApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(new_size);
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let (Some(gpu), Some(window)) = (self.gpu.as_mut(), self.window.as_ref()) {
                    gpu.resize(window.inner_size());
                }
            }

            WindowEvent::RedrawRequested => {
                if !self.frame() {
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}
