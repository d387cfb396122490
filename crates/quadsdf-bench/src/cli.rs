use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use quadsdf_engine::quad::BlendMode;

use crate::scene::Scenario;

/// Throughput benchmark and snapshot tool for the quadsdf rectangle pipeline.
#[derive(Parser, Debug)]
#[command(name = "quadsdf-bench", version, about)]
pub struct Cli {
    /// Log filter override (env_logger syntax, e.g. "quadsdf_engine=debug").
    #[arg(long, global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open a window and render the scene every frame, logging throughput.
    Run(RunArgs),
    /// Render one frame offscreen and write it as PNG.
    Snapshot(SnapshotArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SceneArgs {
    /// Number of rectangles.
    #[arg(short = 'n', long, default_value_t = 10_000)]
    pub count: usize,

    /// Which pipelines the scene exercises.
    #[arg(short, long, value_enum, default_value_t = Scenario::Antialiased)]
    pub scenario: Scenario,

    /// RNG seed; equal seeds give equal scenes.
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// How rectangles combine with what is already drawn.
    #[arg(long, value_enum, default_value_t = Blend::Alpha)]
    pub blend: Blend,
}

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Blend {
    /// Straight-alpha source-over.
    Alpha,
    /// Overwrite the target with the fragment color.
    Replace,
}

impl From<Blend> for BlendMode {
    fn from(blend: Blend) -> Self {
        match blend {
            Blend::Alpha => BlendMode::Alpha,
            Blend::Replace => BlendMode::Replace,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Present without vsync to measure raw throughput.
    #[arg(long)]
    pub no_vsync: bool,

    /// Exit after this many frames.
    #[arg(long)]
    pub frames: Option<u64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Headless wgpu device.
    Gpu,
    /// Software reference rasterizer.
    Cpu,
}

#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    #[arg(long, default_value_t = 512)]
    pub width: u32,

    #[arg(long, default_value_t = 512)]
    pub height: u32,

    #[arg(short, long, value_enum, default_value_t = Backend::Gpu)]
    pub backend: Backend,

    /// Scene time in seconds (only the zoom scenario animates).
    #[arg(long, default_value_t = 0.0)]
    pub time: f32,

    #[arg(short, long, default_value = "quadsdf.png")]
    pub output: PathBuf,
}
