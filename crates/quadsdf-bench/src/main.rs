mod app;
mod cli;
mod scene;
mod snapshot;

use anyhow::Result;
use clap::Parser;

use quadsdf_engine::logging::{init_logging, LoggingConfig};

use crate::cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..Default::default()
    });

    match cli.command {
        Command::Run(args) => app::run(args),
        Command::Snapshot(args) => snapshot::run(args),
    }
}
