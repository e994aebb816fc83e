//! Regionbake CLI
//!
//! Command-line interface for the Regionbake region editor.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use regionbake::cli::commands::{self, BakeOverrides};
use regionbake::cli::{Cli, Commands};
use regionbake::EditorConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Regionbake v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Some(cmd) => handle_command(cmd, &config),
        None => {
            println!("Regionbake v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands, config: &EditorConfig) -> Result<()> {
    match cmd {
        Commands::Info { input } => commands::show_info(&input)
            .with_context(|| format!("reading {}", input.display())),
        Commands::Envelope {
            input,
            width,
            chunk_frames,
            json,
        } => commands::show_envelope(&input, config, width, chunk_frames, json)
            .with_context(|| format!("building envelope of {}", input.display())),
        Commands::Normalize { regions, duration } => commands::normalize(&regions, duration)
            .with_context(|| format!("normalizing {}", regions.display())),
        Commands::Bake {
            input,
            regions,
            output,
            in_time,
            out_time,
            fade_ms,
            policy,
            bit_depth,
        } => {
            let overrides = BakeOverrides {
                in_time,
                out_time,
                fade_ms,
                policy,
                bit_depth,
            };
            commands::bake(&input, &regions, &output, config, &overrides)
                .with_context(|| format!("baking {} into {}", input.display(), output.display()))
        }
    }
}
