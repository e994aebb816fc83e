//! CLI Module
//!
//! Command-line interface for Regionbake.

pub mod commands;
pub mod document;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::edit::MuteCutPolicy;

/// Regionbake - waveform envelopes and mute/cut bakes for WAV files
#[derive(Parser, Debug)]
#[command(name = "regionbake")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Editor config file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show format, levels and digest of a WAV file
    #[command(name = "info")]
    Info {
        /// Input WAV file
        input: PathBuf,
    },

    /// Print the min/max waveform envelope of a WAV file
    #[command(name = "envelope")]
    Envelope {
        /// Input WAV file
        input: PathBuf,

        /// Number of columns
        #[arg(short, long)]
        width: Option<u32>,

        /// Frames read per chunk
        #[arg(long)]
        chunk_frames: Option<u32>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Normalize a region document and print the result
    #[command(name = "normalize")]
    Normalize {
        /// Region document (JSON)
        regions: PathBuf,

        /// Buffer duration in seconds to clamp against
        #[arg(short, long)]
        duration: f64,
    },

    /// Render a selection with its regions applied
    #[command(name = "bake")]
    Bake {
        /// Input WAV file
        input: PathBuf,

        /// Region document (JSON)
        #[arg(short, long)]
        regions: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Selection in point in seconds
        #[arg(long = "in")]
        in_time: Option<f64>,

        /// Selection out point in seconds
        #[arg(long = "out")]
        out_time: Option<f64>,

        /// Fade length in milliseconds
        #[arg(long)]
        fade_ms: Option<u32>,

        /// How overlapping mutes and cuts resolve: cut-wins or mute-wins
        #[arg(long)]
        policy: Option<MuteCutPolicy>,

        /// Output bit depth: 16, 24 or 32 (float)
        #[arg(long)]
        bit_depth: Option<u16>,
    },
}
