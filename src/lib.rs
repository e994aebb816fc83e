//! Regionbake - Non-destructive Audio Region Editing
//!
//! Regionbake provides the data side of a waveform region editor:
//! 1. Envelope building - a fixed-width min/max summary for drawing
//! 2. Region baking - rendering a selection with Mute and Cut regions
//!    applied into a new buffer
//!
//! # Architecture
//!
//! Everything here is a pure, synchronous transform over in-memory buffers:
//! - `engine`: immutable source buffers, envelopes, WAV I/O
//! - `edit`: regions, normalization and the two-pass bake
//! - `dsp`: fade and crossfade arithmetic
//!
//! Source buffers are never modified; every bake returns a new buffer.

pub mod cli;
pub mod config;
pub mod dsp;
pub mod edit;
pub mod engine;
pub mod error;

pub use config::EditorConfig;
pub use edit::{bake, normalize_regions, EditRegion, RegionAction, RegionSet, Selection};
pub use engine::{build_envelope, AudioBuffer, Envelope};
pub use error::{BakeError, Result};
