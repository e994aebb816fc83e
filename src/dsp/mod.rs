//! Sample-level DSP helpers shared by the bake pipeline

pub mod fade;

pub use fade::{apply_fade_in, apply_fade_out, apply_mute, crossfade_overlap_add, fade_frames};
