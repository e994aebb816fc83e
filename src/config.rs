//! Editor configuration
//!
//! Tunables shared by the envelope builder, the baker and the exporter.
//! Stored as JSON; any field missing from a file takes its default.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::edit::bake::DEFAULT_FADE_MS;
use crate::edit::plan::MuteCutPolicy;
use crate::engine::envelope::DEFAULT_CHUNK_FRAMES;
use crate::engine::io::ExportFormat;
use crate::error::{BakeError, Result};

/// Default envelope width in pixel columns
pub const DEFAULT_ENVELOPE_WIDTH: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Crossfade at cut seams and fade at mute edges, in milliseconds
    pub fade_ms: u32,
    /// Frames read per chunk while building envelopes
    pub chunk_frames: u32,
    /// Envelope width in pixel columns
    pub envelope_width: u32,
    pub mute_cut_policy: MuteCutPolicy,
    pub export: ExportFormat,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            fade_ms: DEFAULT_FADE_MS,
            chunk_frames: DEFAULT_CHUNK_FRAMES,
            envelope_width: DEFAULT_ENVELOPE_WIDTH,
            mute_cut_policy: MuteCutPolicy::CutWins,
            export: ExportFormat::default(),
        }
    }
}

impl EditorConfig {
    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BakeError::FileNotFound {
                path: path.display().to_string(),
                source: None,
            });
        }
        let content = fs::read_to_string(path)?;
        let config: EditorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Write as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_frames == 0 {
            return Err(BakeError::invalid("chunk_frames must be non-zero"));
        }
        if self.envelope_width == 0 {
            return Err(BakeError::invalid("envelope_width must be non-zero"));
        }
        self.export.validate().map_err(|e| BakeError::invalid(e.to_string()))
    }
}
