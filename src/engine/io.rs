//! Audio file I/O for Regionbake
//!
//! WAV import and export at the file's own sample rate and channel count.
//! Samples are held as interleaved 32-bit float; nothing is resampled.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::engine::buffer::AudioBuffer;
use crate::error::{BakeError, Result};

/// Export format configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFormat {
    /// Bit depth: 16, 24, or 32 float (default: 24)
    pub bit_depth: u16,
}

impl Default for ExportFormat {
    fn default() -> Self {
        ExportFormat { bit_depth: 24 }
    }
}

impl ExportFormat {
    /// Create a new export format with the given bit depth
    pub fn new(bit_depth: u16) -> Self {
        ExportFormat { bit_depth }
    }

    /// 16-bit integer
    pub fn cd_quality() -> Self {
        ExportFormat { bit_depth: 16 }
    }

    /// 32-bit float, lossless for in-memory buffers
    pub fn float() -> Self {
        ExportFormat { bit_depth: 32 }
    }

    /// Check that the bit depth is one the writer supports
    pub fn validate(&self) -> Result<()> {
        match self.bit_depth {
            16 | 24 | 32 => Ok(()),
            other => Err(BakeError::UnsupportedFormat {
                format: format!("{}-bit audio (only 16, 24, 32 supported)", other),
            }),
        }
    }
}

/// Import a WAV file into an interleaved float buffer
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidAudio` - If the file is not a valid WAV file
/// * `UnsupportedFormat` - If the integer bit depth is not 8/16/24/32
pub fn import_wav(path: &Path) -> Result<AudioBuffer> {
    if !path.exists() {
        return Err(BakeError::FileNotFound {
            path: path.display().to_string(),
            source: None,
        });
    }

    let reader = WavReader::open(path).map_err(|e| BakeError::InvalidAudio {
        reason: format!("Failed to open WAV file: {}", e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    debug!(
        "Importing {}: {} Hz, {} ch, {}-bit {:?}",
        path.display(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        spec.sample_format
    );

    let samples = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;

    AudioBuffer::new(spec.sample_rate, spec.channels, samples).map_err(|e| {
        BakeError::InvalidAudio {
            reason: e.to_string(),
            source: None,
        }
    })
}

/// Export a buffer to a WAV file
///
/// A zero-length buffer is written as a valid WAV with no frames.
pub fn export_wav(buffer: &AudioBuffer, path: &Path, format: ExportFormat) -> Result<()> {
    format.validate()?;

    let spec = WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample: format.bit_depth,
        sample_format: if format.bit_depth == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };

    let mut writer = WavWriter::create(path, spec).map_err(wav_io_error)?;

    match format.bit_depth {
        16 => {
            for &sample in buffer.samples() {
                let scaled = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
                writer.write_sample(scaled).map_err(wav_io_error)?;
            }
        }
        24 => {
            for &sample in buffer.samples() {
                // 24-bit stored as i32 in hound
                let scaled = (sample * 8388607.0).clamp(-8388608.0, 8388607.0) as i32;
                writer.write_sample(scaled).map_err(wav_io_error)?;
            }
        }
        _ => {
            for &sample in buffer.samples() {
                writer.write_sample(sample).map_err(wav_io_error)?;
            }
        }
    }

    writer.finalize().map_err(wav_io_error)?;

    debug!(
        "Exported {} frames to {} ({}-bit)",
        buffer.frame_count(),
        path.display(),
        format.bit_depth
    );

    Ok(())
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn wav_io_error(e: hound::Error) -> BakeError {
    match e {
        hound::Error::IoError(io) => BakeError::Io(io),
        other => BakeError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            other.to_string(),
        )),
    }
}

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let scale = match (sample_format, bits_per_sample) {
        (SampleFormat::Float, _) => {
            return reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| BakeError::InvalidAudio {
                    reason: format!("Failed to read float samples: {}", e),
                    source: Some(Box::new(e)),
                });
        }
        (SampleFormat::Int, 8) => 128.0,
        (SampleFormat::Int, 16) => 32768.0,
        (SampleFormat::Int, 24) => 8388608.0,
        (SampleFormat::Int, 32) => 2147483648.0,
        (SampleFormat::Int, other) => {
            return Err(BakeError::UnsupportedFormat {
                format: format!("{}-bit integer audio", other),
            });
        }
    };

    // hound widens every integer depth to i32 on request
    reader
        .samples::<i32>()
        .map(|s| s.map(|v| (v as f64 / scale) as f32))
        .collect::<std::result::Result<Vec<f32>, _>>()
        .map_err(|e| BakeError::InvalidAudio {
            reason: format!("Failed to read {}-bit samples: {}", bits_per_sample, e),
            source: Some(Box::new(e)),
        })
}

// ============================================================================
// Tests
// ============================================================================
