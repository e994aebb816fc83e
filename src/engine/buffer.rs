//! Audio Buffer Management
//!
//! Provides the immutable source buffer type shared by the envelope builder
//! and the bake pipeline, plus a few level-metering helpers.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{BakeError, Result};

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert linear amplitude to decibels
///
/// # Returns
/// Value in decibels. Returns -f32::INFINITY for zero input.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Round a time in seconds to the nearest frame index
///
/// NaN and non-positive times map to frame 0.
#[inline]
pub fn time_to_frame(time: f64, sample_rate: u32) -> usize {
    if time.is_nan() || time <= 0.0 {
        return 0;
    }
    (time * sample_rate as f64).round() as usize
}

/// Calculate the RMS level of an audio buffer in dB
///
/// Returns -f32::INFINITY for empty or silent buffers.
pub fn calculate_rms(buffer: &AudioBuffer) -> f32 {
    if buffer.samples.is_empty() {
        return f32::NEG_INFINITY;
    }

    let sum_squares: f64 = buffer
        .samples
        .iter()
        .map(|&s| (s as f64) * (s as f64))
        .sum();

    let rms = (sum_squares / buffer.samples.len() as f64).sqrt() as f32;
    linear_to_db(rms)
}

/// Calculate the peak level of an audio buffer in dB
///
/// Returns -f32::INFINITY for empty buffers.
pub fn calculate_peak(buffer: &AudioBuffer) -> f32 {
    let peak = buffer
        .samples
        .iter()
        .map(|&s| s.abs())
        .fold(0.0_f32, f32::max);

    linear_to_db(peak)
}

// ============================================================================
// Audio Buffer
// ============================================================================

/// Immutable interleaved PCM audio
///
/// `samples.len() == frame_count * channels` always holds. Nothing in this
/// crate mutates a buffer after construction; transforms build a new one.
///
/// Each buffer carries an identity assigned at construction. Clones share
/// the identity of the buffer they were cloned from, so caches keyed on it
/// (see [`EnvelopeCache`](crate::engine::EnvelopeCache)) treat a clone as the
/// same source.
///
/// # Example
/// ```
/// use regionbake::engine::AudioBuffer;
///
/// let buffer = AudioBuffer::new(8000, 2, vec![0.0; 16000]).unwrap();
/// assert_eq!(buffer.frame_count(), 8000);
/// assert_eq!(buffer.duration_secs(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    id: Uuid,
    sample_rate: u32,
    channels: u16,
    frame_count: u64,
    samples: Vec<f32>,
}

impl AudioBuffer {
    /// Create a buffer from interleaved samples
    ///
    /// # Errors
    /// `InvalidArgument` if the sample rate or channel count is zero, or if
    /// the sample count is not a whole number of frames.
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(BakeError::invalid("sample rate must be non-zero"));
        }
        if channels == 0 {
            return Err(BakeError::invalid("channel count must be non-zero"));
        }
        if samples.len() % channels as usize != 0 {
            return Err(BakeError::invalid(format!(
                "Interleaved data length {} is not divisible by channel count {}",
                samples.len(),
                channels
            )));
        }

        let frame_count = (samples.len() / channels as usize) as u64;
        Ok(Self {
            id: Uuid::new_v4(),
            sample_rate,
            channels,
            frame_count,
            samples,
        })
    }

    /// Create a buffer from planar channel data (one Vec per channel)
    pub fn from_channels(sample_rate: u32, channels: &[Vec<f32>]) -> Result<Self> {
        let frames = channels.first().map(|ch| ch.len()).unwrap_or(0);
        if channels.iter().any(|ch| ch.len() != frames) {
            return Err(BakeError::invalid("all channels must have the same length"));
        }
        let channel_count = u16::try_from(channels.len())
            .map_err(|_| BakeError::invalid("too many channels"))?;

        let mut interleaved = Vec::with_capacity(frames * channels.len());
        for frame in 0..frames {
            for channel in channels {
                interleaved.push(channel[frame]);
            }
        }

        Self::new(sample_rate, channel_count, interleaved)
    }

    /// Create a buffer holding `frames` frames of a constant value
    pub fn filled(sample_rate: u32, channels: u16, frames: usize, value: f32) -> Result<Self> {
        Self::new(sample_rate, channels, vec![value; frames * channels as usize])
    }

    /// Create a mono sine test tone
    pub fn sine_wave(frequency: f32, duration_secs: f32, sample_rate: u32) -> Result<Self> {
        let num_samples = time_to_frame(duration_secs as f64, sample_rate);
        let angular_freq = 2.0 * std::f32::consts::PI * frequency / sample_rate as f32;
        let samples = (0..num_samples)
            .map(|i| (angular_freq * i as f32).sin())
            .collect();
        Self::new(sample_rate, 1, samples)
    }

    /// Identity of this buffer's contents
    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Sample rate in Hz
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of interleaved channels
    #[inline]
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames (samples per channel)
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Interleaved sample data
    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Check if the buffer holds no frames
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    /// Duration in seconds
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        self.frame_count as f64 / self.sample_rate as f64
    }

    /// Get one interleaved frame, or None past the end
    pub fn frame(&self, index: usize) -> Option<&[f32]> {
        let ch = self.channels as usize;
        self.samples.get(index * ch..(index + 1) * ch)
    }

    /// Iterate over the samples of a single channel
    pub fn channel_iter(&self, channel: usize) -> impl Iterator<Item = f32> + '_ {
        self.samples
            .iter()
            .skip(channel)
            .step_by(self.channels as usize)
            .copied()
    }

    /// Copy the interleaved frames `[start, end)`
    ///
    /// Bounds are clamped to the buffer.
    pub fn copy_frames(&self, start: usize, end: usize) -> Vec<f32> {
        let frames = self.frame_count as usize;
        let end = end.min(frames);
        let start = start.min(end);
        let ch = self.channels as usize;
        self.samples[start * ch..end * ch].to_vec()
    }

    /// Check if all samples are finite (not NaN or Infinity)
    pub fn is_finite(&self) -> bool {
        self.samples.iter().all(|s| s.is_finite())
    }

    /// Lowercase hex SHA-256 over the format and sample bytes
    ///
    /// Identical audio always produces the same digest regardless of
    /// buffer identity.
    pub fn content_digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.sample_rate.to_le_bytes());
        hasher.update(self.channels.to_le_bytes());
        for sample in &self.samples {
            hasher.update(sample.to_le_bytes());
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}

/// Buffers compare by content; identity is ignored.
impl PartialEq for AudioBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.sample_rate == other.sample_rate
            && self.channels == other.channels
            && self.samples == other.samples
    }
}

// ============================================================================
// Tests
// ============================================================================
