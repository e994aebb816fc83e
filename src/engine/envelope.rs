//! Waveform Envelope
//!
//! Downsamples a buffer into a fixed number of min/max columns for waveform
//! display. The buffer is read in chunks of `chunk_frames` frames so the
//! working set stays bounded no matter how long the source is.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::buffer::AudioBuffer;
use crate::error::{BakeError, Result};

/// Default number of frames read per chunk
pub const DEFAULT_CHUNK_FRAMES: u32 = 65_536;

/// Min/max of the mono mix over one pixel column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeColumn {
    pub min: f32,
    pub max: f32,
}

impl EnvelopeColumn {
    fn merge(self, other: EnvelopeColumn) -> EnvelopeColumn {
        EnvelopeColumn {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Fixed-width min/max summary of a buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    width: u32,
    columns: Vec<EnvelopeColumn>,
}

impl Envelope {
    /// Number of columns
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn columns(&self) -> &[EnvelopeColumn] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<EnvelopeColumn> {
        self.columns.get(index).copied()
    }
}

/// Running min/max over the frames of the column being filled
#[derive(Debug, Default)]
struct ColumnAccumulator {
    min: f32,
    max: f32,
    count: usize,
}

impl ColumnAccumulator {
    #[inline]
    fn push(&mut self, value: f32) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
    }

    fn take(&mut self) -> Option<EnvelopeColumn> {
        if self.count == 0 {
            return None;
        }
        let column = EnvelopeColumn {
            min: self.min,
            max: self.max,
        };
        *self = Self::default();
        Some(column)
    }
}

fn commit(slot: &mut Option<EnvelopeColumn>, column: EnvelopeColumn) {
    *slot = Some(match *slot {
        Some(existing) => existing.merge(column),
        None => column,
    });
}

/// Build a `width`-column min/max envelope of the buffer's mono mix
///
/// Every frame lands in exactly one column. When the frame count does not
/// divide evenly, the remainder is folded into the last column. When
/// `width` exceeds the frame count, columns past the last frame repeat the
/// last filled column.
///
/// # Errors
/// `InvalidArgument` if `width` or `chunk_frames` is zero, or the buffer
/// holds no frames.
pub fn build_envelope(buffer: &AudioBuffer, width: u32, chunk_frames: u32) -> Result<Envelope> {
    if width == 0 {
        return Err(BakeError::invalid("envelope width must be non-zero"));
    }
    if chunk_frames == 0 {
        return Err(BakeError::invalid("chunk size must be non-zero"));
    }
    if buffer.is_empty() {
        return Err(BakeError::invalid("cannot build an envelope of an empty buffer"));
    }

    let columns_len = width as usize;
    let channels = buffer.channels() as usize;
    let frames = buffer.frame_count() as usize;
    let frames_per_column = (frames / columns_len).max(1);
    let last_column = columns_len - 1;

    debug!(
        "Building envelope: {} frames, {} columns, {} frames/column",
        frames, width, frames_per_column
    );

    let mut slots: Vec<Option<EnvelopeColumn>> = vec![None; columns_len];
    let mut acc = ColumnAccumulator::default();
    let mut column = 0usize;

    for chunk in buffer.samples().chunks(chunk_frames as usize * channels) {
        for frame in chunk.chunks_exact(channels) {
            let mono = frame.iter().sum::<f32>() / channels as f32;
            acc.push(mono);

            if acc.count == frames_per_column {
                if let Some(done) = acc.take() {
                    commit(&mut slots[column], done);
                }
                column = (column + 1).min(last_column);
            }
        }
    }

    if let Some(leftover) = acc.take() {
        commit(&mut slots[column], leftover);
    }

    let mut columns = Vec::with_capacity(columns_len);
    let mut previous = EnvelopeColumn { min: 0.0, max: 0.0 };
    for slot in slots {
        let filled = slot.unwrap_or(previous);
        columns.push(filled);
        previous = filled;
    }

    Ok(Envelope { width, columns })
}

/// Holds the envelope of one buffer at one width
///
/// The envelope is rebuilt only when the buffer identity or the requested
/// width changes.
#[derive(Debug)]
pub struct EnvelopeCache {
    chunk_frames: u32,
    cached: Option<((Uuid, u32), Envelope)>,
    rebuilds: u64,
}

impl EnvelopeCache {
    pub fn new(chunk_frames: u32) -> Self {
        Self {
            chunk_frames,
            cached: None,
            rebuilds: 0,
        }
    }

    /// Return the envelope for `buffer` at `width`, rebuilding if stale
    pub fn get_or_build(&mut self, buffer: &AudioBuffer, width: u32) -> Result<&Envelope> {
        let key = (buffer.id(), width);
        let envelope = match self.cached.take() {
            Some((cached_key, envelope)) if cached_key == key => envelope,
            _ => {
                let envelope = build_envelope(buffer, width, self.chunk_frames)?;
                self.rebuilds += 1;
                info!(
                    "Envelope rebuilt for buffer {} at width {} (rebuild #{})",
                    key.0, width, self.rebuilds
                );
                envelope
            }
        };
        Ok(&self.cached.insert((key, envelope)).1)
    }

    /// Drop the cached envelope
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// How many times an envelope has been built
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}

impl Default for EnvelopeCache {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_FRAMES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(frames: usize) -> AudioBuffer {
        let samples = (0..frames).map(|i| i as f32 / frames as f32).collect();
        AudioBuffer::new(1000, 1, samples).unwrap()
    }

    #[test]
    fn test_rejects_zero_width() {
        let buffer = ramp(100);
        assert!(matches!(
            build_envelope(&buffer, 0, 16),
            Err(BakeError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_buffer() {
        let buffer = AudioBuffer::new(1000, 2, Vec::new()).unwrap();
        assert!(build_envelope(&buffer, 10, 16).is_err());
    }

    #[test]
    fn test_rejects_zero_chunk() {
        assert!(build_envelope(&ramp(10), 10, 0).is_err());
    }

    #[test]
    fn test_even_division() {
        let buffer = AudioBuffer::new(1000, 1, vec![0.0, 1.0, -1.0, 0.5]).unwrap();
        let env = build_envelope(&buffer, 2, 3).unwrap();
        assert_eq!(env.width(), 2);
        assert_eq!(env.column(0), Some(EnvelopeColumn { min: 0.0, max: 1.0 }));
        assert_eq!(env.column(1), Some(EnvelopeColumn { min: -1.0, max: 0.5 }));
    }

    #[test]
    fn test_leftover_merges_into_last_column() {
        // 5 frames, 2 columns: 2 frames per column, last frame folds into column 1
        let buffer = AudioBuffer::new(1000, 1, vec![0.1, 0.2, 0.3, 0.4, -0.9]).unwrap();
        let env = build_envelope(&buffer, 2, 64).unwrap();
        assert_eq!(env.column(0), Some(EnvelopeColumn { min: 0.1, max: 0.2 }));
        assert_eq!(env.column(1), Some(EnvelopeColumn { min: -0.9, max: 0.4 }));
    }

    #[test]
    fn test_excess_commits_merge_into_last_column() {
        // 8 frames, 3 columns: 2 frames per column gives 4 commits
        let buffer =
            AudioBuffer::new(1000, 1, vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]).unwrap();
        let env = build_envelope(&buffer, 3, 64).unwrap();
        assert_eq!(env.column(2), Some(EnvelopeColumn { min: 0.4, max: 0.7 }));
    }

    #[test]
    fn test_stereo_mixes_to_mono_mean() {
        let buffer = AudioBuffer::new(1000, 2, vec![1.0, 0.0, -1.0, -0.5]).unwrap();
        let env = build_envelope(&buffer, 1, 1).unwrap();
        let col = env.column(0).unwrap();
        assert_relative_eq!(col.min, -0.75);
        assert_relative_eq!(col.max, 0.5);
    }

    #[test]
    fn test_chunk_size_does_not_change_result() {
        let buffer = ramp(10_007);
        let reference = build_envelope(&buffer, 333, 1 << 20).unwrap();
        for chunk in [1, 7, 64, 4096] {
            assert_eq!(build_envelope(&buffer, 333, chunk).unwrap(), reference);
        }
    }

    #[test]
    fn test_width_larger_than_frames_repeats_last_column() {
        let buffer = AudioBuffer::new(1000, 1, vec![0.25, -0.25]).unwrap();
        let env = build_envelope(&buffer, 5, 16).unwrap();
        assert_eq!(env.columns().len(), 5);
        let last = EnvelopeColumn {
            min: -0.25,
            max: -0.25,
        };
        assert_eq!(env.column(1), Some(last));
        assert_eq!(env.column(4), Some(last));
    }

    #[test]
    fn test_out_of_range_samples_are_not_clipped() {
        let buffer = AudioBuffer::new(1000, 1, vec![1.5, 1.25]).unwrap();
        let env = build_envelope(&buffer, 1, 16).unwrap();
        assert_eq!(env.column(0), Some(EnvelopeColumn { min: 1.25, max: 1.5 }));
    }

    #[test]
    fn test_cache_rebuilds_only_on_identity_or_width_change() {
        let a = ramp(1000);
        let b = ramp(1000);
        let mut cache = EnvelopeCache::new(128);

        cache.get_or_build(&a, 100).unwrap();
        cache.get_or_build(&a, 100).unwrap();
        cache.get_or_build(&a.clone(), 100).unwrap();
        assert_eq!(cache.rebuild_count(), 1);

        cache.get_or_build(&a, 50).unwrap();
        assert_eq!(cache.rebuild_count(), 2);

        let env = cache.get_or_build(&b, 50).unwrap();
        assert_eq!(env.width(), 50);
        assert_eq!(cache.rebuild_count(), 3);

        cache.invalidate();
        cache.get_or_build(&b, 50).unwrap();
        assert_eq!(cache.rebuild_count(), 4);
    }
}
