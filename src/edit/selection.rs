//! Selection Window
//!
//! The in/out window a bake renders, and the conversion from seconds to
//! frame indices. Past this point the pipeline only handles frames.

use serde::{Deserialize, Serialize};

pub use crate::engine::buffer::time_to_frame;

/// Half-open frame range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleSpan {
    pub start: usize,
    pub end: usize,
}

impl SampleSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// In/out points in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub in_time: f64,
    pub out_time: f64,
}

impl Selection {
    pub fn new(in_time: f64, out_time: f64) -> Self {
        Self { in_time, out_time }
    }

    /// Select the whole buffer
    pub fn whole(buffer_duration: f64) -> Self {
        Self::new(0.0, buffer_duration)
    }

    /// Clamp into `[0, buffer_duration]` with `out_time >= in_time`
    pub fn clamped(&self, buffer_duration: f64) -> Self {
        let duration = if buffer_duration.is_nan() {
            0.0
        } else {
            buffer_duration.max(0.0)
        };
        let clamp = |t: f64| if t.is_nan() { 0.0 } else { t.clamp(0.0, duration) };
        let in_time = clamp(self.in_time);
        let out_time = clamp(self.out_time).max(in_time);
        Self { in_time, out_time }
    }

    pub fn duration(&self) -> f64 {
        (self.out_time - self.in_time).max(0.0)
    }

    /// Source frame range of an already clamped selection
    ///
    /// The start is rounded from `in_time` and the length from the
    /// selection duration, so an uncut bake of `[in, out]` is exactly
    /// `round((out - in) * sample_rate)` frames unless the buffer ends
    /// first.
    pub fn to_frames(&self, sample_rate: u32, frame_count: usize) -> SampleSpan {
        let start = time_to_frame(self.in_time, sample_rate).min(frame_count);
        let len = time_to_frame(self.duration(), sample_rate);
        SampleSpan::new(start, (start + len).min(frame_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.25, 8000 => 2000 ; "exact")]
    #[test_case(0.00006, 8000 => 0 ; "rounds down")]
    #[test_case(0.00007, 8000 => 1 ; "rounds up")]
    #[test_case(-1.0, 8000 => 0 ; "negative")]
    #[test_case(f64::NAN, 8000 => 0 ; "nan")]
    fn test_time_to_frame(t: f64, rate: u32) -> usize {
        time_to_frame(t, rate)
    }

    #[test]
    fn test_clamped() {
        let sel = Selection::new(-1.0, 12.0).clamped(10.0);
        assert_eq!(sel, Selection::new(0.0, 10.0));

        let inverted = Selection::new(6.0, 2.0).clamped(10.0);
        assert_eq!(inverted, Selection::new(6.0, 6.0));
        assert_eq!(inverted.duration(), 0.0);
    }

    #[test]
    fn test_to_frames_clamps_to_buffer() {
        let span = Selection::new(0.5, 1.0).to_frames(8000, 6000);
        assert_eq!(span, SampleSpan::new(4000, 6000));
        assert_eq!(span.len(), 2000);
    }

    #[test]
    fn test_to_frames_length_rounds_from_duration() {
        // round(0.36 * 10) - round(0.24 * 10) would be 4 - 2 = 2
        let span = Selection::new(0.24, 0.36).to_frames(10, 100);
        assert_eq!(span, SampleSpan::new(2, 3));
    }

    #[test]
    fn test_span_len() {
        assert_eq!(SampleSpan::new(3, 7).len(), 4);
        assert!(SampleSpan::new(7, 3).is_empty());
        assert_eq!(SampleSpan::new(7, 3).len(), 0);
    }
}
