//! Fade Math
//!
//! Linear gain ramps over interleaved sample slices. Every function takes
//! the channel count and works in whole frames so a ramp never splits a
//! frame between two gains.

/// Convert a fade length in milliseconds to whole frames
///
/// Rounds to the nearest frame, so 5 ms at 8000 Hz is exactly 40 frames.
#[inline]
pub fn fade_frames(sample_rate: u32, fade_ms: u32) -> usize {
    (sample_rate as f64 * fade_ms as f64 / 1000.0).round() as usize
}

/// Overlap-add the head of `incoming` onto the tail already in `dst`
///
/// Both slices hold `frames` interleaved frames. The outgoing weight falls
/// as `1 - n/frames` and the incoming weight rises as `n/frames`, so the
/// two always sum to one.
pub fn crossfade_overlap_add(dst: &mut [f32], incoming: &[f32], channels: usize, frames: usize) {
    if frames == 0 {
        return;
    }
    let span = frames * channels;
    let denom = frames as f32;

    for (n, (out_frame, in_frame)) in dst[..span]
        .chunks_exact_mut(channels)
        .zip(incoming[..span].chunks_exact(channels))
        .enumerate()
    {
        let b = n as f32 / denom;
        let a = 1.0 - b;
        for (out, &inc) in out_frame.iter_mut().zip(in_frame) {
            *out = *out * a + inc * b;
        }
    }
}

/// Scale `samples` by a gain falling from `1 - 1/frames` to exactly 0
pub fn apply_fade_out(samples: &mut [f32], channels: usize, frames: usize) {
    if frames == 0 {
        return;
    }
    let denom = frames as f32;
    for (n, frame) in samples[..frames * channels]
        .chunks_exact_mut(channels)
        .enumerate()
    {
        let gain = 1.0 - (n + 1) as f32 / denom;
        frame.iter_mut().for_each(|s| *s *= gain);
    }
}

/// Scale `samples` by a gain rising from `1/frames` to exactly 1
pub fn apply_fade_in(samples: &mut [f32], channels: usize, frames: usize) {
    if frames == 0 {
        return;
    }
    let denom = frames as f32;
    for (n, frame) in samples[..frames * channels]
        .chunks_exact_mut(channels)
        .enumerate()
    {
        let gain = (n + 1) as f32 / denom;
        frame.iter_mut().for_each(|s| *s *= gain);
    }
}

/// Silence a span with a fade-out at its start and a fade-in at its end
///
/// The fade is truncated to half the span. Returns the fade length used.
pub fn apply_mute(samples: &mut [f32], channels: usize, fade: usize) -> usize {
    let frames = samples.len() / channels;
    let fade = fade.min(frames / 2);
    let body_start = fade * channels;
    let body_end = (frames - fade) * channels;

    apply_fade_out(&mut samples[..body_start], channels, fade);
    samples[body_start..body_end].fill(0.0);
    apply_fade_in(&mut samples[body_end..], channels, fade);

    fade
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test_case(8000, 5 => 40 ; "five ms at 8 kHz")]
    #[test_case(44100, 10 => 441 ; "ten ms at 44.1 kHz")]
    #[test_case(48000, 0 => 0 ; "disabled")]
    #[test_case(44100, 1 => 44 ; "rounds down")]
    #[test_case(500, 1 => 1 ; "rounds half frame up")]
    fn test_fade_frames(rate: u32, ms: u32) -> usize {
        fade_frames(rate, ms)
    }

    #[test]
    fn test_crossfade_weights() {
        let mut dst = vec![1.0; 4];
        let incoming = vec![0.0; 4];
        crossfade_overlap_add(&mut dst, &incoming, 1, 4);
        assert_eq!(dst, vec![1.0, 0.75, 0.5, 0.25]);
    }

    #[test]
    fn test_crossfade_constant_signal_is_unchanged() {
        let mut dst = vec![0.5; 20];
        let incoming = vec![0.5; 20];
        crossfade_overlap_add(&mut dst, &incoming, 2, 10);
        for s in dst {
            assert_relative_eq!(s, 0.5, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_crossfade_is_per_channel() {
        let mut dst = vec![1.0, -1.0, 1.0, -1.0];
        let incoming = vec![0.0, 0.0, 0.0, 0.0];
        crossfade_overlap_add(&mut dst, &incoming, 2, 2);
        assert_eq!(dst, vec![1.0, -1.0, 0.5, -0.5]);
    }

    #[test]
    fn test_zero_length_fades_are_noops() {
        let mut samples = vec![0.3; 6];
        crossfade_overlap_add(&mut samples, &[], 2, 0);
        apply_fade_out(&mut samples, 2, 0);
        apply_fade_in(&mut samples, 2, 0);
        assert_eq!(samples, vec![0.3; 6]);
    }

    #[test]
    fn test_fade_out_reaches_zero() {
        let mut samples = vec![1.0; 4];
        apply_fade_out(&mut samples, 1, 4);
        assert_eq!(samples, vec![0.75, 0.5, 0.25, 0.0]);
    }

    #[test]
    fn test_fade_in_reaches_unity() {
        let mut samples = vec![1.0; 4];
        apply_fade_in(&mut samples, 1, 4);
        assert_eq!(samples, vec![0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_mute_shape() {
        let mut samples = vec![1.0; 10];
        let used = apply_mute(&mut samples, 1, 2);
        assert_eq!(used, 2);
        assert_eq!(
            samples,
            vec![0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.5, 1.0]
        );
    }

    #[test]
    fn test_mute_truncates_fade_to_half_span() {
        let mut samples = vec![1.0; 6];
        let used = apply_mute(&mut samples, 2, 100);
        assert_eq!(used, 1);
        assert_eq!(samples, vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_mute_scales_existing_values() {
        let mut samples = vec![0.2, -0.4, 0.2, -0.4, 0.2, -0.4, 0.2, -0.4];
        apply_mute(&mut samples, 2, 2);
        assert_relative_eq!(samples[0], 0.1);
        assert_relative_eq!(samples[1], -0.2);
        assert_eq!(samples[2], 0.0);
        assert_eq!(samples[5], -0.4 * 0.5);
        assert_relative_eq!(samples[7], -0.4);
    }
}
