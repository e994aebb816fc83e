//! Selection Baker
//!
//! Second pass of a bake: renders a [`BakePlan`] into a new buffer by
//! concatenating the keep intervals with crossfaded seams, then applying
//! mutes on the output timeline.

use log::{debug, info, warn};
use serde::Serialize;

use crate::config::EditorConfig;
use crate::dsp::fade::{apply_mute, crossfade_overlap_add};
use crate::edit::plan::{BakePlan, KeepInterval, MuteCutPolicy};
use crate::edit::region::RegionSet;
use crate::edit::selection::Selection;
use crate::engine::buffer::AudioBuffer;
use crate::error::Result;

/// Default fade length applied at seams and mute edges
pub const DEFAULT_FADE_MS: u32 = 10;

/// Crossfade applied where two keep intervals meet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeamFade {
    /// Output frame where the overlap begins
    pub dst_offset: usize,
    /// Overlap length; the output is this much shorter than a hard join
    pub fade_frames: usize,
}

/// What a bake did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BakeReport {
    pub selection_frames: usize,
    pub output_frames: usize,
    pub keep_intervals: Vec<KeepInterval>,
    pub seams: Vec<SeamFade>,
    pub mutes_applied: usize,
    /// Mutes that fell entirely inside removed audio
    pub mutes_collapsed: usize,
    /// No cut or mute touched the selection; the output is a plain copy
    pub no_op: bool,
}

/// A baked buffer together with its report
#[derive(Debug, Clone)]
pub struct BakeOutcome {
    pub buffer: AudioBuffer,
    pub report: BakeReport,
}

/// Renders a selection with its mute and cut regions applied
///
/// Holds the selection slice and one output buffer in memory at once, so
/// memory grows with the selection length. There is no streaming mode.
///
/// # Example
/// ```
/// use regionbake::edit::{EditRegion, RegionSet, Selection, SelectionBaker};
/// use regionbake::engine::AudioBuffer;
///
/// let source = AudioBuffer::filled(8000, 1, 8000, 0.5).unwrap();
/// let regions = RegionSet::from_regions(vec![EditRegion::cut(0.25, 0.5)]);
///
/// let baked = SelectionBaker::new(0)
///     .bake(&source, Selection::whole(1.0), &regions)
///     .unwrap();
/// assert_eq!(baked.frame_count(), 6000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionBaker {
    fade_ms: u32,
    policy: MuteCutPolicy,
}

impl SelectionBaker {
    pub fn new(fade_ms: u32) -> Self {
        Self {
            fade_ms,
            policy: MuteCutPolicy::default(),
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            fade_ms: config.fade_ms,
            policy: config.mute_cut_policy,
        }
    }

    pub fn with_policy(mut self, policy: MuteCutPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn fade_ms(&self) -> u32 {
        self.fade_ms
    }

    pub fn policy(&self) -> MuteCutPolicy {
        self.policy
    }

    /// Plan without rendering
    pub fn plan(
        &self,
        buffer: &AudioBuffer,
        selection: Selection,
        regions: &RegionSet,
    ) -> Result<BakePlan> {
        BakePlan::build(buffer, selection, regions, self.fade_ms, self.policy)
    }

    /// Render a new buffer; see [`bake_with_report`](Self::bake_with_report)
    pub fn bake(
        &self,
        buffer: &AudioBuffer,
        selection: Selection,
        regions: &RegionSet,
    ) -> Result<AudioBuffer> {
        self.bake_with_report(buffer, selection, regions)
            .map(|outcome| outcome.buffer)
    }

    /// Render a new buffer and report what was done
    ///
    /// # Errors
    /// * `InvalidArgument` - the buffer holds no frames
    /// * `EmptySelection` - the clamped selection spans zero frames
    pub fn bake_with_report(
        &self,
        buffer: &AudioBuffer,
        selection: Selection,
        regions: &RegionSet,
    ) -> Result<BakeOutcome> {
        let plan = self.plan(buffer, selection, regions)?;
        render(buffer, &plan)
    }
}

impl Default for SelectionBaker {
    fn default() -> Self {
        Self::new(DEFAULT_FADE_MS)
    }
}

/// Bake `selection` of `buffer` with `regions` applied
///
/// Shorthand for `SelectionBaker::new(fade_ms).bake(..)` with the default
/// mute/cut policy.
pub fn bake(
    buffer: &AudioBuffer,
    selection: Selection,
    regions: &RegionSet,
    fade_ms: u32,
) -> Result<AudioBuffer> {
    SelectionBaker::new(fade_ms).bake(buffer, selection, regions)
}

/// Render a plan against the buffer it was built from
pub fn render(buffer: &AudioBuffer, plan: &BakePlan) -> Result<BakeOutcome> {
    let channels = buffer.channels() as usize;
    let segment = buffer.copy_frames(plan.source.start, plan.source.end);

    if plan.is_noop() {
        debug!("No region touches the selection, returning a copy");
        let report = BakeReport {
            selection_frames: plan.selection_frames(),
            output_frames: plan.selection_frames(),
            keep_intervals: plan.keeps.clone(),
            seams: Vec::new(),
            mutes_applied: 0,
            mutes_collapsed: 0,
            no_op: true,
        };
        let buffer = AudioBuffer::new(buffer.sample_rate(), buffer.channels(), segment)?;
        return Ok(BakeOutcome { buffer, report });
    }

    let mut dst: Vec<f32> = Vec::with_capacity(plan.output_frames() * channels);
    let mut seams = Vec::with_capacity(plan.seam_fades.len());

    for (i, keep) in plan.keeps.iter().enumerate() {
        let src = &segment[keep.start * channels..keep.end * channels];
        let head = if i == 0 { 0 } else { plan.seam_fades[i - 1] };

        if i > 0 {
            let tail_start = dst.len() - head * channels;
            debug_assert_eq!(plan.map.dst_base(i), Some(tail_start / channels));
            crossfade_overlap_add(&mut dst[tail_start..], &src[..head * channels], channels, head);
            seams.push(SeamFade {
                dst_offset: tail_start / channels,
                fade_frames: head,
            });
        }
        dst.extend_from_slice(&src[head * channels..]);
    }
    debug_assert_eq!(dst.len(), plan.output_frames() * channels);

    if plan.keeps.is_empty() {
        warn!(
            "Cuts cover the whole selection ({} frames), output is empty",
            plan.selection_frames()
        );
    }

    let mut mutes_applied = 0;
    let mut mutes_collapsed = 0;
    for mute in &plan.mutes {
        let target = match plan.map.footprint(*mute) {
            Some(target) => target,
            None => {
                warn!(
                    "Mute {}..{} lies inside removed audio and has no effect",
                    mute.start, mute.end
                );
                mutes_collapsed += 1;
                continue;
            }
        };
        let used = apply_mute(
            &mut dst[target.start * channels..target.end * channels],
            channels,
            plan.fade_frames,
        );
        debug!(
            "Mute {}..{} -> output {}..{} (fade {} frames)",
            mute.start, mute.end, target.start, target.end, used
        );
        mutes_applied += 1;
    }

    let report = BakeReport {
        selection_frames: plan.selection_frames(),
        output_frames: plan.output_frames(),
        keep_intervals: plan.keeps.clone(),
        seams,
        mutes_applied,
        mutes_collapsed,
        no_op: false,
    };

    info!(
        "Baked {} frames into {} ({} seams, {} mutes applied, {} collapsed)",
        report.selection_frames,
        report.output_frames,
        report.seams.len(),
        report.mutes_applied,
        report.mutes_collapsed
    );

    let buffer = AudioBuffer::new(buffer.sample_rate(), buffer.channels(), dst)?;
    Ok(BakeOutcome { buffer, report })
}
