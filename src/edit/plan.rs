//! Bake Planning
//!
//! First pass of a bake. Resolves the selection, regions and fade length
//! into frame-exact interval maps over the whole selection before any
//! audio is copied:
//! - merged cut spans and mute spans, selection-local
//! - keep intervals (the complement of the cuts)
//! - the crossfade length at every seam
//! - the [`DestinationMap`] from selection frames to output frames
//!
//! Crossfades and the destination map both need whole-selection knowledge,
//! which is why planning and rendering are separate passes.

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dsp::fade::fade_frames;
use crate::edit::region::{RegionAction, RegionSet};
use crate::edit::selection::{time_to_frame, SampleSpan, Selection};
use crate::engine::buffer::AudioBuffer;
use crate::error::{BakeError, Result};

/// A contiguous span of the selection that survives the cuts
pub type KeepInterval = SampleSpan;

/// How overlapping Mute and Cut regions are reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MuteCutPolicy {
    /// Cuts ignore mutes. The part of a mute inside removed audio vanishes
    /// with it; a mute entirely inside a cut has no effect.
    #[default]
    CutWins,
    /// Mutes are subtracted from cuts first, so audio under both is kept
    /// in the timeline and silenced.
    MuteWins,
}

impl fmt::Display for MuteCutPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MuteCutPolicy::CutWins => write!(f, "cut-wins"),
            MuteCutPolicy::MuteWins => write!(f, "mute-wins"),
        }
    }
}

impl FromStr for MuteCutPolicy {
    type Err = BakeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cut-wins" => Ok(MuteCutPolicy::CutWins),
            "mute-wins" => Ok(MuteCutPolicy::MuteWins),
            other => Err(BakeError::invalid(format!(
                "unknown mute/cut policy '{}' (expected cut-wins or mute-wins)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MapEntry {
    sel_start: usize,
    len: usize,
    dst_base: usize,
}

/// Maps selection-local frames onto the compressed output timeline
///
/// Keep interval `i` is written at `dst_base(i)` and spans its full length
/// there. Its last `fade` frames overlap the head of interval `i + 1`, so
/// each base advances by `len - fade` where `fade` is the crossfade shared
/// with the next interval.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationMap {
    entries: Vec<MapEntry>,
    output_frames: usize,
}

impl DestinationMap {
    /// Build the map for `keeps`, where `seam_fades[i]` is the crossfade
    /// between `keeps[i]` and `keeps[i + 1]`
    pub fn new(keeps: &[KeepInterval], seam_fades: &[usize]) -> Self {
        let mut entries = Vec::with_capacity(keeps.len());
        let mut base = 0;
        for (i, keep) in keeps.iter().enumerate() {
            let shared = seam_fades.get(i).copied().unwrap_or(0);
            entries.push(MapEntry {
                sel_start: keep.start,
                len: keep.len(),
                dst_base: base,
            });
            base += keep.len().saturating_sub(shared);
        }
        Self {
            entries,
            output_frames: base,
        }
    }

    /// Output frames that carry any of the selection-local `span`
    ///
    /// Kept frames in a crossfaded tail land inside the overlap after their
    /// interval, and a span reaching across a cut covers the head of the
    /// next interval from its first frame. Returns `None` when `span` lies
    /// entirely inside cuts.
    pub fn footprint(&self, span: SampleSpan) -> Option<SampleSpan> {
        let first = self
            .entries
            .partition_point(|e| e.sel_start + e.len <= span.start);

        let mut covered: Option<SampleSpan> = None;
        for entry in self.entries[first..]
            .iter()
            .take_while(|e| e.sel_start < span.end)
        {
            let lo = span.start.max(entry.sel_start) - entry.sel_start;
            let hi = span.end.min(entry.sel_start + entry.len) - entry.sel_start;
            if hi <= lo {
                continue;
            }
            let piece = SampleSpan::new(entry.dst_base + lo, entry.dst_base + hi);
            covered = Some(match covered {
                Some(c) => SampleSpan::new(c.start.min(piece.start), c.end.max(piece.end)),
                None => piece,
            });
        }
        covered
    }

    /// Output offset at which keep interval `index` starts
    pub fn dst_base(&self, index: usize) -> Option<usize> {
        self.entries.get(index).map(|e| e.dst_base)
    }

    /// Total output length in frames
    pub fn output_frames(&self) -> usize {
        self.output_frames
    }
}

/// Frame-exact description of a bake, computed before rendering
#[derive(Debug, Clone, PartialEq)]
pub struct BakePlan {
    /// The selection in source frames
    pub source: SampleSpan,
    /// Merged cut spans, selection-local
    pub cuts: Vec<SampleSpan>,
    /// Mute spans, selection-local, sorted by start
    pub mutes: Vec<SampleSpan>,
    pub keeps: Vec<KeepInterval>,
    /// Crossfade length between `keeps[i]` and `keeps[i + 1]`
    pub seam_fades: Vec<usize>,
    /// Configured fade length in frames
    pub fade_frames: usize,
    pub map: DestinationMap,
}

impl BakePlan {
    /// Plan a bake of `selection` from `buffer`
    ///
    /// `regions` is normalized against the buffer duration here, so callers
    /// may pass a raw snapshot.
    ///
    /// # Errors
    /// * `InvalidArgument` - the buffer holds no frames
    /// * `EmptySelection` - the clamped selection spans zero frames
    pub fn build(
        buffer: &AudioBuffer,
        selection: Selection,
        regions: &RegionSet,
        fade_ms: u32,
        policy: MuteCutPolicy,
    ) -> Result<Self> {
        if buffer.is_empty() {
            return Err(BakeError::invalid("cannot bake an empty buffer"));
        }

        let duration = buffer.duration_secs();
        let sample_rate = buffer.sample_rate();
        let clamped = selection.clamped(duration);
        let source = clamped.to_frames(sample_rate, buffer.frame_count() as usize);
        if source.is_empty() {
            return Err(BakeError::EmptySelection {
                in_time: selection.in_time,
                out_time: selection.out_time,
            });
        }

        let seg_len = source.len();
        let regions = regions.normalized(duration);

        let mut cuts = Vec::new();
        let mut mutes = Vec::new();
        for region in &regions {
            let lo = region.start.max(clamped.in_time);
            let hi = region.end.min(clamped.out_time);
            if hi <= lo {
                continue;
            }
            let span = SampleSpan::new(
                time_to_frame(lo - clamped.in_time, sample_rate).min(seg_len),
                time_to_frame(hi - clamped.in_time, sample_rate).min(seg_len),
            );
            if span.is_empty() {
                continue;
            }
            match region.action {
                RegionAction::Cut => cuts.push(span),
                RegionAction::Mute => mutes.push(span),
            }
        }

        let mut cuts = merge_spans(cuts);
        mutes.sort_by_key(|s| s.start);
        if policy == MuteCutPolicy::MuteWins {
            cuts = subtract_spans(&cuts, &mutes);
        }

        let keeps = keep_intervals(&cuts, seg_len);
        let fade = fade_frames(sample_rate, fade_ms);
        let seam_fades: Vec<usize> = keeps
            .windows(2)
            .map(|pair| fade.min(pair[0].len()).min(pair[1].len()))
            .collect();
        let map = DestinationMap::new(&keeps, &seam_fades);

        debug!(
            "Bake plan: source {}..{} ({} frames), {} cuts, {} mutes, {} keeps, fade {} frames, policy {} -> {} frames",
            source.start,
            source.end,
            seg_len,
            cuts.len(),
            mutes.len(),
            keeps.len(),
            fade,
            policy,
            map.output_frames()
        );

        Ok(Self {
            source,
            cuts,
            mutes,
            keeps,
            seam_fades,
            fade_frames: fade,
            map,
        })
    }

    /// Length of the selection in frames
    pub fn selection_frames(&self) -> usize {
        self.source.len()
    }

    /// Length of the rendered output in frames
    pub fn output_frames(&self) -> usize {
        self.map.output_frames()
    }

    /// True when no cut or mute touches the selection
    pub fn is_noop(&self) -> bool {
        self.cuts.is_empty() && self.mutes.is_empty()
    }
}

/// Sort spans and merge any that overlap or touch
pub fn merge_spans(mut spans: Vec<SampleSpan>) -> Vec<SampleSpan> {
    spans.sort_by_key(|s| s.start);
    let mut merged: Vec<SampleSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(prev) if span.start <= prev.end => prev.end = prev.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Remove every `hole` from `spans`
///
/// Both inputs must be sorted by start; `spans` must not overlap.
pub fn subtract_spans(spans: &[SampleSpan], holes: &[SampleSpan]) -> Vec<SampleSpan> {
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        let mut cursor = span.start;
        for hole in holes {
            if hole.start >= span.end {
                break;
            }
            if hole.end <= cursor {
                continue;
            }
            if hole.start > cursor {
                out.push(SampleSpan::new(cursor, hole.start));
            }
            cursor = cursor.max(hole.end);
            if cursor >= span.end {
                break;
            }
        }
        if cursor < span.end {
            out.push(SampleSpan::new(cursor, span.end));
        }
    }
    out
}

/// Complement of the merged `cuts` within `[0, len)`
pub fn keep_intervals(cuts: &[SampleSpan], len: usize) -> Vec<KeepInterval> {
    let mut keeps = Vec::with_capacity(cuts.len() + 1);
    let mut cursor = 0;
    for cut in cuts {
        if cut.start > cursor {
            keeps.push(KeepInterval::new(cursor, cut.start.min(len)));
        }
        cursor = cursor.max(cut.end);
    }
    if cursor < len {
        keeps.push(KeepInterval::new(cursor, len));
    }
    keeps
}
