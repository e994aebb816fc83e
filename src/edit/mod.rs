//! Region Editing
//!
//! Mute/Cut regions, selections and the two-pass bake:
//! - `region`: region snapshots and normalization
//! - `selection`: in/out window and time-to-frame conversion
//! - `plan`: keep intervals, seam fades and the output coordinate map
//! - `bake`: rendering a plan into a new buffer

pub mod bake;
pub mod plan;
pub mod region;
pub mod selection;

pub use bake::{bake, render, BakeOutcome, BakeReport, SeamFade, SelectionBaker, DEFAULT_FADE_MS};
pub use plan::{BakePlan, DestinationMap, KeepInterval, MuteCutPolicy};
pub use region::{normalize_regions, EditRegion, RegionAction, RegionSet};
pub use selection::{time_to_frame, SampleSpan, Selection};
