//! Edit Regions
//!
//! User-authored time intervals tagged Mute or Cut. A [`RegionSet`] is a
//! value: editing operations return a new set instead of mutating a shared
//! list, and the baker normalizes whatever snapshot it is handed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a region does to the audio it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionAction {
    /// Silence the audio, keeping its duration
    Mute,
    /// Remove the audio, closing the gap
    Cut,
}

impl fmt::Display for RegionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionAction::Mute => write!(f, "mute"),
            RegionAction::Cut => write!(f, "cut"),
        }
    }
}

/// A time interval in seconds plus the action applied to it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditRegion {
    pub start: f64,
    pub end: f64,
    pub action: RegionAction,
}

impl EditRegion {
    pub fn new(start: f64, end: f64, action: RegionAction) -> Self {
        Self { start, end, action }
    }

    pub fn mute(start: f64, end: f64) -> Self {
        Self::new(start, end, RegionAction::Mute)
    }

    pub fn cut(start: f64, end: f64) -> Self {
        Self::new(start, end, RegionAction::Cut)
    }

    /// Length in seconds (zero for inverted regions)
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Clamp both ends into `[0, duration]` and force `end >= start`
    ///
    /// NaN times clamp to 0.
    pub fn clamped(&self, duration: f64) -> Self {
        let start = clamp_time(self.start, duration);
        let end = clamp_time(self.end, duration).max(start);
        Self::new(start, end, self.action)
    }
}

fn clamp_time(t: f64, duration: f64) -> f64 {
    let duration = if duration.is_nan() { 0.0 } else { duration.max(0.0) };
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, duration)
    }
}

/// Ordered collection of edit regions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionSet {
    regions: Vec<EditRegion>,
}

impl RegionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a snapshot of regions as-is, without normalizing
    pub fn from_regions(regions: Vec<EditRegion>) -> Self {
        Self { regions }
    }

    pub fn regions(&self) -> &[EditRegion] {
        &self.regions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EditRegion> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Number of regions with the given action
    pub fn count(&self, action: RegionAction) -> usize {
        self.regions.iter().filter(|r| r.action == action).count()
    }

    /// A copy of this set with `region` appended
    pub fn with_region(&self, region: EditRegion) -> Self {
        let mut regions = self.regions.clone();
        regions.push(region);
        Self { regions }
    }

    /// A copy of this set without the region at `index`
    ///
    /// An out-of-range index yields an unchanged copy.
    pub fn without_region(&self, index: usize) -> Self {
        let regions = self
            .regions
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != index)
            .map(|(_, r)| *r)
            .collect();
        Self { regions }
    }

    /// An empty set
    pub fn cleared(&self) -> Self {
        Self::new()
    }

    /// Normalized copy for a buffer of `buffer_duration` seconds
    pub fn normalized(&self, buffer_duration: f64) -> Self {
        normalize_regions(&self.regions, buffer_duration)
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a EditRegion;
    type IntoIter = std::slice::Iter<'a, EditRegion>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

impl FromIterator<EditRegion> for RegionSet {
    fn from_iter<I: IntoIterator<Item = EditRegion>>(iter: I) -> Self {
        Self {
            regions: iter.into_iter().collect(),
        }
    }
}

/// Clamp, sort and merge a region snapshot
///
/// Every region is clamped into `[0, buffer_duration]`, then the list is
/// stable-sorted by start. A single sweep merges each region into the
/// latest earlier region with the same action when they overlap or touch.
/// Regions with different actions are never merged and may still overlap.
///
/// Never fails: out-of-range input is clamped rather than rejected.
pub fn normalize_regions(regions: &[EditRegion], buffer_duration: f64) -> RegionSet {
    let mut clamped: Vec<EditRegion> = regions
        .iter()
        .map(|r| r.clamped(buffer_duration))
        .collect();
    clamped.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<EditRegion> = Vec::with_capacity(clamped.len());
    let mut last_mute: Option<usize> = None;
    let mut last_cut: Option<usize> = None;

    for region in clamped {
        let last = match region.action {
            RegionAction::Mute => &mut last_mute,
            RegionAction::Cut => &mut last_cut,
        };
        let current = *last;
        match current {
            Some(idx) if region.start <= merged[idx].end => {
                merged[idx].end = merged[idx].end.max(region.end);
            }
            _ => {
                *last = Some(merged.len());
                merged.push(region);
            }
        }
    }

    RegionSet { regions: merged }
}
