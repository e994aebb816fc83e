//! Region Normalization Tests

use pretty_assertions::assert_eq;

use regionbake::edit::{EditRegion, RegionAction, RegionSet};
use regionbake::normalize_regions;

/// A messy snapshot: unsorted, overlapping, out of range and inverted
fn messy_snapshot() -> Vec<EditRegion> {
    vec![
        EditRegion::cut(4.0, 6.0),
        EditRegion::mute(1.0, 3.0),
        EditRegion::mute(0.0, 2.0),
        EditRegion::cut(5.5, 7.0),
        EditRegion::mute(-3.0, 0.5),
        EditRegion::cut(9.0, 20.0),
        EditRegion::mute(8.0, 7.5),
        EditRegion::cut(f64::NAN, 1.0),
        EditRegion::mute(2.5, 4.5),
        EditRegion::cut(7.0, 8.0),
    ]
}

#[test]
fn test_normalize_is_idempotent() {
    let once = normalize_regions(&messy_snapshot(), 10.0);
    let twice = once.normalized(10.0);
    assert_eq!(twice, once);
}

#[test]
fn test_overlapping_mutes_merge() {
    let regions = vec![EditRegion::mute(0.0, 2.0), EditRegion::mute(1.0, 3.0)];
    let normalized = normalize_regions(&regions, 10.0);
    assert_eq!(normalized.regions(), &[EditRegion::mute(0.0, 3.0)]);
}

#[test]
fn test_touching_regions_merge() {
    let regions = vec![EditRegion::cut(2.0, 3.0), EditRegion::cut(1.0, 2.0)];
    let normalized = normalize_regions(&regions, 10.0);
    assert_eq!(normalized.regions(), &[EditRegion::cut(1.0, 3.0)]);
}

#[test]
fn test_mixed_actions_stay_separate() {
    let regions = vec![EditRegion::mute(0.0, 2.0), EditRegion::cut(1.0, 3.0)];
    let normalized = normalize_regions(&regions, 10.0);
    assert_eq!(
        normalized.regions(),
        &[EditRegion::mute(0.0, 2.0), EditRegion::cut(1.0, 3.0)]
    );
}

#[test]
fn test_same_action_merges_across_other_action() {
    let regions = vec![
        EditRegion::mute(0.0, 4.0),
        EditRegion::cut(1.0, 2.0),
        EditRegion::mute(3.0, 5.0),
    ];
    let normalized = normalize_regions(&regions, 10.0);
    assert_eq!(
        normalized.regions(),
        &[EditRegion::mute(0.0, 5.0), EditRegion::cut(1.0, 2.0)]
    );
}

#[test]
fn test_normalized_output_properties() {
    let normalized = normalize_regions(&messy_snapshot(), 10.0);

    for region in &normalized {
        assert!(region.start >= 0.0 && region.end <= 10.0, "{:?} out of range", region);
        assert!(region.start <= region.end, "{:?} inverted", region);
    }
    for pair in normalized.regions().windows(2) {
        assert!(pair[0].start <= pair[1].start, "not sorted: {:?}", pair);
    }
    for action in [RegionAction::Mute, RegionAction::Cut] {
        let same: Vec<&EditRegion> = normalized.iter().filter(|r| r.action == action).collect();
        for pair in same.windows(2) {
            assert!(
                pair[0].end < pair[1].start,
                "{} regions still overlap: {:?}",
                action,
                pair
            );
        }
    }
}

#[test]
fn test_clamping() {
    let regions = vec![EditRegion::cut(-1.0, 0.5), EditRegion::mute(9.0, 15.0)];
    let normalized = normalize_regions(&regions, 10.0);
    assert_eq!(
        normalized.regions(),
        &[EditRegion::cut(0.0, 0.5), EditRegion::mute(9.0, 10.0)]
    );
}

#[test]
fn test_set_edits_return_new_values() {
    let base = RegionSet::new().with_region(EditRegion::mute(1.0, 2.0));
    let grown = base.with_region(EditRegion::cut(3.0, 4.0));

    assert_eq!(base.len(), 1);
    assert_eq!(grown.len(), 2);
    assert_eq!(grown.count(RegionAction::Cut), 1);

    let shrunk = grown.without_region(0);
    assert_eq!(shrunk.regions(), &[EditRegion::cut(3.0, 4.0)]);
    assert!(grown.cleared().is_empty());
    assert_eq!(grown.len(), 2);
}

#[test]
fn test_region_document_json_shape() {
    let json = r#"[
        { "start": 0.5, "end": 1.0, "action": "cut" },
        { "start": 0.0, "end": 0.25, "action": "mute" }
    ]"#;
    let set: RegionSet = serde_json::from_str(json).unwrap();
    assert_eq!(set.count(RegionAction::Cut), 1);

    let normalized = set.normalized(2.0);
    assert_eq!(normalized.regions()[0], EditRegion::mute(0.0, 0.25));
}
