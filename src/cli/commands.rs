//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::info;

use crate::cli::document::RegionDocument;
use crate::config::EditorConfig;
use crate::edit::{normalize_regions, MuteCutPolicy, Selection, SelectionBaker};
use crate::engine::{
    build_envelope, calculate_peak, calculate_rms, export_wav, import_wav, ExportFormat,
};
use crate::error::Result;

/// Options for the `bake` command that override the config file
#[derive(Debug, Clone, Default)]
pub struct BakeOverrides {
    pub in_time: Option<f64>,
    pub out_time: Option<f64>,
    pub fade_ms: Option<u32>,
    pub policy: Option<MuteCutPolicy>,
    pub bit_depth: Option<u16>,
}

/// Show format, levels and digest of a WAV file.
pub fn show_info(input: &Path) -> Result<()> {
    info!("Reading: {}", input.display());

    let buffer = import_wav(input)?;

    println!("File:        {}", input.display());
    println!("Sample rate: {} Hz", buffer.sample_rate());
    println!("Channels:    {}", buffer.channels());
    println!("Frames:      {}", buffer.frame_count());
    println!("Duration:    {:.3}s", buffer.duration_secs());
    println!("Peak:        {:.2} dBFS", calculate_peak(&buffer));
    println!("RMS:         {:.2} dBFS", calculate_rms(&buffer));
    println!("SHA-256:     {}", buffer.content_digest());

    Ok(())
}

/// Print the waveform envelope of a WAV file.
pub fn show_envelope(
    input: &Path,
    config: &EditorConfig,
    width: Option<u32>,
    chunk_frames: Option<u32>,
    json: bool,
) -> Result<()> {
    let width = width.unwrap_or(config.envelope_width);
    let chunk_frames = chunk_frames.unwrap_or(config.chunk_frames);
    info!(
        "Building envelope of {} ({} columns, {} frames/chunk)",
        input.display(),
        width,
        chunk_frames
    );

    let buffer = import_wav(input)?;
    let envelope = build_envelope(&buffer, width, chunk_frames)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    for (i, column) in envelope.columns().iter().enumerate() {
        println!("{:>6} {:>10.6} {:>10.6}", i, column.min, column.max);
    }

    Ok(())
}

/// Normalize a region document and print the result.
pub fn normalize(regions: &Path, duration: f64) -> Result<()> {
    info!("Normalizing {} against {:.3}s", regions.display(), duration);

    let document = RegionDocument::load(regions)?;
    let normalized = normalize_regions(document.regions.regions(), duration);

    println!("{}", serde_json::to_string_pretty(&normalized)?);

    Ok(())
}

/// Bake a selection of a WAV file with its regions applied.
pub fn bake(
    input: &Path,
    regions: &Path,
    output: &Path,
    config: &EditorConfig,
    overrides: &BakeOverrides,
) -> Result<()> {
    info!("Baking {} with regions from {}", input.display(), regions.display());

    let buffer = import_wav(input)?;
    let document = RegionDocument::load(regions)?;

    let duration = buffer.duration_secs();
    let base = document.selection.unwrap_or_else(|| Selection::whole(duration));
    let selection = Selection::new(
        overrides.in_time.unwrap_or(base.in_time),
        overrides.out_time.unwrap_or(base.out_time),
    );
    let region_set = document.regions.normalized(duration);

    let baker = SelectionBaker::new(overrides.fade_ms.unwrap_or(config.fade_ms))
        .with_policy(overrides.policy.unwrap_or(config.mute_cut_policy));
    let format = overrides
        .bit_depth
        .map(ExportFormat::new)
        .unwrap_or(config.export);
    format.validate()?;

    let outcome = baker.bake_with_report(&buffer, selection, &region_set)?;
    export_wav(&outcome.buffer, output, format)?;

    let report = &outcome.report;
    println!(
        "Baked {:.3}s..{:.3}s of {} -> {}",
        selection.in_time,
        selection.out_time,
        input.display(),
        output.display()
    );
    println!(
        "Frames: {} -> {} ({} keep intervals, {} seams)",
        report.selection_frames,
        report.output_frames,
        report.keep_intervals.len(),
        report.seams.len()
    );
    for seam in &report.seams {
        println!(
            "  seam at frame {} ({} frame crossfade)",
            seam.dst_offset, seam.fade_frames
        );
    }
    println!(
        "Mutes: {} applied, {} collapsed under cuts",
        report.mutes_applied, report.mutes_collapsed
    );
    if report.no_op {
        println!("No region touched the selection; output is a plain copy");
    }
    println!("SHA-256: {}", outcome.buffer.content_digest());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::{EditRegion, RegionSet};
    use crate::engine::AudioBuffer;
    use tempfile::TempDir;

    #[test]
    fn test_bake_command_writes_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.wav");
        let regions = dir.path().join("regions.json");
        let output = dir.path().join("out.wav");

        let source = AudioBuffer::filled(8000, 1, 8000, 0.5).unwrap();
        export_wav(&source, &input, ExportFormat::float()).unwrap();
        RegionDocument {
            selection: None,
            regions: RegionSet::from_regions(vec![EditRegion::cut(0.25, 0.5)]),
        }
        .save(&regions)
        .unwrap();

        let overrides = BakeOverrides {
            fade_ms: Some(0),
            bit_depth: Some(32),
            ..BakeOverrides::default()
        };
        bake(&input, &regions, &output, &EditorConfig::default(), &overrides).unwrap();

        let baked = import_wav(&output).unwrap();
        assert_eq!(baked.frame_count(), 6000);
        assert!(baked.samples().iter().all(|&s| s == 0.5));
    }

    #[test]
    fn test_bake_command_rejects_bad_bit_depth() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.wav");
        let regions = dir.path().join("regions.json");

        export_wav(
            &AudioBuffer::filled(8000, 1, 100, 0.1).unwrap(),
            &input,
            ExportFormat::default(),
        )
        .unwrap();
        RegionDocument::default().save(&regions).unwrap();

        let overrides = BakeOverrides {
            bit_depth: Some(8),
            ..BakeOverrides::default()
        };
        let result = bake(
            &input,
            &regions,
            &dir.path().join("out.wav"),
            &EditorConfig::default(),
            &overrides,
        );
        assert!(result.is_err());
    }
}
