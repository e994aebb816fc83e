//! Bake Benchmarks
//!
//! Performance benchmarks for envelope building and region baking.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use regionbake::edit::{EditRegion, RegionSet, Selection, SelectionBaker};
use regionbake::engine::{build_envelope, AudioBuffer, DEFAULT_CHUNK_FRAMES};

fn benchmark_envelope(c: &mut Criterion) {
    let buffer = AudioBuffer::sine_wave(440.0, 60.0, 44100).unwrap();

    c.bench_function("envelope_60s_1024_columns", |b| {
        b.iter(|| build_envelope(black_box(&buffer), 1024, DEFAULT_CHUNK_FRAMES).unwrap())
    });
}

fn benchmark_bake(c: &mut Criterion) {
    let buffer = AudioBuffer::sine_wave(440.0, 60.0, 44100).unwrap();
    let regions: RegionSet = (0..50)
        .map(|i| {
            let t = i as f64;
            if i % 2 == 0 {
                EditRegion::cut(t + 0.2, t + 0.5)
            } else {
                EditRegion::mute(t + 0.1, t + 0.9)
            }
        })
        .collect();
    let baker = SelectionBaker::new(10);

    c.bench_function("bake_60s_50_regions", |b| {
        b.iter(|| {
            baker
                .bake(black_box(&buffer), Selection::whole(60.0), black_box(&regions))
                .unwrap()
        })
    });

    c.bench_function("bake_60s_noop", |b| {
        b.iter(|| {
            baker
                .bake(black_box(&buffer), Selection::whole(60.0), &RegionSet::new())
                .unwrap()
        })
    });
}

criterion_group!(benches, benchmark_envelope, benchmark_bake);
criterion_main!(benches);
