//! Performance benchmarks for contour analysis

use cantus::features::vibrato::detect_vibrato;
use cantus::{analyze_batch, analyze_performance, AnalysisConfig, PitchContour};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::f64::consts::PI;

/// `seconds` of A4 with a 6 Hz, 40-cent vibrato at 100 frames/s
fn synthetic_contours(seconds: usize) -> (PitchContour, PitchContour) {
    let n = seconds * 100;
    let times: Vec<f64> = (0..n).map(|i| i as f64 * 0.01).collect();
    let sung: Vec<Option<f64>> = times
        .iter()
        .map(|t| Some(440.0 * 2f64.powf(20.0 * (2.0 * PI * 6.0 * t).sin() / 1200.0)))
        .collect();
    let target: Vec<Option<f64>> = vec![Some(440.0); n];
    let confidence = vec![0.9; n];

    (
        PitchContour::from_arrays(&times, &sung, &confidence).unwrap(),
        PitchContour::from_arrays(&times, &target, &confidence).unwrap(),
    )
}

fn bench_analyze_performance(c: &mut Criterion) {
    let (performance, target) = synthetic_contours(180);
    let config = AnalysisConfig::default();

    c.bench_function("analyze_performance_3min", |b| {
        b.iter(|| {
            let _ = analyze_performance(black_box(&performance), black_box(&target), black_box(&config));
        });
    });
}

fn bench_detect_vibrato(c: &mut Criterion) {
    let (performance, _) = synthetic_contours(30);
    let times: Vec<f64> = performance.samples().iter().map(|s| s.time).collect();
    let hz: Vec<f64> = performance.samples().iter().filter_map(|s| s.pitch.hz()).collect();
    let config = AnalysisConfig::default();

    c.bench_function("detect_vibrato_30s", |b| {
        b.iter(|| detect_vibrato(black_box(&hz), black_box(&times), black_box(&config)));
    });
}

fn bench_analyze_batch(c: &mut Criterion) {
    let pairs: Vec<_> = (0..16).map(|_| synthetic_contours(30)).collect();
    let config = AnalysisConfig::default();

    c.bench_function("analyze_batch_16x30s", |b| {
        b.iter(|| analyze_batch(black_box(&pairs), black_box(&config)));
    });
}

criterion_group!(
    benches,
    bench_analyze_performance,
    bench_detect_vibrato,
    bench_analyze_batch
);
criterion_main!(benches);
