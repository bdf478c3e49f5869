//! Performance benchmarks for the loudness moment pipeline

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use loudness_moments::audio::{smooth, AnalysisConfig, LoudnessProfiler, MomentAnalyzer, SampleBuffer};

fn synthetic_stereo(seconds: usize) -> SampleBuffer {
    let left: Vec<f32> = (0..44100 * seconds)
        .map(|i| {
            let envelope = if (i / 22050) % 2 == 0 { 0.05 } else { 0.6 };
            (i as f32 * 440.0 * 2.0 * std::f32::consts::PI / 44100.0).sin() * envelope
        })
        .collect();
    let right = left.iter().map(|s| s * 0.7).collect();
    SampleBuffer::new(44100, vec![left, right]).unwrap()
}

fn bench_pipeline(c: &mut Criterion) {
    let buffer = synthetic_stereo(30);
    let analyzer = MomentAnalyzer::with_config(AnalysisConfig::default());

    c.bench_function("analyze_30s_stereo", |b| {
        b.iter(|| analyzer.analyze(black_box(&buffer)).unwrap());
    });

    c.bench_function("profile_30s_stereo", |b| {
        b.iter(|| LoudnessProfiler::profile(black_box(&buffer), 100.0, 50.0));
    });

    let levels = LoudnessProfiler::profile(&buffer, 100.0, 50.0).levels;
    c.bench_function("smooth_span_5", |b| {
        b.iter(|| smooth(black_box(&levels), 5));
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
