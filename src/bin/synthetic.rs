// Runs the moment pipeline on generated audio with known transitions

use std::f32::consts::PI;

use rand::{rngs::SmallRng, Rng, SeedableRng};
use loudness_moments::{
    audio::{AnalysisConfig, MomentAnalyzer, SampleBuffer},
    timeline::Timeline,
};

const SAMPLE_RATE: u32 = 44100;

/// Quiet noise bed with loud 440 Hz bursts starting at `bursts` (seconds)
fn burst_track(duration: f64, bursts: &[(f64, f64)], seed: u64) -> anyhow::Result<SampleBuffer> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let len = (duration * SAMPLE_RATE as f64) as usize;

    let samples: Vec<f32> = (0..len)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE as f64;
            let noise = (rng.gen::<f32>() - 0.5) * 0.02;
            let loud = bursts
                .iter()
                .any(|&(start, length)| t >= start && t < start + length);
            if loud {
                (2.0 * PI * 440.0 * t as f32).sin() * 0.6 + noise
            } else {
                noise
            }
        })
        .collect();

    // Same signal on both channels, right slightly attenuated
    let right: Vec<f32> = samples.iter().map(|s| s * 0.8).collect();
    Ok(SampleBuffer::new(SAMPLE_RATE, vec![samples, right])?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("Testing loudness-moments on synthetic audio");

    let bursts = [(1.0, 1.5), (2.8, 0.4), (5.0, 2.0)];
    let buffer = burst_track(8.0, &bursts, 7)?;
    println!(
        "\n1. Generated {:.1}s stereo track with bursts at {:?}",
        buffer.duration(),
        bursts.iter().map(|b| b.0).collect::<Vec<_>>()
    );

    println!("\n2. Running presets...");
    let presets = [
        ("default", AnalysisConfig::default()),
        ("sensitive", AnalysisConfig::sensitive()),
        ("coarse", AnalysisConfig::coarse()),
        (
            "no debounce",
            AnalysisConfig {
                min_gap_sec: 0.0,
                ..Default::default()
            },
        ),
    ];

    for (name, config) in presets {
        let analysis = MomentAnalyzer::with_config(config).analyze(&buffer)?;
        let timeline = Timeline::from_analysis(&analysis);

        println!("   {:<12} {}", name, timeline.summary());
        println!("   {:<12} {}", "", timeline.render_ascii(64));
        println!(
            "   {:<12} {:?}",
            "",
            analysis
                .moments
                .iter()
                .map(|t| format!("{:.2}", t))
                .collect::<Vec<_>>()
        );
    }

    println!("\n3. Loudness profile (default config)...");
    let analysis = MomentAnalyzer::new().analyze(&buffer)?;
    if let Some(peak) = analysis.peak_level() {
        println!("   Windows: {}, peak level: {:.1} dB", analysis.raw.len(), peak);
    }
    for (time, level) in analysis.raw.iter().step_by(20) {
        println!("   {:>6.2}s {:>7.1} dB", time, level);
    }

    Ok(())
}
