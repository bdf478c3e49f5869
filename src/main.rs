use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use loudness_moments::{audio::MomentAnalyzer, config::Config, timeline::Timeline};

#[derive(Parser)]
#[command(
    name = "loudness-moments",
    version,
    about = "Find moments of significant loudness change in an audio track",
    long_about = "Measures windowed RMS loudness, smooths it, and reports every point where the level jumps by more than a threshold, no closer together than a minimum gap."
)]
struct Cli {
    /// Audio file path (WAV, MP3, FLAC, OGG, ...)
    #[arg(short, long)]
    audio: PathBuf,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Analysis window length in milliseconds
    #[arg(long)]
    window_ms: Option<f64>,

    /// Stride between windows in milliseconds
    #[arg(long)]
    hop_ms: Option<f64>,

    /// Minimum dB change that counts as a moment
    #[arg(short, long)]
    threshold_db: Option<f64>,

    /// Minimum seconds between reported moments
    #[arg(short, long)]
    min_gap: Option<f64>,

    /// Moving-average span in windows (odd)
    #[arg(long)]
    span: Option<usize>,

    /// Write the timeline as a PNG image
    #[arg(long)]
    png: Option<PathBuf>,

    /// Print a JSON report instead of the text timeline
    #[arg(long)]
    json: bool,

    /// Width of the text timeline in characters
    #[arg(long, default_value_t = 80)]
    columns: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Command-line values win over the configuration file
    fn apply_overrides(&self, config: &mut Config) {
        let analysis = &mut config.analysis;
        if let Some(window_ms) = self.window_ms {
            analysis.window_ms = window_ms;
        }
        if let Some(hop_ms) = self.hop_ms {
            analysis.hop_ms = hop_ms;
        }
        if let Some(threshold_db) = self.threshold_db {
            analysis.threshold_db = threshold_db;
        }
        if let Some(min_gap) = self.min_gap {
            analysis.min_gap_sec = min_gap;
        }
        if let Some(span) = self.span {
            analysis.smoothing_span = span;
        }
    }
}

fn format_timestamp(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor();
    format!("{:02}:{:06.3}", minutes as u64, seconds - minutes * 60.0)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so --json output stays parseable
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting loudness-moments v{}", env!("CARGO_PKG_VERSION"));
    info!("Audio: {:?}", cli.audio);

    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };
    cli.apply_overrides(&mut config);
    config.validate()?;

    let analyzer = MomentAnalyzer::with_config(config.analysis.clone());
    let analysis = analyzer
        .analyze_file(&cli.audio)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))
        .with_context(|| format!("analyzing {}", cli.audio.display()))?;

    let timeline = Timeline::from_analysis(&analysis);

    if cli.json {
        let report = analysis.report(Some(cli.audio.display().to_string()));
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", timeline.summary());
        println!("{}", timeline.render_ascii(cli.columns));
        for (i, moment) in timeline.ticks().iter().enumerate() {
            println!("{:>4}  {}", i + 1, format_timestamp(*moment));
        }
    }

    if let Some(png_path) = &cli.png {
        timeline.render_png(png_path, &config.timeline)?;
        info!("Timeline image saved to: {:?}", png_path);
    }

    Ok(())
}
