//! # Audio Analysis Module
//!
//! Finds moments where an audio track gets significantly louder or quieter.
//!
//! ## Pipeline
//!
//! - **Decoding**: [`AudioLoader`] turns WAV/MP3/FLAC/... bytes into a [`SampleBuffer`]
//! - **Profiling**: [`LoudnessProfiler`] measures windowed RMS loudness in dB
//! - **Smoothing**: [`smooth`] applies a centered moving average
//! - **Detection**: [`detect`] flags level jumps above a threshold, debounced by a minimum gap
//!
//! Profiling, smoothing and detection are pure functions; only decoding touches I/O.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use loudness_moments::audio::{AnalysisConfig, MomentAnalyzer};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let analyzer = MomentAnalyzer::with_config(AnalysisConfig::default());
//! let analysis = analyzer.analyze_file("song.mp3").await?;
//!
//! println!("Duration: {:.2}s", analysis.duration);
//! println!("Found {} moments", analysis.moments.len());
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod detector;
pub mod loader;
pub mod profiler;
pub mod smoother;
pub mod types;

pub use analyzer::MomentAnalyzer;
pub use detector::detect;
pub use loader::{AudioDecoder, AudioLoader};
pub use profiler::{LoudnessProfiler, WindowParams};
pub use smoother::smooth;
pub use types::{
    AnalysisConfig, AnalysisReport, AudioFormat, LoudnessSeries, MomentAnalysis, SampleBuffer,
};
