//! # loudness-moments
//!
//! Find the moments where an audio track gets noticeably louder or quieter,
//! and lay them out as tick marks on a timeline.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use loudness_moments::{
//!     audio::MomentAnalyzer,
//!     config::Config,
//!     timeline::Timeline,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let analyzer = MomentAnalyzer::with_config(config.analysis.clone());
//!
//! let analysis = analyzer.analyze_file("song.mp3").await?;
//! let timeline = Timeline::from_analysis(&analysis);
//!
//! println!("{}", timeline.summary());
//! timeline.render_png("timeline.png", &config.timeline)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`audio`] - Decoding and the loudness profile / smoothing / detection pipeline
//! - [`timeline`] - Caller-owned timeline state and rendering
//! - [`plot`] - Layout math for the coordinate-grid panel
//! - [`config`] - Configuration management
//!
//! ## Custom decoders
//!
//! Decoding sits behind the [`AudioDecoder`](audio::AudioDecoder) trait:
//!
//! ```rust,no_run
//! use loudness_moments::audio::{AudioDecoder, SampleBuffer};
//! use loudness_moments::Result;
//!
//! struct RawF32Mono;
//!
//! impl AudioDecoder for RawF32Mono {
//!     fn decode(&self, bytes: &[u8], _hint: Option<&str>) -> Result<SampleBuffer> {
//!         let samples = bytes
//!             .chunks_exact(4)
//!             .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
//!             .collect();
//!         SampleBuffer::new(48000, vec![samples])
//!     }
//! }
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod plot;
pub mod timeline;

// Re-export commonly used types for convenience
pub use crate::{
    audio::{AnalysisConfig, MomentAnalysis, MomentAnalyzer, SampleBuffer},
    config::Config,
    error::{MomentsError, Result},
    timeline::Timeline,
};
