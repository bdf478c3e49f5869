use std::path::Path;
use std::sync::Arc;

use crate::audio::detector::detect;
use crate::audio::loader::{AudioDecoder, AudioLoader};
use crate::audio::profiler::LoudnessProfiler;
use crate::audio::smoother::smooth;
use crate::audio::types::{AnalysisConfig, MomentAnalysis, SampleBuffer};
use crate::error::{AudioError, Result};

/// Runs decode, profile, smooth and detect in sequence
pub struct MomentAnalyzer {
    config: AnalysisConfig,
    decoder: Arc<dyn AudioDecoder>,
}

impl MomentAnalyzer {
    /// Create a new analyzer with default configuration
    pub fn new() -> Self {
        Self::with_config(AnalysisConfig::default())
    }

    /// Create a new analyzer with custom configuration
    pub fn with_config(config: AnalysisConfig) -> Self {
        Self {
            config,
            decoder: Arc::new(AudioLoader),
        }
    }

    /// Swap the decoder used by [`analyze_bytes`](Self::analyze_bytes)
    pub fn with_decoder(mut self, decoder: Arc<dyn AudioDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Find loudness moments in a decoded buffer
    pub fn analyze(&self, buffer: &SampleBuffer) -> Result<MomentAnalysis> {
        self.config
            .validate()
            .map_err(|e| AudioError::InvalidParameters { details: e })?;

        tracing::info!(
            "Analyzing {:.2}s of audio ({} Hz, {} channel(s))",
            buffer.duration(),
            buffer.sample_rate(),
            buffer.channel_count()
        );

        let raw = LoudnessProfiler::profile(buffer, self.config.window_ms, self.config.hop_ms);
        tracing::debug!("Profiled {} windows", raw.len());

        let smoothed = smooth(&raw.levels, self.config.smoothing_span);
        let moments = detect(
            &raw.times,
            &smoothed,
            self.config.threshold_db,
            self.config.min_gap_sec,
        );

        tracing::info!("Analysis complete: {} moments detected", moments.len());

        Ok(MomentAnalysis {
            moments,
            duration: buffer.duration(),
            raw,
            smoothed,
            config: self.config.clone(),
        })
    }

    /// Decode encoded audio bytes and analyze them
    pub fn analyze_bytes(&self, bytes: &[u8], hint: Option<&str>) -> Result<MomentAnalysis> {
        let buffer = self.decoder.decode(bytes, hint)?;
        self.analyze(&buffer)
    }

    /// Read, decode and analyze an audio file
    pub async fn analyze_file<P: AsRef<Path>>(&self, path: P) -> Result<MomentAnalysis> {
        let path = path.as_ref();

        // Reject bad settings before paying for the decode
        self.config
            .validate()
            .map_err(|e| AudioError::InvalidParameters { details: e })?;

        let (bytes, hint) = AudioLoader::read_file(path).await?;
        self.analyze_bytes(&bytes, hint.as_deref())
    }
}

impl Default for MomentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MomentsError;

    fn step_buffer(quiet: f32, loud: f32) -> SampleBuffer {
        let samples: Vec<f32> = (0..2000)
            .map(|i| if i < 1000 { quiet } else { loud })
            .collect();
        SampleBuffer::new(1000, vec![samples]).unwrap()
    }

    struct FixedDecoder(SampleBuffer);

    impl AudioDecoder for FixedDecoder {
        fn decode(&self, _bytes: &[u8], _hint: Option<&str>) -> Result<SampleBuffer> {
            Ok(self.0.clone())
        }
    }

    struct FailingDecoder;

    impl AudioDecoder for FailingDecoder {
        fn decode(&self, _bytes: &[u8], _hint: Option<&str>) -> Result<SampleBuffer> {
            Err(AudioError::DecodeFailed {
                reason: "not audio".to_string(),
            }
            .into())
        }
    }

    #[test]
    fn test_step_produces_one_moment() {
        let analysis = MomentAnalyzer::new()
            .analyze(&step_buffer(0.01, 0.5))
            .unwrap();

        assert_eq!(analysis.duration, 2.0);
        assert_eq!(analysis.raw.len(), 39);
        assert_eq!(analysis.smoothed.len(), 39);
        assert_eq!(analysis.moments.len(), 1);
        // The 5-window average starts rising two windows before the step
        assert_eq!(analysis.moments[0], analysis.raw.times[17]);
        assert!((analysis.moments[0] - 1.0).abs() <= 0.2);
    }

    #[test]
    fn test_smoothing_spreads_step_without_gap() {
        let analyzer = MomentAnalyzer::with_config(AnalysisConfig {
            min_gap_sec: 0.0,
            ..Default::default()
        });

        let analysis = analyzer.analyze(&step_buffer(0.01, 0.5)).unwrap();
        assert_eq!(analysis.moments, analysis.raw.times[17..22].to_vec());
        assert!(analysis.moments.iter().all(|t| (t - 1.0).abs() <= 0.15));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let analyzer = MomentAnalyzer::with_config(AnalysisConfig {
            hop_ms: 0.0,
            ..Default::default()
        });

        let result = analyzer.analyze(&step_buffer(0.01, 0.5));
        assert!(matches!(
            result,
            Err(MomentsError::Audio(AudioError::InvalidParameters { .. }))
        ));
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let analyzer = MomentAnalyzer::new();
        let buffer = step_buffer(0.02, 0.7);

        let first = analyzer.analyze(&buffer).unwrap();
        let second = analyzer.analyze(&buffer).unwrap();
        assert_eq!(first.moments, second.moments);
        assert_eq!(first.raw, second.raw);
        assert_eq!(first.smoothed, second.smoothed);
    }

    #[test]
    fn test_custom_decoder() {
        let analyzer = MomentAnalyzer::new()
            .with_decoder(Arc::new(FixedDecoder(step_buffer(0.01, 0.5))));
        let analysis = analyzer.analyze_bytes(b"ignored", Some("mp3")).unwrap();
        assert_eq!(analysis.moments.len(), 1);

        let failing = MomentAnalyzer::new().with_decoder(Arc::new(FailingDecoder));
        let err = failing.analyze_bytes(b"ignored", None).unwrap_err();
        assert!(!err.is_recoverable());
    }

    #[tokio::test]
    async fn test_analyze_missing_file() {
        let result = MomentAnalyzer::new().analyze_file("/no/such/track.mp3").await;
        assert!(matches!(
            result,
            Err(MomentsError::Audio(AudioError::LoadFailed { .. }))
        ));
    }
}
