use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AudioError, Result};

/// Decoded audio, stored planar (one sample vector per channel)
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
    format: Option<AudioFormat>,
}

impl SampleBuffer {
    /// Build a buffer from planar channel data.
    ///
    /// Rejects a zero sample rate, zero channels, channels of differing
    /// lengths and empty channels.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidBuffer {
                details: "sample rate must be positive".to_string(),
            }
            .into());
        }

        let frames = match channels.first() {
            Some(first) => first.len(),
            None => {
                return Err(AudioError::InvalidBuffer {
                    details: "at least one channel is required".to_string(),
                }
                .into())
            }
        };

        if let Some((index, channel)) = channels
            .iter()
            .enumerate()
            .find(|(_, channel)| channel.len() != frames)
        {
            return Err(AudioError::InvalidBuffer {
                details: format!(
                    "channel {} has {} samples, expected {}",
                    index,
                    channel.len(),
                    frames
                ),
            }
            .into());
        }

        if frames == 0 {
            return Err(AudioError::InvalidBuffer {
                details: "buffer contains no samples".to_string(),
            }
            .into());
        }

        Ok(Self {
            sample_rate,
            channels,
            format: None,
        })
    }

    /// Build a buffer from interleaved samples (L, R, L, R, ...)
    pub fn from_interleaved(sample_rate: u32, channel_count: u16, samples: &[f32]) -> Result<Self> {
        if channel_count == 0 {
            return Err(AudioError::InvalidBuffer {
                details: "at least one channel is required".to_string(),
            }
            .into());
        }

        let channel_count = channel_count as usize;
        if samples.len() % channel_count != 0 {
            return Err(AudioError::InvalidBuffer {
                details: format!(
                    "{} interleaved samples do not divide into {} channels",
                    samples.len(),
                    channel_count
                ),
            }
            .into());
        }

        let frames = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        Self::new(sample_rate, channels)
    }

    /// Attach source format information
    pub fn with_format(mut self, format: AudioFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    /// Whether the buffer has no samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Samples for a specific channel (0-based)
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// All channels
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Source format, when the buffer came from a decoder
    pub fn format(&self) -> Option<&AudioFormat> {
        self.format.as_ref()
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    /// Get time in seconds for a sample index
    pub fn time_for_sample(&self, sample_index: usize) -> f64 {
        sample_index as f64 / self.sample_rate as f64
    }
}

/// Audio file format information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// File extension or probe hint (wav, mp3, flac, etc.)
    pub extension: String,

    /// Bit depth (16, 24, 32, etc.)
    pub bit_depth: Option<u16>,

    /// Codec name for compressed formats
    pub codec: Option<String>,
}

/// Configuration for loudness-moment analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Analysis window length in milliseconds
    pub window_ms: f64,

    /// Stride between window starts in milliseconds
    pub hop_ms: f64,

    /// Minimum absolute dB change between consecutive windows to flag a moment
    pub threshold_db: f64,

    /// Minimum spacing between reported moments in seconds
    pub min_gap_sec: f64,

    /// Moving-average span in windows (odd)
    pub smoothing_span: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_ms: 100.0,
            hop_ms: 50.0,
            threshold_db: 3.0,
            min_gap_sec: 1.0,
            smoothing_span: 5,
        }
    }
}

impl AnalysisConfig {
    /// Floor for `window_ms` when normalizing user input
    pub const MIN_WINDOW_MS: f64 = 5.0;
    /// Floor for `hop_ms` when normalizing user input
    pub const MIN_HOP_MS: f64 = 1.0;
    /// Floor for `threshold_db` when normalizing user input
    pub const MIN_THRESHOLD_DB: f64 = 0.1;

    /// Pick up quieter transitions and report them more densely
    pub fn sensitive() -> Self {
        Self {
            threshold_db: 1.5,
            min_gap_sec: 0.5,
            ..Default::default()
        }
    }

    /// Only report large, well-separated transitions
    pub fn coarse() -> Self {
        Self {
            window_ms: 200.0,
            hop_ms: 100.0,
            threshold_db: 6.0,
            min_gap_sec: 2.0,
            ..Default::default()
        }
    }

    /// Build a config from loosely-typed form values.
    ///
    /// Missing, non-finite or zero values fall back to the defaults, then
    /// each value is clamped to its floor. The result always validates.
    pub fn from_user_input(
        window_ms: Option<f64>,
        hop_ms: Option<f64>,
        threshold_db: Option<f64>,
        min_gap_sec: Option<f64>,
    ) -> Self {
        let defaults = Self::default();
        let or_default = |value: Option<f64>, default: f64| match value {
            Some(v) if v.is_finite() && v != 0.0 => v,
            _ => default,
        };

        Self {
            window_ms: or_default(window_ms, defaults.window_ms).max(Self::MIN_WINDOW_MS),
            hop_ms: or_default(hop_ms, defaults.hop_ms).max(Self::MIN_HOP_MS),
            threshold_db: or_default(threshold_db, defaults.threshold_db)
                .max(Self::MIN_THRESHOLD_DB),
            min_gap_sec: or_default(min_gap_sec, defaults.min_gap_sec).max(0.0),
            smoothing_span: defaults.smoothing_span,
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.window_ms.is_finite() || self.window_ms <= 0.0 {
            return Err(format!("Window length must be positive, got {} ms", self.window_ms));
        }

        if !self.hop_ms.is_finite() || self.hop_ms <= 0.0 {
            return Err(format!("Hop length must be positive, got {} ms", self.hop_ms));
        }

        if !self.threshold_db.is_finite() || self.threshold_db <= 0.0 {
            return Err(format!("Threshold must be positive, got {} dB", self.threshold_db));
        }

        if !self.min_gap_sec.is_finite() || self.min_gap_sec < 0.0 {
            return Err(format!("Minimum gap cannot be negative, got {} s", self.min_gap_sec));
        }

        if self.smoothing_span == 0 || self.smoothing_span % 2 == 0 {
            return Err(format!(
                "Smoothing span must be odd and at least 1, got {}",
                self.smoothing_span
            ));
        }

        Ok(())
    }
}

/// Windowed loudness over time
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoudnessSeries {
    /// Window centers in seconds, strictly increasing
    pub times: Vec<f64>,

    /// Window loudness in dB
    pub levels: Vec<f64>,
}

impl LoudnessSeries {
    /// Number of windows
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// `(time, level)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.levels.iter().copied())
    }

    /// Loudest window, if any
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.iter()
            .fold(None, |best: Option<(f64, f64)>, (time, level)| match best {
                Some((_, best_level)) if best_level >= level => best,
                _ => Some((time, level)),
            })
    }
}

/// Result of one analysis run
#[derive(Debug, Clone)]
pub struct MomentAnalysis {
    /// Detected moment timestamps in seconds, ascending
    pub moments: Vec<f64>,

    /// Total duration in seconds
    pub duration: f64,

    /// Unsmoothed loudness series
    pub raw: LoudnessSeries,

    /// Smoothed levels, parallel to `raw.times`
    pub smoothed: Vec<f64>,

    /// Analysis configuration used
    pub config: AnalysisConfig,
}

impl MomentAnalysis {
    /// Get moments within a time range (inclusive)
    pub fn moments_in_range(&self, start: f64, end: f64) -> Vec<f64> {
        self.moments
            .iter()
            .copied()
            .filter(|&t| t >= start && t <= end)
            .collect()
    }

    /// Find the next moment strictly after a given time
    pub fn next_moment_after(&self, time: f64) -> Option<f64> {
        self.moments.iter().copied().find(|&t| t > time)
    }

    /// Highest raw window level in dB
    pub fn peak_level(&self) -> Option<f64> {
        self.raw.peak().map(|(_, level)| level)
    }

    /// Serializable summary of the run
    pub fn report(&self, source: Option<String>) -> AnalysisReport {
        AnalysisReport {
            source,
            duration: self.duration,
            moments: self.moments.clone(),
            windows: self.raw.len(),
            peak_level_db: self.peak_level(),
            config: self.config.clone(),
            analyzed_at: Utc::now(),
        }
    }
}

/// JSON-friendly analysis summary
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Audio file the moments were found in
    pub source: Option<String>,

    pub duration: f64,

    pub moments: Vec<f64>,

    /// Number of analysis windows
    pub windows: usize,

    pub peak_level_db: Option<f64>,

    pub config: AnalysisConfig,

    pub analyzed_at: DateTime<Utc>,
}
