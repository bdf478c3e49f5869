//! Windowed RMS loudness in decibels.

use crate::audio::types::{LoudnessSeries, SampleBuffer};

/// Floor added to the RMS before taking the logarithm, so silence maps to
/// -240 dB instead of negative infinity.
pub const EPSILON: f64 = 1e-12;

/// Window and hop lengths in samples for a given sample rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowParams {
    /// Samples per analysis window
    pub win: usize,

    /// Samples between successive window starts
    pub hop: usize,
}

impl WindowParams {
    /// Convert millisecond lengths to whole samples, at least one each
    pub fn from_ms(sample_rate: u32, window_ms: f64, hop_ms: f64) -> Self {
        Self {
            win: ms_to_samples(sample_rate, window_ms),
            hop: ms_to_samples(sample_rate, hop_ms),
        }
    }

    /// Number of windows over `len` samples.
    ///
    /// A buffer shorter than one window still yields a single window.
    pub fn num_hops(&self, len: usize) -> usize {
        1 + len.saturating_sub(self.win) / self.hop
    }
}

fn ms_to_samples(sample_rate: u32, ms: f64) -> usize {
    let samples = (sample_rate as f64 * (ms / 1000.0)).round();
    if samples >= 1.0 {
        samples as usize
    } else {
        1
    }
}

/// Index actually read for position `n`: past-the-end positions repeat the
/// final sample.
pub fn clamped_index(n: usize, len: usize) -> usize {
    n.min(len - 1)
}

/// Mean of squared amplitude across channels at one sample index
pub fn mean_channel_power(channels: &[Vec<f32>], index: usize) -> f64 {
    let sum: f64 = channels
        .iter()
        .map(|channel| {
            let v = channel[index] as f64;
            v * v
        })
        .sum();
    sum / channels.len() as f64
}

/// Convert a linear RMS amplitude to dB
pub fn rms_to_db(rms: f64) -> f64 {
    20.0 * (rms + EPSILON).log10()
}

/// Computes loudness over sliding windows
pub struct LoudnessProfiler;

impl LoudnessProfiler {
    /// Profile `buffer` with the given window and hop lengths in milliseconds.
    ///
    /// Each window's timestamp is its center. Windows reaching past the end
    /// of the buffer repeat the final sample for the missing positions.
    pub fn profile(buffer: &SampleBuffer, window_ms: f64, hop_ms: f64) -> LoudnessSeries {
        let params = WindowParams::from_ms(buffer.sample_rate(), window_ms, hop_ms);
        Self::profile_samples(buffer, params)
    }

    /// Profile with window and hop already expressed in samples
    pub fn profile_samples(buffer: &SampleBuffer, params: WindowParams) -> LoudnessSeries {
        let len = buffer.len();
        let sample_rate = buffer.sample_rate() as f64;
        let channels = buffer.channels();
        let num_hops = params.num_hops(len);

        let mut times = Vec::with_capacity(num_hops);
        let mut levels = Vec::with_capacity(num_hops);

        for h in 0..num_hops {
            let start = h * params.hop;
            let end = start + params.win;

            let sum_power: f64 = (start..end)
                .map(|n| mean_channel_power(channels, clamped_index(n, len)))
                .sum();
            let rms = (sum_power / params.win as f64).sqrt();

            times.push((start as f64 + params.win as f64 / 2.0) / sample_rate);
            levels.push(rms_to_db(rms));
        }

        LoudnessSeries { times, levels }
    }
}
