//! # Timeline
//!
//! Holds the moments of the most recent analysis and lays them out as tick
//! marks along a horizontal baseline. The analysis itself keeps no state;
//! callers own a [`Timeline`] and replace or clear it between runs.

pub mod render;

use serde::{Deserialize, Serialize};

use crate::audio::MomentAnalysis;
use crate::error::{ConfigError, Result};

/// Timeline rendering parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Horizontal margin on each side of the baseline
    pub margin: u32,

    /// Tick extent above and below the baseline
    pub tick_height: u32,

    /// Stroke width for the baseline and ticks
    pub line_width: u32,

    pub background: String,
    pub baseline_color: String,
    pub tick_color: String,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 120,
            margin: 20,
            tick_height: 18,
            line_width: 2,
            background: "#ffffff".to_string(),
            baseline_color: "#000000".to_string(),
            tick_color: "#2f72ff".to_string(),
        }
    }
}

impl TimelineConfig {
    /// Narrowest timeline that still leaves room between the margins
    pub const MIN_WIDTH: u32 = 300;

    pub(crate) fn validate(&self) -> Result<()> {
        if self.width < Self::MIN_WIDTH {
            return Err(ConfigError::InvalidValue {
                key: "timeline.width".to_string(),
                value: self.width.to_string(),
            }
            .into());
        }

        if self.height == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeline.height".to_string(),
                value: self.height.to_string(),
            }
            .into());
        }

        if self.margin.saturating_mul(2) >= self.width {
            return Err(ConfigError::InvalidValue {
                key: "timeline.margin".to_string(),
                value: self.margin.to_string(),
            }
            .into());
        }

        for (key, value) in [
            ("timeline.background", &self.background),
            ("timeline.baseline_color", &self.baseline_color),
            ("timeline.tick_color", &self.tick_color),
        ] {
            if render::parse_hex_color(value).is_none() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.clone(),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// Detected moments and the duration they are laid out against
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    ticks: Vec<f64>,
    duration: f64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_analysis(analysis: &MomentAnalysis) -> Self {
        let mut timeline = Self::new();
        timeline.set(analysis.moments.clone(), analysis.duration);
        timeline
    }

    /// Replace the current ticks
    pub fn set(&mut self, ticks: Vec<f64>, duration: f64) {
        self.ticks = ticks;
        self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
    }

    pub fn clear(&mut self) {
        self.ticks.clear();
        self.duration = 0.0;
    }

    pub fn ticks(&self) -> &[f64] {
        &self.ticks
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// True when there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.duration == 0.0 || self.ticks.is_empty()
    }

    /// Horizontal pixel position of each tick between the margins
    pub fn tick_positions(&self, width: f64, margin: f64) -> Vec<f64> {
        if self.is_empty() {
            return Vec::new();
        }

        let x0 = margin;
        let x1 = width - margin;
        self.ticks
            .iter()
            .map(|t| x0 + (t / self.duration) * (x1 - x0))
            .collect()
    }

    /// One-line description shown under the timeline
    pub fn summary(&self) -> String {
        if self.duration == 0.0 {
            String::new()
        } else if self.ticks.is_empty() {
            format!(
                "Duration: {:.2} s — no moments detected (adjust threshold?)",
                self.duration
            )
        } else {
            format!("Duration: {:.2} s — {} moments", self.duration, self.ticks.len())
        }
    }

    /// Text rendering: `-` for the baseline, `|` for each tick
    pub fn render_ascii(&self, columns: usize) -> String {
        let columns = columns.max(2);
        let mut line = vec!['-'; columns];

        if !self.is_empty() {
            let last = (columns - 1) as f64;
            for t in &self.ticks {
                let col = ((t / self.duration) * last).round().clamp(0.0, last) as usize;
                line[col] = '|';
            }
        }

        line.into_iter().collect()
    }
}
