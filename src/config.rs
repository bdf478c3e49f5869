use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::{
    audio::AnalysisConfig,
    error::{ConfigError, Result},
    timeline::TimelineConfig,
};

/// Main configuration for loudness-moments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Loudness analysis settings
    pub analysis: AnalysisConfig,

    /// Timeline rendering settings
    pub timeline: TimelineConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            tracing::debug!("TOML parse error in {:?}: {}", path, e);
            ConfigError::ParseFailed { path: path.display().to_string() }
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.analysis.validate().map_err(|details| ConfigError::InvalidValue {
            key: "analysis".to_string(),
            value: details,
        })?;
        self.timeline.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let mut original_config = Config::default();
        original_config.analysis.threshold_db = 4.5;
        original_config.timeline.tick_color = "#ff0000".to_string();

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config, loaded_config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        std::fs::write(&file_path, "[analysis]\nmin_gap_sec = 0.25\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.analysis.min_gap_sec, 0.25);
        assert_eq!(config.analysis.window_ms, 100.0);
        assert_eq!(config.timeline, TimelineConfig::default());
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let dir = tempdir().unwrap();

        let missing = Config::from_file(dir.path().join("nope.toml"));
        assert!(matches!(
            missing,
            Err(crate::error::MomentsError::Config(ConfigError::FileNotFound { .. }))
        ));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[analysis\nwindow_ms = ").unwrap();
        assert!(matches!(
            Config::from_file(&broken),
            Err(crate::error::MomentsError::Config(ConfigError::ParseFailed { .. }))
        ));
    }

    #[test]
    fn test_invalid_analysis_config() {
        let mut config = Config::default();
        config.analysis.smoothing_span = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_timeline_config() {
        let mut config = Config::default();
        config.timeline.height = 0;
        assert!(config.validate().is_err());
    }
}
