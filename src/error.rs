use thiserror::Error;

/// Main error type for the loudness-moments library
#[derive(Error, Debug)]
pub enum MomentsError {
    #[error("Audio processing error: {0}")]
    Audio(#[from] AudioError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    #[error("Plot error: {0}")]
    Plot(#[from] PlotError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Audio-specific errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to load audio file: {path}")]
    LoadFailed { path: String },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Failed to decode audio: {reason}")]
    DecodeFailed { reason: String },

    #[error("Invalid sample buffer: {details}")]
    InvalidBuffer { details: String },

    #[error("Invalid analysis parameters: {details}")]
    InvalidParameters { details: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Timeline presentation errors
#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("Invalid timeline dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Timeline rendering failed: {reason}")]
    RenderFailed { reason: String },
}

/// Grid plot errors
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Invalid point: {details}")]
    InvalidPoint { details: String },

    #[error("Point index {index} out of range ({len} points)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Convenience type alias for Results using MomentsError
pub type Result<T> = std::result::Result<T, MomentsError>;

impl MomentsError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            // IO errors might be temporary
            Self::Io(_) => true,
            // The file may become readable; undecodable bytes never will
            Self::Audio(AudioError::LoadFailed { .. }) => true,
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Audio(AudioError::LoadFailed { path }) => {
                format!("Could not read audio file '{}'. Please check the file exists.", path)
            }
            Self::Audio(AudioError::DecodeFailed { .. }) => {
                "Analyze failed. The file could not be decoded as audio.".to_string()
            }
            Self::Audio(AudioError::InvalidParameters { details }) => {
                format!("Analysis settings are invalid: {}", details)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
