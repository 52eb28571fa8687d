//! # Error Types
//!
//! Custom error types for Pad Probe using `thiserror`.

use thiserror::Error;

/// Main error type for Pad Probe
#[derive(Debug, Error)]
pub enum PadProbeError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Host platform errors (device registry, handle sharing)
    #[error("Host error: {0}")]
    Host(String),

    /// Session recorder serialization errors
    #[error("Recording error: {0}")]
    Record(#[from] serde_json::Error),

    /// A vibration attempt that reached the device but failed
    #[error("Vibration error: {0}")]
    Vibration(String),

    /// Raised when every vibration tier is unsupported or has failed
    #[error("no supported vibration capability")]
    NoVibrationSupport,
}

/// Result type alias for Pad Probe
pub type Result<T> = std::result::Result<T, PadProbeError>;
