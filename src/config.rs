//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub frame: FrameConfig,

    #[serde(default)]
    pub controller: ControllerConfig,

    #[serde(default)]
    pub recorder: RecorderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Frame loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct FrameConfig {
    #[serde(default = "default_rate_hz")]
    pub rate_hz: u32,
}

/// Controller discovery configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ControllerConfig {
    /// Explicit event device path; empty means auto-detect
    #[serde(default)]
    pub device_path: String,

    #[serde(default = "default_scan_interval_ms")]
    pub scan_interval_ms: u64,
}

/// Session recorder configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RecorderConfig {
    #[serde(default = "default_recorder_enabled")]
    pub enabled: bool,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_max_records_per_file")]
    pub max_records_per_file: usize,

    #[serde(default = "default_max_files_to_keep")]
    pub max_files_to_keep: usize,

    #[serde(default = "default_record_interval_ms")]
    pub record_interval_ms: u64,

    #[serde(default = "default_record_format")]
    pub format: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Directory for rolling log files; empty means console only
    #[serde(default)]
    pub dir: String,

    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_rate_hz() -> u32 { 60 }

fn default_scan_interval_ms() -> u64 { 1000 }

fn default_recorder_enabled() -> bool { false }
fn default_log_dir() -> String { "./recordings".to_string() }
fn default_max_records_per_file() -> usize { 10000 }
fn default_max_files_to_keep() -> usize { 10 }
fn default_record_interval_ms() -> u64 { 100 }
fn default_record_format() -> String { "jsonl".to_string() }

fn default_log_level() -> String { "info".to_string() }

impl Default for FrameConfig {
    fn default() -> Self {
        Self { rate_hz: default_rate_hz() }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            device_path: String::new(),
            scan_interval_ms: default_scan_interval_ms(),
        }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            enabled: default_recorder_enabled(),
            log_dir: default_log_dir(),
            max_records_per_file: default_max_records_per_file(),
            max_files_to_keep: default_max_files_to_keep(),
            record_interval_ms: default_record_interval_ms(),
            format: default_record_format(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: String::new(),
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pad_probe::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an optional path, falling back to defaults
    ///
    /// With an explicit path the file must exist and parse. Without one,
    /// `config/default.toml` is used when present; otherwise the built-in
    /// defaults apply.
    ///
    /// # Arguments
    ///
    /// * `path` - Optional explicit path to a configuration file
    ///
    /// # Errors
    ///
    /// Returns error if an explicit or discovered file fails to load or
    /// validate.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new("config/default.toml");
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    let config = Config::default();
                    config.validate()?;
                    Ok(config)
                }
            }
        }
    }

    /// Validate configuration values
    ///
    /// # Returns
    ///
    /// * `Result<()>` - Ok if valid, Err if invalid
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        // Validate frame loop rate
        if self.frame.rate_hz < 10 || self.frame.rate_hz > 240 {
            return Err(crate::error::PadProbeError::Config(
                toml::de::Error::custom("rate_hz must be between 10 and 240")
            ));
        }

        // Controller device_path can be empty (auto-detect)
        if self.controller.scan_interval_ms == 0 || self.controller.scan_interval_ms > 60000 {
            return Err(crate::error::PadProbeError::Config(
                toml::de::Error::custom("scan_interval_ms must be between 1 and 60000")
            ));
        }

        // Validate recorder configuration
        if self.recorder.enabled && self.recorder.log_dir.is_empty() {
            return Err(crate::error::PadProbeError::Config(
                toml::de::Error::custom("recorder log_dir cannot be empty when enabled")
            ));
        }

        if self.recorder.record_interval_ms == 0 || self.recorder.record_interval_ms > 60000 {
            return Err(crate::error::PadProbeError::Config(
                toml::de::Error::custom("record_interval_ms must be between 1 and 60000")
            ));
        }

        if self.recorder.max_records_per_file == 0 {
            return Err(crate::error::PadProbeError::Config(
                toml::de::Error::custom("max_records_per_file must be greater than 0")
            ));
        }

        if self.recorder.max_files_to_keep == 0 {
            return Err(crate::error::PadProbeError::Config(
                toml::de::Error::custom("max_files_to_keep must be greater than 0")
            ));
        }

        if self.recorder.format != "jsonl" {
            return Err(crate::error::PadProbeError::Config(
                toml::de::Error::custom("record format must be 'jsonl' (only supported format)")
            ));
        }

        // Validate log level
        if !["trace", "debug", "info", "warn", "error"].contains(&self.logging.level.as_str()) {
            return Err(crate::error::PadProbeError::Config(
                toml::de::Error::custom("log level must be one of: trace, debug, info, warn, error")
            ));
        }

        Ok(())
    }
}
