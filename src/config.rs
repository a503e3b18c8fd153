//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PadBridgeError, Result};
use crate::frame::protocol::TASTM32_BAUD_RATE;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub pipe: PipeConfig,
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// Backend selection
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Pipe,
    Serial,
}

/// Controller configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ControllerConfig {
    #[serde(default = "default_backend")]
    pub backend: Backend,

    /// Controller port on the console (1-4)
    #[serde(default = "default_port")]
    pub port: u8,
}

/// Dolphin pipe configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PipeConfig {
    /// Dolphin user directory containing `Pipes/`
    #[serde(default = "default_dolphin_home")]
    pub dolphin_home: PathBuf,
}

/// TAStm32 serial configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    #[serde(default = "default_serial_device")]
    pub device: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Read timeout for handshake and acknowledgment bytes; 0 waits forever
    #[serde(default)]
    pub timeout_ms: u64,
}

/// Input log configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

/// Binary runner configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RunnerConfig {
    /// Flushes per second (the console polls at 60Hz)
    #[serde(default = "default_poll_rate_hz")]
    pub poll_rate_hz: u32,
}

// Default value functions
fn default_backend() -> Backend { Backend::Pipe }
fn default_port() -> u8 { 1 }

fn default_dolphin_home() -> PathBuf { PathBuf::from("./dolphin") }

fn default_serial_device() -> String { "/dev/ttyACM0".to_string() }
fn default_baud_rate() -> u32 { TASTM32_BAUD_RATE }

fn default_log_dir() -> String { "./logs".to_string() }

fn default_poll_rate_hz() -> u32 { 60 }

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            port: default_port(),
        }
    }
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self { dolphin_home: default_dolphin_home() }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            device: default_serial_device(),
            baud_rate: default_baud_rate(),
            timeout_ms: 0,
        }
    }
}

impl SerialConfig {
    /// Read timeout, `None` when reads may block indefinitely
    pub fn read_timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_dir: default_log_dir(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self { poll_rate_hz: default_poll_rate_hz() }
    }
}

fn invalid(message: &str) -> PadBridgeError {
    PadBridgeError::Config(toml::de::Error::custom(message))
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
    /// use gc_pad_bridge::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if !(1..=4).contains(&self.controller.port) {
            return Err(invalid("controller port must be between 1 and 4"));
        }

        if self.controller.backend == Backend::Pipe
            && self.pipe.dolphin_home.as_os_str().is_empty()
        {
            return Err(invalid("dolphin_home cannot be empty for the pipe backend"));
        }

        if self.serial.device.is_empty() {
            return Err(invalid("serial device cannot be empty"));
        }

        // The TAStm32 firmware only speaks 115200
        if self.serial.baud_rate != TASTM32_BAUD_RATE {
            return Err(invalid("baud_rate must be 115200"));
        }

        if self.serial.timeout_ms > 60000 {
            return Err(invalid("timeout_ms must be between 0 and 60000"));
        }

        if self.telemetry.enabled && self.telemetry.log_dir.is_empty() {
            return Err(invalid("telemetry log_dir cannot be empty when enabled"));
        }

        if self.runner.poll_rate_hz == 0 || self.runner.poll_rate_hz > 1000 {
            return Err(invalid("poll_rate_hz must be between 1 and 1000"));
        }

        Ok(())
    }
}
