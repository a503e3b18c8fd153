//! # Error Types
//!
//! Custom error types for GC Pad Bridge using `thiserror`.

use thiserror::Error;

/// Main error type for GC Pad Bridge
#[derive(Debug, Error)]
pub enum PadBridgeError {
    /// Serial link errors (open, write, read)
    #[error("Serial error: {0}")]
    Serial(String),

    /// The device did not answer the reset command with `0x01 'R'`
    #[error("TAStm32 did not reset properly (got {response:02X?}); try power cycling it")]
    DeviceNotReset { response: [u8; 2] },

    /// The device did not accept GameCube mode with `0x01 'S'`
    #[error("TAStm32 did not set to GCN mode (got {response:02X?}); try power cycling it")]
    ModeNotSet { response: [u8; 2] },

    /// A bounded read on the serial link expired
    #[error("Timed out after {timeout_ms} ms waiting for {waiting_for}")]
    Timeout {
        waiting_for: &'static str,
        timeout_ms: u64,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for GC Pad Bridge
pub type Result<T> = std::result::Result<T, PadBridgeError>;
