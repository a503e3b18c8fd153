//! # Telemetry Module
//!
//! Records the inputs sent to the console as JSON Lines.
//!
//! This module handles:
//! - The [`InputLogger`] collaborator that transports mirror commands into
//! - Grouping entries per category within one frame
//! - Writing one JSONL record per frame

pub mod logger;

pub use logger::{InputLogger, JsonlInputLogger};
