//! # TAStm32 Frame Module
//!
//! Binary protocol spoken to a TAStm32 replay device in GameCube mode.
//!
//! This module handles:
//! - Protocol constants (command bytes, expected responses, mask bits)
//! - Encoding a controller state into the 8-byte GameCube poll frame

pub mod protocol;
pub mod encoder;
