//! # GC Pad Bridge Library
//!
//! Drive a virtual GameCube controller from Rust.
//!
//! This library models the controller state and delivers it to the console
//! over one of two transports: Dolphin's controller pipe (text commands) or a
//! TAStm32 replay device on a serial link (binary frames).

pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod frame;
pub mod telemetry;
pub mod transport;
