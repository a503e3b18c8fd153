//! # Transport Module
//!
//! Delivers controller input to the console.
//!
//! Two backends implement [`Transport`]:
//! - [`PipeTransport`]: Dolphin named pipe, one text command per input change
//! - [`SerialTransport`]: TAStm32 serial link, one binary frame per flush
//!
//! Both see every [`InputOp`] through [`Transport::apply`] and the full state
//! through [`Transport::commit`]. What differs is *when* bytes leave the
//! process: the pipe writes on `apply`, the serial link only on `commit`.

use async_trait::async_trait;
use std::fmt;

use crate::controller::input::InputOp;
use crate::controller::state::ControllerState;
use crate::error::Result;

pub mod pipe;
pub mod port;
pub mod serial;

pub use pipe::PipeTransport;
pub use serial::SerialTransport;

/// Which backend a transport talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Dolphin named pipe
    Pipe,
    /// TAStm32 over USB serial
    Serial,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Pipe => f.write_str("pipe"),
            TransportKind::Serial => f.write_str("serial"),
        }
    }
}

/// Connection to whatever consumes the controller state
#[async_trait]
pub trait Transport: Send {
    fn kind(&self) -> TransportKind;

    fn is_connected(&self) -> bool;

    /// Acquire the connection (and run any handshake)
    async fn connect(&mut self) -> Result<()>;

    /// Release the connection. Safe to call when not connected.
    async fn disconnect(&mut self) -> Result<()>;

    /// Observe a single input change
    async fn apply(&mut self, op: &InputOp) -> Result<()>;

    /// Make `state` visible to the receiver
    ///
    /// Returns `true` when the state was delivered, `false` when there was no
    /// connection to deliver it to.
    async fn commit(&mut self, state: &ControllerState) -> Result<bool>;
}
