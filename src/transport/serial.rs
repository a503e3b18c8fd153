//! # TAStm32 Serial Transport
//!
//! Binary request/acknowledge protocol over the TAStm32 USB serial link.
//!
//! This module handles:
//! - Opening the link at 115200 baud with RTS/CTS flow control
//! - The reset and GameCube mode handshake on connect
//! - Sending one poll frame per commit and checking its acknowledgment
//!
//! Input changes are only kept in memory until [`Transport::commit`]; nothing
//! is written to the link in between.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::port::{SerialPortIO, TokioSerialPort};
use super::{Transport, TransportKind};
use crate::config::SerialConfig;
use crate::controller::input::InputOp;
use crate::controller::state::ControllerState;
use crate::error::{PadBridgeError, Result};
use crate::frame::encoder::encode_poll_packet;
use crate::frame::protocol::*;

/// Opens (or re-opens) the underlying byte link
pub type PortOpener = Box<dyn FnMut() -> Result<Box<dyn SerialPortIO>> + Send>;

/// TAStm32 serial backend
pub struct SerialTransport {
    device: String,
    opener: PortOpener,
    port: Option<Box<dyn SerialPortIO>>,
    ready: bool,
    read_timeout: Option<Duration>,
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("device", &self.device)
            .field("open", &self.port.is_some())
            .field("ready", &self.ready)
            .field("read_timeout", &self.read_timeout)
            .finish_non_exhaustive()
    }
}

impl SerialTransport {
    /// Open the TAStm32 described by `config`
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be opened. Without the device there
    /// is nothing to drive, so callers normally treat this as fatal.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gc_pad_bridge::config::SerialConfig;
    /// use gc_pad_bridge::transport::{SerialTransport, Transport};
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let mut serial = SerialTransport::open(&SerialConfig::default())?;
    ///     serial.connect().await?;
    ///     Ok(())
    /// }
    /// ```
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let path = config.device.clone();
        let baud_rate = config.baud_rate;
        let opener: PortOpener = Box::new(move || {
            let port = TokioSerialPort::open(&path, baud_rate)?;
            Ok(Box::new(port) as Box<dyn SerialPortIO>)
        });
        Self::with_opener(config.device.clone(), opener, config.read_timeout())
    }

    /// Build a transport around a custom port opener
    ///
    /// The opener is called once here and again on every `connect` after a
    /// `disconnect`.
    pub fn with_opener(
        device: impl Into<String>,
        mut opener: PortOpener,
        read_timeout: Option<Duration>,
    ) -> Result<Self> {
        let device = device.into();
        let port = opener()?;
        info!("Opened TAStm32 at {}", device);

        Ok(Self {
            device,
            opener,
            port: Some(port),
            ready: false,
            read_timeout,
        })
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    fn port_mut(&mut self) -> Result<&mut (dyn SerialPortIO + 'static)> {
        self.port
            .as_deref_mut()
            .ok_or_else(|| PadBridgeError::Serial(format!("{} is not open", self.device)))
    }
}

/// Read exactly `buf.len()` bytes, giving up after `timeout` if one is set
async fn read_response(
    port: &mut dyn SerialPortIO,
    buf: &mut [u8],
    timeout: Option<Duration>,
    waiting_for: &'static str,
) -> Result<()> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, port.read_exact(buf))
            .await
            .map_err(|_| PadBridgeError::Timeout {
                waiting_for,
                timeout_ms: limit.as_millis() as u64,
            })??,
        None => port.read_exact(buf).await?,
    }
    Ok(())
}

#[async_trait]
impl Transport for SerialTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Serial
    }

    /// True once the handshake has completed on an open link
    fn is_connected(&self) -> bool {
        self.ready && self.port.is_some()
    }

    /// Reset the device and put it in GameCube mode
    ///
    /// # Errors
    ///
    /// - `DeviceNotReset`: wrong answer to the reset command
    /// - `ModeNotSet`: wrong answer to the mode command
    /// - `Timeout`: no answer within the configured read timeout
    ///
    /// The first two usually need the device to be power cycled. No retry is
    /// attempted here.
    async fn connect(&mut self) -> Result<()> {
        self.ready = false;
        if self.port.is_none() {
            self.port = Some((self.opener)()?);
            info!("Re-opened TAStm32 at {}", self.device);
        }

        let timeout = self.read_timeout;
        let port = self.port_mut()?;

        // Drop anything left over from a previous session
        port.clear_input()?;

        port.write_all(&[CMD_RESET]).await?;
        port.flush().await?;
        let mut response = [0u8; 2];
        read_response(port, &mut response, timeout, "reset response").await?;
        if response != RESPONSE_RESET {
            error!(
                "TAStm32 did not reset properly (got {:02X?}). Try power cycling it.",
                response
            );
            return Err(PadBridgeError::DeviceNotReset { response });
        }
        debug!("TAStm32 reset");

        port.write_all(&CMD_SET_GCN_MODE).await?;
        port.flush().await?;
        let mut response = [0u8; 2];
        read_response(port, &mut response, timeout, "mode response").await?;
        port.clear_input()?;
        if response != RESPONSE_SET_MODE {
            error!(
                "TAStm32 did not set to GCN mode (got {:02X?}). Try power cycling it.",
                response
            );
            return Err(PadBridgeError::ModeNotSet { response });
        }

        self.ready = true;
        info!("TAStm32 at {} ready in GameCube mode", self.device);
        Ok(())
    }

    /// Close the link. The device gets no teardown command.
    async fn disconnect(&mut self) -> Result<()> {
        self.ready = false;
        if self.port.take().is_some() {
            info!("Closed TAStm32 at {}", self.device);
        }
        Ok(())
    }

    async fn apply(&mut self, _op: &InputOp) -> Result<()> {
        Ok(())
    }

    /// Send one poll frame and wait for its acknowledgment
    ///
    /// An unexpected acknowledgment byte is logged and otherwise ignored.
    async fn commit(&mut self, state: &ControllerState) -> Result<bool> {
        if !self.is_connected() {
            debug!("TAStm32 not connected, dropping frame");
            return Ok(false);
        }

        let timeout = self.read_timeout;
        let port = self.port_mut()?;
        let packet = encode_poll_packet(state);
        port.write_all(&packet).await?;
        port.flush().await?;

        let mut ack = [0u8; 1];
        read_response(port, &mut ack, timeout, "poll acknowledgment").await?;
        if ack[0] != RESPONSE_POLL {
            warn!("Got error response from TAStm32: 0x{:02X}", ack[0]);
        } else {
            debug!("Sent frame {:02X?}", &packet[1..]);
        }
        Ok(true)
    }
}
