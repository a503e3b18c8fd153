//! # Controller Module
//!
//! Virtual GameCube controller.
//!
//! This module handles:
//! - Controller state (buttons, sticks, shoulders)
//! - Turning press/tilt calls into [`InputOp`]s for the transport
//! - Connect, flush and disconnect lifecycle
//!
//! ## Usage
//!
//! ```no_run
//! use gc_pad_bridge::controller::Controller;
//! use gc_pad_bridge::controller::input::{Button, Stick};
//! use gc_pad_bridge::transport::PipeTransport;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pipe = PipeTransport::new("/home/me/.dolphin/Pipes/slippibot1");
//!     let mut controller = Controller::new(Box::new(pipe));
//!     controller.connect().await?;
//!
//!     controller.empty_input().await?;
//!     controller.press_button(Button::A).await?;
//!     controller.tilt_analog(Stick::Main, 0.0, 0.5).await?;
//!     controller.flush().await?;
//!     Ok(())
//! }
//! ```

pub mod input;
pub mod state;

use tracing::{debug, info};

use crate::config::{Backend, Config};
use crate::console::pipes_path;
use crate::error::Result;
use crate::telemetry::InputLogger;
use crate::transport::{PipeTransport, SerialTransport, Transport, TransportKind};
use input::{Button, InputOp, Shoulder, Stick};
use state::ControllerState;

/// A virtual controller plugged into one console port
///
/// Input calls build up `current`. [`flush`](Controller::flush) makes it
/// visible to the console and snapshots it into `previous`.
pub struct Controller {
    transport: Box<dyn Transport>,
    current: ControllerState,
    previous: ControllerState,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("kind", &self.transport.kind())
            .field("connected", &self.transport.is_connected())
            .field("current", &self.current)
            .field("previous", &self.previous)
            .finish()
    }
}

impl Controller {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            current: ControllerState::new(),
            previous: ControllerState::new(),
        }
    }

    /// Build the controller for the configured backend
    ///
    /// The logger only receives pipe commands; the serial backend sends
    /// nothing it could mirror.
    ///
    /// # Errors
    ///
    /// Returns error if the serial device cannot be opened
    pub fn from_config(config: &Config, logger: Option<Box<dyn InputLogger>>) -> Result<Self> {
        let transport: Box<dyn Transport> = match config.controller.backend {
            Backend::Pipe => {
                let path = pipes_path(&config.pipe.dolphin_home, config.controller.port);
                debug!("Using Dolphin pipe {}", path.display());
                let pipe = PipeTransport::new(path);
                match logger {
                    Some(logger) => Box::new(pipe.with_logger(logger)),
                    None => Box::new(pipe),
                }
            }
            Backend::Serial => Box::new(SerialTransport::open(&config.serial)?),
        };
        Ok(Self::new(transport))
    }

    pub fn kind(&self) -> TransportKind {
        self.transport.kind()
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// State built up since the last flush
    pub fn current(&self) -> &ControllerState {
        &self.current
    }

    /// State as of the last delivered flush
    pub fn previous(&self) -> &ControllerState {
        &self.previous
    }

    /// Connect to the console
    ///
    /// # Errors
    ///
    /// - Pipe: the pipe does not exist or cannot be opened
    /// - Serial: the device failed the reset or mode handshake
    pub async fn connect(&mut self) -> Result<()> {
        self.transport.connect().await?;
        info!("Controller connected over {}", self.transport.kind());
        Ok(())
    }

    pub async fn disconnect(&mut self) -> Result<()> {
        self.transport.disconnect().await
    }

    async fn apply(&mut self, op: InputOp) -> Result<()> {
        self.current.apply(&op);
        self.transport.apply(&op).await
    }

    /// Press a single button. Pressing a held button has no effect.
    pub async fn press_button(&mut self, button: Button) -> Result<()> {
        self.apply(InputOp::Press(button)).await
    }

    /// Release a single button. Releasing a released button has no effect.
    pub async fn release_button(&mut self, button: Button) -> Result<()> {
        self.apply(InputOp::Release(button)).await
    }

    /// Press an analog shoulder to `amount` (0 released, 1 fully in)
    ///
    /// This does not touch the digital L/R button.
    pub async fn press_shoulder(&mut self, shoulder: Shoulder, amount: f64) -> Result<()> {
        self.apply(InputOp::Shoulder(shoulder, amount)).await
    }

    /// Tilt a stick to (`x`, `y`): 0 is left/down, 1 is right/up
    pub async fn tilt_analog(&mut self, stick: Stick, x: f64, y: f64) -> Result<()> {
        self.apply(InputOp::Tilt(stick, x, y)).await
    }

    /// Set the main stick, let go of both shoulders, and hold only `button`
    ///
    /// Every other digital button is released, so calling this twice before a
    /// flush keeps only the second call's button. Like every other input call,
    /// `current` is updated even when the transport is not connected.
    pub async fn simple_press(&mut self, x: f64, y: f64, button: Option<Button>) -> Result<()> {
        self.tilt_analog(Stick::Main, x, y).await?;
        self.press_shoulder(Shoulder::L, 0.0).await?;
        self.press_shoulder(Shoulder::R, 0.0).await?;

        for item in Button::ALL {
            if Some(item) == button {
                self.press_button(item).await?;
            } else {
                self.release_button(item).await?;
            }
        }
        Ok(())
    }

    /// Release everything and return sticks and shoulders to rest
    pub async fn empty_input(&mut self) -> Result<()> {
        self.apply(InputOp::Empty).await
    }

    /// Send the current state to the console
    ///
    /// Once delivered, `current` is copied into `previous`.
    pub async fn flush(&mut self) -> Result<()> {
        if self.transport.commit(&self.current).await? {
            self.previous = self.current.clone();
        }
        Ok(())
    }
}
