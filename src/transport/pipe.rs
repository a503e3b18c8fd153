//! # Dolphin Pipe Transport
//!
//! Text protocol spoken over Dolphin's controller pipe.
//!
//! ## Commands
//!
//! | Input | Command |
//! |-------|---------|
//! | Press button | `PRESS <BUTTON>` |
//! | Release button | `RELEASE <BUTTON>` |
//! | Shoulder | `SET <L\|R> <amount>` |
//! | Stick | `SET <MAIN\|C> <x> <y>` |
//!
//! Every command is one `\n`-terminated line. Analog values are written as the
//! caller gave them; Dolphin clamps on its side.
//!
//! Commands are buffered and only reach Dolphin on [`Transport::commit`].

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info};

use super::{Transport, TransportKind};
use crate::controller::input::InputOp;
use crate::controller::state::ControllerState;
use crate::error::Result;
use crate::telemetry::InputLogger;

/// Category commands are mirrored under in the input log
pub const LOG_CATEGORY: &str = "Buttons Pressed";

/// Message logged for a full reset instead of its sixteen commands
pub const EMPTY_INPUT_LOG_MESSAGE: &str = "Empty Input";

/// Batch written for [`InputOp::Empty`]
pub const EMPTY_INPUT_COMMANDS: &str = "RELEASE A\n\
RELEASE B\n\
RELEASE X\n\
RELEASE Y\n\
RELEASE Z\n\
RELEASE L\n\
RELEASE R\n\
RELEASE START\n\
RELEASE D_UP\n\
RELEASE D_DOWN\n\
RELEASE D_LEFT\n\
RELEASE D_RIGHT\n\
SET MAIN .5 .5\n\
SET C .5 .5\n\
SET L 0\n\
SET R 0\n";

/// Format the pipe command for an input change
///
/// # Examples
///
/// ```
/// use gc_pad_bridge::controller::input::{Button, InputOp, Stick};
/// use gc_pad_bridge::transport::pipe::format_command;
///
/// assert_eq!(format_command(&InputOp::Press(Button::A)), "PRESS A\n");
/// assert_eq!(format_command(&InputOp::Tilt(Stick::Main, 0.0, 1.0)), "SET MAIN 0 1\n");
/// ```
pub fn format_command(op: &InputOp) -> String {
    match op {
        InputOp::Press(button) => format!("PRESS {}\n", button),
        InputOp::Release(button) => format!("RELEASE {}\n", button),
        InputOp::Shoulder(shoulder, amount) => format!("SET {} {}\n", shoulder, amount),
        InputOp::Tilt(stick, x, y) => format!("SET {} {} {}\n", stick, x, y),
        InputOp::Empty => EMPTY_INPUT_COMMANDS.to_string(),
    }
}

/// Dolphin pipe backend
///
/// Writing before [`connect`](Transport::connect) or after
/// [`disconnect`](Transport::disconnect) does nothing.
pub struct PipeTransport {
    pipe_path: PathBuf,
    pipe: Option<BufWriter<File>>,
    logger: Option<Box<dyn InputLogger>>,
}

impl std::fmt::Debug for PipeTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipeTransport")
            .field("pipe_path", &self.pipe_path)
            .field("connected", &self.pipe.is_some())
            .finish_non_exhaustive()
    }
}

impl PipeTransport {
    pub fn new<P: Into<PathBuf>>(pipe_path: P) -> Self {
        Self {
            pipe_path: pipe_path.into(),
            pipe: None,
            logger: None,
        }
    }

    /// Mirror every command into `logger`
    pub fn with_logger(mut self, logger: Box<dyn InputLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn pipe_path(&self) -> &Path {
        &self.pipe_path
    }

    fn mirror(&mut self, message: &str) {
        if let Some(logger) = self.logger.as_mut() {
            logger.log(LOG_CATEGORY, message, true);
        }
    }
}

#[async_trait]
impl Transport for PipeTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Pipe
    }

    fn is_connected(&self) -> bool {
        self.pipe.is_some()
    }

    /// Open the pipe for writing
    ///
    /// The path is never created: a missing pipe is an error, and the
    /// transport stays disconnected. A pipe that is already open is flushed
    /// and closed first, so queued commands are not lost.
    async fn connect(&mut self) -> Result<()> {
        if let Some(mut pipe) = self.pipe.take() {
            pipe.shutdown().await?;
            debug!("Closed previous handle to {}", self.pipe_path.display());
        }
        let file = OpenOptions::new()
            .write(true)
            .open(&self.pipe_path)
            .await?;
        self.pipe = Some(BufWriter::new(file));
        info!("Connected to Dolphin pipe at {}", self.pipe_path.display());
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut pipe) = self.pipe.take() {
            pipe.shutdown().await?;
            info!("Disconnected from Dolphin pipe at {}", self.pipe_path.display());
        }
        Ok(())
    }

    async fn apply(&mut self, op: &InputOp) -> Result<()> {
        if self.pipe.is_none() {
            return Ok(());
        }

        let command = format_command(op);
        if !matches!(op, InputOp::Empty) {
            self.mirror(&command);
        }

        if let Some(pipe) = self.pipe.as_mut() {
            pipe.write_all(command.as_bytes()).await?;
        }
        debug!("Queued pipe command: {}", command.trim_end());

        if matches!(op, InputOp::Empty) {
            self.mirror(EMPTY_INPUT_LOG_MESSAGE);
        }
        Ok(())
    }

    async fn commit(&mut self, _state: &ControllerState) -> Result<bool> {
        match self.pipe.as_mut() {
            Some(pipe) => {
                pipe.flush().await?;
                if let Some(logger) = self.logger.as_mut() {
                    logger.end_frame();
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::{Button, Shoulder, Stick};
    use crate::error::PadBridgeError;
    use crate::telemetry::logger::MockInputLogger;
    use std::fs;
    use tempfile::{NamedTempFile, TempDir};

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_format_buttons() {
        assert_eq!(format_command(&InputOp::Press(Button::Start)), "PRESS START\n");
        assert_eq!(format_command(&InputOp::Release(Button::DLeft)), "RELEASE D_LEFT\n");
    }

    #[test]
    fn test_format_analog_values_are_raw() {
        assert_eq!(
            format_command(&InputOp::Shoulder(Shoulder::R, 0.35)),
            "SET R 0.35\n"
        );
        assert_eq!(
            format_command(&InputOp::Shoulder(Shoulder::L, 1.5)),
            "SET L 1.5\n"
        );
        assert_eq!(
            format_command(&InputOp::Tilt(Stick::C, -0.25, 0.5)),
            "SET C -0.25 0.5\n"
        );
    }

    #[test]
    fn test_empty_input_batch() {
        let batch = format_command(&InputOp::Empty);
        let lines: Vec<&str> = batch.lines().collect();
        assert_eq!(lines.len(), 16);

        for (line, button) in lines.iter().zip(Button::ALL) {
            assert_eq!(*line, format!("RELEASE {}", button));
        }
        assert_eq!(&lines[12..], &["SET MAIN .5 .5", "SET C .5 .5", "SET L 0", "SET R 0"]);
    }

    #[tokio::test]
    async fn test_writes_before_connect_are_noops() {
        let file = NamedTempFile::new().unwrap();
        let mut pipe = PipeTransport::new(file.path());

        pipe.apply(&InputOp::Press(Button::A)).await.unwrap();
        let delivered = pipe.commit(&ControllerState::new()).await.unwrap();

        assert!(!delivered);
        assert!(!pipe.is_connected());
        assert_eq!(read(file.path()), "");
    }

    #[tokio::test]
    async fn test_commands_delivered_only_on_commit() {
        let file = NamedTempFile::new().unwrap();
        let mut pipe = PipeTransport::new(file.path());
        pipe.connect().await.unwrap();

        pipe.apply(&InputOp::Press(Button::A)).await.unwrap();
        pipe.apply(&InputOp::Tilt(Stick::Main, 0.0, 1.0)).await.unwrap();
        assert_eq!(read(file.path()), "");

        assert!(pipe.commit(&ControllerState::new()).await.unwrap());
        assert_eq!(read(file.path()), "PRESS A\nSET MAIN 0 1\n");
    }

    #[tokio::test]
    async fn test_connect_missing_pipe_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("slippibot1");
        let mut pipe = PipeTransport::new(&missing);

        let result = pipe.connect().await;
        match result {
            Err(PadBridgeError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("Expected Io error, got: {:?}", other),
        }
        assert!(!pipe.is_connected());
        assert!(!missing.exists(), "connect must not create the pipe");
    }

    #[tokio::test]
    async fn test_disconnect_flushes_and_stops_writes() {
        let file = NamedTempFile::new().unwrap();
        let mut pipe = PipeTransport::new(file.path());
        pipe.connect().await.unwrap();

        pipe.apply(&InputOp::Release(Button::B)).await.unwrap();
        pipe.disconnect().await.unwrap();
        assert!(!pipe.is_connected());
        assert_eq!(read(file.path()), "RELEASE B\n");

        pipe.apply(&InputOp::Press(Button::B)).await.unwrap();
        assert!(!pipe.commit(&ControllerState::new()).await.unwrap());
        assert_eq!(read(file.path()), "RELEASE B\n");

        // Disconnecting twice is fine
        pipe.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_reconnect_after_disconnect() {
        let file = NamedTempFile::new().unwrap();
        let mut pipe = PipeTransport::new(file.path());

        pipe.connect().await.unwrap();
        pipe.disconnect().await.unwrap();
        pipe.connect().await.unwrap();
        assert!(pipe.is_connected());
    }

    #[tokio::test]
    async fn test_connect_again_keeps_queued_commands() {
        let file = NamedTempFile::new().unwrap();
        let mut pipe = PipeTransport::new(file.path());
        pipe.connect().await.unwrap();

        pipe.apply(&InputOp::Press(Button::A)).await.unwrap();
        pipe.connect().await.unwrap();
        assert!(pipe.is_connected());
        pipe.commit(&ControllerState::new()).await.unwrap();

        assert!(read(file.path()).contains("PRESS A\n"));
    }

    #[tokio::test]
    async fn test_commands_mirrored_to_logger() {
        let file = NamedTempFile::new().unwrap();
        let mut logger = MockInputLogger::new();
        logger
            .expect_log()
            .withf(|category, message, concat| {
                category == LOG_CATEGORY && message == "PRESS X\n" && *concat
            })
            .times(1)
            .return_const(());
        logger
            .expect_log()
            .withf(|category, message, concat| {
                category == LOG_CATEGORY && message == EMPTY_INPUT_LOG_MESSAGE && *concat
            })
            .times(1)
            .return_const(());
        logger.expect_end_frame().times(1).return_const(());

        let mut pipe = PipeTransport::new(file.path()).with_logger(Box::new(logger));
        pipe.connect().await.unwrap();
        pipe.apply(&InputOp::Press(Button::X)).await.unwrap();
        pipe.apply(&InputOp::Empty).await.unwrap();
        pipe.commit(&ControllerState::new()).await.unwrap();

        assert_eq!(read(file.path()), format!("PRESS X\n{}", EMPTY_INPUT_COMMANDS));
    }

    #[tokio::test]
    async fn test_logger_untouched_while_disconnected() {
        let file = NamedTempFile::new().unwrap();
        let mut logger = MockInputLogger::new();
        logger.expect_log().times(0);

        let mut pipe = PipeTransport::new(file.path()).with_logger(Box::new(logger));
        pipe.apply(&InputOp::Press(Button::X)).await.unwrap();
    }
}
