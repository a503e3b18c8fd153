//! Trait abstraction for serial port operations to enable testing

use async_trait::async_trait;
use std::io;
use tokio_serial::SerialPortBuilderExt;

use crate::error::{PadBridgeError, Result};

/// Trait for serial port I/O operations
#[async_trait]
pub trait SerialPortIO: Send {
    /// Write all data to the port
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Flush the output buffer
    async fn flush(&mut self) -> io::Result<()>;

    /// Read exactly `buf.len()` bytes, waiting as long as it takes
    async fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Discard everything received but not yet read
    fn clear_input(&mut self) -> io::Result<()>;
}

/// Wrapper around tokio_serial::SerialStream that implements SerialPortIO
pub struct TokioSerialPort {
    port: tokio_serial::SerialStream,
}

impl TokioSerialPort {
    pub fn new(port: tokio_serial::SerialStream) -> Self {
        Self { port }
    }

    /// Open a TAStm32 device: 8N1, RTS/CTS flow control
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::Hardware)
            .open_native_async()
            .map_err(|e| {
                PadBridgeError::Serial(format!("Failed to open {} at {} baud: {}", path, baud_rate, e))
            })?;

        Ok(Self::new(port))
    }
}

#[async_trait]
impl SerialPortIO for TokioSerialPort {
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        use tokio::io::AsyncWriteExt;
        self.port.write_all(data).await
    }

    async fn flush(&mut self) -> io::Result<()> {
        use tokio::io::AsyncWriteExt;
        self.port.flush().await
    }

    async fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        use tokio::io::AsyncReadExt;
        self.port.read_exact(buf).await.map(|_| ())
    }

    fn clear_input(&mut self) -> io::Result<()> {
        use tokio_serial::SerialPort;
        self.port
            .clear(tokio_serial::ClearBuffer::Input)
            .map_err(io::Error::from)
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Mock serial port for testing
    ///
    /// Every write pops the next scripted reply (if any) into the input buffer,
    /// the way the device answers a command. Reads that cannot be satisfied
    /// wait forever, like the real link without a timeout.
    #[derive(Clone)]
    pub struct MockSerialPort {
        pub written_data: Arc<Mutex<Vec<Vec<u8>>>>,
        pub input: Arc<Mutex<VecDeque<u8>>>,
        pub replies: Arc<Mutex<VecDeque<Vec<u8>>>>,
        pub clear_count: Arc<Mutex<usize>>,
        pub write_error: Arc<Mutex<Option<io::ErrorKind>>>,
        pub flush_error: Arc<Mutex<Option<io::ErrorKind>>>,
    }

    impl MockSerialPort {
        pub fn new() -> Self {
            Self {
                written_data: Arc::new(Mutex::new(Vec::new())),
                input: Arc::new(Mutex::new(VecDeque::new())),
                replies: Arc::new(Mutex::new(VecDeque::new())),
                clear_count: Arc::new(Mutex::new(0)),
                write_error: Arc::new(Mutex::new(None)),
                flush_error: Arc::new(Mutex::new(None)),
            }
        }

        /// Queue the bytes the device sends back after the next write
        pub fn reply_with(&self, bytes: &[u8]) {
            self.replies.lock().unwrap().push_back(bytes.to_vec());
        }

        /// Put bytes in the input buffer right away (stale data)
        pub fn push_input(&self, bytes: &[u8]) {
            self.input.lock().unwrap().extend(bytes.iter().copied());
        }

        pub fn get_written_data(&self) -> Vec<Vec<u8>> {
            self.written_data.lock().unwrap().clone()
        }

        pub fn pending_input(&self) -> usize {
            self.input.lock().unwrap().len()
        }

        pub fn clear_count(&self) -> usize {
            *self.clear_count.lock().unwrap()
        }

        pub fn set_write_error(&self, error: io::ErrorKind) {
            *self.write_error.lock().unwrap() = Some(error);
        }

        pub fn set_flush_error(&self, error: io::ErrorKind) {
            *self.flush_error.lock().unwrap() = Some(error);
        }
    }

    #[async_trait]
    impl SerialPortIO for MockSerialPort {
        async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
            if let Some(error) = *self.write_error.lock().unwrap() {
                return Err(io::Error::new(error, "Mock write error"));
            }
            self.written_data.lock().unwrap().push(data.to_vec());
            if let Some(reply) = self.replies.lock().unwrap().pop_front() {
                self.input.lock().unwrap().extend(reply);
            }
            Ok(())
        }

        async fn flush(&mut self) -> io::Result<()> {
            if let Some(error) = *self.flush_error.lock().unwrap() {
                return Err(io::Error::new(error, "Mock flush error"));
            }
            Ok(())
        }

        async fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
            let filled = {
                let mut input = self.input.lock().unwrap();
                if input.len() >= buf.len() {
                    for byte in buf.iter_mut() {
                        *byte = input.pop_front().unwrap_or_default();
                    }
                    true
                } else {
                    false
                }
            };

            if filled {
                Ok(())
            } else {
                std::future::pending::<io::Result<()>>().await
            }
        }

        fn clear_input(&mut self) -> io::Result<()> {
            self.input.lock().unwrap().clear();
            *self.clear_count.lock().unwrap() += 1;
            Ok(())
        }
    }
}
