//! # GC Pad Bridge
//!
//! Drive a virtual GameCube controller through Dolphin or a TAStm32.
//!
//! This application connects the configured controller and holds it at rest,
//! flushing a neutral state at the console's poll rate until Ctrl+C.

use anyhow::Result;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info};
use tracing_subscriber::prelude::*;

use gc_pad_bridge::config::{Backend, Config};
use gc_pad_bridge::controller::Controller;
use gc_pad_bridge::telemetry::{InputLogger, JsonlInputLogger};

/// Configuration file used when none is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Number of flushes between status log messages
const LOG_INTERVAL_FRAMES: u64 = 600;

/// Main entry point for GC Pad Bridge
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (first argument, or `config/default.toml`)
///    - Set up logging with tracing subscriber (plus a daily log file when
///      telemetry is enabled)
///    - Build the controller; a TAStm32 that cannot be opened ends the process
///    - Connect (pipe open, or TAStm32 reset + GameCube mode handshake)
///
/// 2. **Main Loop**
///    - Flush the neutral controller state at `poll_rate_hz`
///    - Log status every 600 frames
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Graceful Shutdown**
///    - Disconnect the controller
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)?;

    // Initialize logging
    let (file_layer, _log_guard) = if config.telemetry.enabled {
        let appender =
            tracing_appender::rolling::daily(&config.telemetry.log_dir, "gc-pad-bridge.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        (
            Some(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false)),
            Some(guard),
        )
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    info!("GC Pad Bridge v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("Loaded configuration from {}", config_path);

    let input_logger: Option<Box<dyn InputLogger>> = if config.telemetry.enabled {
        Some(Box::new(JsonlInputLogger::create(&config.telemetry.log_dir)?))
    } else {
        None
    };

    let mut controller = match Controller::from_config(&config, input_logger) {
        Ok(controller) => controller,
        Err(e) => {
            if config.controller.backend == Backend::Serial {
                error!(
                    "TAStm32 was not ready. It might be booting up. Wait a few seconds and try again ({})",
                    e
                );
            } else {
                error!("Failed to create controller: {}", e);
            }
            std::process::exit(1);
        }
    };

    if let Err(e) = controller.connect().await {
        error!("Failed to connect controller: {}", e);
        return Err(e.into());
    }

    controller.empty_input().await?;

    let period = Duration::from_secs_f64(1.0 / config.runner.poll_rate_hz as f64);
    let mut frame_interval = interval(period);

    info!(
        "Holding controller {} at rest, flushing at {}Hz",
        config.controller.port, config.runner.poll_rate_hz
    );
    info!("Press Ctrl+C to exit");

    let mut frame_count: u64 = 0;

    loop {
        tokio::select! {
            _ = frame_interval.tick() => {
                if let Err(e) = controller.flush().await {
                    debug!("Failed to flush controller: {}", e);
                    continue;
                }

                frame_count += 1;
                if frame_count % LOG_INTERVAL_FRAMES == 0 {
                    info!("Sent {} frames over {}", frame_count, controller.kind());
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                info!("Total frames sent: {}", frame_count);
                break;
            }
        }
    }

    controller.disconnect().await?;
    Ok(())
}
