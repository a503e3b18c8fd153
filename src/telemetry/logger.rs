//! # Input Logger
//!
//! Append-style log of controller commands, one JSON record per frame.
//!
//! ```text
//! {"timestamp":"2024-01-01T12:00:00.000Z","frame":3,"entries":{"Buttons Pressed":"PRESS A\nSET MAIN 0 0.5\n"}}
//! ```

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::Result;

/// Sink for human-readable input entries
///
/// Logging never fails from the caller's point of view: implementations deal
/// with their own I/O errors.
#[cfg_attr(test, mockall::automock)]
pub trait InputLogger: Send {
    /// Record `message` under `category`.
    ///
    /// With `concat` the message is appended to whatever the category already
    /// holds for the current frame, otherwise it replaces it.
    fn log(&mut self, category: &str, message: &str, concat: bool);

    /// Called once the entries logged so far have been sent to the console
    fn end_frame(&mut self) {}
}

#[derive(Debug, Serialize)]
struct FrameRecord<'a> {
    timestamp: String,
    frame: u64,
    entries: &'a BTreeMap<String, String>,
}

/// [`InputLogger`] writing JSON Lines files
pub struct JsonlInputLogger {
    path: PathBuf,
    writer: BufWriter<File>,
    entries: BTreeMap<String, String>,
    frame: u64,
}

impl std::fmt::Debug for JsonlInputLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlInputLogger")
            .field("path", &self.path)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

impl JsonlInputLogger {
    /// Create a new log file in `log_dir`
    ///
    /// The directory is created if missing. The file is named after the
    /// current UTC time, e.g. `inputs_20240101_120000.jsonl`.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created
    pub fn create<P: AsRef<Path>>(log_dir: P) -> Result<Self> {
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;

        let file_name = format!("inputs_{}.jsonl", Utc::now().format("%Y%m%d_%H%M%S"));
        let path = log_dir.join(file_name);
        let file = File::create(&path)?;
        info!("Logging inputs to {}", path.display());

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            entries: BTreeMap::new(),
            frame: 0,
        })
    }

    /// Path of the file being written
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries collected for the current frame
    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Number of frames written so far
    pub fn frames_written(&self) -> u64 {
        self.frame
    }

    /// Write the current frame's entries as one record and start a new frame
    ///
    /// Frames without entries are skipped. Write errors are reported and
    /// otherwise ignored.
    pub fn write_frame(&mut self) {
        if self.entries.is_empty() {
            return;
        }

        let record = FrameRecord {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            frame: self.frame,
            entries: &self.entries,
        };

        let result = serde_json::to_string(&record)
            .map_err(std::io::Error::from)
            .and_then(|line| {
                writeln!(self.writer, "{}", line)?;
                self.writer.flush()
            });

        match result {
            Ok(()) => debug!("Wrote input log frame {}", self.frame),
            Err(e) => warn!("Failed to write input log frame {}: {}", self.frame, e),
        }

        self.frame += 1;
        self.entries.clear();
    }
}

impl InputLogger for JsonlInputLogger {
    fn log(&mut self, category: &str, message: &str, concat: bool) {
        let entry = self.entries.entry(category.to_string()).or_default();
        if !concat {
            entry.clear();
        }
        entry.push_str(message);
    }

    fn end_frame(&mut self) {
        self.write_frame();
    }
}

impl Drop for JsonlInputLogger {
    fn drop(&mut self) {
        self.write_frame();
    }
}
