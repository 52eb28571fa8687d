//! # Session Recorder Module
//!
//! Optional JSONL recording of controller state for offline diagnosis.
//!
//! This module handles:
//! - Formatting sampled state as JSONL (JSON Lines)
//! - Writing to rotating record files
//! - Managing file rotation (max N records per file)
//! - Retaining only the last M files

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::RecorderConfig;
use crate::controller::state::{ControllerState, BUTTON_NAMES};
use crate::error::Result;

/// One recorded line of controller state.
#[derive(Debug, Serialize)]
struct InputRecord {
    /// Local wall-clock time, RFC 3339.
    timestamp: String,
    connected: bool,
    buttons: Vec<ButtonRecord>,
    left_stick: [f32; 2],
    right_stick: [f32; 2],
    triggers: [f32; 2],
}

#[derive(Debug, Serialize)]
struct ButtonRecord {
    name: &'static str,
    pressed: bool,
    value: f32,
}

impl InputRecord {
    fn from_state(state: &ControllerState) -> Self {
        Self {
            timestamp: chrono::Local::now().to_rfc3339(),
            connected: state.connected,
            buttons: state
                .buttons
                .iter()
                .zip(BUTTON_NAMES)
                .map(|(button, name)| ButtonRecord {
                    name,
                    pressed: button.pressed,
                    value: button.value,
                })
                .collect(),
            left_stick: [state.sticks.left.x, state.sticks.left.y],
            right_stick: [state.sticks.right.x, state.sticks.right.y],
            triggers: [state.triggers.left, state.triggers.right],
        }
    }
}

/// Writes controller-state records to rotating JSONL files.
///
/// Does nothing when disabled in the configuration; callers can record
/// unconditionally on their own cadence.
#[derive(Debug)]
pub struct SessionRecorder {
    config: RecorderConfig,
    writer: Option<BufWriter<File>>,
    records_in_file: usize,
    file_seq: u32,
}

impl SessionRecorder {
    /// Creates a recorder; no file is opened until the first record.
    #[must_use]
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            config,
            writer: None,
            records_in_file: 0,
            file_seq: 0,
        }
    }

    /// Appends one state record, rotating files as configured.
    ///
    /// # Errors
    ///
    /// Returns error if the record directory or current file cannot be
    /// written.
    pub fn record(&mut self, state: &ControllerState) -> Result<()> {
        if !self.config.enabled {
            return Ok(());
        }

        if self.writer.is_none() {
            self.open_new_file()?;
        }

        let line = serde_json::to_string(&InputRecord::from_state(state))?;
        if let Some(writer) = self.writer.as_mut() {
            writeln!(writer, "{}", line)?;
            writer.flush()?;
        }

        self.records_in_file += 1;
        if self.records_in_file >= self.config.max_records_per_file {
            debug!("Record file reached {} records, rotating", self.records_in_file);
            self.writer = None;
        }

        Ok(())
    }

    fn open_new_file(&mut self) -> Result<()> {
        let dir = Path::new(&self.config.log_dir);
        fs::create_dir_all(dir)?;

        self.file_seq += 1;
        let filename = format!(
            "pad-probe-{}-{:04}.jsonl",
            chrono::Local::now().format("%Y%m%d-%H%M%S"),
            self.file_seq
        );
        let path = dir.join(filename);
        info!("Recording session to {}", path.display());

        self.writer = Some(BufWriter::new(File::create(&path)?));
        self.records_in_file = 0;

        self.prune_old_files(dir)?;
        Ok(())
    }

    /// Deletes the oldest record files beyond the retention limit.
    fn prune_old_files(&self, dir: &Path) -> Result<()> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with("pad-probe-") && name.ends_with(".jsonl"))
            })
            .collect();

        if files.len() <= self.config.max_files_to_keep {
            return Ok(());
        }

        // Timestamped names sort chronologically
        files.sort();
        let excess = files.len() - self.config.max_files_to_keep;
        for path in files.into_iter().take(excess) {
            debug!("Pruning old record file {}", path.display());
            fs::remove_file(path)?;
        }

        Ok(())
    }
}
