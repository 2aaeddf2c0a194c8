// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only JSONL log of table state transitions

use serde::{Deserialize, Serialize};
use smk_core::{Actor, ExitReason, RecordError, SharedState, StateRecorder};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur in state log operations
#[derive(Debug, Error)]
pub enum StateLogError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error on line {line}: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },
}

/// What a log line describes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEntry {
    State { state: SharedState },
    Exit { exit: ExitReason },
}

/// One line of the state log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub seq: u64,
    pub actor: Actor,
    #[serde(flatten)]
    pub entry: LogEntry,
}

struct Writer {
    file: File,
    sequence: u64,
}

/// State recorder backed by a JSONL file.
///
/// Opening an existing log continues its sequence numbers.
pub struct StateLog {
    path: PathBuf,
    writer: Mutex<Writer>,
}

impl StateLog {
    /// Open or create a state log at the given path
    pub fn open(path: &Path) -> Result<Self, StateLogError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;

        // Count existing entries to set sequence number
        let reader = BufReader::new(File::open(path)?);
        let sequence = reader.lines().count() as u64;

        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(Writer { file, sequence }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the current sequence number
    pub fn sequence(&self) -> u64 {
        self.writer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .sequence
    }

    fn append(&self, actor: Actor, entry: LogEntry) -> Result<u64, RecordError> {
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let record = LogRecord {
            seq: writer.sequence + 1,
            actor,
            entry,
        };
        let line =
            serde_json::to_string(&record).map_err(|e| RecordError::Failed(e.to_string()))?;
        writeln!(writer.file, "{}", line)?;
        writer.file.flush()?;
        writer.sequence = record.seq;
        Ok(record.seq)
    }

    /// Read every record of the log, oldest first
    pub fn replay(path: &Path) -> Result<Vec<LogRecord>, StateLogError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|source| StateLogError::Json {
                line: index + 1,
                source,
            })?;
            records.push(record);
        }

        Ok(records)
    }
}

impl StateRecorder for StateLog {
    fn record_state(&self, actor: Actor, state: &SharedState) -> Result<(), RecordError> {
        self.append(
            actor,
            LogEntry::State {
                state: state.clone(),
            },
        )?;
        Ok(())
    }

    fn record_exit(&self, actor: Actor, reason: &ExitReason) -> Result<(), RecordError> {
        self.append(
            actor,
            LogEntry::Exit {
                exit: reason.clone(),
            },
        )?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "state_log_tests.rs"]
mod tests;
