// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for table synchronization

use crate::signals::Signal;
use thiserror::Error;

/// A synchronization primitive failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("signal {signal} was torn down")]
    Closed { signal: Signal },
}

/// The state recorder could not persist a record
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("state recorder failed: {0}")]
    Failed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that end a role at the table.
///
/// Every variant is fatal: the substrate or the shared state can no longer be
/// trusted, so the role stops instead of retrying.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Signal(#[from] SignalError),
    #[error("record error: {0}")]
    Record(#[from] RecordError),
    #[error("shared state invariant violated: {message}")]
    Invariant { message: String },
}

/// Errors loading a simulation config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
