// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! smk-storage: durable state trace for the smokers' table

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod state_log;
mod trace;

pub use state_log::{LogEntry, LogRecord, StateLog, StateLogError};
pub use trace::{render_row, Trace};
