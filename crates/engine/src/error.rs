// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the simulation runtime

use smk_core::Actor;
use thiserror::Error;

/// Errors that can occur in the runtime
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("role task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("{actor} failed: {message}")]
    Role { actor: Actor, message: String },
}
