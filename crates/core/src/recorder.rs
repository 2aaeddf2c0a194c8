// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State recording side channel
//!
//! Every status change made under the table lock is handed to a
//! [`StateRecorder`] before the lock is released. Role exits are recorded
//! outside the lock and tell a normal close apart from a fatal error.

use crate::error::RecordError;
use crate::ingredient::{Ingredient, SmokerId};
use crate::state::SharedState;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// A role at the table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "snake_case")]
pub enum Actor {
    Agent,
    Watcher(Ingredient),
    Smoker(SmokerId),
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actor::Agent => write!(f, "agent"),
            Actor::Watcher(kind) => write!(f, "watcher-{}", kind),
            Actor::Smoker(smoker) => write!(f, "{}", smoker),
        }
    }
}

/// Why a role stopped
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExitReason {
    /// Observed the closing flag and shut down
    Closed,
    /// A synchronization primitive or the recorder failed
    Fatal { error: String },
}

impl ExitReason {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExitReason::Fatal { .. })
    }
}

/// Sink for state transitions.
///
/// `record_state` runs while the table lock is held and must not block on
/// other roles. An error is fatal to the calling role.
pub trait StateRecorder: Send + Sync {
    fn record_state(&self, actor: Actor, state: &SharedState) -> Result<(), RecordError>;

    fn record_exit(&self, actor: Actor, reason: &ExitReason) -> Result<(), RecordError>;
}

impl<R: StateRecorder + ?Sized> StateRecorder for Arc<R> {
    fn record_state(&self, actor: Actor, state: &SharedState) -> Result<(), RecordError> {
        (**self).record_state(actor, state)
    }

    fn record_exit(&self, actor: Actor, reason: &ExitReason) -> Result<(), RecordError> {
        (**self).record_exit(actor, reason)
    }
}

/// Recorder that drops everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpRecorder;

impl StateRecorder for NoOpRecorder {
    fn record_state(&self, _actor: Actor, _state: &SharedState) -> Result<(), RecordError> {
        Ok(())
    }

    fn record_exit(&self, _actor: Actor, _reason: &ExitReason) -> Result<(), RecordError> {
        Ok(())
    }
}

/// Wrapper that adds tracing to any StateRecorder
#[derive(Clone, Debug)]
pub struct TracedRecorder<R> {
    inner: R,
}

impl<R> TracedRecorder<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: StateRecorder> StateRecorder for TracedRecorder<R> {
    fn record_state(&self, actor: Actor, state: &SharedState) -> Result<(), RecordError> {
        tracing::debug!(
            %actor,
            available = ?state.available,
            reserved = ?state.reserved,
            closing = state.closing,
            "state"
        );
        let result = self.inner.record_state(actor, state);
        if let Err(e) = &result {
            tracing::error!(%actor, error = %e, "record failed");
        }
        result
    }

    fn record_exit(&self, actor: Actor, reason: &ExitReason) -> Result<(), RecordError> {
        match reason {
            ExitReason::Closed => tracing::info!(%actor, "closed"),
            ExitReason::Fatal { error } => tracing::error!(%actor, error, "exited on fatal error"),
        }
        self.inner.record_exit(actor, reason)
    }
}

/// Entry kept by [`MemoryRecorder`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recorded {
    State { actor: Actor, state: SharedState },
    Exit { actor: Actor, reason: ExitReason },
}

#[derive(Debug, Default)]
struct MemoryLog {
    entries: Vec<Recorded>,
    /// Number of state records accepted before every later one fails
    fail_after: Option<usize>,
    accepted: usize,
}

/// In-memory recorder for tests, with optional injected failure
#[derive(Clone, Debug, Default)]
pub struct MemoryRecorder {
    log: Arc<Mutex<MemoryLog>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `n` state records, then fail every later one
    pub fn failing_after(n: usize) -> Self {
        let recorder = Self::new();
        recorder.lock().fail_after = Some(n);
        recorder
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryLog> {
        self.log.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn entries(&self) -> Vec<Recorded> {
        self.lock().entries.clone()
    }

    /// Snapshots recorded by `actor`, oldest first
    pub fn states_of(&self, actor: Actor) -> Vec<SharedState> {
        self.lock()
            .entries
            .iter()
            .filter_map(|e| match e {
                Recorded::State { actor: a, state } if *a == actor => Some(state.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn exit_of(&self, actor: Actor) -> Option<ExitReason> {
        self.lock().entries.iter().find_map(|e| match e {
            Recorded::Exit { actor: a, reason } if *a == actor => Some(reason.clone()),
            _ => None,
        })
    }

    pub fn exits(&self) -> Vec<(Actor, ExitReason)> {
        self.lock()
            .entries
            .iter()
            .filter_map(|e| match e {
                Recorded::Exit { actor, reason } => Some((*actor, reason.clone())),
                _ => None,
            })
            .collect()
    }
}

impl StateRecorder for MemoryRecorder {
    fn record_state(&self, actor: Actor, state: &SharedState) -> Result<(), RecordError> {
        let mut log = self.lock();
        if log.fail_after.is_some_and(|n| log.accepted >= n) {
            return Err(RecordError::Failed(format!(
                "injected failure recording {}",
                actor
            )));
        }
        log.accepted += 1;
        log.entries.push(Recorded::State {
            actor,
            state: state.clone(),
        });
        Ok(())
    }

    fn record_exit(&self, actor: Actor, reason: &ExitReason) -> Result<(), RecordError> {
        self.lock().entries.push(Recorded::Exit {
            actor,
            reason: reason.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "recorder_tests.rs"]
mod tests;
