// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The table: shared state, its lock, the signal set and the recorder
//!
//! Every role receives an `Arc<Table>` at construction. The shared state is
//! only reachable through [`Table::enter`], which hands out a
//! [`CriticalSection`] holding the lock until it is dropped or left.

use crate::error::{SignalError, SyncError};
use crate::recorder::{Actor, ExitReason, StateRecorder};
use crate::signals::{Signal, SignalSet};
use crate::state::SharedState;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

pub struct Table {
    state: Mutex<SharedState>,
    signals: SignalSet,
    recorder: Arc<dyn StateRecorder>,
}

impl Table {
    pub fn new(recorder: Arc<dyn StateRecorder>) -> Self {
        Self::with_state(SharedState::new(), recorder)
    }

    pub fn with_state(state: SharedState, recorder: Arc<dyn StateRecorder>) -> Self {
        Self {
            state: Mutex::new(state),
            signals: SignalSet::new(),
            recorder,
        }
    }

    /// Acquire the lock.
    ///
    /// Fails once the signal set has been torn down.
    pub async fn enter(&self) -> Result<CriticalSection<'_>, SyncError> {
        if self.signals.is_closed() {
            return Err(lock_closed());
        }
        let guard = self.state.lock().await;
        // Teardown may have happened while queued on the lock
        if self.signals.is_closed() {
            return Err(lock_closed());
        }
        Ok(CriticalSection {
            guard,
            recorder: self.recorder.as_ref(),
        })
    }

    pub fn signals(&self) -> &SignalSet {
        &self.signals
    }

    pub async fn wait(&self, signal: Signal) -> Result<(), SyncError> {
        Ok(self.signals.wait(signal).await?)
    }

    pub fn raise(&self, signal: Signal) -> Result<(), SyncError> {
        Ok(self.signals.raise(signal)?)
    }

    /// Record why `actor` stopped. Recorder failures are only logged: the
    /// role is already gone.
    pub fn record_exit(&self, actor: Actor, reason: &ExitReason) {
        if let Err(e) = self.recorder.record_exit(actor, reason) {
            tracing::error!(%actor, error = %e, "could not record exit");
        }
    }

    /// Tear down the signal set so every blocked role wakes with an error
    pub fn tear_down(&self) {
        self.signals.close();
    }

    /// Copy of the shared state, taken under the lock
    pub async fn snapshot(&self) -> SharedState {
        self.state.lock().await.clone()
    }
}

/// Exclusive access to the shared state
pub struct CriticalSection<'a> {
    guard: MutexGuard<'a, SharedState>,
    recorder: &'a dyn StateRecorder,
}

impl CriticalSection<'_> {
    /// Hand the current state to the recorder on behalf of `actor`
    pub fn record(&self, actor: Actor) -> Result<(), SyncError> {
        Ok(self.recorder.record_state(actor, &self.guard)?)
    }

    /// Release the lock
    pub fn leave(self) {}
}

impl Deref for CriticalSection<'_> {
    type Target = SharedState;

    fn deref(&self) -> &SharedState {
        &self.guard
    }
}

impl DerefMut for CriticalSection<'_> {
    fn deref_mut(&mut self) -> &mut SharedState {
        &mut self.guard
    }
}

fn lock_closed() -> SyncError {
    SignalError::Closed {
        signal: Signal::Mutex,
    }
    .into()
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
