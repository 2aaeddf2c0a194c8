// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named counting signals
//!
//! Every signal targets one logical waiter and is never broadcast. A raise
//! with nobody waiting stays armed for the next wait, so producers and
//! consumers never race on who acts first.

use crate::error::SignalError;
use crate::ingredient::{Ingredient, PerIngredient, SmokerId};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Semaphore;

/// Name of a synchronization primitive at the table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Signal {
    /// The lock guarding the shared state
    Mutex,
    /// Raised by the agent for the watcher of an ingredient
    IngredientReady(Ingredient),
    /// Raised by a watcher for the smoker it satisfied (or releases at close)
    Proceed(SmokerId),
    /// Raised by a smoker once it has taken its ingredients
    TableCleared,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Mutex => write!(f, "mutex"),
            Signal::IngredientReady(kind) => write!(f, "ingredient-ready:{}", kind),
            Signal::Proceed(smoker) => write!(f, "proceed:{}", smoker),
            Signal::TableCleared => write!(f, "table-cleared"),
        }
    }
}

/// One counting signal starting at zero
#[derive(Debug)]
struct Counter {
    signal: Signal,
    permits: Semaphore,
}

impl Counter {
    fn new(signal: Signal) -> Self {
        Self {
            signal,
            permits: Semaphore::new(0),
        }
    }

    fn closed(&self) -> SignalError {
        SignalError::Closed {
            signal: self.signal,
        }
    }

    async fn wait(&self) -> Result<(), SignalError> {
        let permit = self.permits.acquire().await.map_err(|_| self.closed())?;
        permit.forget();
        Ok(())
    }

    fn raise(&self) -> Result<(), SignalError> {
        if self.permits.is_closed() {
            return Err(self.closed());
        }
        self.permits.add_permits(1);
        Ok(())
    }
}

/// The fixed set of signals shared by the agent, watchers and smokers
#[derive(Debug)]
pub struct SignalSet {
    ingredient_ready: PerIngredient<Counter>,
    proceed: PerIngredient<Counter>,
    table_cleared: Counter,
    torn_down: AtomicBool,
}

impl Default for SignalSet {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSet {
    pub fn new() -> Self {
        let ready = |k| Counter::new(Signal::IngredientReady(k));
        let proceed = |k| Counter::new(Signal::Proceed(SmokerId(k)));
        Self {
            ingredient_ready: PerIngredient {
                tobacco: ready(Ingredient::Tobacco),
                paper: ready(Ingredient::Paper),
                matches: ready(Ingredient::Matches),
            },
            proceed: PerIngredient {
                tobacco: proceed(Ingredient::Tobacco),
                paper: proceed(Ingredient::Paper),
                matches: proceed(Ingredient::Matches),
            },
            table_cleared: Counter::new(Signal::TableCleared),
            torn_down: AtomicBool::new(false),
        }
    }

    fn counter(&self, signal: Signal) -> Option<&Counter> {
        match signal {
            Signal::Mutex => None,
            Signal::IngredientReady(kind) => Some(&self.ingredient_ready[kind]),
            Signal::Proceed(smoker) => Some(&self.proceed[smoker.holds()]),
            Signal::TableCleared => Some(&self.table_cleared),
        }
    }

    /// Block until `signal` has been raised once more than it has been
    /// consumed, then consume one raise.
    pub async fn wait(&self, signal: Signal) -> Result<(), SignalError> {
        match self.counter(signal) {
            Some(counter) => counter.wait().await,
            None => Err(SignalError::Closed { signal }),
        }
    }

    /// Arm `signal` once, waking at most one waiter
    pub fn raise(&self, signal: Signal) -> Result<(), SignalError> {
        match self.counter(signal) {
            Some(counter) => counter.raise(),
            None => Err(SignalError::Closed { signal }),
        }
    }

    /// Raises not yet consumed by a wait
    pub fn pending(&self, signal: Signal) -> usize {
        self.counter(signal)
            .map_or(0, |c| c.permits.available_permits())
    }

    /// Tear down every signal.
    ///
    /// Blocked waiters wake with an error and every later wait, raise or lock
    /// entry fails.
    pub fn close(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::warn!("tearing down signal set");
        for kind in Ingredient::ALL {
            self.ingredient_ready[kind].permits.close();
            self.proceed[kind].permits.close();
        }
        self.table_cleared.permits.close();
    }

    pub fn is_closed(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "signals_tests.rs"]
mod tests;
