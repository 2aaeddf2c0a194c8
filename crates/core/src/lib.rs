// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! smk-core: the smokers' table and its watchers
//!
//! This crate provides:
//! - Ingredient kinds, smoker identities and the fixed pairing order
//! - The shared table state and the lock-guarded access to it
//! - Named counting signals between agent, watchers and smokers
//! - The watcher (per-ingredient coordinator) protocol
//! - A pluggable state recorder and the simulation config

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod error;
pub mod ingredient;
pub mod recorder;
pub mod signals;
pub mod state;
pub mod table;
pub mod watcher;

pub use config::SimulationConfig;
pub use error::{ConfigError, RecordError, SignalError, SyncError};
pub use ingredient::{Ingredient, IngredientCounts, PerIngredient, SmokerId, PAIRING_ORDER};
pub use recorder::{
    Actor, ExitReason, MemoryRecorder, NoOpRecorder, Recorded, StateRecorder, TracedRecorder,
};
pub use signals::{Signal, SignalSet};
pub use state::{AgentStatus, SharedState, SmokerStatus, WatcherStatus};
pub use table::{CriticalSection, Table};
pub use watcher::{Watcher, WatcherReport};
