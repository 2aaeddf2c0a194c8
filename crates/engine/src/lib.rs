// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Smokers simulation engine: the agent, the smokers and the runtime that
//! runs them alongside the watchers

mod agent;
mod error;
mod jitter;
mod runtime;
mod smoker;

pub use agent::{Agent, AgentReport};
pub use error::RuntimeError;
pub use runtime::{Simulation, SimulationReport};
pub use smoker::{Smoker, SmokerReport};
