// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulation configuration
//!
//! Loaded from TOML. Every key is optional:
//!
//! ```toml
//! rounds = 25
//! roll_time = "5ms"
//! smoke_time = "40ms"
//! seed = 7
//! state_log = "smokers.jsonl"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Ingredient pairs the agent produces before closing the table
    pub rounds: u32,
    /// Upper bound of the time a smoker spends rolling
    #[serde(with = "humantime_serde")]
    pub roll_time: Duration,
    /// Upper bound of the time a smoker spends smoking
    #[serde(with = "humantime_serde")]
    pub smoke_time: Duration,
    /// Seed for the agent's pair choice; random when unset
    pub seed: Option<u64>,
    /// Where to write the JSONL state log
    pub state_log: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rounds: 10,
            roll_time: Duration::from_millis(10),
            smoke_time: Duration::from_millis(20),
            seed: None,
            state_log: None,
        }
    }
}

impl SimulationConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smoke_time > Duration::from_secs(60) || self.roll_time > Duration::from_secs(60) {
            return Err(ConfigError::Invalid(
                "roll_time and smoke_time must not exceed 60s".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_times(mut self, roll_time: Duration, smoke_time: Duration) -> Self {
        self.roll_time = roll_time;
        self.smoke_time = smoke_time;
        self
    }

    pub fn with_state_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_log = Some(path.into());
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
