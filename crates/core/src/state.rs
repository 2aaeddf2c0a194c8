// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared table state
//!
//! Plain data mutated only while the table lock is held. Counters are
//! unsigned, so they can never go negative; decrements that would underflow
//! are reported instead of wrapping.

use crate::error::SyncError;
use crate::ingredient::{Ingredient, IngredientCounts, PerIngredient, SmokerId, PAIRING_ORDER};
use serde::{Deserialize, Serialize};

/// Last reached phase of a watcher
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatcherStatus {
    #[default]
    Waiting,
    Updating,
    Informing,
    Closing,
}

/// Last reached phase of the agent
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    #[default]
    Preparing,
    WaitingCigarette,
    Closing,
}

/// Last reached phase of a smoker
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokerStatus {
    #[default]
    WaitingIngredients,
    Rolling,
    Smoking,
    Closing,
}

/// Data shared by every role at the table
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedState {
    /// Units offered by the agent and not yet taken by a smoker
    pub available: IngredientCounts,
    /// Units not yet committed to a winning pair
    pub reserved: IngredientCounts,
    /// Units ever put on the table, one ingredient-ready raise each
    pub offered: IngredientCounts,
    pub watcher_status: PerIngredient<WatcherStatus>,
    pub smoker_status: PerIngredient<SmokerStatus>,
    pub agent_status: AgentStatus,
    /// Cigarettes rolled by each smoker, keyed by held ingredient
    pub cigarettes: IngredientCounts,
    /// Set once by the agent; never reverts
    pub closing: bool,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one unit of the watcher's ingredient into the reservation pool
    /// and commit the first complete pair, if any.
    ///
    /// At most one pair is committed per call. Other satisfiable pairs stay
    /// reserved for a later call. A slot never holds more than is on the
    /// table.
    pub fn update_reservations(&mut self, id: Ingredient) -> Option<SmokerId> {
        self.reserved[id] = (self.reserved[id] + 1).min(self.available[id]);

        let pairing = PAIRING_ORDER
            .into_iter()
            .find(|p| self.reserved[p.first] > 0 && self.reserved[p.second] > 0)?;

        self.reserved[pairing.first] -= 1;
        self.reserved[pairing.second] -= 1;
        Some(pairing.winner)
    }

    /// Offer one unit of `kind`
    pub fn put(&mut self, kind: Ingredient) {
        self.available[kind] += 1;
        self.offered[kind] += 1;
    }

    /// Take one unit of `kind` off the table
    pub fn take(&mut self, kind: Ingredient) -> Result<(), SyncError> {
        let slot = &mut self.available[kind];
        *slot = slot.checked_sub(1).ok_or(SyncError::Invariant {
            message: format!("no {} available to take", kind),
        })?;
        Ok(())
    }

    /// Raise the closing flag; returns false if it was already raised
    pub fn close(&mut self) -> bool {
        !std::mem::replace(&mut self.closing, true)
    }

    /// `reserved[k] <= available[k]` for every ingredient
    pub fn reservations_consistent(&self) -> bool {
        Ingredient::ALL
            .iter()
            .all(|&k| self.reserved[k] <= self.available[k])
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
