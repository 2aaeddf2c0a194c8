// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watcher: the per-ingredient coordinator
//!
//! A watcher waits for the agent to put its ingredient on the table, folds
//! it into the reservation pool and wakes the one smoker whose pair became
//! complete. Lifecycle:
//!
//! ```text
//! Waiting -> Updating -> (Informing)? -> Waiting
//!    \-> Closing
//! ```
//!
//! No signal is awaited while the lock is held, and a proceed signal is only
//! raised after the lock acquisition that reserved the pair has ended.

use crate::error::SyncError;
use crate::ingredient::{Ingredient, SmokerId};
use crate::recorder::Actor;
use crate::signals::Signal;
use crate::state::WatcherStatus;
use crate::table::Table;
use std::sync::Arc;

/// Counters reported by a watcher when it closes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WatcherReport {
    /// Ingredient-ready raises consumed for real units
    pub units: u64,
    /// Proceed signals raised for winning smokers
    pub informed: u64,
}

pub struct Watcher {
    id: Ingredient,
    table: Arc<Table>,
    report: WatcherReport,
}

impl Watcher {
    pub fn new(id: Ingredient, table: Arc<Table>) -> Self {
        Self {
            id,
            table,
            report: WatcherReport::default(),
        }
    }

    pub fn id(&self) -> Ingredient {
        self.id
    }

    pub fn actor(&self) -> Actor {
        Actor::Watcher(self.id)
    }

    pub fn report(&self) -> WatcherReport {
        self.report
    }

    /// Block until the agent raises this watcher's ingredient.
    ///
    /// Returns `Ok(false)` when the wake-up was the agent closing. In that
    /// case the smoker holding this watcher's ingredient is released so it
    /// can observe the close too. The close raise is always the last one, so
    /// a wake is only treated as the close once every offered unit of this
    /// ingredient has been consumed.
    pub async fn wait_for_ingredient(&mut self) -> Result<bool, SyncError> {
        let mut cs = self.table.enter().await?;
        cs.watcher_status[self.id] = WatcherStatus::Waiting;
        cs.record(self.actor())?;
        cs.leave();

        self.table.wait(Signal::IngredientReady(self.id)).await?;

        // Raises queued ahead of the close raise still carry units
        let mut cs = self.table.enter().await?;
        if cs.closing && self.report.units >= u64::from(cs.offered[self.id]) {
            cs.watcher_status[self.id] = WatcherStatus::Closing;
            cs.record(self.actor())?;
            cs.leave();

            self.table.raise(Signal::Proceed(SmokerId(self.id)))?;
            tracing::debug!(watcher = %self.id, "agent closing, released smoker");
            return Ok(false);
        }
        cs.leave();

        self.report.units += 1;
        Ok(true)
    }

    /// Reserve this watcher's ingredient and pick the smoker whose pair is
    /// now complete, if any. Runs as a single critical section.
    pub async fn update_reservations(&mut self) -> Result<Option<SmokerId>, SyncError> {
        let mut cs = self.table.enter().await?;
        cs.watcher_status[self.id] = WatcherStatus::Updating;
        cs.record(self.actor())?;

        let winner = cs.update_reservations(self.id);
        tracing::debug!(
            watcher = %self.id,
            reserved = ?cs.reserved,
            winner = ?winner,
            "reservations updated"
        );
        cs.leave();

        Ok(winner)
    }

    /// Wake `winner`; its ingredients were reserved by the preceding update
    pub async fn inform_smoker(&mut self, winner: SmokerId) -> Result<(), SyncError> {
        let mut cs = self.table.enter().await?;
        cs.watcher_status[self.id] = WatcherStatus::Informing;
        cs.record(self.actor())?;
        cs.leave();

        self.table.raise(Signal::Proceed(winner))?;
        self.report.informed += 1;
        tracing::debug!(watcher = %self.id, %winner, "informed smoker");
        Ok(())
    }

    /// Run until the agent closes the table
    pub async fn run(mut self) -> Result<WatcherReport, SyncError> {
        while self.wait_for_ingredient().await? {
            if let Some(winner) = self.update_reservations().await? {
                self.inform_smoker(winner).await?;
            }
        }
        Ok(self.report)
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
