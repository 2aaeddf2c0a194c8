// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A smoker: waits for its pair, rolls, frees the table, smokes

use crate::jitter;
use rand::rngs::StdRng;
use smk_core::{Actor, SmokerId, SmokerStatus, Signal, SyncError, Table};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SmokerReport {
    pub cigarettes: u32,
}

pub struct Smoker {
    id: SmokerId,
    table: Arc<Table>,
    roll_time: Duration,
    smoke_time: Duration,
    rng: StdRng,
    report: SmokerReport,
}

impl Smoker {
    pub fn new(id: SmokerId, table: Arc<Table>) -> Self {
        Self {
            id,
            table,
            roll_time: Duration::ZERO,
            smoke_time: Duration::ZERO,
            rng: jitter::rng(None),
            report: SmokerReport::default(),
        }
    }

    pub fn with_times(mut self, roll_time: Duration, smoke_time: Duration) -> Self {
        self.roll_time = roll_time;
        self.smoke_time = smoke_time;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.rng = jitter::rng(seed);
        self
    }

    fn actor(&self) -> Actor {
        Actor::Smoker(self.id)
    }

    async fn set_status(&self, status: SmokerStatus) -> Result<(), SyncError> {
        let mut cs = self.table.enter().await?;
        cs.smoker_status[self.id.holds()] = status;
        cs.record(self.actor())?;
        cs.leave();
        Ok(())
    }

    /// Wait for a watcher to release this smoker.
    ///
    /// Returns `Ok(false)` when the release was the table closing. Otherwise
    /// the two needed ingredients have been taken off the table.
    pub async fn wait_for_ingredients(&mut self) -> Result<bool, SyncError> {
        self.set_status(SmokerStatus::WaitingIngredients).await?;
        self.table.wait(Signal::Proceed(self.id)).await?;

        let mut cs = self.table.enter().await?;
        if cs.closing {
            cs.smoker_status[self.id.holds()] = SmokerStatus::Closing;
            cs.record(self.actor())?;
            return Ok(false);
        }
        let (first, second) = self.id.needs();
        cs.take(first)?;
        cs.take(second)?;
        cs.smoker_status[self.id.holds()] = SmokerStatus::Rolling;
        cs.record(self.actor())?;
        cs.leave();
        Ok(true)
    }

    /// Roll, let the agent refill the table, then smoke
    pub async fn roll_and_smoke(&mut self) -> Result<(), SyncError> {
        tokio::time::sleep(jitter::delay(&mut self.rng, self.roll_time)).await;
        self.table.raise(Signal::TableCleared)?;

        let mut cs = self.table.enter().await?;
        cs.cigarettes[self.id.holds()] += 1;
        cs.smoker_status[self.id.holds()] = SmokerStatus::Smoking;
        cs.record(self.actor())?;
        cs.leave();

        self.report.cigarettes += 1;
        tracing::debug!(smoker = %self.id, "smoking");
        tokio::time::sleep(jitter::delay(&mut self.rng, self.smoke_time)).await;
        Ok(())
    }

    pub async fn run(mut self) -> Result<SmokerReport, SyncError> {
        while self.wait_for_ingredients().await? {
            self.roll_and_smoke().await?;
        }
        Ok(self.report)
    }
}

#[cfg(test)]
#[path = "smoker_tests.rs"]
mod tests;
