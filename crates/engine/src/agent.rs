// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The agent: puts random ingredient pairs on the table, then closes it

use crate::jitter;
use rand::rngs::StdRng;
use rand::Rng;
use smk_core::{Actor, AgentStatus, Ingredient, IngredientCounts, Signal, SyncError, Table};
use std::sync::Arc;

/// What the agent did before closing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AgentReport {
    pub rounds: u32,
    /// Units offered per ingredient
    pub offered: IngredientCounts,
}

pub struct Agent {
    table: Arc<Table>,
    rounds: u32,
    rng: StdRng,
    report: AgentReport,
}

impl Agent {
    pub fn new(table: Arc<Table>, rounds: u32, seed: Option<u64>) -> Self {
        Self {
            table,
            rounds,
            rng: jitter::rng(seed),
            report: AgentReport::default(),
        }
    }

    /// Two distinct ingredients, uniformly chosen
    fn choose_pair(&mut self) -> (Ingredient, Ingredient) {
        let withheld = Ingredient::ALL[self.rng.gen_range(0..Ingredient::ALL.len())];
        withheld.complement()
    }

    /// Put a pair on the table and raise both watchers
    pub async fn prepare_ingredients(&mut self) -> Result<(Ingredient, Ingredient), SyncError> {
        let (first, second) = self.choose_pair();

        let mut cs = self.table.enter().await?;
        cs.put(first);
        cs.put(second);
        cs.agent_status = AgentStatus::Preparing;
        cs.record(Actor::Agent)?;
        cs.leave();

        self.table.raise(Signal::IngredientReady(first))?;
        self.table.raise(Signal::IngredientReady(second))?;

        self.report.offered[first] += 1;
        self.report.offered[second] += 1;
        tracing::debug!(%first, %second, "ingredients on the table");
        Ok((first, second))
    }

    /// Block until a smoker has taken the pair
    pub async fn wait_for_cigarette(&mut self) -> Result<(), SyncError> {
        let mut cs = self.table.enter().await?;
        cs.agent_status = AgentStatus::WaitingCigarette;
        cs.record(Actor::Agent)?;
        cs.leave();

        self.table.wait(Signal::TableCleared).await
    }

    /// Raise the closing flag and wake every watcher one last time
    pub async fn close_factory(&mut self) -> Result<(), SyncError> {
        let mut cs = self.table.enter().await?;
        cs.close();
        cs.agent_status = AgentStatus::Closing;
        cs.record(Actor::Agent)?;
        cs.leave();

        for kind in Ingredient::ALL {
            self.table.raise(Signal::IngredientReady(kind))?;
        }
        tracing::info!(rounds = self.report.rounds, "agent closing");
        Ok(())
    }

    pub async fn run(mut self) -> Result<AgentReport, SyncError> {
        for _ in 0..self.rounds {
            self.prepare_ingredients().await?;
            self.wait_for_cigarette().await?;
            self.report.rounds += 1;
        }
        self.close_factory().await?;
        Ok(self.report)
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
