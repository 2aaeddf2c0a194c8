// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime for a smokers simulation
//!
//! Spawns the agent, one watcher per ingredient and one smoker per
//! ingredient as independent tasks sharing one [`Table`], then joins them.
//! A role that fails tears the signal set down so every other role wakes
//! and stops instead of blocking forever.

use crate::agent::{Agent, AgentReport};
use crate::error::RuntimeError;
use crate::smoker::{Smoker, SmokerReport};
use smk_core::{
    Actor, ExitReason, Ingredient, PerIngredient, SharedState, SimulationConfig, SmokerId,
    StateRecorder, SyncError, Table, Watcher, WatcherReport,
};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::Instrument;

/// Result of one role's task
enum Outcome {
    Agent(AgentReport),
    Watcher(Ingredient, WatcherReport),
    Smoker(SmokerId, SmokerReport),
}

type RoleResult = (Actor, Result<Outcome, String>);

/// Everything the roles reported once the table closed
#[derive(Clone, Debug, Default)]
pub struct SimulationReport {
    pub agent: AgentReport,
    pub watchers: PerIngredient<WatcherReport>,
    pub smokers: PerIngredient<SmokerReport>,
    /// Exit of every role, in the order the roles finished
    pub exits: Vec<(Actor, ExitReason)>,
    pub final_state: SharedState,
}

impl SimulationReport {
    /// Every role closed normally
    pub fn is_clean(&self) -> bool {
        self.exits.iter().all(|(_, reason)| !reason.is_fatal())
    }

    /// The first role that stopped on a fatal error
    pub fn first_failure(&self) -> Option<(Actor, &str)> {
        self.exits.iter().find_map(|(actor, reason)| match reason {
            ExitReason::Fatal { error } => Some((*actor, error.as_str())),
            ExitReason::Closed => None,
        })
    }

    pub fn into_result(self) -> Result<Self, RuntimeError> {
        match self.first_failure() {
            Some((actor, message)) => Err(RuntimeError::Role {
                actor,
                message: message.to_string(),
            }),
            None => Ok(self),
        }
    }

    pub fn total_cigarettes(&self) -> u32 {
        self.smokers.iter().map(|(_, s)| s.cigarettes).sum()
    }
}

pub struct Simulation {
    config: SimulationConfig,
    recorder: Arc<dyn StateRecorder>,
}

impl Simulation {
    pub fn new(config: SimulationConfig, recorder: Arc<dyn StateRecorder>) -> Self {
        Self { config, recorder }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run every role to completion
    pub async fn run(&self) -> Result<SimulationReport, RuntimeError> {
        let table = Arc::new(Table::new(Arc::clone(&self.recorder)));
        let mut roles = JoinSet::new();

        tracing::info!(rounds = self.config.rounds, "opening table");

        for kind in Ingredient::ALL {
            let watcher = Watcher::new(kind, Arc::clone(&table));
            spawn_role(&mut roles, &table, Actor::Watcher(kind), async move {
                watcher.run().await.map(|r| Outcome::Watcher(kind, r))
            });
        }

        for (index, id) in SmokerId::ALL.into_iter().enumerate() {
            let smoker = Smoker::new(id, Arc::clone(&table))
                .with_times(self.config.roll_time, self.config.smoke_time)
                .with_seed(self.config.seed.map(|s| s.wrapping_add(index as u64 + 1)));
            spawn_role(&mut roles, &table, Actor::Smoker(id), async move {
                smoker.run().await.map(|r| Outcome::Smoker(id, r))
            });
        }

        let agent = Agent::new(Arc::clone(&table), self.config.rounds, self.config.seed);
        spawn_role(&mut roles, &table, Actor::Agent, async move {
            agent.run().await.map(Outcome::Agent)
        });

        let mut report = SimulationReport::default();
        let mut join_error = None;

        while let Some(joined) = roles.join_next().await {
            let (actor, result) = match joined {
                Ok(role) => role,
                Err(e) => {
                    tracing::error!(error = %e, "role task aborted");
                    table.tear_down();
                    join_error.get_or_insert(e);
                    continue;
                }
            };
            match result {
                Ok(Outcome::Agent(r)) => report.agent = r,
                Ok(Outcome::Watcher(kind, r)) => report.watchers[kind] = r,
                Ok(Outcome::Smoker(id, r)) => report.smokers[id.holds()] = r,
                Err(error) => {
                    report.exits.push((actor, ExitReason::Fatal { error }));
                    continue;
                }
            }
            report.exits.push((actor, ExitReason::Closed));
        }

        if let Some(e) = join_error {
            return Err(RuntimeError::Join(e));
        }

        report.final_state = table.snapshot().await;
        tracing::info!(
            cigarettes = report.total_cigarettes(),
            clean = report.is_clean(),
            "table closed"
        );
        Ok(report)
    }
}

/// Spawn one role, recording its exit and tearing the table down if it fails
fn spawn_role<F>(roles: &mut JoinSet<RoleResult>, table: &Arc<Table>, actor: Actor, role: F)
where
    F: Future<Output = Result<Outcome, SyncError>> + Send + 'static,
{
    let table = Arc::clone(table);
    let span = tracing::info_span!("role", %actor);
    roles.spawn(
        async move {
            match role.await {
                Ok(outcome) => {
                    table.record_exit(actor, &ExitReason::Closed);
                    (actor, Ok(outcome))
                }
                Err(e) => {
                    tracing::error!(error = %e, "role failed");
                    let error = e.to_string();
                    table.record_exit(actor, &ExitReason::Fatal { error: error.clone() });
                    table.tear_down();
                    (actor, Err(error))
                }
            }
        }
        .instrument(span),
    );
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
