// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized view of a replayed state log

use crate::state_log::{LogEntry, LogRecord};
use smk_core::{Actor, ExitReason, Ingredient, IngredientCounts, SharedState};
use std::collections::BTreeMap;

/// Summary built from state log records
#[derive(Debug, Default)]
pub struct Trace {
    /// Number of state transitions per actor
    pub transitions: BTreeMap<String, usize>,
    /// Exit reason per actor, keyed by actor name
    pub exits: BTreeMap<String, ExitReason>,
    /// Latest recorded state
    pub last_state: Option<SharedState>,
}

impl Trace {
    pub fn from_records(records: &[LogRecord]) -> Self {
        let mut trace = Self::default();
        for record in records {
            trace.apply(record);
        }
        trace
    }

    /// Apply a record to update the view
    pub fn apply(&mut self, record: &LogRecord) {
        let name = record.actor.to_string();
        match &record.entry {
            LogEntry::State { state } => {
                *self.transitions.entry(name).or_default() += 1;
                self.last_state = Some(state.clone());
            }
            LogEntry::Exit { exit } => {
                self.exits.insert(name, exit.clone());
            }
        }
    }

    /// Actors that stopped on a fatal error
    pub fn fatal_exits(&self) -> Vec<(&str, &str)> {
        self.exits
            .iter()
            .filter_map(|(actor, reason)| match reason {
                ExitReason::Fatal { error } => Some((actor.as_str(), error.as_str())),
                ExitReason::Closed => None,
            })
            .collect()
    }

    /// Whether every given actor closed normally
    pub fn all_closed(&self, actors: &[Actor]) -> bool {
        actors
            .iter()
            .all(|a| self.exits.get(&a.to_string()) == Some(&ExitReason::Closed))
    }
}

/// Render one record as a fixed-width table row.
///
/// Columns: sequence, actor, agent status, watcher statuses, smoker
/// statuses, then available/reserved/cigarette counts per ingredient.
pub fn render_row(record: &LogRecord) -> String {
    let actor = record.actor.to_string();
    match &record.entry {
        LogEntry::State { state } => {
            let watchers = Ingredient::ALL
                .iter()
                .map(|&k| format!("{:<9}", status(&state.watcher_status[k])))
                .collect::<Vec<_>>()
                .join(" ");
            let smokers = Ingredient::ALL
                .iter()
                .map(|&k| format!("{:<19}", status(&state.smoker_status[k])))
                .collect::<Vec<_>>()
                .join(" ");
            format!(
                "{:>5} {:<15} {:<17} {} {} | {} | {} | {}{}",
                record.seq,
                actor,
                status(&state.agent_status),
                watchers,
                smokers,
                counts(&state.available),
                counts(&state.reserved),
                counts(&state.cigarettes),
                if state.closing { " closing" } else { "" },
            )
        }
        LogEntry::Exit {
            exit: ExitReason::Closed,
        } => format!("{:>5} {:<15} exited: closed", record.seq, actor),
        LogEntry::Exit {
            exit: ExitReason::Fatal { error },
        } => format!("{:>5} {:<15} exited: FATAL {}", record.seq, actor, error),
    }
}

fn status(value: &impl std::fmt::Debug) -> String {
    format!("{:?}", value).to_uppercase()
}

fn counts(c: &IngredientCounts) -> String {
    c.iter()
        .map(|(_, n)| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "trace_tests.rs"]
mod tests;
