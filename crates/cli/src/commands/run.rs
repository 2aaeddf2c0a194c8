// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run a simulation to completion

use anyhow::{Context, Result};
use smk_core::{NoOpRecorder, SimulationConfig, SmokerId, StateRecorder, TracedRecorder};
use smk_engine::{Simulation, SimulationReport};
use smk_storage::StateLog;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(clap::Args, Debug, Default)]
pub struct RunArgs {
    /// Simulation config file (TOML)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Ingredient pairs the agent produces before closing
    #[arg(long)]
    rounds: Option<u32>,

    /// Seed for the agent's pair choice
    #[arg(long)]
    seed: Option<u64>,

    /// Write every recorded state to this JSONL file
    #[arg(long)]
    state_log: Option<PathBuf>,
}

impl RunArgs {
    /// File values first, then command-line overrides
    fn resolve(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => SimulationConfig::default(),
        };
        if let Some(rounds) = self.rounds {
            config = config.with_rounds(rounds);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(path) = &self.state_log {
            config = config.with_state_log(path);
        }
        Ok(config)
    }
}

pub async fn handle(args: RunArgs) -> Result<()> {
    let config = args.resolve()?;

    let recorder: Arc<dyn StateRecorder> = match &config.state_log {
        Some(path) => {
            let log = StateLog::open(path)
                .with_context(|| format!("opening state log {}", path.display()))?;
            Arc::new(TracedRecorder::new(log))
        }
        None => Arc::new(TracedRecorder::new(NoOpRecorder)),
    };

    tracing::info!(
        rounds = config.rounds,
        seed = ?config.seed,
        state_log = ?config.state_log,
        "starting simulation"
    );

    let report = Simulation::new(config, recorder)
        .run()
        .await?
        .into_result()
        .context("simulation failed")?;

    tracing::info!(
        cigarettes = report.total_cigarettes(),
        rounds = report.agent.rounds,
        "simulation finished"
    );
    print_summary(&report);
    Ok(())
}

fn print_summary(report: &SimulationReport) {
    for id in SmokerId::ALL {
        println!(
            "{:<15} {} cigarettes",
            id.to_string(),
            report.smokers[id.holds()].cigarettes
        );
    }
    println!(
        "{:<15} {} cigarettes in {} rounds",
        "total",
        report.total_cigarettes(),
        report.agent.rounds
    );
}
