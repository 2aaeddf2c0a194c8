// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! smokers - cigarette smokers simulation

mod commands;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{replay, run};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "smokers",
    version,
    about = "Simulate the cigarette smokers problem with watcher tasks",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    run: run::RunArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a recorded state log as a table
    Replay(replay::ReplayArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = logging::setup_logging(cli.log_file.as_deref())?;

    match cli.command {
        Some(Commands::Replay(args)) => replay::handle(args),
        None => run::handle(cli.run).await,
    }
}
