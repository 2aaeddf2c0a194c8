// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replay a recorded state log

use anyhow::{bail, Context, Result};
use smk_storage::{render_row, StateLog, Trace};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
pub struct ReplayArgs {
    /// State log written by a previous run
    path: PathBuf,

    /// Only print the summary, not every row
    #[arg(long)]
    summary: bool,
}

pub fn handle(args: ReplayArgs) -> Result<()> {
    let records = StateLog::replay(&args.path)
        .with_context(|| format!("reading state log {}", args.path.display()))?;
    if records.is_empty() {
        bail!("no records in {}", args.path.display());
    }

    if !args.summary {
        for record in &records {
            println!("{}", render_row(record));
        }
        println!();
    }

    let trace = Trace::from_records(&records);
    println!("{} records", records.len());
    for (actor, count) in &trace.transitions {
        println!("  {:<15} {} transitions", actor, count);
    }
    if let Some(state) = &trace.last_state {
        println!("  cigarettes: {}", state.cigarettes.total());
    }

    let fatal = trace.fatal_exits();
    if !fatal.is_empty() {
        for (actor, error) in &fatal {
            eprintln!("{} failed: {}", actor, error);
        }
        bail!("{} role(s) stopped on a fatal error", fatal.len());
    }
    Ok(())
}
