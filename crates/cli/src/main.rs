// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! kit - bring an application stack up with a single command

mod args;
mod env;
mod exit_error;
mod renderer;
mod signals;

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::Result;
use clap::FromArgMatches;
use kit_core::NamedLocks;
use kit_engine::{ColorTaskLog, PlainTaskLog, Supervisor, TaskLog};
use kit_exec::TokioProcessAdapter;

use crate::args::Cli;
use crate::exit_error::ExitError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        let code = error.downcast_ref::<ExitError>().map_or(1, |e| e.code);
        let message = format_error(&error);
        if !message.is_empty() {
            eprintln!("Error: {message}");
        }
        std::process::exit(code);
    }
}

/// Format an anyhow error, deduplicating the chain when the top-level
/// `Display` already contains the source's text (common with `thiserror`
/// variants built from `#[from]`).
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();
    let chain_redundant = err.chain().skip(1).all(|cause| top.contains(&cause.to_string()));
    if chain_redundant {
        return top;
    }
    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {i}: {cause}"));
    }
    buf
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let matches = match args::cli_command().try_get_matches() {
        Ok(m) => m,
        Err(e) => e.exit(),
    };
    let cli = Cli::from_arg_matches(&matches)?;

    let loaded = kit_config::load(&cli.file).map_err(|e| {
        anyhow::Error::new(ExitError::new(1, format!("loading {}: {e}", cli.file.display())))
    })?;

    let requested = cli.tasks.clone();

    let watch_enabled = !cli.no_watch && !env::watch_disabled_by_env();
    let interactive = std::io::stdout().is_terminal() && !env::is_ci();

    let log: Arc<dyn TaskLog> = if interactive { Arc::new(ColorTaskLog) } else { Arc::new(PlainTaskLog) };

    let supervisor = Supervisor::new(
        loaded.graph,
        NamedLocks::new(loaded.semaphore_capacities),
        Arc::new(TokioProcessAdapter),
        log,
        loaded.termination_grace_period,
        watch_enabled,
    );

    signals::install(supervisor.cancellation_token());

    let result = if interactive {
        let status = supervisor
            .build_status(&requested)
            .map_err(|e| anyhow::Error::new(ExitError::new(1, e.to_string())))?;
        let render_handle = tokio::spawn(renderer::run(status.clone(), supervisor.cancellation_token()));
        let result = supervisor.run_with_status(&requested, status).await;
        render_handle.abort();
        result
    } else {
        supervisor.run(&requested).await
    };

    result.map_err(|e| anyhow::Error::new(ExitError::new(1, e.to_string())))
}
