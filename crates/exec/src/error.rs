// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime error kinds this crate can raise: run-failures (recovered
//! locally by the caller, see §7) and fatal-runtime conditions (watch
//! init, missing watch paths).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to spawn process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("activity kind is not a spawnable process (image/manifests are carried but not launched by this crate)")]
    UnsupportedActivity,

    #[error("waiting on child process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("sending signal to process group {pgid}: {source}")]
    Signal { pgid: i32, #[source] source: nix::Error },

    #[error("probe dial failed: {0}")]
    ProbeDial(String),

    #[error("port {0} still in use after waiting")]
    PortBusy(u16),

    #[error("watch path does not exist: {0}")]
    WatchPathMissing(std::path::PathBuf),

    #[error("initializing filesystem watcher: {0}")]
    WatchInit(#[from] notify::Error),
}
