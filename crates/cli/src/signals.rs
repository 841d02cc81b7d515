// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signal handling (§6 "Signals"): `SIGINT`, `SIGTERM`, `SIGHUP` each trip
//! the supervisor's root cancellation token for graceful shutdown.

use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;

/// Spawn a task that trips `root` on the first of `SIGINT`/`SIGTERM`/`SIGHUP`.
pub fn install(root: CancellationToken) {
    tokio::spawn(async move {
        let mut sigint = match signal(SignalKind::interrupt()) {
            Ok(s) => s,
            Err(error) => {
                tracing::warn!(%error, "failed to install SIGINT handler");
                return;
            }
        };
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(error) => {
                tracing::warn!(%error, "failed to install SIGTERM handler");
                return;
            }
        };
        let mut sighup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(error) => {
                tracing::warn!(%error, "failed to install SIGHUP handler");
                return;
            }
        };

        tokio::select! {
            _ = sigint.recv() => tracing::info!("received SIGINT, shutting down"),
            _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
            _ = sighup.recv() => tracing::info!("received SIGHUP, shutting down"),
            _ = root.cancelled() => return,
        }
        root.cancel();
    });
}
