// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive filesystem watch with debounce (§4.5 WatchLoop).
//!
//! This is the raw watch+debounce primitive: register every `watch` path
//! (recursing into directories), collapse bursts of events into a single
//! "re-run" trigger after a quiet period. `kit-engine` owns mapping that
//! trigger onto a specific task and the work channel.

use std::path::PathBuf;
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::ExecError;

/// Debounce interval per §4.5: "reset the timer to a debounce interval (1
/// second)".
pub const DEBOUNCE: Duration = Duration::from_secs(1);

/// A live filesystem watch. Dropping this stops watching; the debounce
/// loop itself also exits on cancellation (§4.5: "exit on per-task
/// process-context cancellation").
pub struct FsWatch {
    _watcher: RecommendedWatcher,
}

impl FsWatch {
    /// Register every path in `paths` (recursing into directories) and
    /// spawn the debounce loop, invoking `on_trigger` once per quiet
    /// period that follows at least one substantive change.
    ///
    /// Fails fast if any path doesn't exist or the watcher itself can't be
    /// initialized — both are fatal-runtime conditions the caller is
    /// expected to elevate to root cancellation (§4.5).
    pub fn spawn(
        paths: &[PathBuf],
        cancel: CancellationToken,
        on_trigger: impl Fn() + Send + Sync + 'static,
    ) -> Result<Self, ExecError> {
        for path in paths {
            if !path.exists() {
                return Err(ExecError::WatchPathMissing(path.clone()));
            }
        }

        let (raw_tx, raw_rx) = mpsc::unbounded_channel::<()>();
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                if is_substantive(&event.kind) {
                    let _ = raw_tx.send(());
                }
            }
        })?;

        for path in paths {
            let mode = if path.is_dir() { RecursiveMode::Recursive } else { RecursiveMode::NonRecursive };
            watcher.watch(path, mode)?;
        }

        tokio::spawn(debounce_loop(raw_rx, cancel, on_trigger));

        Ok(Self { _watcher: watcher })
    }
}

/// Permission/metadata-only changes don't count as a substantive edit
/// (§4.5: "On each event other than a permission/metadata-only change").
fn is_substantive(kind: &EventKind) -> bool {
    !matches!(kind, EventKind::Access(_) | EventKind::Other)
}

async fn debounce_loop(
    mut raw_rx: mpsc::UnboundedReceiver<()>,
    cancel: CancellationToken,
    on_trigger: impl Fn() + Send + Sync + 'static,
) {
    loop {
        // Sentinel: wait indefinitely for the first event before arming
        // the debounce timer at all (§4.5: "initially armed to a
        // never-expiring sentinel").
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            event = raw_rx.recv() => {
                if event.is_none() {
                    return;
                }
            }
        }

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(DEBOUNCE) => {
                    on_trigger();
                    break;
                }
                event = raw_rx.recv() => {
                    if event.is_none() {
                        return;
                    }
                    // Reset the timer by looping back to the sleep arm.
                }
            }
        }
    }
}
