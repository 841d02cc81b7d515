// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Downstream release (§4.6 "Downstream release", §5 ordering guarantees).

use kit_core::{status::fulfills_downstream, StatusTable, TaskGraph};
use tokio::sync::mpsc::UnboundedSender;

use crate::dispatch::WorkItem;

/// For every task downstream of `name`, check whether all of *its*
/// dependencies are fulfilled (success, or running-and-background) and if
/// so enqueue it. Idempotent by construction: the dispatch loop only acts
/// on a [`WorkItem::Dispatch`] when the task is still `Waiting` (§7
/// invariant 2), so calling this on every upstream transition — including
/// every restart of an `Always` background task — is harmless.
pub fn release_downstream(
    graph: &TaskGraph,
    status: &StatusTable,
    name: &str,
    work_tx: &UnboundedSender<WorkItem>,
) {
    for downstream in graph.downstream(name) {
        let fulfilled = downstream.dependencies.iter().all(|dep| {
            let background = graph.get(dep).map(|t| t.is_background()).unwrap_or(false);
            status.get(dep).map(|r| fulfills_downstream(r.reason, background)).unwrap_or(false)
        });
        if fulfilled {
            let _ = work_tx.send(WorkItem::Dispatch(downstream.name.clone()));
        }
    }
}
