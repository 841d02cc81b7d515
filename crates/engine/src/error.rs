// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fatal-runtime errors (§7): conditions that trip the root token and tear
//! the whole run down, as opposed to run-failures which are absorbed into
//! `StatusRecord` (§7 "run-failure is never an `Err` that escapes the
//! `TaskRunner`").

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("task {0:?} requested but not found in the graph")]
    UnknownTask(String),

    #[error(transparent)]
    Graph(#[from] kit_core::GraphError),

    #[error("initializing watch for task {task:?}: {source}")]
    WatchInit { task: String, #[source] source: kit_exec::ExecError },

    #[error("one or more restartPolicy=Never tasks ended in error")]
    Failed,
}
