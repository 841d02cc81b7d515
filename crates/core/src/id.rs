// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ID generation for per-run bookkeeping.
//!
//! Tasks themselves are identified by their declared `name` (a plain
//! `String`, unique within the graph — see [`crate::task::Task`]). `RunId`
//! is a separate, internal identifier minted once per `TaskRunner` attempt
//! so that log lines and the per-run cancellation registry can distinguish
//! consecutive restarts of the same task.

/// Unique identifier for one execution attempt of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(u64);

impl RunId {
    /// Generate a new run id from a process-wide monotonic counter.
    pub fn next() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run-{}", self.0)
    }
}
