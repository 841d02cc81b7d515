// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrent status table: one mutable record per task (§2, §7).

use crate::backoff::Backoff;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// A task's current lifecycle phase (§2 StatusRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    Waiting,
    Starting,
    Running,
    Success,
    Error,
}

crate::simple_display! {
    Reason {
        Waiting => "waiting",
        Starting => "starting",
        Running => "running",
        Success => "success",
        Error => "error",
    }
}

/// One task's mutable status: `{reason, backoff}` (§2). Created before
/// execution begins and never destroyed until process exit.
#[derive(Debug, Clone, Copy)]
pub struct StatusRecord {
    pub reason: Reason,
    pub backoff: Backoff,
}

impl Default for StatusRecord {
    fn default() -> Self {
        Self { reason: Reason::Waiting, backoff: Backoff::default() }
    }
}

/// Whether a reason counts as "fulfilled" for a downstream task, given
/// whether the upstream is a background task (§4.7, glossary "Fulfilled
/// upstream"): `success`, or `running` when the upstream won't terminate.
pub fn fulfills_downstream(reason: Reason, upstream_is_background: bool) -> bool {
    match reason {
        Reason::Success => true,
        Reason::Running => upstream_is_background,
        _ => false,
    }
}

/// Concurrent mapping from task name to [`StatusRecord`] (§2).
///
/// Each `TaskRunner` mutates only its own entry (§7 invariant: "status
/// transitions for a single task are totally ordered by that task's
/// runner"); the renderer only ever reads. Entries are pre-populated for
/// every task name at construction so readers never observe a missing key.
#[derive(Debug, Clone)]
pub struct StatusTable {
    inner: Arc<RwLock<IndexMap<String, StatusRecord>>>,
}

impl StatusTable {
    /// Build a table with every name initialized to `{waiting, defaultBackoff}`.
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let map = names.into_iter().map(|name| (name, StatusRecord::default())).collect();
        Self { inner: Arc::new(RwLock::new(map)) }
    }

    /// Current record for `name`, if it was registered.
    pub fn get(&self, name: &str) -> Option<StatusRecord> {
        self.inner.read().get(name).copied()
    }

    /// Set the reason for `name`, leaving its backoff untouched.
    pub fn set_reason(&self, name: &str, reason: Reason) {
        if let Some(record) = self.inner.write().get_mut(name) {
            record.reason = reason;
        }
    }

    /// Set both fields for `name` at once.
    pub fn set(&self, name: &str, reason: Reason, backoff: Backoff) {
        if let Some(record) = self.inner.write().get_mut(name) {
            record.reason = reason;
            record.backoff = backoff;
        }
    }

    /// A point-in-time copy of every entry, in registration order, for the
    /// renderer to paint without holding a lock across the render.
    pub fn snapshot(&self) -> Vec<(String, StatusRecord)> {
        self.inner.read().iter().map(|(name, record)| (name.clone(), *record)).collect()
    }
}
