// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide registry of named mutexes and named counting semaphores
//! (§2 NamedLocks, §4.3).

use indexmap::IndexMap;
use parking_lot::Mutex as SyncMutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

/// Returned by a gated acquisition that lost the race to cancellation
/// (§4.3: "acquisition is cancellable").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Process-wide mutex/semaphore registry.
///
/// Mutexes are get-or-create: the first task to reference a label creates
/// it, and every later reference to the same label gets the same instance.
/// Semaphores are fixed at construction time from the configured capacity
/// table; a task referencing an unregistered semaphore label gets a
/// zero-capacity semaphore that denies every acquisition.
#[derive(Clone)]
pub struct NamedLocks {
    mutexes: Arc<SyncMutex<HashMap<String, Arc<Mutex<()>>>>>,
    semaphores: Arc<IndexMap<String, Arc<Semaphore>>>,
}

impl NamedLocks {
    /// Build the registry. `semaphore_capacities` is read once, per §4.3:
    /// "capacity is read once from configuration when the registry is built."
    pub fn new(semaphore_capacities: impl IntoIterator<Item = (String, usize)>) -> Self {
        let semaphores = semaphore_capacities
            .into_iter()
            .map(|(label, capacity)| (label, Arc::new(Semaphore::new(capacity))))
            .collect();
        Self {
            mutexes: Arc::new(SyncMutex::new(HashMap::new())),
            semaphores: Arc::new(semaphores),
        }
    }

    /// Return the mutex for `label`, creating it on first reference.
    /// Returns the same instance for equal labels across calls, and is
    /// safe to call concurrently.
    pub fn get_mutex(&self, label: &str) -> Arc<Mutex<()>> {
        self.mutexes
            .lock()
            .entry(label.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Return the pre-registered semaphore for `label`, or a fresh
    /// zero-capacity semaphore if the label was never declared.
    pub fn get_semaphore(&self, label: &str) -> Arc<Semaphore> {
        self.semaphores.get(label).cloned().unwrap_or_else(|| Arc::new(Semaphore::new(0)))
    }

    /// Acquire `label`'s mutex, or lose to cancellation.
    pub async fn acquire_mutex(
        &self,
        label: &str,
        cancel: &CancellationToken,
    ) -> Result<OwnedMutexGuard<()>, Cancelled> {
        let mutex = self.get_mutex(label);
        tokio::select! {
            guard = mutex.lock_owned() => Ok(guard),
            _ = cancel.cancelled() => Err(Cancelled),
        }
    }

    /// Acquire one permit from `label`'s semaphore, or lose to
    /// cancellation. A zero-capacity (unregistered) semaphore never
    /// resolves and so always loses to cancellation.
    pub async fn acquire_semaphore(
        &self,
        label: &str,
        cancel: &CancellationToken,
    ) -> Result<OwnedSemaphorePermit, Cancelled> {
        let semaphore = self.get_semaphore(label);
        tokio::select! {
            permit = semaphore.acquire_owned() => Ok(permit.expect("semaphore is never closed")),
            _ = cancel.cancelled() => Err(Cancelled),
        }
    }
}
