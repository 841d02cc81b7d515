// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared graph fixtures for this crate's tests and for downstream crates
//! exercising the scheduler against known topologies. Gated behind
//! `test-support` so `kit-engine`/`kit-exec` can depend on it in their own
//! `dev-dependencies` without pulling builder/proptest surface into release
//! builds.

use crate::graph::TaskGraph;
use crate::task::{RestartPolicy, Task, TaskKind};

/// `a -> b -> c`: the linear-chain scenario (SPEC_FULL.md §8, scenario 1).
pub fn linear_chain() -> TaskGraph {
    TaskGraph::new(vec![
        Task::builder().name("a").build(),
        Task::builder().name("b").dependencies(vec!["a".to_string()]).build(),
        Task::builder().name("c").dependencies(vec!["b".to_string()]).build(),
    ])
    .expect("fixture graph is valid")
}

/// `db` (a background `Service`) feeds both `migrate` and `api` (scenario 2:
/// fan-out with a background upstream).
pub fn fan_out_with_background_upstream() -> TaskGraph {
    TaskGraph::new(vec![
        Task::builder().name("db").kind(TaskKind::Service).build(),
        Task::builder().name("migrate").dependencies(vec!["db".to_string()]).build(),
        Task::builder().name("api").dependencies(vec!["db".to_string()]).build(),
    ])
    .expect("fixture graph is valid")
}

/// `a -> b`, `a` has `restartPolicy=Never` (scenario 3: fatal failure).
pub fn fatal_upstream() -> TaskGraph {
    TaskGraph::new(vec![
        Task::builder().name("a").restart_policy(RestartPolicy::Never).build(),
        Task::builder().name("b").dependencies(vec!["a".to_string()]).build(),
    ])
    .expect("fixture graph is valid")
}

/// Two independent tasks sharing a mutex label (scenario 4: mutex contention).
pub fn mutex_contenders(label: &str) -> TaskGraph {
    TaskGraph::new(vec![
        Task::builder().name("x").mutex(label).build(),
        Task::builder().name("y").mutex(label).build(),
    ])
    .expect("fixture graph is valid")
}
