// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kit-engine: the supervisor loop that turns a `kit-core` task graph and a
//! `kit-exec` process adapter into a running system (§4).
//!
//! `Supervisor` owns the work channel, the active-runner registry, the root
//! cancellation token, and the termination predicates. `TaskRunner` owns a
//! single task's gate/run/probe/classify/restart cycle. Everything in
//! between — the work-channel item type, downstream release, and per-task
//! log sinks — is plumbing shared by both.

pub mod dispatch;
pub mod error;
pub mod log;
pub mod probe_loop;
pub mod release;
pub mod runner;
pub mod supervisor;

pub use dispatch::WorkItem;
pub use error::EngineError;
pub use log::{ColorTaskLog, PlainTaskLog, TaskLog};
pub use runner::TaskRunner;
pub use supervisor::Supervisor;
