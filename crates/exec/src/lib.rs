// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kit-exec: the concrete external collaborators §1 names as out of scope
//! for the core supervisor, made real enough to run: process spawning,
//! TCP/HTTP probe dialing, port-free polling, recursive filesystem
//! watching with debounce, and the target-freshness skip check.

pub mod error;
pub mod portwait;
pub mod probe;
pub mod process;
pub mod skip;
pub mod watch;

pub use error::ExecError;
pub use portwait::wait_port_free;
pub use probe::{build_probe, ProbeCheck};
pub use process::{ProcessAdapter, ProcessSpec, RunningProcess, TokioProcessAdapter};
pub use skip::is_fresh;
pub use watch::FsWatch;
