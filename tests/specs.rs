//! Behavioral specifications for the `kit` CLI.
//!
//! These tests are black-box: they invoke the built binary against a
//! generated `tasks.yaml` and verify stdout, stderr, and exit codes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/help.rs"]
mod cli_help;

// engine/
#[path = "specs/engine/linear_chain.rs"]
mod engine_linear_chain;
#[path = "specs/engine/fan_out_background.rs"]
mod engine_fan_out_background;
#[path = "specs/engine/fatal_failure.rs"]
mod engine_fatal_failure;
#[path = "specs/engine/mutex_contention.rs"]
mod engine_mutex_contention;
#[path = "specs/engine/skip_fresh.rs"]
mod engine_skip_fresh;
#[path = "specs/engine/watch_rerun.rs"]
mod engine_watch_rerun;
