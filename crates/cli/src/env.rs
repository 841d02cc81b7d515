// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the `kit` binary (§6
//! "Environment"), mirroring `oj-daemon::env`'s one-function-per-variable
//! style.

/// `WATCH=0` or `KIT_WATCH=0` disables the filesystem watcher, independent
/// of the `-W` flag.
pub fn watch_disabled_by_env() -> bool {
    is_zero("WATCH") || is_zero("KIT_WATCH")
}

fn is_zero(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| v == "0")
}

/// Whether the run environment looks like CI, per §6: `CI`, `BUILD_ID`,
/// `RUN_ID` set (to any value), or `GITHUB_ACTIONS=true`. CI suppresses the
/// terminal renderer.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("BUILD_ID").is_ok()
        || std::env::var("RUN_ID").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}
