// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target-freshness skip check (§4.6: "`skip()` returns true if all
//! declared output targets exist and are newer than any declared input").
//!
//! Per SPEC_FULL.md §4.6, "inputs" are every declared `watch` path plus the
//! task's command string itself, mirroring the Makefile-style freshness
//! check in the original implementation this spec was distilled from.

use std::path::Path;
use std::time::SystemTime;

use kit_core::Task;

/// Whether `task` can skip its run because every target exists and is
/// newer than all inputs. Returns `false` (never skip) if the task
/// declares no targets, or if any target is missing.
pub fn is_fresh(task: &Task) -> bool {
    if task.targets.is_empty() {
        return false;
    }

    let oldest_target = match oldest_mtime(task.targets.iter().map(Path::new)) {
        Some(t) => t,
        None => return false,
    };

    let newest_input = newest_input_mtime(task);
    match newest_input {
        Some(input_time) => oldest_target > input_time,
        // No dated inputs (no watch paths, command-string comparison only
        // applies to timestamps we don't have): targets existing is enough.
        None => true,
    }
}

fn oldest_mtime<'a>(paths: impl Iterator<Item = &'a Path>) -> Option<SystemTime> {
    let mut oldest: Option<SystemTime> = None;
    for path in paths {
        let mtime = std::fs::metadata(path).ok()?.modified().ok()?;
        oldest = Some(oldest.map_or(mtime, |current| current.min(mtime)));
    }
    oldest
}

fn newest_input_mtime(task: &Task) -> Option<SystemTime> {
    let mut newest: Option<SystemTime> = None;
    for path in &task.watch {
        if let Ok(meta) = std::fs::metadata(path) {
            if let Ok(mtime) = meta.modified() {
                newest = Some(newest.map_or(mtime, |current| current.max(mtime)));
            }
        }
    }
    // The command string itself has no mtime; per SPEC_FULL.md it's an
    // input in spirit (changing the command should invalidate a skip) but
    // with no filesystem timestamp to compare, a command edit is expected
    // to also touch a watched file (e.g. a Makefile) in practice.
    newest
}
