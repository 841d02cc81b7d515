// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal duration literal parser for YAML fields and probe-URL query
//! params: bare integers are seconds, `Ns` is seconds, `Nms` is milliseconds.

use std::time::Duration;

pub fn parse(literal: &str) -> Result<Duration, String> {
    let literal = literal.trim();
    if let Some(ms) = literal.strip_suffix("ms") {
        let n: u64 = ms.parse().map_err(|_| format!("invalid duration {literal:?}"))?;
        return Ok(Duration::from_millis(n));
    }
    if let Some(s) = literal.strip_suffix('s') {
        let n: u64 = s.parse().map_err(|_| format!("invalid duration {literal:?}"))?;
        return Ok(Duration::from_secs(n));
    }
    let n: u64 = literal.parse().map_err(|_| format!("invalid duration {literal:?}"))?;
    Ok(Duration::from_secs(n))
}
