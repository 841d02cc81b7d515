// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal status renderer (§2 StatusRenderer, §9 design note: "strictly a
//! reader of `StatusTable`"). Paints a fixed list of `<task> <reason>`
//! lines, redrawing on a fixed cadence — no event-driven coupling to the
//! engine.

use std::time::Duration;

use kit_core::{reason_sgr_code, task_sgr_code, StatusTable};
use tokio_util::sync::CancellationToken;

/// §9: "a single fixed refresh cadence (~10ms off-CI) is sufficient".
const REFRESH_INTERVAL: Duration = Duration::from_millis(10);

const CLEAR_SCREEN: &str = "\x1b[2J";
const CURSOR_HOME: &str = "\x1b[H";

/// Run the render loop until `cancel` trips. Intended to be spawned as its
/// own task; never mutates `status`.
pub async fn run(status: StatusTable, cancel: CancellationToken) {
    loop {
        print!("{CLEAR_SCREEN}{CURSOR_HOME}");
        for (name, record) in status.snapshot() {
            let name_code = task_sgr_code(&name);
            let reason_code = reason_sgr_code(record.reason);
            println!("\x1b[{name_code}m{name}\x1b[0m  \x1b[{reason_code}m{}\x1b[0m", record.reason);
        }
        use std::io::Write;
        let _ = std::io::stdout().flush();

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(REFRESH_INTERVAL) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn renderer_exits_promptly_on_cancellation() {
        let status = StatusTable::new(["a".to_string()]);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(status, cancel.clone()));
        cancel.cancel();
        tokio::time::timeout(Duration::from_millis(200), handle).await.unwrap().unwrap();
    }
}
