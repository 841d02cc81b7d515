// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic probe evaluation with success/failure thresholds (§4.4
//! ProbeLoop). Drives a [`kit_exec::ProbeCheck`] on a timer; `kit-exec`
//! only answers "is it reachable right now", this is the state machine
//! that turns a stream of attempts into ready/unready transitions.

use std::sync::Arc;

use kit_core::Probe;
use kit_exec::ProbeCheck;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Spawn the probe loop described in §4.4:
///
/// 1. Sleep `initial_delay`.
/// 2. Every `period`, run one attempt.
/// 3. Track consecutive successes/failures; on reaching `success_threshold`
///    call `on_transition(true)`, on reaching `failure_threshold` call
///    `on_transition(false)` — each exactly once per transition.
/// 4. A success resets the failure counter and vice versa.
/// 5. Exit when `cancel` trips.
pub fn spawn(
    probe: Probe,
    check: Arc<dyn ProbeCheck>,
    cancel: CancellationToken,
    on_transition: impl Fn(bool) + Send + Sync + 'static,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(probe.initial_delay) => {}
        }

        let mut consecutive_success: u32 = 0;
        let mut consecutive_failure: u32 = 0;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(probe.period) => {}
            }

            let ok = check.check().await.is_ok();
            if ok {
                consecutive_failure = 0;
                consecutive_success += 1;
                if consecutive_success == probe.success_threshold {
                    on_transition(true);
                }
            } else {
                consecutive_success = 0;
                consecutive_failure += 1;
                if consecutive_failure == probe.failure_threshold {
                    on_transition(false);
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kit_core::ProbeKind;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct ScriptedCheck {
        results: Mutex<Vec<bool>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ProbeCheck for ScriptedCheck {
        async fn check(&self) -> Result<(), kit_exec::ExecError> {
            let idx = self.calls.fetch_add(1, Ordering::SeqCst);
            let results = self.results.lock();
            let ok = results.get(idx).copied().unwrap_or(*results.last().unwrap());
            if ok {
                Ok(())
            } else {
                Err(kit_exec::ExecError::ProbeDial("scripted failure".to_string()))
            }
        }
    }

    fn probe(success_threshold: u32, failure_threshold: u32) -> Probe {
        Probe::new(
            ProbeKind::Tcp { port: 0 },
            Some(Duration::from_millis(0)),
            Some(Duration::from_millis(5)),
            Some(success_threshold),
            Some(failure_threshold),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn fires_ready_once_threshold_reached() {
        let check: Arc<dyn ProbeCheck> =
            Arc::new(ScriptedCheck { results: Mutex::new(vec![false, true, true, true]), calls: AtomicUsize::new(0) });
        let cancel = CancellationToken::new();
        let transitions = Arc::new(Mutex::new(Vec::new()));
        let t2 = transitions.clone();

        let handle = spawn(probe(2, 5), check, cancel.clone(), move |ok| t2.lock().push(ok));
        tokio::time::sleep(Duration::from_millis(40)).await;
        cancel.cancel();
        let _ = handle.await;

        let seen = transitions.lock().clone();
        assert_eq!(seen, vec![true]);
    }

    #[tokio::test]
    async fn fires_unready_once_failure_threshold_reached() {
        let check: Arc<dyn ProbeCheck> =
            Arc::new(ScriptedCheck { results: Mutex::new(vec![false, false]), calls: AtomicUsize::new(0) });
        let cancel = CancellationToken::new();
        let transitions = Arc::new(Mutex::new(Vec::new()));
        let t2 = transitions.clone();

        let handle = spawn(probe(1, 2), check, cancel.clone(), move |ok| t2.lock().push(ok));
        tokio::time::sleep(Duration::from_millis(40)).await;
        cancel.cancel();
        let _ = handle.await;

        let seen = transitions.lock().clone();
        assert_eq!(seen, vec![false]);
    }

    #[tokio::test]
    async fn exits_promptly_on_cancellation() {
        let check: Arc<dyn ProbeCheck> =
            Arc::new(ScriptedCheck { results: Mutex::new(vec![true]), calls: AtomicUsize::new(0) });
        let cancel = CancellationToken::new();
        let handle = spawn(probe(100, 100), check, cancel.clone(), |_| {});
        cancel.cancel();
        tokio::time::timeout(Duration::from_millis(200), handle).await.unwrap().unwrap();
    }
}
