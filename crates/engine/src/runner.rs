// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-task supervision (§4.6 TaskRunner): gate, run, probe, classify,
//! restart — honoring cancellation at every suspension point (§5).

use std::sync::Arc;
use std::time::Duration;

use kit_core::status::fulfills_downstream;
use kit_core::{Backoff, NamedLocks, Reason, RestartPolicy, StatusTable, Task, TaskGraph};
use kit_exec::process::ProcessSpec;
use kit_exec::{build_probe, is_fresh, wait_port_free, ProcessAdapter};
use nix::sys::signal::Signal;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::dispatch::WorkItem;
use crate::log::TaskLog;
use crate::probe_loop;
use crate::release::release_downstream;

/// What a single spawn-and-wait attempt produced, before §4.6 step 5's
/// classification is applied.
enum Outcome {
    /// The per-process (or root) token was tripped — exit silently,
    /// distinct from a per-run-only cancellation (liveness probe kill).
    ExitSilently,
    Succeeded,
    Failed,
}

pub struct TaskRunner<P: ProcessAdapter> {
    pub name: String,
    pub graph: Arc<TaskGraph>,
    pub status: StatusTable,
    pub locks: NamedLocks,
    pub process_adapter: Arc<P>,
    pub work_tx: UnboundedSender<WorkItem>,
    pub log: Arc<dyn TaskLog>,
    pub termination_grace: Duration,
}

impl<P: ProcessAdapter + 'static> TaskRunner<P> {
    /// Run the full per-task lifecycle until `process_cancel` trips or the
    /// task's restart policy says to stop (§4.6).
    pub async fn run(self, process_cancel: CancellationToken) {
        let Some(task) = self.graph.get(&self.name).cloned() else { return };

        // Open question resolution (SPEC_FULL.md §9): re-check upstream
        // fulfillment immediately before gating, so a downstream that was
        // speculatively enqueued before an upstream failed doesn't start.
        if !self.upstreams_fulfilled(&task) {
            self.status.set_reason(&self.name, Reason::Waiting);
            return;
        }

        let _mutex_guard = if let Some(label) = &task.mutex {
            match self.locks.acquire_mutex(label, &process_cancel).await {
                Ok(guard) => Some(guard),
                Err(_) => return,
            }
        } else {
            None
        };
        let _sem_permit = if let Some(label) = &task.semaphore {
            match self.locks.acquire_semaphore(label, &process_cancel).await {
                Ok(permit) => Some(permit),
                Err(_) => return,
            }
        } else {
            None
        };

        loop {
            if process_cancel.is_cancelled() {
                return;
            }

            if is_fresh(&task) {
                self.status.set(&self.name, Reason::Success, Backoff::default());
                release_downstream(&self.graph, &self.status, &self.name, &self.work_tx);
                return;
            }

            let run_cancel = process_cancel.child_token();
            self.status.set_reason(&self.name, Reason::Starting);

            if !self.wait_for_free_ports(&task, &run_cancel).await {
                if process_cancel.is_cancelled() {
                    return;
                }
                let Some(delay) = self.classify_and_decide(&task, Outcome::Failed) else { return };
                if !self.sleep_backoff(delay, &process_cancel).await {
                    return;
                }
                continue;
            }

            let _liveness_handle = task.liveness_probe.as_ref().map(|probe| {
                let check = build_probe(probe);
                let kill_switch = run_cancel.clone();
                probe_loop::spawn(probe.clone(), check, run_cancel.clone(), move |ok| {
                    if !ok {
                        kill_switch.cancel();
                    }
                })
            });

            let _readiness_handle = if let Some(probe) = &task.readiness_probe {
                let check = build_probe(probe);
                let status = self.status.clone();
                let graph = self.graph.clone();
                let work_tx = self.work_tx.clone();
                let name = self.name.clone();
                Some(probe_loop::spawn(probe.clone(), check, run_cancel.clone(), move |ok| {
                    if ok {
                        status.set_reason(&name, Reason::Running);
                        release_downstream(&graph, &status, &name, &work_tx);
                    } else {
                        status.set_reason(&name, Reason::Error);
                    }
                }))
            } else {
                self.status.set_reason(&self.name, Reason::Running);
                release_downstream(&self.graph, &self.status, &self.name, &self.work_tx);
                None
            };

            let outcome = self.spawn_and_wait(&task, &process_cancel, &run_cancel).await;

            if matches!(outcome, Outcome::ExitSilently) {
                return;
            }
            let Some(delay) = self.classify_and_decide(&task, outcome) else { return };
            if !self.sleep_backoff(delay, &process_cancel).await {
                return;
            }
        }
    }

    /// §9 open question: a downstream is dispatched before confirming
    /// every upstream is fulfilled (the dispatch loop only gates on
    /// `Waiting`, not on a full re-check). This catches the race where an
    /// upstream entered `Error` between enqueue and this runner starting.
    fn upstreams_fulfilled(&self, task: &Task) -> bool {
        task.dependencies.iter().all(|dep| {
            let background = self.graph.get(dep).map(|t| t.is_background()).unwrap_or(false);
            self.status.get(dep).map(|r| fulfills_downstream(r.reason, background)).unwrap_or(false)
        })
    }

    async fn wait_for_free_ports(&self, task: &Task, run_cancel: &CancellationToken) -> bool {
        for port in &task.ports {
            if wait_port_free(port.host, run_cancel).await.is_err() {
                return false;
            }
        }
        true
    }

    async fn spawn_and_wait(
        &self,
        task: &Task,
        process_cancel: &CancellationToken,
        run_cancel: &CancellationToken,
    ) -> Outcome {
        let spec = ProcessSpec {
            activity: task.activity.clone(),
            env: task.env.clone(),
            working_dir: task.working_dir.clone(),
        };
        let log = self.log.clone();
        let name = self.name.clone();
        let sink: kit_exec::process::LineSink =
            Arc::new(move |stream, line| log.line(&name, stream, &line));

        let mut process = match self.process_adapter.spawn(spec, sink).await {
            Ok(process) => process,
            Err(error) => {
                tracing::warn!(task = %self.name, %error, "failed to spawn task");
                return Outcome::Failed;
            }
        };

        tokio::select! {
            status = process.wait() => match status {
                Ok(status) if kit_exec::process::exited_successfully(&status) => Outcome::Succeeded,
                Ok(status) => {
                    tracing::info!(task = %self.name, reason = %kit_exec::process::describe_failure(&status), "task exited");
                    Outcome::Failed
                }
                Err(error) => {
                    tracing::warn!(task = %self.name, %error, "error waiting on task process");
                    Outcome::Failed
                }
            },
            _ = run_cancel.cancelled() => {
                let _ = process.signal_group(Signal::SIGTERM);
                tokio::select! {
                    _ = process.wait() => {}
                    _ = tokio::time::sleep(self.termination_grace) => {
                        let _ = process.signal_group(Signal::SIGKILL);
                        let _ = process.wait().await;
                    }
                }
                if process_cancel.is_cancelled() {
                    Outcome::ExitSilently
                } else {
                    // run_cancel tripped without the parent tripping: only
                    // the liveness probe does this directly.
                    Outcome::Failed
                }
            }
        }
    }

    /// Apply §4.6 step 5 (classification) and step 6 (restart decision).
    /// Returns the backoff duration to sleep before the next attempt, or
    /// `None` if the caller should stop looping.
    fn classify_and_decide(&self, task: &Task, outcome: Outcome) -> Option<Duration> {
        let current_backoff = self.status.get(&self.name).map(|r| r.backoff).unwrap_or_default();

        let next_backoff = match outcome {
            Outcome::ExitSilently => return None,
            Outcome::Succeeded => {
                self.status.set(&self.name, Reason::Success, Backoff::default());
                release_downstream(&self.graph, &self.status, &self.name, &self.work_tx);
                if task.restart_policy != RestartPolicy::Always {
                    return None;
                }
                Backoff::default()
            }
            Outcome::Failed => {
                let next = current_backoff.next();
                self.status.set(&self.name, Reason::Error, next);
                if task.restart_policy == RestartPolicy::Never {
                    return None;
                }
                next
            }
        };

        Some(next_backoff.duration())
    }

    /// Sleep for `duration`, honoring cancellation (§9: "runners must not
    /// sleep on backoff during termination"). Returns `false` if the
    /// process token tripped while sleeping, meaning the caller should
    /// exit rather than loop.
    async fn sleep_backoff(&self, duration: Duration, process_cancel: &CancellationToken) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = process_cancel.cancelled() => false,
        }
    }
}
