// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level orchestrator (§4.7): seeds leaves, dispatches `TaskRunner`s,
//! evaluates termination predicates, and cascades shutdown.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use kit_core::{NamedLocks, Reason, RestartPolicy, StatusTable, TaskGraph};
use kit_exec::{FsWatch, ProcessAdapter};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::dispatch::WorkItem;
use crate::error::EngineError;
use crate::log::TaskLog;
use crate::runner::TaskRunner;

/// How often the termination predicates (§4.7 step 6) are evaluated.
const TERMINATION_POLL: Duration = Duration::from_secs(1);

type ActiveRunners = HashMap<String, (u64, CancellationToken, JoinHandle<()>)>;

pub struct Supervisor<P: ProcessAdapter> {
    graph: TaskGraph,
    locks: NamedLocks,
    process_adapter: Arc<P>,
    log: Arc<dyn TaskLog>,
    termination_grace: Duration,
    watch_enabled: bool,
    root: CancellationToken,
}

impl<P: ProcessAdapter + 'static> Supervisor<P> {
    pub fn new(
        graph: TaskGraph,
        locks: NamedLocks,
        process_adapter: Arc<P>,
        log: Arc<dyn TaskLog>,
        termination_grace: Duration,
        watch_enabled: bool,
    ) -> Self {
        Self {
            graph,
            locks,
            process_adapter,
            log,
            termination_grace,
            watch_enabled,
            root: CancellationToken::new(),
        }
    }

    /// The root cancellation token, so the caller can wire signal handling
    /// (§6 "Signals") to trip it without the supervisor itself knowing
    /// about `SIGINT`/`SIGTERM`/`SIGHUP`.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.root.clone()
    }

    /// The `StatusTable` for the effective graph `requested` resolves to,
    /// built ahead of `run`/`run_with_status` so a caller (the terminal
    /// renderer) can hold a handle onto the same table the engine will
    /// populate rather than a disconnected copy.
    pub fn build_status(&self, requested: &[String]) -> Result<StatusTable, EngineError> {
        let graph = self.graph.needed_for(requested)?;
        Ok(StatusTable::new(graph.iter().map(|t| t.name.clone())))
    }

    /// Run the effective graph to completion. Returns `Err(EngineError::Failed)`
    /// if any `restartPolicy=Never` task ended in `error` (§4.7 step 8, §7).
    pub async fn run(self, requested: &[String]) -> Result<(), EngineError> {
        let graph = self.graph.needed_for(requested)?;
        let status = StatusTable::new(graph.iter().map(|t| t.name.clone()));
        self.run_with_status(requested, status).await
    }

    /// Like `run`, but against a `StatusTable` the caller already holds a
    /// handle to — lets a renderer observe the same table the engine
    /// populates instead of a disconnected copy (§9: the renderer "is
    /// strictly a reader of `StatusTable`").
    pub async fn run_with_status(self, requested: &[String], status: StatusTable) -> Result<(), EngineError> {
        let graph = Arc::new(self.graph.needed_for(requested)?);
        let (work_tx, mut work_rx) = mpsc::unbounded_channel::<WorkItem>();

        for leaf in graph.leaves() {
            let _ = work_tx.send(WorkItem::Dispatch(leaf.name.clone()));
        }

        let mut watches = Vec::new();
        if self.watch_enabled {
            for task in graph.iter() {
                if task.watch.is_empty() {
                    continue;
                }
                let trigger_tx = work_tx.clone();
                let name = task.name.clone();
                let watch = FsWatch::spawn(&task.watch, self.root.clone(), move || {
                    let _ = trigger_tx.send(WorkItem::WatchTrigger(name.clone()));
                })
                .map_err(|source| EngineError::WatchInit { task: task.name.clone(), source })?;
                watches.push(watch);
            }
        }

        self.spawn_termination_predicate(graph.clone(), status.clone());

        let mut active: ActiveRunners = HashMap::new();
        let mut next_generation: u64 = 0;

        loop {
            tokio::select! {
                _ = self.root.cancelled() => break,
                item = work_rx.recv() => {
                    let Some(item) = item else { break };
                    self.handle_work_item(item, &graph, &status, &work_tx, &mut active, &mut next_generation).await;
                }
            }
        }

        for (_, (_, token, handle)) in active.drain() {
            token.cancel();
            let _ = handle.await;
        }
        drop(watches);

        let any_fatal = graph.any(|t| {
            t.restart_policy == RestartPolicy::Never
                && status.get(&t.name).map(|r| r.reason) == Some(Reason::Error)
        });
        if any_fatal {
            Err(EngineError::Failed)
        } else {
            Ok(())
        }
    }

    async fn handle_work_item(
        &self,
        item: WorkItem,
        graph: &Arc<TaskGraph>,
        status: &StatusTable,
        work_tx: &UnboundedSender<WorkItem>,
        active: &mut ActiveRunners,
        next_generation: &mut u64,
    ) {
        match item {
            WorkItem::Dispatch(name) => {
                if active.contains_key(&name) {
                    return;
                }
                if status.get(&name).map(|r| r.reason) != Some(Reason::Waiting) {
                    return;
                }
                self.spawn_runner(&name, graph, status, work_tx, active, next_generation);
            }
            WorkItem::WatchTrigger(name) => {
                if let Some((_, token, handle)) = active.remove(&name) {
                    token.cancel();
                    let _ = handle.await;
                }
                self.spawn_runner(&name, graph, status, work_tx, active, next_generation);
            }
            WorkItem::Reap(name, generation) => {
                if active.get(&name).map(|(g, _, _)| *g) == Some(generation) {
                    active.remove(&name);
                }
            }
        }
    }

    fn spawn_runner(
        &self,
        name: &str,
        graph: &Arc<TaskGraph>,
        status: &StatusTable,
        work_tx: &UnboundedSender<WorkItem>,
        active: &mut ActiveRunners,
        next_generation: &mut u64,
    ) {
        let generation = *next_generation;
        *next_generation += 1;

        let process_cancel = self.root.child_token();
        let run_token = process_cancel.clone();
        let runner = TaskRunner {
            name: name.to_string(),
            graph: graph.clone(),
            status: status.clone(),
            locks: self.locks.clone(),
            process_adapter: self.process_adapter.clone(),
            work_tx: work_tx.clone(),
            log: self.log.clone(),
            termination_grace: self.termination_grace,
        };

        let reap_tx = work_tx.clone();
        let reap_name = name.to_string();
        let handle = tokio::spawn(async move {
            runner.run(run_token).await;
            let _ = reap_tx.send(WorkItem::Reap(reap_name, generation));
        });

        active.insert(name.to_string(), (generation, process_cancel, handle));
    }

    fn spawn_termination_predicate(&self, graph: Arc<TaskGraph>, status: StatusTable) {
        let root = self.root.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = root.cancelled() => return,
                    _ = tokio::time::sleep(TERMINATION_POLL) => {}
                }

                let all_complete = graph.all(|t| {
                    t.is_background()
                        || matches!(
                            status.get(&t.name).map(|r| r.reason),
                            Some(Reason::Success) | Some(Reason::Error)
                        )
                });
                let any_fatal = graph.any(|t| {
                    t.restart_policy == RestartPolicy::Never
                        && status.get(&t.name).map(|r| r.reason) == Some(Reason::Error)
                });

                if all_complete || any_fatal {
                    root.cancel();
                    return;
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kit_core::{Task, TaskKind};
    use kit_exec::process::{LineSink, ProcessSpec, RunningProcess};
    use kit_exec::ExecError;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    struct ImmediateExit {
        success: bool,
    }

    #[async_trait]
    impl RunningProcess for ImmediateExit {
        async fn wait(&mut self) -> Result<ExitStatus, ExecError> {
            Ok(ExitStatus::from_raw(if self.success { 0 } else { 256 }))
        }
        fn signal_group(&self, _signal: nix::sys::signal::Signal) -> Result<(), ExecError> {
            Ok(())
        }
        fn pid(&self) -> u32 {
            1
        }
    }

    struct ScriptedAdapter {
        fails: Vec<String>,
        spawn_order: parking_lot::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ProcessAdapter for ScriptedAdapter {
        async fn spawn(&self, spec: ProcessSpec, _on_line: LineSink) -> Result<Box<dyn RunningProcess>, ExecError> {
            let name = match &spec.activity {
                kit_core::Activity::Sh(tag) => tag.clone(),
                _ => "?".to_string(),
            };
            self.spawn_order.lock().push(name.clone());
            Ok(Box::new(ImmediateExit { success: !self.fails.contains(&name) }))
        }
    }

    fn named_task(name: &str, deps: &[&str]) -> Task {
        Task::builder()
            .name(name)
            .dependencies(deps.iter().map(|s| s.to_string()).collect())
            .activity(kit_core::Activity::Sh(name.to_string()))
            .build()
    }

    #[tokio::test]
    async fn linear_chain_runs_in_order_and_exits_cleanly() {
        let graph = TaskGraph::new(vec![
            named_task("a", &[]),
            named_task("b", &["a"]),
            named_task("c", &["b"]),
        ])
        .unwrap();
        let adapter = Arc::new(ScriptedAdapter { fails: vec![], spawn_order: parking_lot::Mutex::new(Vec::new()) });
        let supervisor = Supervisor::new(
            graph,
            NamedLocks::new(std::iter::empty()),
            adapter.clone(),
            Arc::new(crate::log::PlainTaskLog),
            Duration::from_millis(200),
            false,
        );

        let result = tokio::time::timeout(Duration::from_secs(5), supervisor.run(&[])).await.unwrap();
        assert!(result.is_ok());
        assert_eq!(*adapter.spawn_order.lock(), vec!["a".to_string(), "b".to_string(), "c".to_string()]);
    }

    #[tokio::test]
    async fn fatal_failure_blocks_downstream_and_fails_the_run() {
        let graph = TaskGraph::new(vec![named_task("a", &[]), named_task("b", &["a"])]).unwrap();
        let adapter = Arc::new(ScriptedAdapter {
            fails: vec!["a".to_string()],
            spawn_order: parking_lot::Mutex::new(Vec::new()),
        });
        let supervisor = Supervisor::new(
            graph,
            NamedLocks::new(std::iter::empty()),
            adapter.clone(),
            Arc::new(crate::log::PlainTaskLog),
            Duration::from_millis(200),
            false,
        );

        let result = tokio::time::timeout(Duration::from_secs(5), supervisor.run(&[])).await.unwrap();
        assert!(matches!(result, Err(EngineError::Failed)));
        assert_eq!(*adapter.spawn_order.lock(), vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn background_service_stays_running_while_dependents_start() {
        let graph = TaskGraph::new(vec![
            Task::builder().name("db").kind(TaskKind::Service).activity(kit_core::Activity::Sh("db".to_string())).build(),
            named_task("api", &["db"]),
        ])
        .unwrap();
        let adapter = Arc::new(ScriptedAdapter { fails: vec![], spawn_order: parking_lot::Mutex::new(Vec::new()) });
        let supervisor = Supervisor::new(
            graph,
            NamedLocks::new(std::iter::empty()),
            adapter.clone(),
            Arc::new(crate::log::PlainTaskLog),
            Duration::from_millis(200),
            false,
        );
        let cancel = supervisor.cancellation_token();

        let handle = tokio::spawn(async move {
            let requested = vec!["api".to_string()];
            supervisor.run(&requested).await
        });
        tokio::time::sleep(Duration::from_millis(200)).await;
        cancel.cancel();
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;

        let order = adapter.spawn_order.lock();
        assert!(order.contains(&"db".to_string()));
        assert!(order.contains(&"api".to_string()));
    }

    #[tokio::test]
    async fn unreachable_root_task_is_rejected() {
        let graph = TaskGraph::new(vec![named_task("a", &[])]).unwrap();
        let adapter = Arc::new(ScriptedAdapter { fails: vec![], spawn_order: parking_lot::Mutex::new(Vec::new()) });
        let supervisor = Supervisor::new(
            graph,
            NamedLocks::new(std::iter::empty()),
            adapter,
            Arc::new(crate::log::PlainTaskLog),
            Duration::from_millis(200),
            false,
        );

        let result = supervisor.run(&["missing".to_string()]).await;
        assert!(matches!(result, Err(EngineError::Graph(_))));
    }
}
