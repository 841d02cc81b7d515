// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Real child-process execution: spawn, stdio → line sink, process-group
//! kill (§4.6 "run-loop").

use std::collections::HashMap;
use std::os::unix::process::CommandExt as _;
use std::os::unix::process::ExitStatusExt as _;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::sync::Arc;

use async_trait::async_trait;
use kit_core::Activity;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::error::ExecError;

/// Which stream a captured output line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Callback invoked once per captured output line.
pub type LineSink = Arc<dyn Fn(Stream, String) + Send + Sync>;

/// What to launch: a resolved argv/cwd/env triple. Built by the caller from
/// a [`kit_core::Task`]; `Image`/`Manifests` activities have no
/// corresponding spec and are rejected by [`TokioProcessAdapter`].
pub struct ProcessSpec {
    pub activity: Activity,
    pub env: HashMap<String, String>,
    pub working_dir: Option<PathBuf>,
}

/// A spawned, running process.
#[async_trait]
pub trait RunningProcess: Send {
    /// Block until the process exits.
    async fn wait(&mut self) -> Result<ExitStatus, ExecError>;

    /// Send `signal` to the whole process group this child leads.
    fn signal_group(&self, signal: Signal) -> Result<(), ExecError>;

    fn pid(&self) -> u32;
}

/// Spawns real OS processes. The seam a container/Kubernetes runtime would
/// plug into for `Image`/`Manifests` activities (out of scope here).
#[async_trait]
pub trait ProcessAdapter: Send + Sync {
    async fn spawn(
        &self,
        spec: ProcessSpec,
        on_line: LineSink,
    ) -> Result<Box<dyn RunningProcess>, ExecError>;
}

/// Production [`ProcessAdapter`] backed by `tokio::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioProcessAdapter;

#[async_trait]
impl ProcessAdapter for TokioProcessAdapter {
    async fn spawn(
        &self,
        spec: ProcessSpec,
        on_line: LineSink,
    ) -> Result<Box<dyn RunningProcess>, ExecError> {
        let mut command = match &spec.activity {
            Activity::Command(argv) => {
                let (program, args) = argv.split_first().ok_or(ExecError::UnsupportedActivity)?;
                let mut c = Command::new(program);
                c.args(args);
                c
            }
            Activity::Sh(script) => {
                let mut c = Command::new("sh");
                c.arg("-c").arg(script);
                c
            }
            Activity::Image(_) | Activity::Manifests(_) => return Err(ExecError::UnsupportedActivity),
        };

        command.envs(&spec.env);
        if let Some(dir) = &spec.working_dir {
            command.current_dir(dir);
        }
        command.stdin(std::process::Stdio::null());
        command.stdout(std::process::Stdio::piped());
        command.stderr(std::process::Stdio::piped());
        // New process group headed by the child, so the whole tree can be
        // signalled together at shutdown.
        command.process_group(0);

        let mut child = command.spawn().map_err(ExecError::Spawn)?;
        let pid = child.id().expect("freshly spawned child has a pid");

        if let Some(stdout) = child.stdout.take() {
            spawn_line_reader(stdout, Stream::Stdout, on_line.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_line_reader(stderr, Stream::Stderr, on_line);
        }

        Ok(Box::new(TokioRunningProcess { child, pid }))
    }
}

fn spawn_line_reader(
    stream: impl tokio::io::AsyncRead + Unpin + Send + 'static,
    which: Stream,
    on_line: LineSink,
) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            on_line(which, line);
        }
    });
}

struct TokioRunningProcess {
    child: tokio::process::Child,
    pid: u32,
}

#[async_trait]
impl RunningProcess for TokioRunningProcess {
    async fn wait(&mut self) -> Result<ExitStatus, ExecError> {
        self.child.wait().await.map_err(ExecError::Wait)
    }

    fn signal_group(&self, signal: Signal) -> Result<(), ExecError> {
        killpg(Pid::from_raw(self.pid as i32), signal)
            .map_err(|source| ExecError::Signal { pgid: self.pid as i32, source })
    }

    fn pid(&self) -> u32 {
        self.pid
    }
}

/// Whether an [`ExitStatus`] should be treated as a clean run (§4.6: "the
/// run returned cleanly").
pub fn exited_successfully(status: &ExitStatus) -> bool {
    status.success()
}

/// A stable textual description of a failed exit, for logs and status.
pub fn describe_failure(status: &ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exited with status {code}"),
        None => match status.signal() {
            Some(sig) => format!("terminated by signal {sig}"),
            None => "exited abnormally".to_string(),
        },
    }
}
