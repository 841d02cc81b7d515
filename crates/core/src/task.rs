// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task definition: the unit the scheduler, runner, and status table operate on.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Restart behavior once a task's process exits (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestartPolicy {
    Always,
    OnFailure,
    Never,
}

crate::simple_display! {
    RestartPolicy {
        Always => "always",
        OnFailure => "on-failure",
        Never => "never",
    }
}

/// Whether a task is expected to terminate (`Job`) or run indefinitely
/// (`Service`). See glossary: "Background task".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Job,
    Service,
}

crate::simple_display! {
    TaskKind {
        Job => "job",
        Service => "service",
    }
}

/// How a task's activity is carried out. `kit-exec` spawns a real child
/// process for [`Activity::Command`]/[`Activity::Sh`]; `Image`/`Manifests`
/// are parsed and carried on the task so the graph, scheduler, and status
/// table behave uniformly, but launching them is an explicitly out-of-scope
/// container/Kubernetes runtime contract (see SPEC_FULL.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    /// Argv-style command: program + arguments.
    Command(Vec<String>),
    /// A single string executed via `sh -c`.
    Sh(String),
    /// A container image reference.
    Image(String),
    /// Kubernetes-style manifest file paths.
    Manifests(Vec<PathBuf>),
}

/// A host/container port advertisement (`"N"` or `"HOST:CONTAINER"` in the
/// YAML). Parsing lives in `kit-config`; this is the resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortSpec {
    pub host: u16,
    pub container: u16,
}

impl PortSpec {
    pub fn same(port: u16) -> Self {
        Self { host: port, container: port }
    }
}

/// A host/container volume mount (`"HOST:CONTAINER"` in the YAML).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    pub host: PathBuf,
    pub container: PathBuf,
}

/// What a [`Probe`] dials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeKind {
    Tcp { port: u16 },
    Http { url: String },
}

/// Default values per §3: `initialDelay=5s, period=5s, successThreshold=1,
/// failureThreshold=20`.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(5);
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(5);
pub const DEFAULT_SUCCESS_THRESHOLD: u32 = 1;
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 20;

/// A liveness or readiness probe definition (§3, §4.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub kind: ProbeKind,
    pub initial_delay: Duration,
    pub period: Duration,
    pub success_threshold: u32,
    pub failure_threshold: u32,
}

impl Probe {
    /// Build a probe applying the spec's defaults for any field the caller
    /// doesn't set explicitly. Returns `None` if `success_threshold` or
    /// `failure_threshold` is `0` (§4.4 edge case: invalid).
    pub fn new(
        kind: ProbeKind,
        initial_delay: Option<Duration>,
        period: Option<Duration>,
        success_threshold: Option<u32>,
        failure_threshold: Option<u32>,
    ) -> Option<Self> {
        let success_threshold = success_threshold.unwrap_or(DEFAULT_SUCCESS_THRESHOLD);
        let failure_threshold = failure_threshold.unwrap_or(DEFAULT_FAILURE_THRESHOLD);
        if success_threshold == 0 || failure_threshold == 0 {
            return None;
        }
        Some(Self {
            kind,
            initial_delay: initial_delay.unwrap_or(DEFAULT_INITIAL_DELAY),
            period: period.unwrap_or(DEFAULT_PERIOD),
            success_threshold,
            failure_threshold,
        })
    }
}

/// A named unit of work with dependencies, gating, and probes (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub dependencies: Vec<String>,
    pub watch: Vec<PathBuf>,
    pub ports: Vec<PortSpec>,
    pub mutex: Option<String>,
    pub semaphore: Option<String>,
    pub restart_policy: RestartPolicy,
    pub kind: TaskKind,
    pub liveness_probe: Option<Probe>,
    pub readiness_probe: Option<Probe>,
    pub targets: Vec<PathBuf>,
    pub activity: Activity,
    pub env: HashMap<String, String>,
    pub working_dir: Option<PathBuf>,
    pub volumes: Vec<VolumeMount>,
}

impl Task {
    /// A background task's downstream gates on `running`, not `success`
    /// (glossary: "Background task").
    pub fn is_background(&self) -> bool {
        self.kind == TaskKind::Service || self.restart_policy == RestartPolicy::Always
    }
}

crate::builder! {
    pub struct TaskBuilder => Task {
        into {
            name: String = "task",
        }
        set {
            dependencies: Vec<String> = Vec::new(),
            watch: Vec<PathBuf> = Vec::new(),
            ports: Vec<PortSpec> = Vec::new(),
            restart_policy: RestartPolicy = RestartPolicy::Never,
            kind: TaskKind = TaskKind::Job,
            targets: Vec<PathBuf> = Vec::new(),
            activity: Activity = Activity::Sh("true".to_string()),
            env: HashMap<String, String> = HashMap::new(),
            volumes: Vec<VolumeMount> = Vec::new(),
        }
        option {
            mutex: String = None,
            semaphore: String = None,
            liveness_probe: Probe = None,
            readiness_probe: Probe = None,
            working_dir: PathBuf = None,
        }
    }
}
