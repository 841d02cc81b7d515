// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turn a `tasks.yaml` document into a validated [`kit_core::TaskGraph`]
//! plus the ambient registry/timing settings the engine needs (§6).

use std::path::Path;
use std::time::Duration;

use kit_core::{Activity, PortSpec, RestartPolicy, Task, TaskGraph, TaskKind, VolumeMount};

use crate::error::ConfigError;
use crate::ports;
use crate::probe;
use crate::raw::{RawDocument, RawTask};

const API_VERSION: &str = "kit/v1";
const KIND: &str = "Tasks";

/// Default grace period when `spec.terminationGracePeriodSeconds` is
/// absent; the spec leaves the exact value open (§9 open question carried
/// into SPEC_FULL.md), we pick a value long enough for a typical process
/// to flush and exit cleanly.
pub const DEFAULT_TERMINATION_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// A fully validated configuration: the task graph plus the settings that
/// apply to the run as a whole rather than to any one task.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub name: String,
    pub graph: TaskGraph,
    pub semaphore_capacities: Vec<(String, usize)>,
    pub termination_grace_period: Duration,
}

/// Read and parse `path`, producing a fully validated [`LoadedConfig`].
pub fn load(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
    parse(&content)
}

/// Parse already-read YAML content (split out from [`load`] for testing
/// against in-memory fixtures without touching the filesystem).
pub fn parse(content: &str) -> Result<LoadedConfig, ConfigError> {
    let doc: RawDocument = serde_yaml::from_str(content)?;

    if doc.api_version != API_VERSION {
        return Err(ConfigError::InvalidApiVersion(doc.api_version));
    }
    if doc.kind != KIND {
        return Err(ConfigError::InvalidKind(doc.kind));
    }
    if doc.metadata.name.trim().is_empty() {
        return Err(ConfigError::MissingName);
    }
    if doc.spec.tasks.is_empty() {
        return Err(ConfigError::NoTasks);
    }

    let global_volumes = doc
        .spec
        .volumes
        .iter()
        .map(|v| ports::parse_volume(v).map_err(|reason| ConfigError::InvalidVolume {
            task: "<spec.volumes>".to_string(),
            value: v.clone(),
            reason,
        }))
        .collect::<Result<Vec<_>, _>>()?;

    let semaphore_capacities: Vec<(String, usize)> =
        doc.spec.semaphores.iter().map(|(label, capacity)| (label.clone(), *capacity)).collect();

    let mut tasks = Vec::with_capacity(doc.spec.tasks.len());
    for (name, raw) in &doc.spec.tasks {
        tasks.push(build_task(name, raw, &global_volumes, &doc.spec.semaphores)?);
    }

    let graph = TaskGraph::new(tasks)?;

    Ok(LoadedConfig {
        name: doc.metadata.name,
        graph,
        semaphore_capacities,
        termination_grace_period: doc
            .spec
            .termination_grace_period_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TERMINATION_GRACE_PERIOD),
    })
}

fn build_task(
    name: &str,
    raw: &RawTask,
    global_volumes: &[VolumeMount],
    semaphores: &indexmap::IndexMap<String, usize>,
) -> Result<Task, ConfigError> {
    let activity = build_activity(name, raw)?;

    let ports = raw
        .ports
        .iter()
        .map(|p| {
            ports::parse_port(p).map_err(|reason| ConfigError::InvalidPort {
                task: name.to_string(),
                value: p.clone(),
                reason,
            })
        })
        .collect::<Result<Vec<PortSpec>, _>>()?;

    let mut volumes = raw
        .volumes
        .iter()
        .map(|v| {
            ports::parse_volume(v).map_err(|reason| ConfigError::InvalidVolume {
                task: name.to_string(),
                value: v.clone(),
                reason,
            })
        })
        .collect::<Result<Vec<VolumeMount>, _>>()?;
    volumes.extend(global_volumes.iter().cloned());

    if let Some(label) = &raw.semaphore {
        if !semaphores.contains_key(label) {
            return Err(ConfigError::UnknownSemaphore { task: name.to_string(), label: label.clone() });
        }
    }

    let restart_policy = match raw.restart_policy.as_deref() {
        None => RestartPolicy::Never,
        Some(s) => match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "always" => RestartPolicy::Always,
            "onfailure" => RestartPolicy::OnFailure,
            "never" => RestartPolicy::Never,
            _ => {
                return Err(ConfigError::InvalidEnumValue {
                    task: name.to_string(),
                    field: "restartPolicy",
                    value: s.clone(),
                })
            }
        },
    };

    let kind = match raw.kind.as_deref() {
        None => TaskKind::Job,
        Some(s) => match s.to_ascii_lowercase().as_str() {
            "job" => TaskKind::Job,
            "service" => TaskKind::Service,
            _ => {
                return Err(ConfigError::InvalidEnumValue {
                    task: name.to_string(),
                    field: "type",
                    value: s.clone(),
                })
            }
        },
    };

    let liveness_probe = raw
        .liveness_probe
        .as_ref()
        .map(|p| {
            probe::parse(p).map_err(|reason| ConfigError::InvalidProbe {
                task: name.to_string(),
                probe: "liveness",
                reason,
            })
        })
        .transpose()?;

    let readiness_probe = raw
        .readiness_probe
        .as_ref()
        .map(|p| {
            probe::parse(p).map_err(|reason| ConfigError::InvalidProbe {
                task: name.to_string(),
                probe: "readiness",
                reason,
            })
        })
        .transpose()?;

    Ok(Task {
        name: name.to_string(),
        dependencies: raw.dependencies.clone(),
        watch: raw.watch.clone(),
        ports,
        mutex: raw.mutex.clone(),
        semaphore: raw.semaphore.clone(),
        restart_policy,
        kind,
        liveness_probe,
        readiness_probe,
        targets: raw.targets.clone(),
        activity,
        env: raw.env.clone(),
        working_dir: raw.working_dir.clone(),
        volumes,
    })
}

fn build_activity(name: &str, raw: &RawTask) -> Result<Activity, ConfigError> {
    let declared = [raw.command.is_some(), raw.sh.is_some(), raw.image.is_some(), raw.manifests.is_some()]
        .into_iter()
        .filter(|b| *b)
        .count();
    if declared == 0 {
        return Err(ConfigError::MissingActivity { task: name.to_string() });
    }
    if declared > 1 {
        return Err(ConfigError::ConflictingActivity { task: name.to_string() });
    }
    if let Some(command) = &raw.command {
        return Ok(Activity::Command(command.clone()));
    }
    if let Some(sh) = &raw.sh {
        return Ok(Activity::Sh(sh.clone()));
    }
    if let Some(image) = &raw.image {
        return Ok(Activity::Image(image.clone()));
    }
    if let Some(manifests) = &raw.manifests {
        return Ok(Activity::Manifests(manifests.clone()));
    }
    unreachable!("declared == 1 guarantees one of the above matched")
}
