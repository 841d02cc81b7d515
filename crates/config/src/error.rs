// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fatal startup errors: invalid documents, schema violations, and
//! unresolved references (§7 "Configuration" error kind — all fatal).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("parsing YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported apiVersion {0:?}, expected \"kit/v1\"")]
    InvalidApiVersion(String),

    #[error("unsupported kind {0:?}, expected \"Tasks\"")]
    InvalidKind(String),

    #[error("metadata.name is required and must be non-empty")]
    MissingName,

    #[error("spec.tasks is empty; at least one task is required")]
    NoTasks,

    #[error("task {task:?} declares no activity (one of command/sh/image/manifests is required)")]
    MissingActivity { task: String },

    #[error(
        "task {task:?} declares more than one activity kind (command/sh/image/manifests are mutually exclusive)"
    )]
    ConflictingActivity { task: String },

    #[error("task {task:?} has invalid port {value:?}: {reason}")]
    InvalidPort { task: String, value: String, reason: String },

    #[error("task {task:?} has invalid volume {value:?}: {reason}")]
    InvalidVolume { task: String, value: String, reason: String },

    #[error("task {task:?} references unknown semaphore label {label:?}")]
    UnknownSemaphore { task: String, label: String },

    #[error("task {task:?} has an invalid {probe} probe: {reason}")]
    InvalidProbe { task: String, probe: &'static str, reason: String },

    #[error("task {task:?} has an invalid {field} {value:?}")]
    InvalidEnumValue { task: String, field: &'static str, value: String },

    #[error("task {task:?} has an invalid {probe} probe URL {value:?}: {reason}")]
    InvalidProbeUrl { task: String, probe: &'static str, value: String, reason: String },

    #[error(transparent)]
    Graph(#[from] kit_core::GraphError),
}
