// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Strict YAML document shape (§6). Every struct denies unknown fields so
//! a typo in `tasks.yaml` is a fatal startup error rather than a silently
//! ignored field.

use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::probe::RawProbe;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDocument {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: RawMetadata,
    pub spec: RawSpec,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawMetadata {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSpec {
    pub tasks: IndexMap<String, RawTask>,
    #[serde(default)]
    pub semaphores: IndexMap<String, usize>,
    #[serde(rename = "terminationGracePeriodSeconds", default)]
    pub termination_grace_period_seconds: Option<u64>,
    #[serde(default)]
    pub volumes: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTask {
    #[serde(default)]
    pub command: Option<Vec<String>>,
    #[serde(default)]
    pub sh: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub manifests: Option<Vec<PathBuf>>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub watch: Vec<PathBuf>,
    #[serde(default)]
    pub ports: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(rename = "workingDir", default)]
    pub working_dir: Option<PathBuf>,
    #[serde(default)]
    pub mutex: Option<String>,
    #[serde(default)]
    pub semaphore: Option<String>,
    #[serde(rename = "restartPolicy", default)]
    pub restart_policy: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub targets: Vec<PathBuf>,
    #[serde(rename = "livenessProbe", default)]
    pub liveness_probe: Option<RawProbe>,
    #[serde(rename = "readinessProbe", default)]
    pub readiness_probe: Option<RawProbe>,
    /// Accepted for schema-compatibility; per-task log overrides are not
    /// part of the terminal renderer's contract (§6).
    #[serde(default)]
    pub log: Option<serde_yaml::Value>,
    #[serde(default)]
    pub volumes: Vec<String>,
}
