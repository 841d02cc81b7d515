// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot TCP/HTTP probe dialing (§3 Probe, §6 "Probe URL syntax").
//!
//! This module only answers "is the target reachable right now?" — the
//! periodic success/failure threshold state machine (§4.4 ProbeLoop) is
//! `kit-engine`'s concern; it drives one of these on a timer.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kit_core::{Probe, ProbeKind};
use tokio::net::TcpStream;

use crate::error::ExecError;

/// A single reachability check. Implementations must return promptly: the
/// ProbeLoop that drives this has no independent timeout of its own.
#[async_trait]
pub trait ProbeCheck: Send + Sync {
    async fn check(&self) -> Result<(), ExecError>;
}

/// The dial timeout applied to a single attempt, independent of the
/// probe's configured `period` (a period shorter than this would make the
/// loop overlap attempts, but that's a config-authoring concern, not this
/// crate's).
const DIAL_TIMEOUT: Duration = Duration::from_secs(3);

struct TcpProbeCheck {
    port: u16,
}

#[async_trait]
impl ProbeCheck for TcpProbeCheck {
    async fn check(&self) -> Result<(), ExecError> {
        let addr: SocketAddr = ([127, 0, 0, 1], self.port).into();
        match tokio::time::timeout(DIAL_TIMEOUT, TcpStream::connect(addr)).await {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(source)) => Err(ExecError::ProbeDial(source.to_string())),
            Err(_) => Err(ExecError::ProbeDial(format!("dialing 127.0.0.1:{} timed out", self.port))),
        }
    }
}

struct HttpProbeCheck {
    url: String,
    client: reqwest::Client,
}

#[async_trait]
impl ProbeCheck for HttpProbeCheck {
    async fn check(&self) -> Result<(), ExecError> {
        let response = self
            .client
            .get(&self.url)
            .timeout(DIAL_TIMEOUT)
            .send()
            .await
            .map_err(|e| ExecError::ProbeDial(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ExecError::ProbeDial(format!("{} responded {}", self.url, response.status())))
        }
    }
}

/// Build the concrete checker for a task's declared probe.
pub fn build_probe(probe: &Probe) -> Arc<dyn ProbeCheck> {
    match &probe.kind {
        ProbeKind::Tcp { port } => Arc::new(TcpProbeCheck { port: *port }),
        ProbeKind::Http { url } => {
            Arc::new(HttpProbeCheck { url: url.clone(), client: reqwest::Client::new() })
        }
    }
}
