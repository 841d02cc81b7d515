// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Probe parsing: a structured `{tcp: port, ...}` mapping, or an HTTP URL
//! with threshold/timing query parameters (§6 "Probe URL syntax").

use kit_core::{Probe, ProbeKind};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::duration;

/// Raw `livenessProbe`/`readinessProbe` value as it appears in YAML: either
/// a bare URL string for HTTP probes, or a structured mapping for TCP.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawProbe {
    Url(String),
    Tcp(RawTcpProbe),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTcpProbe {
    pub tcp: u16,
    #[serde(rename = "initialDelay", default)]
    pub initial_delay: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(rename = "successThreshold", default)]
    pub success_threshold: Option<u32>,
    #[serde(rename = "failureThreshold", default)]
    pub failure_threshold: Option<u32>,
}

/// Query parameter names recognized on an HTTP probe URL; stripped from the
/// URL actually dialed once parsed.
const QUERY_KEYS: [&str; 4] = ["failureThreshold", "initialDelay", "period", "successThreshold"];

pub fn parse(raw: &RawProbe) -> Result<Probe, String> {
    match raw {
        RawProbe::Tcp(tcp) => {
            let initial_delay = parse_opt_duration(tcp.initial_delay.as_deref())?;
            let period = parse_opt_duration(tcp.period.as_deref())?;
            Probe::new(
                ProbeKind::Tcp { port: tcp.tcp },
                initial_delay,
                period,
                tcp.success_threshold,
                tcp.failure_threshold,
            )
            .ok_or_else(|| "successThreshold and failureThreshold must be non-zero".to_string())
        }
        RawProbe::Url(raw_url) => parse_http(raw_url),
    }
}

fn parse_http(raw_url: &str) -> Result<Probe, String> {
    let url = Url::parse(raw_url).map_err(|e| format!("invalid URL: {e}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!("unsupported scheme {:?}, expected http or https", url.scheme()));
    }

    let mut failure_threshold = None;
    let mut initial_delay = None;
    let mut period = None;
    let mut success_threshold = None;
    let mut remaining_query = Vec::new();

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "failureThreshold" => {
                failure_threshold =
                    Some(value.parse::<u32>().map_err(|_| format!("invalid failureThreshold {value:?}"))?);
            }
            "initialDelay" => initial_delay = Some(duration::parse(&value)?),
            "period" => period = Some(duration::parse(&value)?),
            "successThreshold" => {
                success_threshold =
                    Some(value.parse::<u32>().map_err(|_| format!("invalid successThreshold {value:?}"))?);
            }
            _ => remaining_query.push((key.to_string(), value.to_string())),
        }
    }

    let mut cleaned = url.clone();
    if remaining_query.is_empty() {
        cleaned.set_query(None);
    } else {
        let joined: String = remaining_query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        cleaned.set_query(Some(&joined));
    }

    Probe::new(
        ProbeKind::Http { url: cleaned.to_string() },
        initial_delay,
        period,
        success_threshold,
        failure_threshold,
    )
    .ok_or_else(|| "successThreshold and failureThreshold must be non-zero".to_string())
}

fn parse_opt_duration(literal: Option<&str>) -> Result<Option<Duration>, String> {
    literal.map(duration::parse).transpose()
}

/// The recognized query keys, exposed for tests that assert the rest of a
/// probe URL survives unparsed.
pub fn recognized_query_keys() -> &'static [&'static str] {
    &QUERY_KEYS
}
