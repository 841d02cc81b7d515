// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Port-string parsing: `"N"` or `"HOST:CONTAINER"` (§6).

use kit_core::PortSpec;

/// Parse a single `ports` entry. `"8080"` maps host and container to the
/// same port; `"8080:80"` maps host 8080 to container 80.
pub fn parse_port(value: &str) -> Result<PortSpec, String> {
    match value.split_once(':') {
        Some((host, container)) => {
            let host: u16 = host.parse().map_err(|_| format!("invalid host port in {value:?}"))?;
            let container: u16 =
                container.parse().map_err(|_| format!("invalid container port in {value:?}"))?;
            Ok(PortSpec { host, container })
        }
        None => {
            let port: u16 = value.parse().map_err(|_| format!("invalid port {value:?}"))?;
            Ok(PortSpec::same(port))
        }
    }
}

/// Parse a single `volumes` entry: `"HOST:CONTAINER"`.
pub fn parse_volume(value: &str) -> Result<kit_core::VolumeMount, String> {
    let (host, container) =
        value.split_once(':').ok_or_else(|| format!("expected HOST:CONTAINER, got {value:?}"))?;
    if host.is_empty() || container.is_empty() {
        return Err(format!("expected HOST:CONTAINER, got {value:?}"));
    }
    Ok(kit_core::VolumeMount { host: host.into(), container: container.into() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_port_from_bare_number() {
        let spec = parse_port("8080").unwrap();
        assert_eq!(spec.host, 8080);
        assert_eq!(spec.container, 8080);
    }

    #[test]
    fn host_container_split() {
        let spec = parse_port("8080:80").unwrap();
        assert_eq!(spec.host, 8080);
        assert_eq!(spec.container, 80);
    }

    #[yare::parameterized(
        word       = { "http" },
        empty      = { "" },
        negative   = { "-1" },
        two_colons = { "80:80:80" },
    )]
    fn rejects_invalid_port_strings(value: &str) {
        assert!(parse_port(value).is_err());
    }

    #[test]
    fn volume_requires_both_sides() {
        assert!(parse_volume("/host").is_err());
        let v = parse_volume("/host:/container").unwrap();
        assert_eq!(v.host.to_str().unwrap(), "/host");
        assert_eq!(v.container.to_str().unwrap(), "/container");
    }
}
