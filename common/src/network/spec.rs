//! # Additional Probe Specifications
//!
//! Parses the values given to `-p`. A value is either the name of a port set
//! (e.g. `large`) or an explicit `protocol:port` pair such as `https:8443`.

use crate::config::PortSets;
use crate::error::SpecError;
use crate::network::target::Protocol;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeSpec {
    /// A named port set, already resolved to its ordered port list.
    /// Every port is probed over HTTPS (with the usual fallback).
    Preset { name: String, ports: Vec<u16> },
    /// A single `protocol:port` pair.
    Explicit { protocol: Protocol, port: u16 },
}

impl ProbeSpec {
    /// Parses a raw `-p` value.
    ///
    /// Port set names take precedence over the `protocol:port` form. Any
    /// protocol other than `https` (case-insensitive) means plain HTTP.
    ///
    /// The port has to be a valid `u16`. A value such as `https:` or
    /// `http:70000` is rejected here instead of being pasted into the URL
    /// as-is, where it could only ever produce a failed probe.
    pub fn parse(raw: &str, port_sets: &PortSets) -> Result<Self, SpecError> {
        if let Some(ports) = port_sets.get(raw) {
            return Ok(ProbeSpec::Preset {
                name: raw.to_string(),
                ports: ports.to_vec(),
            });
        }

        let Some((proto_str, port_str)) = raw.split_once(':') else {
            return Err(SpecError::MissingSeparator(raw.to_string()));
        };

        let port: u16 = port_str.parse().map_err(|_| SpecError::InvalidPort {
            spec: raw.to_string(),
            port: port_str.to_string(),
        })?;

        let protocol: Protocol = if proto_str.eq_ignore_ascii_case("https") {
            Protocol::Https
        } else {
            Protocol::Http
        };

        Ok(ProbeSpec::Explicit { protocol, port })
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
