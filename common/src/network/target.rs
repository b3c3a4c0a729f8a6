//! # Probe Target Model
//!
//! Defines what a single probe points at.
//!
//! A target is a hostname taken verbatim from the input, an optional explicit
//! port and the protocol to speak. Without a port the HTTP client falls back
//! to the protocol default (443 for HTTPS, 80 for HTTP).

use std::fmt;

/// Application protocol used by a probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn scheme(self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

/// One (protocol, host, port) combination to probe.
///
/// Targets are never deduplicated, two equal targets are probed twice.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProbeTarget {
    protocol: Protocol,
    host: String,
    port: Option<u16>,
}

impl ProbeTarget {
    pub fn new(protocol: Protocol, host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            protocol,
            host: host.into(),
            port,
        }
    }

    pub fn https(host: impl Into<String>, port: Option<u16>) -> Self {
        Self::new(Protocol::Https, host, port)
    }

    pub fn http(host: impl Into<String>, port: Option<u16>) -> Self {
        Self::new(Protocol::Http, host, port)
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Same host and port, spoken over another protocol.
    pub fn with_protocol(&self, protocol: Protocol) -> Self {
        Self {
            protocol,
            host: self.host.clone(),
            port: self.port,
        }
    }

    /// `host` or `host:port`, without a scheme.
    pub fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }

    /// Renders `protocol://host[:port]`.
    pub fn url(&self) -> String {
        format!("{}://{}", self.protocol.scheme(), self.authority())
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

/// A target paired with the verdict of its single probe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub target: ProbeTarget,
    pub reachable: bool,
}

impl ProbeOutcome {
    pub fn new(target: ProbeTarget, reachable: bool) -> Self {
        Self { target, reachable }
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
