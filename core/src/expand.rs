//! # Probe Expansion
//!
//! Turns one input hostname into the targets submitted to the tiers.
//!
//! The protocol of an expanded target decides its route: HTTPS targets go to
//! both the fast tier (with HTTP fallback) and the patient tier, HTTP targets
//! only reach the fast tier's HTTP stage.

use probr_common::config::Config;
use probr_common::network::spec::ProbeSpec;
use probr_common::network::target::{Protocol, ProbeTarget};

/// Expands `host` according to the default probe and the configured specs,
/// in that order. The host is used verbatim, even when empty.
pub fn expand(host: &str, cfg: &Config) -> Vec<ProbeTarget> {
    let mut targets: Vec<ProbeTarget> = Vec::new();

    if !cfg.skip_default {
        targets.push(ProbeTarget::https(host, None));
    }

    for spec in &cfg.probes {
        match spec {
            ProbeSpec::Preset { ports, .. } => {
                targets.extend(ports.iter().map(|port| ProbeTarget::https(host, Some(*port))));
            }
            ProbeSpec::Explicit { protocol, port } => {
                targets.push(ProbeTarget::new(*protocol, host, Some(*port)));
            }
        }
    }

    targets
}

/// Normalizes a raw input line into a hostname.
///
/// The trailing `\n` or `\r\n` is stripped. Bytes that are not valid UTF-8
/// are replaced rather than rejected, so one garbled line never ends input.
pub fn normalize(line: &[u8]) -> String {
    let line: &[u8] = line.strip_suffix(b"\n").unwrap_or(line);
    let line: &[u8] = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).to_lowercase()
}

/// Whether a target is also probed by the patient tier.
pub fn reaches_patient_tier(target: &ProbeTarget) -> bool {
    target.protocol() == Protocol::Https
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
