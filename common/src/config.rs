use std::collections::HashMap;
use std::time::Duration;

use tracing::warn;

use crate::network::spec::ProbeSpec;

pub const DEFAULT_CONCURRENCY: usize = 20;
pub const DEFAULT_CONCURRENCY_HIGH: usize = 1000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_TIMEOUT_HIGH: Duration = Duration::from_millis(120_000);
pub const DEFAULT_METHOD: &str = "GET";

const LARGE: &[u16] = &[
    81, 591, 2082, 2087, 2095, 2096, 3000, 8000, 8001, 8008, 8080, 8083, 8443, 8834, 8888,
];

const XLARGE: &[u16] = &[
    81, 300, 591, 593, 832, 981, 1010, 1311, 2082, 2087, 2095, 2096, 2480, 3000, 3128, 3333, 4243,
    4567, 4711, 4712, 4993, 5000, 5104, 5108, 5800, 6543, 7000, 7396, 7474, 8000, 8001, 8008, 8014,
    8042, 8069, 8080, 8081, 8088, 8090, 8091, 8118, 8123, 8172, 8222, 8243, 8280, 8281, 8333, 8443,
    8500, 8834, 8880, 8888, 8983, 9000, 9043, 9060, 9080, 9090, 9091, 9200, 9443, 9800, 9981,
    12443, 16080, 18091, 18092, 20720, 28017,
];

/// Named port lists a bare hostname can be expanded into.
#[derive(Clone, Debug, Default)]
pub struct PortSets {
    sets: HashMap<String, Vec<u16>>,
}

impl PortSets {
    /// The `large` and `xlarge` (also `extra-large`) presets.
    pub fn builtin() -> Self {
        let mut sets = Self::default();
        sets.insert("large", LARGE.to_vec());
        sets.insert("xlarge", XLARGE.to_vec());
        sets.insert("extra-large", XLARGE.to_vec());
        sets
    }

    pub fn insert(&mut self, name: impl Into<String>, ports: Vec<u16>) {
        self.sets.insert(name.into(), ports);
    }

    pub fn get(&self, name: &str) -> Option<&[u16]> {
        self.sets.get(name).map(Vec::as_slice)
    }
}

/// What a tier does with a target once its HTTPS probe has finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Stop after the first probe.
    None,
    /// Retry the same host:port over plain HTTP. With `prefer_https` the
    /// HTTP attempt only happens when HTTPS failed.
    ToHttp { prefer_https: bool },
}

/// Settings of one worker tier, or of one stage within a tier.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Number of concurrent workers.
    pub workers: usize,
    /// Connect and whole-request timeout of every probe.
    pub timeout: Duration,
    pub method: String,
    /// Self-signed and otherwise invalid certificates still count as a live
    /// responder.
    pub accept_invalid_certs: bool,
    pub fallback: FallbackPolicy,
}

impl PoolConfig {
    /// Splits a tier into its HTTPS and HTTP stages.
    ///
    /// An odd worker count leaves the HTTP stage one worker short. The HTTP
    /// stage is the end of the fallback chain and never falls back itself.
    pub fn split(&self) -> (PoolConfig, PoolConfig) {
        let http_workers: usize = self.workers / 2;

        let https = PoolConfig {
            workers: self.workers - http_workers,
            ..self.clone()
        };
        let http = PoolConfig {
            workers: http_workers,
            fallback: FallbackPolicy::None,
            ..self.clone()
        };

        (https, http)
    }
}

/// Runtime configuration of a probing run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Workers of the fast tier, split between its HTTPS and HTTP stages.
    pub concurrency: usize,
    /// Workers of the patient (long timeout, HTTPS only) tier.
    pub concurrency_high: usize,
    pub timeout: Duration,
    pub timeout_high: Duration,
    pub method: String,
    /// Additional probes applied to every hostname, in order.
    pub probes: Vec<ProbeSpec>,
    /// Skips the bare `host` probe (https:443 with http:80 fallback).
    pub skip_default: bool,
    /// Only try plain HTTP when HTTPS failed.
    pub prefer_https: bool,
    pub port_sets: PortSets,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            concurrency_high: DEFAULT_CONCURRENCY_HIGH,
            timeout: DEFAULT_TIMEOUT,
            timeout_high: DEFAULT_TIMEOUT_HIGH,
            method: DEFAULT_METHOD.to_string(),
            probes: Vec::new(),
            skip_default: false,
            prefer_https: false,
            port_sets: PortSets::builtin(),
        }
    }
}

impl Config {
    /// Parses raw `-p` values against the configured port sets.
    ///
    /// Malformed values are skipped, they never abort a run.
    pub fn with_probe_args<S: AsRef<str>>(mut self, raw: &[S]) -> Self {
        for value in raw {
            match ProbeSpec::parse(value.as_ref(), &self.port_sets) {
                Ok(spec) => self.probes.push(spec),
                Err(e) => warn!("Skipping probe: {e}"),
            }
        }
        self
    }

    pub fn fast_pool(&self) -> PoolConfig {
        PoolConfig {
            workers: self.concurrency,
            timeout: self.timeout,
            method: self.method.clone(),
            accept_invalid_certs: true,
            fallback: FallbackPolicy::ToHttp {
                prefer_https: self.prefer_https,
            },
        }
    }

    pub fn patient_pool(&self) -> PoolConfig {
        PoolConfig {
            workers: self.concurrency_high,
            timeout: self.timeout_high,
            method: self.method.clone(),
            accept_invalid_certs: true,
            fallback: FallbackPolicy::None,
        }
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
