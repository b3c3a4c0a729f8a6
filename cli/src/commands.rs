use std::time::Duration;

use clap::{ArgAction, Parser};
use probr_common::config::{self, Config};

#[derive(Parser, Debug)]
#[command(name = "probr")]
#[command(about = "Finds live HTTP and HTTPS servers for hostnames read from stdin.")]
#[command(version)]
pub struct CommandLine {
    /// Concurrency of the fast tier, split between HTTPS and HTTP probes
    #[arg(short = 'c', long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(2..))]
    pub concurrency: u32,

    /// Additional probe: proto:port, or a port set (large, xlarge)
    #[arg(short = 'p', long = "probe", value_name = "SPEC")]
    pub probes: Vec<String>,

    /// Skip the default probes (http:80 and https:443)
    #[arg(short = 's', long)]
    pub skip_default: bool,

    /// Timeout of the fast tier in milliseconds
    #[arg(short = 't', long, value_name = "MS", default_value_t = 10_000)]
    pub timeout: u64,

    /// Only try plain HTTP if HTTPS fails
    #[arg(long)]
    pub prefer_https: bool,

    /// HTTP method to use
    #[arg(long, default_value = config::DEFAULT_METHOD)]
    pub method: String,

    /// Concurrency of the patient tier (long timeout, HTTPS only)
    #[arg(short = 'C', long, visible_alias = "ch", default_value_t = 1000, value_parser = clap::value_parser!(u32).range(1..))]
    pub concurrency_high: u32,

    /// Timeout of the patient tier in milliseconds
    #[arg(short = 'T', long, visible_alias = "th", value_name = "MS", default_value_t = 120_000)]
    pub timeout_high: u64,

    /// More diagnostics on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only report errors on stderr
    #[arg(short, long)]
    pub quiet: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        Config {
            concurrency: self.concurrency as usize,
            concurrency_high: self.concurrency_high as usize,
            timeout: Duration::from_millis(self.timeout),
            timeout_high: Duration::from_millis(self.timeout_high),
            method: self.method.clone(),
            skip_default: self.skip_default,
            prefer_https: self.prefer_https,
            ..Config::default()
        }
        .with_probe_args(self.probes.as_slice())
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
