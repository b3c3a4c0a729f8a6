//! # Probing Pipeline
//!
//! Wires expansion, stages and aggregators together:
//!
//! ```text
//!            ┌────────────┐  fallback  ┌───────────┐
//!   input ─┬▶│ fast-https │──────────▶ │ fast-http │
//!          │ └─────┬──────┘     ▲      └─────┬─────┘
//!          ├───────┼─ http:port ┘            │
//!          │       └────────────┬────────────┘
//!          │                    ▼
//!          │               fast output ───┐
//!          │                              ├──▶ sink
//!          └▶ patient ──▶ patient output ─┘
//! ```
//!
//! The input reader owns the senders of the three input queues and drops them
//! when input ends. Every stage owns the senders of its downstream queues, so
//! each queue closes once everything upstream of it has drained and the run
//! terminates without explicit shutdown signals.

use std::io;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use probr_common::config::{Config, PoolConfig};
use probr_common::network::target::{Protocol, ProbeTarget};
use probr_common::probe::Prober;
use probr_protocols::HttpProber;

use crate::aggregate::{self, OutputSink, Tally};
use crate::expand;
use crate::pool;
use crate::stage::Stage;

/// What a finished run did.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Input lines read.
    pub hosts: usize,
    /// Targets accepted by an input queue, HTTPS targets count once per tier.
    pub submitted: usize,
    /// Targets handled by all stages, fallback probes included.
    pub probed: usize,
    pub fast: Tally,
    pub patient: Tally,
    /// Read error that ended input processing early, if any.
    pub input_error: Option<io::Error>,
}

impl RunSummary {
    pub fn reachable(&self) -> usize {
        self.fast.reachable + self.patient.reachable
    }
}

pub struct Pipeline {
    config: Config,
    fast: Arc<dyn Prober>,
    patient: Arc<dyn Prober>,
}

impl Pipeline {
    pub fn new(config: Config, fast: Arc<dyn Prober>, patient: Arc<dyn Prober>) -> Self {
        Self {
            config,
            fast,
            patient,
        }
    }

    /// Builds one HTTP client per tier from `config`.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let fast: HttpProber =
            HttpProber::new(&config.fast_pool()).context("creating fast tier client")?;
        let patient: HttpProber =
            HttpProber::new(&config.patient_pool()).context("creating patient tier client")?;

        Ok(Self::new(config, Arc::new(fast), Arc::new(patient)))
    }

    /// Probes every hostname read from `input` and writes reachable URLs to
    /// `sink`. Returns once all probes have finished and all output has been
    /// written.
    pub async fn run<R>(&self, input: R, sink: Arc<dyn OutputSink>) -> anyhow::Result<RunSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        let (fast_https_cfg, fast_http_cfg) = self.config.fast_pool().split();
        let patient_cfg: PoolConfig = self.config.patient_pool();

        let fast_https = Stage::new(
            "fast-https",
            Protocol::Https,
            &fast_https_cfg,
            Arc::clone(&self.fast),
        );
        let fast_http = Stage::new(
            "fast-http",
            Protocol::Http,
            &fast_http_cfg,
            Arc::clone(&self.fast),
        );
        let patient = Stage::new(
            "patient",
            Protocol::Https,
            &patient_cfg,
            Arc::clone(&self.patient),
        );

        info!(
            "Probing with {} + {} fast workers and {} patient workers",
            fast_https.workers(),
            fast_http.workers(),
            patient.workers()
        );

        let (fast_https_tx, fast_https_queue) = pool::queue::<ProbeTarget>(fast_https.workers());
        let (fast_http_tx, fast_http_queue) = pool::queue::<ProbeTarget>(fast_http.workers());
        let (patient_tx, patient_queue) = pool::queue::<ProbeTarget>(patient.workers());
        let (fast_out_tx, fast_out_queue) =
            pool::queue(fast_https.workers() + fast_http.workers());
        let (patient_out_tx, patient_out_queue) = pool::queue(patient.workers());

        let fast_output = tokio::spawn(aggregate::aggregate("fast", fast_out_queue, Arc::clone(&sink)));
        let patient_output = tokio::spawn(aggregate::aggregate("patient", patient_out_queue, sink));

        let fast_https_done =
            fast_https.spawn(fast_https_queue, fast_out_tx.clone(), Some(fast_http_tx.clone()));
        let fast_http_done = fast_http.spawn(fast_http_queue, fast_out_tx, None);
        let patient_done = patient.spawn(patient_queue, patient_out_tx, None);

        let feeder = Feeder {
            fast_https: fast_https_tx,
            fast_http: fast_http_tx,
            patient: patient_tx,
        };
        let report: FeedReport = self.feed(input, feeder).await;

        if let Some(e) = &report.input_error {
            error!("failed to read input: {e}");
        }
        debug!(
            "Input finished: {} hosts, {} targets submitted",
            report.hosts, report.submitted
        );

        let (https_probed, http_probed, patient_probed) = tokio::join!(
            fast_https_done.wait(),
            fast_http_done.wait(),
            patient_done.wait()
        );

        let fast: Tally = fast_output.await.context("fast output task failed")?;
        let patient: Tally = patient_output.await.context("patient output task failed")?;

        let summary = RunSummary {
            hosts: report.hosts,
            submitted: report.submitted,
            probed: https_probed + http_probed + patient_probed,
            fast,
            patient,
            input_error: report.input_error,
        };

        info!(
            "{} probes finished, {} reachable URLs",
            summary.probed,
            summary.reachable()
        );

        Ok(summary)
    }

    /// Reads hostnames until input ends or the reader fails. Dropping `feeder`
    /// at the end closes the three input queues.
    async fn feed<R>(&self, mut input: R, feeder: Feeder) -> FeedReport
    where
        R: AsyncBufRead + Unpin,
    {
        let mut report: FeedReport = FeedReport::default();
        let mut line: Vec<u8> = Vec::new();

        loop {
            line.clear();
            match input.read_until(b'\n', &mut line).await {
                Ok(0) => break,
                Ok(_) => {
                    report.hosts += 1;
                    let host: String = expand::normalize(&line);
                    for target in expand::expand(&host, &self.config) {
                        report.submitted += feeder.submit(target).await;
                    }
                }
                Err(e) => {
                    report.input_error = Some(e);
                    break;
                }
            }
        }

        report
    }
}

#[derive(Default)]
struct FeedReport {
    hosts: usize,
    submitted: usize,
    input_error: Option<io::Error>,
}

/// Producer side of the three input queues.
struct Feeder {
    fast_https: mpsc::Sender<ProbeTarget>,
    fast_http: mpsc::Sender<ProbeTarget>,
    patient: mpsc::Sender<ProbeTarget>,
}

impl Feeder {
    /// Routes a target and returns how many queues accepted it.
    async fn submit(&self, target: ProbeTarget) -> usize {
        if expand::reaches_patient_tier(&target) {
            let fast: usize = Self::send(&self.fast_https, target.clone()).await;
            fast + Self::send(&self.patient, target).await
        } else {
            Self::send(&self.fast_http, target).await
        }
    }

    async fn send(tx: &mpsc::Sender<ProbeTarget>, target: ProbeTarget) -> usize {
        match tx.send(target).await {
            Ok(()) => 1,
            Err(mpsc::error::SendError(target)) => {
                warn!("Queue closed, dropping {target}");
                0
            }
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
