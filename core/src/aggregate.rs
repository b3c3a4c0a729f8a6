//! # Result Aggregation
//!
//! Each tier drains its own outcome queue into a shared [`OutputSink`]. A
//! reachable target is written as soon as it arrives, one URL per line;
//! unreachable targets are only counted.

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};
use tracing::error;

use probr_common::network::target::ProbeOutcome;

use crate::pool::WorkQueue;

/// Destination of reachable URLs.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Writes one URL as a complete line.
    async fn emit(&self, url: &str) -> io::Result<()>;
}

/// Writes one URL per line to an async writer, flushing after every line.
///
/// Both tiers share one sink, the lock keeps their lines from interleaving.
pub struct LineSink<W> {
    writer: tokio::sync::Mutex<W>,
}

impl<W> LineSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: tokio::sync::Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

/// The CLI's sink.
pub type StdoutSink = LineSink<Stdout>;

impl LineSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait]
impl<W> OutputSink for LineSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn emit(&self, url: &str) -> io::Result<()> {
        let line: String = format!("{url}\n");
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await
    }
}

/// Collects URLs in memory, in arrival order.
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl OutputSink for MemorySink {
    async fn emit(&self, url: &str) -> io::Result<()> {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(url.to_string()),
            Err(poisoned) => poisoned.into_inner().push(url.to_string()),
        }
        Ok(())
    }
}

/// Per-tier count of verdicts seen by an aggregator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub reachable: usize,
    pub unreachable: usize,
}

impl Tally {
    pub fn probes(&self) -> usize {
        self.reachable + self.unreachable
    }
}

/// Drains `outcomes` until every producer is gone.
///
/// A failing sink is reported once; the queue keeps being drained so that
/// workers never block on a dead output.
pub async fn aggregate(
    tier: &'static str,
    outcomes: WorkQueue<ProbeOutcome>,
    sink: Arc<dyn OutputSink>,
) -> Tally {
    let mut tally: Tally = Tally::default();
    let mut sink_failed: bool = false;

    while let Some(outcome) = outcomes.next().await {
        if !outcome.reachable {
            tally.unreachable += 1;
            continue;
        }

        tally.reachable += 1;
        if sink_failed {
            continue;
        }

        if let Err(e) = sink.emit(&outcome.target.url()).await {
            error!("{tier}: failed to write output: {e}");
            sink_failed = true;
        }
    }

    tally
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
