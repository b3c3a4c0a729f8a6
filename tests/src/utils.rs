use std::collections::HashSet;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_trait::async_trait;
use probr_common::config::Config;
use probr_common::probe::Prober;
use probr_core::{MemorySink, Pipeline, RunSummary};
use tokio::io::{AsyncBufRead, AsyncRead, ReadBuf};

/// Prober answering from a fixed set of reachable URLs.
pub struct StubProber {
    reachable: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl StubProber {
    pub fn new(reachable: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            reachable: reachable.iter().map(|url| url.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prober for StubProber {
    async fn is_listening(&self, url: &str) -> bool {
        self.calls.lock().unwrap().push(url.to_string());
        self.reachable.contains(url)
    }
}

/// Reader whose every read fails, standing in for a broken stdin.
pub struct FailingReader;

impl AsyncRead for FailingReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "input closed")))
    }
}

pub fn small_config() -> Config {
    Config {
        concurrency: 4,
        concurrency_high: 8,
        ..Config::default()
    }
}

/// Runs the pipeline over `input` and returns the summary with the sorted
/// output lines.
pub async fn run_with<R>(pipeline: Pipeline, input: R) -> anyhow::Result<(RunSummary, Vec<String>)>
where
    R: AsyncBufRead + Unpin,
{
    let sink: Arc<MemorySink> = Arc::new(MemorySink::new());
    let summary: RunSummary = pipeline.run(input, sink.clone()).await?;
    let mut lines: Vec<String> = sink.lines();
    lines.sort();
    Ok((summary, lines))
}

pub async fn run_stubbed(
    config: Config,
    fast: Arc<StubProber>,
    patient: Arc<StubProber>,
    input: &[u8],
) -> (RunSummary, Vec<String>) {
    run_with(Pipeline::new(config, fast, patient), input)
        .await
        .expect("pipeline failed")
}
