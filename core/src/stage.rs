//! # Probe Stages
//!
//! A stage is a [`WorkerPool`] whose handler probes every target over one
//! protocol with one prober, reports each verdict and applies the fallback
//! policy. Both tiers are built from stages:
//!
//! * **fast**: an HTTPS stage forwarding fallback candidates into an HTTP
//!   stage, both with the short timeout.
//! * **patient**: a single HTTPS stage with the long timeout and no
//!   fallback, so it never speaks plain HTTP.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{trace, warn};

use probr_common::config::{FallbackPolicy, PoolConfig};
use probr_common::network::target::{Protocol, ProbeOutcome, ProbeTarget};
use probr_common::probe::Prober;

use crate::fallback::{self, Step};
use crate::pool::{PoolHandle, WorkQueue, WorkerPool};

pub struct Stage {
    pool: WorkerPool,
    protocol: Protocol,
    prober: Arc<dyn Prober>,
    fallback: FallbackPolicy,
}

impl Stage {
    /// Takes its worker count and fallback policy from `cfg`. Timeout and
    /// method are already baked into `prober`.
    pub fn new(
        name: &'static str,
        protocol: Protocol,
        cfg: &PoolConfig,
        prober: Arc<dyn Prober>,
    ) -> Self {
        Self {
            pool: WorkerPool::new(name, cfg.workers),
            protocol,
            prober,
            fallback: cfg.fallback,
        }
    }

    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    /// Starts the stage.
    ///
    /// `outcomes` receives one verdict per probe. `forward` receives HTTP
    /// fallback candidates; a stage without a fallback policy never uses it.
    /// Both senders are dropped once the last worker exits.
    pub fn spawn(
        self,
        queue: WorkQueue<ProbeTarget>,
        outcomes: mpsc::Sender<ProbeOutcome>,
        forward: Option<mpsc::Sender<ProbeTarget>>,
    ) -> PoolHandle {
        let name: &'static str = self.pool.name();
        let protocol: Protocol = self.protocol;
        let prober: Arc<dyn Prober> = self.prober;
        let policy: FallbackPolicy = self.fallback;

        if policy != FallbackPolicy::None && forward.is_none() {
            warn!("{name}: fallback configured without an HTTP stage, it is ignored");
        }

        self.pool.spawn(queue, move |target: ProbeTarget| {
            let prober: Arc<dyn Prober> = Arc::clone(&prober);
            let outcomes: mpsc::Sender<ProbeOutcome> = outcomes.clone();
            let forward: Option<mpsc::Sender<ProbeTarget>> = forward.clone();

            async move {
                let target: ProbeTarget = target.with_protocol(protocol);
                let reachable: bool = prober.is_listening(&target.url()).await;
                trace!("{name}: {target} -> {reachable}");

                let next: Step = fallback::next_step(policy, reachable);

                if outcomes.send(ProbeOutcome::new(target.clone(), reachable)).await.is_err() {
                    warn!("{name}: output closed, dropping verdict for {target}");
                }

                if let (Step::TryHttp, Some(forward)) = (next, forward) {
                    if forward.send(target.with_protocol(Protocol::Http)).await.is_err() {
                        warn!("{name}: HTTP stage closed, dropping fallback for {target}");
                    }
                }
            }
        })
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
