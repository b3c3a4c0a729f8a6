//! # HTTP(S) Probe Executor
//!
//! Issues exactly one request per probe and reports whether *any* response
//! came back. Status codes are irrelevant: a `404` or a `302` still proves a
//! live HTTP responder. Only transport failures (refused, timed out, TLS or
//! DNS errors) and unbuildable requests count as unreachable.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONNECTION;
use reqwest::{redirect, Client, Method};
use thiserror::Error;
use tracing::{trace, warn};

use probr_common::config::PoolConfig;
use probr_common::probe::Prober;

const TCP_KEEPALIVE: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Reachability prober backed by a dedicated `reqwest` client.
///
/// The client is read-only after construction and is shared by every worker
/// of a tier.
pub struct HttpProber {
    client: Client,
    method: Option<Method>,
}

impl HttpProber {
    pub fn new(cfg: &PoolConfig) -> Result<Self, ProbeError> {
        let client: Client = Client::builder()
            .timeout(cfg.timeout)
            .connect_timeout(cfg.timeout)
            .danger_accept_invalid_certs(cfg.accept_invalid_certs)
            // a redirect already proves a responder, `Location` is never requested
            .redirect(redirect::Policy::none())
            .pool_max_idle_per_host(0)
            .tcp_keepalive(TCP_KEEPALIVE)
            .no_proxy()
            .user_agent(concat!("probr/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let method: Option<Method> = match Method::from_bytes(cfg.method.as_bytes()) {
            Ok(method) => Some(method),
            Err(e) => {
                warn!("Invalid HTTP method '{}': {e}, every probe will fail", cfg.method);
                None
            }
        };

        Ok(Self { client, method })
    }

    /// Sends one request to `url` and drains the response body.
    pub async fn probe(&self, url: &str) -> bool {
        let Some(method) = self.method.clone() else {
            return false;
        };

        let result = self
            .client
            .request(method, url)
            .header(CONNECTION, "close")
            .send()
            .await;

        let mut response = match result {
            Ok(response) => response,
            Err(e) => {
                trace!("{url} unreachable: {e}");
                return false;
            }
        };

        trace!("{url} answered {}", response.status());

        loop {
            match response.chunk().await {
                Ok(Some(_)) => continue,
                Ok(None) => break,
                Err(e) => {
                    trace!("{url} body aborted: {e}");
                    break;
                }
            }
        }

        true
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn is_listening(&self, url: &str) -> bool {
        self.probe(url).await
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
