//! Periodic health poller.
//!
//! One task per distinct endpoint URL, each on its own timer, so a slow
//! endpoint never delays the others. A probe that outlives its period
//! causes that endpoint's next tick to be skipped rather than letting
//! two probes for the same URL overlap.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::ProbeError;
use crate::registry::ServiceRegistry;
use crate::status::{HealthStatus, Indicator, StatusStore};

/// One endpoint to probe, passed by value into its scheduled task.
#[derive(Debug, Clone)]
pub struct ProbeTarget {
    pub name: String,
    pub url: String,
}

/// Poller timing knobs.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Time between poll cycles for each endpoint.
    pub period: Duration,
    /// Upper bound on a single probe, applied at the HTTP client.
    pub probe_timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(5),
        }
    }
}

/// Nested body shape published by status-page style health endpoints.
#[derive(Debug, Deserialize)]
struct StatusBody {
    status: StatusFields,
}

#[derive(Debug, Deserialize)]
struct StatusFields {
    indicator: Indicator,
    description: String,
}

/// Maintains [`StatusStore`] as a best-effort mirror of live endpoint
/// health.
pub struct HealthPoller {
    client: reqwest::Client,
    store: Arc<StatusStore>,
    config: PollerConfig,
}

impl HealthPoller {
    pub fn new(store: Arc<StatusStore>, config: PollerConfig) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.probe_timeout)
            .user_agent("watchpost/0.1")
            .build()?;

        Ok(Self { client, store, config })
    }

    /// Probe one endpoint and report its health.
    ///
    /// Never fails past this boundary: every failure mode degrades to a
    /// critical status so readers always have a value.
    pub async fn poll_once(&self, target: &ProbeTarget) -> HealthStatus {
        match self.fetch(target).await {
            Ok(status) => status,
            Err(ProbeError::Status(code)) => HealthStatus::critical("HTTP error", Some(code)),
            Err(ProbeError::Transport(err)) => HealthStatus::critical(err.to_string(), None),
        }
    }

    async fn fetch(&self, target: &ProbeTarget) -> Result<HealthStatus, ProbeError> {
        let response = self.client.get(&target.url).send().await?;
        let code = response.status().as_u16();

        if !response.status().is_success() {
            return Err(ProbeError::Status(code));
        }

        // Tolerant decode: either the body carries the known nested
        // status schema, or a plain 2xx counts as operational.
        match response.json::<StatusBody>().await {
            Ok(body) => Ok(HealthStatus::new(
                body.status.indicator,
                body.status.description,
                Some(code),
            )),
            Err(_) => Ok(HealthStatus::ok("Operational", Some(code))),
        }
    }

    /// Spawn one polling task per distinct registered URL.
    ///
    /// The first tick fires immediately, so every entry leaves
    /// `unknown` after one cycle. Cancellation is observed before each
    /// probe: an in-flight probe finishes and stores its result, but no
    /// new probe starts once the token fires.
    pub fn spawn(self: &Arc<Self>, registry: &ServiceRegistry, token: &CancellationToken) -> Vec<JoinHandle<()>> {
        let mut seen = HashSet::new();
        let mut handles = Vec::new();

        for (name, url) in registry.services() {
            // One status entry and one poll task per URL; a second name
            // for the same URL rides along on the first.
            if !seen.insert(url.to_string()) {
                debug!(name, url, "duplicate URL, sharing existing poll task");
                continue;
            }
            let target = ProbeTarget { name: name.to_string(), url: url.to_string() };
            handles.push(self.spawn_target(target, token.child_token()));
        }

        handles
    }

    fn spawn_target(self: &Arc<Self>, target: ProbeTarget, token: CancellationToken) -> JoinHandle<()> {
        let poller = Arc::clone(self);

        tokio::spawn(async move {
            let mut timer = interval(poller.config.period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = timer.tick() => {}
                }

                let status = poller.poll_once(&target).await;
                debug!(
                    name = %target.name,
                    url = %target.url,
                    indicator = %status.indicator,
                    "probe completed"
                );
                poller.store.record(&target.url, status);
            }
        })
    }

    /// Poll every registered endpoint until the token fires, then join
    /// the per-endpoint tasks.
    pub async fn run(self: Arc<Self>, registry: ServiceRegistry, token: CancellationToken) {
        let handles = self.spawn(&registry, &token);
        for handle in handles {
            if let Err(err) = handle.await {
                warn!("poll task ended abnormally: {err}");
            }
        }
    }
}
