//! Health status types and the shared status store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::ServiceRegistry;

/// Three-valued health classification of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Ok,
    Critical,
    Unknown,
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Indicator::Ok => write!(f, "ok"),
            Indicator::Critical => write!(f, "critical"),
            Indicator::Unknown => write!(f, "unknown"),
        }
    }
}

/// Last-known health of one endpoint URL.
///
/// Overwritten in place on every poll cycle; no history is retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Serialized as `status`, the name the dashboard contract uses.
    #[serde(rename = "status")]
    pub indicator: Indicator,
    pub description: String,
    pub checked_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_code: Option<u16>,
}

impl HealthStatus {
    pub fn new(indicator: Indicator, description: impl Into<String>, http_code: Option<u16>) -> Self {
        Self {
            indicator,
            description: description.into(),
            checked_at: Utc::now(),
            http_code,
        }
    }

    /// The seed value every endpoint starts from before its first poll.
    pub fn unknown() -> Self {
        Self::new(Indicator::Unknown, "Checking...", None)
    }

    pub fn ok(description: impl Into<String>, http_code: Option<u16>) -> Self {
        Self::new(Indicator::Ok, description, http_code)
    }

    pub fn critical(description: impl Into<String>, http_code: Option<u16>) -> Self {
        Self::new(Indicator::Critical, description, http_code)
    }
}

/// Shared mutable map of endpoint URL to last-known health.
///
/// Written only by the poller, read by any number of query callers.
/// The key set is fixed at construction from the registry: writes for
/// URLs outside it are ignored, so the store never grows entries the
/// registry does not know about.
#[derive(Debug)]
pub struct StatusStore {
    inner: RwLock<HashMap<String, HealthStatus>>,
}

impl StatusStore {
    /// Seed one `unknown` entry per distinct registered URL.
    pub fn for_registry(registry: &ServiceRegistry) -> Self {
        let inner = registry
            .services()
            .map(|(_, url)| (url.to_string(), HealthStatus::unknown()))
            .collect();
        Self { inner: RwLock::new(inner) }
    }

    /// Overwrite the status of a registered URL. Last write wins.
    pub fn record(&self, url: &str, status: HealthStatus) {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = map.get_mut(url) {
            *entry = status;
        }
    }

    pub fn get(&self, url: &str) -> Option<HealthStatus> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(url).cloned()
    }

    /// Point-in-time copy of the whole map. Taken under the read lock,
    /// so a caller never sees a partially-updated record.
    pub fn snapshot(&self) -> HashMap<String, HealthStatus> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.clone()
    }
}
