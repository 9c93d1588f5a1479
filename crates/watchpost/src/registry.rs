//! Static service registry loaded once at startup.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// On-disk shape of the service table:
///
/// ```toml
/// [services]
/// github = "https://www.githubstatus.com/api/v2/status.json"
/// ```
#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    services: BTreeMap<String, String>,
}

/// Immutable mapping of logical service name to endpoint URL.
///
/// Loaded once before any poller starts and never mutated afterwards.
/// Status entries are keyed by URL, so two names sharing one URL share
/// one status entry.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: BTreeMap<String, String>,
}

impl ServiceRegistry {
    /// Load the `[services]` table from a TOML file.
    ///
    /// A file without a `[services]` section yields an empty registry;
    /// a missing or unparsable file is a [`ConfigError`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Parse the `[services]` table from raw TOML. Hosts that layer
    /// their own sections on the same file parse it once and hand the
    /// text here.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        let file: RegistryFile = toml::from_str(raw)?;
        Ok(Self { services: file.services })
    }

    /// Build a registry from in-memory pairs. Intended for tests and
    /// embedded hosts.
    pub fn from_pairs<N, U>(pairs: impl IntoIterator<Item = (N, U)>) -> Self
    where
        N: Into<String>,
        U: Into<String>,
    {
        Self {
            services: pairs
                .into_iter()
                .map(|(name, url)| (name.into(), url.into()))
                .collect(),
        }
    }

    /// Iterate registered (name, url) pairs in name order.
    pub fn services(&self) -> impl Iterator<Item = (&str, &str)> {
        self.services.iter().map(|(name, url)| (name.as_str(), url.as_str()))
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
