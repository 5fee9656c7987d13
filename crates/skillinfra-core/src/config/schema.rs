//! Settings schema for skillinfra.toml
//!
//! The same structure is used for the global file
//! (`~/.config/skillinfra/skillinfra.toml`) and the project file
//! (`./skillinfra.toml`); project values win on merge.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default management API endpoint.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.amazonalexa.com";

/// Root settings structure for skillinfra.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    /// Management API connection
    #[serde(default)]
    pub api: ApiSettings,

    /// External deployer executables keyed by infrastructure type
    #[serde(default)]
    pub delegates: BTreeMap<String, DelegateCommandEntry>,
}

/// Management API connection settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ApiSettings {
    /// Base URL; defaults to [`DEFAULT_API_ENDPOINT`]
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bearer token; falls back to `ASK_ACCESS_TOKEN`
    #[serde(default)]
    pub token: Option<String>,
}

/// Executable implementing a deploy delegate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DelegateCommandEntry {
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_endpoint(&self) -> &str {
        self.api.endpoint.as_deref().unwrap_or(DEFAULT_API_ENDPOINT)
    }

    /// Overlay `other` on top of `self`.
    pub fn merge(&mut self, other: Settings) {
        if other.api.endpoint.is_some() {
            self.api.endpoint = other.api.endpoint;
        }
        if other.api.token.is_some() {
            self.api.token = other.api.token;
        }
        self.delegates.extend(other.delegates);
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(endpoint) = &self.api.endpoint {
            let parsed = url::Url::parse(endpoint)
                .map_err(|e| anyhow::anyhow!("Invalid api.endpoint '{}': {}", endpoint, e))?;
            if parsed.cannot_be_a_base() {
                anyhow::bail!("Invalid api.endpoint '{}': not a base URL", endpoint);
            }
        }
        for (infra_type, entry) in &self.delegates {
            if entry.command.trim().is_empty() {
                anyhow::bail!("Delegate '{}' has an empty command", infra_type);
            }
        }
        Ok(())
    }
}
