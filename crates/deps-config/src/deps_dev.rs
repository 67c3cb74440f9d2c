//! Remote package-metadata service configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_address() -> String {
    "https://api.deps.dev".to_string()
}

fn default_ecosystem() -> String {
    "npm".to_string()
}

/// Default request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("depsmanager/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DepsDevConfig {
    /// Base URL of the metadata service, without a trailing slash.
    #[serde(default = "default_address")]
    pub address: String,

    /// Package ecosystem every lookup is made in.
    #[serde(default = "default_ecosystem")]
    pub ecosystem: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for DepsDevConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            ecosystem: default_ecosystem(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl DepsDevConfig {
    /// Address with any trailing `/` removed, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.address.trim_end_matches('/')
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
