//! # deps-config
//!
//! Layered configuration loading for depsmanager using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DEPSMGR_*` prefix, `__` as separator)
//! 2. Project-level `.depsmanager/config.toml`
//! 3. User-level `~/.config/depsmanager/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DEPSMGR_DEPS_DEV__ADDRESS` -> `deps_dev.address`,
//! `DEPSMGR_DATABASE__PATH` -> `database.path`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use deps_config::DepsConfig;
//!
//! let config = DepsConfig::load_with_dotenv().expect("config");
//! println!("metadata service: {}", config.deps_dev.base_url());
//! ```

mod database;
mod deps_dev;
mod error;
mod ingest;

pub use database::DatabaseConfig;
pub use deps_dev::DepsDevConfig;
pub use error::ConfigError;
pub use ingest::IngestConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "DEPSMGR_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DepsConfig {
    #[serde(default)]
    pub deps_dev: DepsDevConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

impl DepsConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        // A missing .env is not an error.
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".depsmanager/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values the rest of the system cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("deps_dev.address", self.deps_dev.address.trim()),
            ("deps_dev.ecosystem", self.deps_dev.ecosystem.trim()),
            ("database.path", self.database.path.trim()),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }
        if !self.deps_dev.address.starts_with("http://")
            && !self.deps_dev.address.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                field: "deps_dev.address".to_string(),
                reason: format!("'{}' is not an http(s) URL", self.deps_dev.address),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("depsmanager").join("config.toml"))
    }
}
