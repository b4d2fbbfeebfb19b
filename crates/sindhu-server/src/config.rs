//! Server configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `sindhu.toml` in the working directory, then `SINDHU_*` environment
//! variables (`SINDHU_STORAGE=sqlite`, `SINDHU_BIND_ADDRESS=...`).

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// Which catalog store backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-lifetime maps; everything is lost on restart
    Memory,
    /// Durable SQLite file at `database_path`
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub storage: StorageBackend,
    pub database_path: String,
    /// Insert the sample catalog when the store has no products
    pub seed_sample_data: bool,
    pub jwt_secret: String,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    /// Require an admin bearer token for catalog mutations and the inbox
    pub require_admin_auth: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            storage: StorageBackend::Memory,
            database_path: "data/sindhu.db".to_string(),
            seed_sample_data: true,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            admin_username: None,
            admin_password: None,
            require_admin_auth: false,
        }
    }
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let settings = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("storage", "memory")?
            .set_default("database_path", defaults.database_path)?
            .set_default("seed_sample_data", defaults.seed_sample_data)?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("require_admin_auth", defaults.require_admin_auth)?
            .add_source(File::with_name("sindhu").required(false))
            .add_source(Environment::with_prefix("SINDHU"))
            .build()
            .context("Failed to read configuration sources")?;

        settings
            .try_deserialize()
            .context("Invalid server configuration")
    }

    /// Admin credentials to bootstrap, when both halves are set
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (&self.admin_username, &self.admin_password) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_memory_store() {
        let config = ServerConfig::default();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert!(!config.require_admin_auth);
        assert!(config.admin_credentials().is_none());
    }

    #[test]
    fn test_admin_credentials_need_both_halves() {
        let config = ServerConfig {
            admin_username: Some("jombir".to_string()),
            ..ServerConfig::default()
        };
        assert!(config.admin_credentials().is_none());

        let config = ServerConfig {
            admin_password: Some("sindhu".to_string()),
            ..config
        };
        assert_eq!(config.admin_credentials(), Some(("jombir", "sindhu")));
    }
}
