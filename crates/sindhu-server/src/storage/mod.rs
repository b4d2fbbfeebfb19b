//! Storage layer
//!
//! Two interchangeable catalog stores: SQLite (embedded, durable) and
//! DashMap (in-memory, ephemeral). Which one runs is decided once at startup.

pub mod db;
pub mod memory;
pub mod seed;

pub use db::SqliteStore;
pub use memory::MemoryStore;

use crate::config::{ServerConfig, StorageBackend};
use anyhow::{Context, Result};
use sindhu_core::CatalogStore;
use std::sync::Arc;

/// Construct the configured backend
pub async fn open(config: &ServerConfig) -> Result<Arc<dyn CatalogStore>> {
    let store: Arc<dyn CatalogStore> = match config.storage {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory catalog store (data is lost on restart)");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::Sqlite => Arc::new(
            SqliteStore::connect(&config.database_path)
                .await
                .context("Failed to initialize database")?,
        ),
    };
    Ok(store)
}
