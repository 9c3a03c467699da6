use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::{
    configuration::{Configuration, StoreBackend},
    models::{Status, StatusId},
};

mod http;
mod memory;
mod sqlite;

pub use http::HttpStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A handle to the status store. Opened once at startup and reused for every
/// sweep.
pub enum Store {
    Http(HttpStore),
    Sqlite(Arc<Mutex<SqliteStore>>),
    Memory(MemoryStore),
}

impl Store {
    pub fn from_configuration(config: &Configuration) -> Result<Store> {
        match config.backend() {
            StoreBackend::Http(url) => Ok(Store::Http(HttpStore::new(
                url.clone(),
                config.collection().clone(),
            ))),
            StoreBackend::Sqlite(path) => Ok(Store::sqlite(SqliteStore::new(path)?)),
        }
    }

    pub fn sqlite(store: SqliteStore) -> Store {
        Store::Sqlite(Arc::new(Mutex::new(store)))
    }

    /// All statuses created at or before `cutoff`.
    pub async fn created_at_or_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Status>> {
        match self {
            Store::Http(http) => http.created_at_or_before(cutoff).await,
            Store::Sqlite(sqlite) => sqlite.lock().await.created_at_or_before(cutoff),
            Store::Memory(memory) => Ok(memory.created_at_or_before(cutoff)),
        }
    }

    /// Delete one status. Deleting a status that is already gone is a no-op,
    /// not an error.
    pub async fn delete(&self, id: &StatusId) -> Result<()> {
        match self {
            Store::Http(http) => http.delete(id).await,
            Store::Sqlite(sqlite) => {
                sqlite.lock().await.delete(id)?;
                Ok(())
            }
            Store::Memory(memory) => {
                memory.delete(id);
                Ok(())
            }
        }
    }
}
