use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::Collection;

/// How far back a status must have been created to be eligible for deletion.
pub const DEFAULT_RETENTION_HOURS: i64 = 24;

/// How often the watch loop runs a sweep.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Which store the sweeper talks to.
pub enum StoreBackend {
    Http(url::Url),
    Sqlite(PathBuf),
}

pub struct Configuration {
    base_dir: PathBuf,
    backend: StoreBackend,
    collection: Collection,
    retention: chrono::Duration,
    sweep_interval: Duration,
}

impl Default for Configuration {
    fn default() -> Self {
        let base_dir = default_base_dir();
        let backend = StoreBackend::Sqlite(base_dir.join("statuses.sqlite"));
        Self::new(base_dir, backend)
    }
}

impl Configuration {
    pub fn new(base_dir: PathBuf, backend: StoreBackend) -> Configuration {
        Configuration {
            base_dir,
            backend,
            collection: Collection::from("statuses"),
            retention: chrono::Duration::hours(DEFAULT_RETENTION_HOURS),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    pub fn with_backend(backend: StoreBackend) -> Configuration {
        Self::new(default_base_dir(), backend)
    }

    pub fn with_collection(mut self, collection: Collection) -> Configuration {
        self.collection = collection;
        self
    }

    pub fn with_retention(mut self, retention: chrono::Duration) -> Configuration {
        self.retention = retention;
        self
    }

    pub fn with_sweep_interval(mut self, sweep_interval: Duration) -> Configuration {
        self.sweep_interval = sweep_interval;
        self
    }

    pub async fn init(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.base_dir).await?;
        Ok(())
    }

    pub fn backend(&self) -> &StoreBackend {
        &self.backend
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn retention(&self) -> chrono::Duration {
        self.retention
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }
}

fn default_base_dir() -> PathBuf {
    dirs::data_dir().unwrap_or("/tmp/lowtide".into()).join("lowtide")
}
