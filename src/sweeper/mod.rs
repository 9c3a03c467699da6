use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use futures::future::try_join_all;
use tracing::{error, info};

use crate::{
    configuration::{DEFAULT_RETENTION_HOURS, DEFAULT_SWEEP_INTERVAL},
    store::Store,
};

/// What a completed sweep did.
#[derive(Debug)]
pub struct SweepOutcome {
    /// Number of statuses that matched the cutoff and were deleted.
    pub deleted: usize,
    /// The eligibility threshold the sweep ran with.
    pub cutoff: DateTime<Utc>,
}

#[derive(bon::Builder)]
pub struct Sweeper {
    store: Store,
    #[builder(default = Duration::hours(DEFAULT_RETENTION_HOURS))]
    retention: Duration,
    #[builder(default = DEFAULT_SWEEP_INTERVAL)]
    interval: std::time::Duration,
}

impl Sweeper {
    /// Run one sweep against the current wall clock.
    pub async fn sweep(&self) -> Result<SweepOutcome> {
        self.sweep_at(Utc::now()).await
    }

    /// Run one sweep as if invoked at `now`.
    ///
    /// Statuses created at or before `now - retention` at query time are
    /// deleted. A status that crosses the threshold while deletes are in
    /// flight is left for the next run.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> Result<SweepOutcome> {
        let cutoff = now - self.retention;
        let expired = self.store.created_at_or_before(cutoff).await?;

        let delete_futures = expired.iter().map(|status| self.store.delete(&status.id));
        try_join_all(delete_futures).await?;

        info!("Deleted {} expired statuses", expired.len());
        Ok(SweepOutcome {
            deleted: expired.len(),
            cutoff,
        })
    }

    /// Number of statuses currently eligible, without deleting anything.
    pub async fn pending(&self) -> Result<usize> {
        let cutoff = Utc::now() - self.retention;
        let expired = self.store.created_at_or_before(cutoff).await?;
        Ok(expired.len())
    }

    /// Sweep on a fixed interval, forever. A failed sweep is logged and
    /// retried by the next tick.
    pub async fn watch(&self) -> Result<()> {
        let mut interval = tokio::time::interval(self.interval);
        loop {
            interval.tick().await;
            if let Err(e) = self.sweep().await {
                error!("Sweep failed: {:?}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        models::{Status, StatusId},
        store::MemoryStore,
    };

    use super::*;

    fn status(id: &str, created_at: DateTime<Utc>) -> Status {
        Status::new(StatusId::from(id), created_at)
    }

    fn sweeper_over(memory: MemoryStore) -> Sweeper {
        Sweeper::builder().store(Store::Memory(memory)).build()
    }

    #[tokio::test]
    async fn deletes_old_statuses_and_keeps_fresh_ones() {
        let memory = MemoryStore::new();
        let now = Utc::now();
        memory.insert(status("a", now - Duration::hours(30)));
        memory.insert(status("b", now - Duration::hours(23)));

        let outcome = sweeper_over(memory.clone()).sweep_at(now).await.unwrap();

        assert_eq!(outcome.deleted, 1);
        assert!(!memory.contains(&StatusId::from("a")));
        assert!(memory.contains(&StatusId::from("b")));
    }

    #[tokio::test]
    async fn the_threshold_is_inclusive() {
        let memory = MemoryStore::new();
        let now = Utc::now();
        memory.insert(status("on-the-line", now - Duration::hours(24)));
        memory.insert(status(
            "a-second-newer",
            now - Duration::hours(24) + Duration::seconds(1),
        ));

        let outcome = sweeper_over(memory.clone()).sweep_at(now).await.unwrap();

        assert_eq!(outcome.deleted, 1);
        assert!(!memory.contains(&StatusId::from("on-the-line")));
        assert!(memory.contains(&StatusId::from("a-second-newer")));
    }

    #[tokio::test]
    async fn an_empty_collection_still_sweeps_successfully() {
        let memory = MemoryStore::new();

        let outcome = sweeper_over(memory).sweep_at(Utc::now()).await.unwrap();

        assert_eq!(outcome.deleted, 0);
    }

    #[tokio::test]
    async fn sweeping_again_immediately_deletes_nothing_new() {
        let memory = MemoryStore::new();
        let now = Utc::now();
        memory.insert(status("old", now - Duration::hours(48)));

        let sweeper = sweeper_over(memory);
        let first = sweeper.sweep_at(now).await.unwrap();
        let second = sweeper.sweep_at(now).await.unwrap();

        assert_eq!(first.deleted, 1);
        assert_eq!(second.deleted, 0);
    }

    #[tokio::test]
    async fn deletes_every_match_before_reporting() {
        let memory = MemoryStore::new();
        let now = Utc::now();
        for i in 0..100 {
            memory.insert(status(&format!("status-{i}"), now - Duration::hours(25)));
        }

        let outcome = sweeper_over(memory.clone()).sweep_at(now).await.unwrap();

        assert_eq!(outcome.deleted, 100);
        assert_eq!(memory.status_count(), 0);
    }

    #[tokio::test]
    async fn the_cutoff_is_the_retention_window_before_invocation() {
        let now = Utc::now();

        let outcome = sweeper_over(MemoryStore::new())
            .sweep_at(now)
            .await
            .unwrap();

        assert_eq!(outcome.cutoff, now - Duration::hours(24));
    }

    #[tokio::test]
    async fn a_shorter_retention_window_is_respected() {
        let memory = MemoryStore::new();
        let now = Utc::now();
        memory.insert(status("two-hours-old", now - Duration::hours(2)));

        let sweeper = Sweeper::builder()
            .store(Store::Memory(memory.clone()))
            .retention(Duration::hours(1))
            .build();
        let outcome = sweeper.sweep_at(now).await.unwrap();

        assert_eq!(outcome.deleted, 1);
        assert_eq!(memory.status_count(), 0);
    }
}
