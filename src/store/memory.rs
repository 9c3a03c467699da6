use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use chrono::{DateTime, Utc};

use crate::models::{Status, StatusId};

/// In-memory status store. Useful for tests and throwaway setups; contents
/// are lost on restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    statuses: Arc<RwLock<HashMap<StatusId, Status>>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn insert(&self, status: Status) {
        self.statuses
            .write()
            .unwrap()
            .insert(status.id.clone(), status);
    }

    pub fn created_at_or_before(&self, cutoff: DateTime<Utc>) -> Vec<Status> {
        self.statuses
            .read()
            .unwrap()
            .values()
            .filter(|status| status.created_at <= cutoff)
            .cloned()
            .collect()
    }

    /// Absent ids are fine; the status may have gone to a concurrent sweep.
    pub fn delete(&self, id: &StatusId) {
        self.statuses.write().unwrap().remove(id);
    }

    pub fn contains(&self, id: &StatusId) -> bool {
        self.statuses.read().unwrap().contains_key(id)
    }

    pub fn status_count(&self) -> usize {
        self.statuses.read().unwrap().len()
    }
}
