use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::models::{Status, StatusId};

pub struct SqliteStore {
    connection: rusqlite::Connection,
}

impl SqliteStore {
    pub fn new(database_path: &Path) -> anyhow::Result<Self> {
        Self::from_connection(rusqlite::Connection::open(database_path)?)
    }

    /// A store that lives only as long as the handle. Used by tests.
    pub fn in_memory() -> anyhow::Result<Self> {
        Self::from_connection(rusqlite::Connection::open_in_memory()?)
    }

    fn from_connection(connection: rusqlite::Connection) -> anyhow::Result<Self> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS statuses (
                    id TEXT PRIMARY KEY,
                    created_at INTEGER NOT NULL,
                    body TEXT NOT NULL
                )",
            (),
        )?;
        Ok(Self { connection })
    }

    pub fn insert_status(&self, status: &Status) -> anyhow::Result<usize> {
        let body = serde_json::to_string(&status.fields)?;
        let num_inserted = self.connection.execute(
            "INSERT INTO statuses (id, created_at, body) VALUES (?, ?, ?)",
            params![
                status.id.as_str(),
                status.created_at.timestamp(),
                body.as_str(),
            ],
        )?;
        Ok(num_inserted)
    }

    pub fn created_at_or_before(&self, cutoff: DateTime<Utc>) -> anyhow::Result<Vec<Status>> {
        let mut stmt = self
            .connection
            .prepare("SELECT id, created_at, body FROM statuses WHERE created_at <= ?")?;
        let statuses = stmt
            .query_map([cutoff.timestamp()], |row| {
                let id: String = row.get(0)?;
                let created_at: i64 = row.get(1)?;
                let body: String = row.get(2)?;
                Ok(Status {
                    id: StatusId::new(id),
                    created_at: DateTime::from_timestamp(created_at, 0).unwrap(),
                    fields: serde_json::from_str(&body).unwrap(),
                })
            })?
            .filter_map(Result::ok)
            .collect();
        Ok(statuses)
    }

    pub fn delete(&self, id: &StatusId) -> anyhow::Result<usize> {
        let num_deleted = self
            .connection
            .execute("DELETE FROM statuses WHERE id = ?", (id.as_str(),))?;
        Ok(num_deleted)
    }

    pub fn status_count(&self) -> anyhow::Result<usize> {
        let mut stmt = self.connection.prepare("SELECT COUNT(*) FROM statuses")?;
        let count = stmt.query_row([], |row| row.get(0))?;
        Ok(count)
    }
}
