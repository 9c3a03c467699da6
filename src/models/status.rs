use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct StatusId(String);

impl Display for StatusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StatusId {
    pub fn new(id: String) -> StatusId {
        StatusId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StatusId {
    fn from(id: &str) -> Self {
        StatusId(id.to_string())
    }
}

/// A story posted to a collection. Only the id and the creation timestamp
/// are inspected; everything else the producer wrote rides along untouched.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Status {
    pub id: StatusId,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Status {
    pub fn new(id: StatusId, created_at: DateTime<Utc>) -> Status {
        Status {
            id,
            created_at,
            fields: serde_json::Map::new(),
        }
    }
}
