use anyhow::Result;
use chrono::{DateTime, Utc};
use failsafe::futures::CircuitBreaker;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Collection, Status, StatusId};

#[derive(Deserialize, Serialize)]
pub struct StatusesResponse {
    pub statuses: Vec<Status>,
}

pub struct HttpStore {
    url: url::Url,
    collection: Collection,
    client: reqwest::Client,
    circuit_breaker: failsafe::StateMachine<
        failsafe::failure_policy::OrElse<
            failsafe::failure_policy::SuccessRateOverTimeWindow<failsafe::backoff::EqualJittered>,
            failsafe::failure_policy::ConsecutiveFailures<failsafe::backoff::EqualJittered>,
        >,
        (),
    >,
}

impl HttpStore {
    pub fn new(url: url::Url, collection: Collection) -> HttpStore {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap();
        let circuit_breaker = failsafe::Config::new().build();
        HttpStore {
            url,
            collection,
            client,
            circuit_breaker,
        }
    }

    pub fn url(&self) -> &url::Url {
        &self.url
    }

    pub async fn created_at_or_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Status>> {
        let url = self
            .url
            .join(&format!("collections/{}/statuses", self.collection))?;
        debug!("Querying {} for statuses up to {}", url.as_str(), cutoff);
        let request_future = self
            .client
            .get(url.as_str())
            .query(&[("createdAtOrBefore", cutoff.to_rfc3339())])
            .send();
        let response = self.circuit_breaker.call(request_future).await?;
        let response: StatusesResponse = response.json().await?;
        Ok(response.statuses)
    }

    pub async fn delete(&self, id: &StatusId) -> Result<()> {
        let url = self
            .url
            .join(&format!("collections/{}/statuses/{}", self.collection, id))?;
        debug!("Deleting {}", url.as_str());
        let request_future = self.client.delete(url.as_str()).send();
        let response = self.circuit_breaker.call(request_future).await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            // Already gone, possibly to a concurrent sweep.
            return Ok(());
        }
        response.error_for_status()?;
        Ok(())
    }
}
