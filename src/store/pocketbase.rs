use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::{ListQuery, RecordStore, StoreError};
use crate::config::AppConfig;

/// Records returned per collection read. List reads are capped at one page.
pub const PAGE_SIZE: usize = 200;

/// Cached admin tokens are re-exchanged after this window.
const SESSION_MAX_AGE: Duration = Duration::from_secs(30 * 60);

struct Session {
    token: String,
    obtained_at: Instant,
}

impl Session {
    fn is_valid(&self) -> bool {
        self.obtained_at.elapsed() < SESSION_MAX_AGE
    }
}

/// Client for a PocketBase-style record store. Constructed once at startup
/// and passed by reference; the cached admin session is the only shared
/// mutable state.
pub struct PocketBaseClient {
    base_url: String,
    identity: String,
    password: String,
    http: reqwest::Client,
    session: Mutex<Option<Session>>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    items: Vec<Value>,
}

impl PocketBaseClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("ratewatch/1.0")
            .build()?;
        Ok(PocketBaseClient {
            base_url: config.host.clone(),
            identity: config.identity.clone(),
            password: config.password.clone(),
            http,
            session: Mutex::new(None),
        })
    }

    /// Exchanges credentials for an admin token unless a valid session is
    /// already cached.
    async fn ensure_authenticated(&self) -> Result<String, StoreError> {
        let mut session = self.session.lock().await;
        if let Some(current) = session.as_ref() {
            if current.is_valid() {
                return Ok(current.token.clone());
            }
            debug!("Cached session expired, re-authenticating");
        }

        let url = format!("{}/api/admins/auth-with-password", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&json!({
                "identity": self.identity,
                "password": self.password,
            }))
            .send()
            .await
            .map_err(|e| StoreError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Auth(format!("HTTP error: {}", response.status())));
        }

        let auth = response
            .json::<AuthResponse>()
            .await
            .map_err(|e| StoreError::Auth(e.to_string()))?;

        info!("Authenticated with the record store");
        let token = auth.token.clone();
        *session = Some(Session {
            token: auth.token,
            obtained_at: Instant::now(),
        });
        Ok(token)
    }

    /// Clears the cached session locally. The next fetch re-authenticates.
    pub async fn logout(&self) {
        self.session.lock().await.take();
        warn!("Logged out, cleared cached session");
    }
}

#[async_trait]
impl RecordStore for PocketBaseClient {
    #[instrument(name = "CollectionFetch", skip(self, query), fields(collection = %collection))]
    async fn fetch_collection(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> Result<Vec<Value>, StoreError> {
        let token = self.ensure_authenticated().await?;

        let url = format!("{}/api/collections/{}/records", self.base_url, collection);
        debug!("Requesting records from {}", url);

        let mut request = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .query(&[("perPage", PAGE_SIZE.to_string())]);
        if let Some(filter) = &query.filter {
            request = request.query(&[("filter", filter)]);
        }
        if let Some(sort) = &query.sort {
            request = request.query(&[("sort", sort)]);
        }
        if let Some(expand) = &query.expand {
            request = request.query(&[("expand", expand)]);
        }

        let fetch_error = |reason: String| StoreError::Collection {
            collection: collection.to_string(),
            reason,
        };

        let response = request.send().await.map_err(|e| fetch_error(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fetch_error(format!("HTTP error: {}", response.status())));
        }

        let list = response
            .json::<ListResponse>()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        debug!("Fetched {} records from {}", list.items.len(), collection);
        Ok(list.items)
    }

    #[instrument(name = "RecordFetch", skip(self), fields(collection = %collection, id = %id))]
    async fn fetch_record(
        &self,
        collection: &str,
        id: &str,
        expand: Option<&str>,
    ) -> Result<Value, StoreError> {
        let token = self.ensure_authenticated().await?;

        let url = format!(
            "{}/api/collections/{}/records/{}",
            self.base_url, collection, id
        );
        debug!("Requesting record from {}", url);

        let mut request = self.http.get(&url).bearer_auth(&token);
        if let Some(expand) = expand {
            request = request.query(&[("expand", expand)]);
        }

        let fetch_error = |reason: String| StoreError::Record {
            collection: collection.to_string(),
            id: id.to_string(),
            reason,
        };

        let response = request.send().await.map_err(|e| fetch_error(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fetch_error(format!("HTTP error: {}", response.status())));
        }

        let record = response
            .json::<Value>()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        debug!("Fetched record {} from {}", id, collection);
        Ok(record)
    }
}
