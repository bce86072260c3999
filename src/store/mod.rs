//! Access to the remote record store.

pub mod pocketbase;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use pocketbase::PocketBaseClient;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Authentication failed: {0}. Please check your credentials.")]
    Auth(String),
    #[error("Failed to fetch data from {collection}: {reason}")]
    Collection { collection: String, reason: String },
    #[error("Failed to fetch record {id} from {collection}: {reason}")]
    Record {
        collection: String,
        id: String,
        reason: String,
    },
}

/// Optional query parameters for collection reads.
#[derive(Debug, Default, Clone)]
pub struct ListQuery {
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub expand: Option<String>,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetches all records from a collection, honoring optional query
    /// parameters. One page only; the store caps list reads at 200 records.
    async fn fetch_collection(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> Result<Vec<Value>, StoreError>;

    /// Fetches a single record by id, optionally expanding relations.
    async fn fetch_record(
        &self,
        collection: &str,
        id: &str,
        expand: Option<&str>,
    ) -> Result<Value, StoreError>;
}
