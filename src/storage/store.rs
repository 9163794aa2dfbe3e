//! Storage Contract
//!
//! The read side the matcher depends on (`scan`, `exact_query`), plus the small
//! amount of plumbing the HTTP layer needs: a random quote, API key lookup and
//! usage log persistence.

use crate::search::types::Quote;
use crate::usage::types::UsageEntry;

use async_trait::async_trait;
use thiserror::Error;

/// The only failure a store reports. The matcher never recovers from it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::Unavailable(format!("storage task failed: {}", err))
    }
}

#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Up to `scan_limit` quotes, in storage order.
    async fn scan(&self, scan_limit: usize) -> Result<Vec<Quote>, StoreError>;

    /// Quotes whose normalized author or normalized topic list contains
    /// `normalized_query`, in random order, at most `limit` of them.
    async fn exact_query(
        &self,
        normalized_query: &str,
        limit: usize,
    ) -> Result<Vec<Quote>, StoreError>;

    /// One quote chosen uniformly at random, `None` when the store is empty.
    async fn random_quote(&self) -> Result<Option<Quote>, StoreError>;

    /// Resolves an API key to the owning user id.
    async fn resolve_api_key(&self, api_key: &str) -> Result<Option<i64>, StoreError>;

    async fn record_usage(&self, entry: &UsageEntry) -> Result<(), StoreError>;

    async fn insert_quotes(&self, quotes: Vec<Quote>) -> Result<usize, StoreError>;

    /// Registers an API key and returns the new user id.
    async fn insert_user(&self, api_key: &str) -> Result<i64, StoreError>;
}
