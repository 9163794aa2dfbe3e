use super::store::{QuoteStore, StoreError};
use crate::search::engine::exact_search;
use crate::search::types::Quote;
use crate::usage::types::UsageEntry;

use async_trait::async_trait;
use dashmap::DashMap;
use rand::seq::IteratorRandom;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Process-local store backed by concurrent maps.
///
/// Used when no database path is configured and throughout the tests. Quotes
/// keep their insertion sequence so `scan` is stable between calls.
pub struct MemoryStore {
    quotes: Arc<DashMap<u64, Quote>>,
    users: Arc<DashMap<String, i64>>,
    usage_logs: Arc<DashMap<String, UsageEntry>>,
    next_quote_id: AtomicU64,
    next_user_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            quotes: Arc::new(DashMap::new()),
            users: Arc::new(DashMap::new()),
            usage_logs: Arc::new(DashMap::new()),
            next_quote_id: AtomicU64::new(1),
            next_user_id: AtomicI64::new(1),
        }
    }

    pub fn with_quotes(quotes: Vec<Quote>) -> Self {
        let store = Self::new();
        for quote in quotes {
            store.store_local(quote);
        }
        store
    }

    pub fn store_local(&self, quote: Quote) -> u64 {
        let id = self.next_quote_id.fetch_add(1, Ordering::SeqCst);
        self.quotes.insert(id, quote);
        id
    }

    pub fn quote_count(&self) -> usize {
        self.quotes.len()
    }

    /// Snapshot of every persisted usage entry, oldest first.
    pub fn usage_logs(&self) -> Vec<UsageEntry> {
        let mut entries: Vec<UsageEntry> = self
            .usage_logs
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by_key(|entry| entry.created_at);
        entries
    }

    fn ordered_quotes(&self) -> Vec<Quote> {
        let mut rows: Vec<(u64, Quote)> = self
            .quotes
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        rows.sort_by_key(|(id, _)| *id);
        rows.into_iter().map(|(_, quote)| quote).collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteStore for MemoryStore {
    async fn scan(&self, scan_limit: usize) -> Result<Vec<Quote>, StoreError> {
        let mut quotes = self.ordered_quotes();
        quotes.truncate(scan_limit);
        Ok(quotes)
    }

    async fn exact_query(
        &self,
        normalized_query: &str,
        limit: usize,
    ) -> Result<Vec<Quote>, StoreError> {
        Ok(exact_search(&self.ordered_quotes(), normalized_query, limit))
    }

    async fn random_quote(&self) -> Result<Option<Quote>, StoreError> {
        Ok(self
            .quotes
            .iter()
            .choose(&mut rand::thread_rng())
            .map(|entry| entry.value().clone()))
    }

    async fn resolve_api_key(&self, api_key: &str) -> Result<Option<i64>, StoreError> {
        Ok(self.users.get(api_key).map(|user| *user.value()))
    }

    async fn record_usage(&self, entry: &UsageEntry) -> Result<(), StoreError> {
        self.usage_logs.insert(entry.id.clone(), entry.clone());
        Ok(())
    }

    async fn insert_quotes(&self, quotes: Vec<Quote>) -> Result<usize, StoreError> {
        let count = quotes.len();
        for quote in quotes {
            self.store_local(quote);
        }
        tracing::debug!("Stored {} quote(s) in memory", count);
        Ok(count)
    }

    async fn insert_user(&self, api_key: &str) -> Result<i64, StoreError> {
        if let Some(existing) = self.users.get(api_key) {
            return Ok(*existing.value());
        }
        let id = self.next_user_id.fetch_add(1, Ordering::SeqCst);
        self.users.insert(api_key.to_string(), id);
        Ok(id)
    }
}
