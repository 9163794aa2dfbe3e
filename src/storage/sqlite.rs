use super::store::{QuoteStore, StoreError};
use crate::search::normalizer::normalize;
use crate::search::types::Quote;
use crate::usage::types::UsageEntry;

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Arc, Mutex};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS quotes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    author      TEXT NOT NULL,
    quote       TEXT NOT NULL,
    topics      TEXT NOT NULL DEFAULT '',
    likes       INTEGER,
    author_norm TEXT NOT NULL,
    topics_norm TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS users (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    api_key TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS usage_logs (
    id         TEXT PRIMARY KEY,
    user_id    INTEGER,
    endpoint   TEXT NOT NULL,
    method     TEXT NOT NULL,
    status     INTEGER NOT NULL,
    created_at INTEGER NOT NULL
);
";

/// Store backed by a single SQLite connection.
///
/// Normalized copies of `author` and `topics` are written next to the raw
/// columns so the exact phase is a single `instr` scan inside SQLite. Every
/// statement runs on the blocking pool.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))?;
            op(&mut *guard)
        })
        .await?
    }
}

fn quote_from_row(row: &Row<'_>) -> rusqlite::Result<Quote> {
    Ok(Quote {
        author: row.get(0)?,
        quote: row.get(1)?,
        topics: row.get(2)?,
        likes: row.get(3)?,
    })
}

#[async_trait]
impl QuoteStore for SqliteStore {
    async fn scan(&self, scan_limit: usize) -> Result<Vec<Quote>, StoreError> {
        let scan_limit = i64::try_from(scan_limit).unwrap_or(i64::MAX);
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT author, quote, topics, likes FROM quotes ORDER BY id LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![scan_limit], quote_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    async fn exact_query(
        &self,
        normalized_query: &str,
        limit: usize,
    ) -> Result<Vec<Quote>, StoreError> {
        let needle = normalized_query.to_string();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT author, quote, topics, likes
                 FROM quotes
                 WHERE instr(author_norm, ?1) > 0 OR instr(topics_norm, ?1) > 0
                 ORDER BY RANDOM()
                 LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![needle, limit], quote_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    async fn random_quote(&self) -> Result<Option<Quote>, StoreError> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT author, quote, topics, likes FROM quotes ORDER BY RANDOM() LIMIT 1",
                    [],
                    quote_from_row,
                )
                .optional()?)
        })
        .await
    }

    async fn resolve_api_key(&self, api_key: &str) -> Result<Option<i64>, StoreError> {
        let api_key = api_key.to_string();
        self.with_conn(move |conn| {
            Ok(conn
                .query_row(
                    "SELECT id FROM users WHERE api_key = ?1 LIMIT 1",
                    params![api_key],
                    |row| row.get(0),
                )
                .optional()?)
        })
        .await
    }

    async fn record_usage(&self, entry: &UsageEntry) -> Result<(), StoreError> {
        let entry = entry.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO usage_logs (id, user_id, endpoint, method, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    entry.id,
                    entry.user_id,
                    entry.endpoint,
                    entry.method,
                    entry.status,
                    i64::try_from(entry.created_at).unwrap_or(i64::MAX),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn insert_quotes(&self, quotes: Vec<Quote>) -> Result<usize, StoreError> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO quotes (author, quote, topics, likes, author_norm, topics_norm)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?;
                for quote in &quotes {
                    stmt.execute(params![
                        quote.author,
                        quote.quote,
                        quote.topics,
                        quote.likes,
                        normalize(&quote.author),
                        normalize(&quote.topics),
                    ])?;
                }
            }
            tx.commit()?;
            tracing::debug!("Inserted {} quote(s) into sqlite", quotes.len());
            Ok(quotes.len())
        })
        .await
    }

    async fn insert_user(&self, api_key: &str) -> Result<i64, StoreError> {
        let api_key = api_key.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO users (api_key) VALUES (?1)",
                params![api_key],
            )?;
            Ok(conn.query_row(
                "SELECT id FROM users WHERE api_key = ?1",
                params![api_key],
                |row| row.get(0),
            )?)
        })
        .await
    }
}

impl SqliteStore {
    /// Number of persisted usage log rows.
    pub async fn usage_count(&self) -> Result<i64, StoreError> {
        self.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM usage_logs", [], |row| row.get(0))?)
        })
        .await
    }
}
