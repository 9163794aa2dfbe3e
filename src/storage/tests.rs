//! Storage Module Tests
//!
//! Validates both `QuoteStore` backends and the seed loader.
//!
//! ## Test Scopes
//! - **MemoryStore**: scan ordering and caps, exact queries, random picks, API keys, usage logs.
//! - **SqliteStore**: the same contract against a real database file, plus persistence across reopen.
//! - **Seed**: both accepted file shapes.

#[cfg(test)]
mod tests {
    use crate::search::types::Quote;
    use crate::storage::memory::MemoryStore;
    use crate::storage::seed::{SeedFile, apply_seed, load_seed};
    use crate::storage::sqlite::SqliteStore;
    use crate::storage::store::{QuoteStore, StoreError};
    use crate::usage::types::UsageEntry;

    use std::collections::HashSet;
    use tempfile::TempDir;

    fn sample_quotes() -> Vec<Quote> {
        vec![
            Quote::new("C.S. Lewis", "Hope is a virtue.", "faith, hope"),
            Quote::new("John Piper", "Grace is free.", "grace"),
            Quote {
                likes: Some(7),
                ..Quote::new("Augustine", "Our heart is restless.", "rest, God")
            },
        ]
    }

    fn authors(quotes: &[Quote]) -> HashSet<String> {
        quotes.iter().map(|q| q.author.clone()).collect()
    }

    // ============================================================
    // MEMORY STORE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_memory_scan_preserves_insertion_order() {
        let store = MemoryStore::with_quotes(sample_quotes());

        let scanned = store.scan(10).await.unwrap();

        assert_eq!(scanned, sample_quotes());
    }

    #[tokio::test]
    async fn test_memory_scan_respects_cap() {
        let store = MemoryStore::with_quotes(sample_quotes());

        let scanned = store.scan(2).await.unwrap();

        assert_eq!(scanned.len(), 2);
        assert_eq!(scanned[0].author, "C.S. Lewis");
    }

    #[tokio::test]
    async fn test_memory_exact_query() {
        let store = MemoryStore::with_quotes(sample_quotes());

        let found = store.exact_query("cslewis", 5).await.unwrap();
        assert_eq!(authors(&found), HashSet::from(["C.S. Lewis".to_string()]));

        let found = store.exact_query("god", 5).await.unwrap();
        assert_eq!(authors(&found), HashSet::from(["Augustine".to_string()]));

        assert!(store.exact_query("zebra", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_random_quote() {
        let empty = MemoryStore::new();
        assert!(empty.random_quote().await.unwrap().is_none());

        let store = MemoryStore::with_quotes(sample_quotes());
        let quote = store.random_quote().await.unwrap().unwrap();
        assert!(sample_quotes().contains(&quote));
    }

    #[tokio::test]
    async fn test_memory_api_keys() {
        let store = MemoryStore::new();

        let id = store.insert_user("key-1").await.unwrap();
        let again = store.insert_user("key-1").await.unwrap();
        let other = store.insert_user("key-2").await.unwrap();

        assert_eq!(id, again, "Registering the same key twice keeps one user");
        assert_ne!(id, other);
        assert_eq!(store.resolve_api_key("key-1").await.unwrap(), Some(id));
        assert_eq!(store.resolve_api_key("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_usage_logs() {
        let store = MemoryStore::new();
        let entry = UsageEntry::new(Some(3), "/v1/quotes", "GET", 200);

        store.record_usage(&entry).await.unwrap();

        assert_eq!(store.usage_logs(), vec![entry]);
    }

    // ============================================================
    // SQLITE STORE TESTS
    // ============================================================

    async fn seeded_sqlite(dir: &TempDir) -> SqliteStore {
        let store = SqliteStore::open(dir.path().join("quotes.db")).unwrap();
        store.insert_quotes(sample_quotes()).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_sqlite_scan_roundtrips_rows() {
        let dir = TempDir::new().unwrap();
        let store = seeded_sqlite(&dir).await;

        let scanned = store.scan(10).await.unwrap();

        assert_eq!(scanned, sample_quotes());
        assert_eq!(scanned[2].likes, Some(7));
        assert_eq!(store.scan(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sqlite_exact_query_uses_normalized_columns() {
        let dir = TempDir::new().unwrap();
        let store = seeded_sqlite(&dir).await;

        let found = store.exact_query("cslewis", 5).await.unwrap();
        assert_eq!(authors(&found), HashSet::from(["C.S. Lewis".to_string()]));

        let found = store.exact_query("faith,hope", 5).await.unwrap();
        assert_eq!(authors(&found), HashSet::from(["C.S. Lewis".to_string()]));

        assert!(store.exact_query("zebra", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_exact_query_treats_wildcards_literally() {
        let dir = TempDir::new().unwrap();
        let store = seeded_sqlite(&dir).await;

        assert!(store.exact_query("%", 5).await.unwrap().is_empty());
        assert!(store.exact_query("_", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_exact_query_limit() {
        let store = SqliteStore::open_in_memory().unwrap();
        let quotes: Vec<Quote> = (0..12)
            .map(|i| Quote::new(&format!("Author {}", i), "t", "hope"))
            .collect();
        store.insert_quotes(quotes).await.unwrap();

        let found = store.exact_query("hope", 5).await.unwrap();

        assert_eq!(found.len(), 5);
        assert_eq!(authors(&found).len(), 5);
    }

    #[tokio::test]
    async fn test_sqlite_agrees_with_memory_backend() {
        let dir = TempDir::new().unwrap();
        let sqlite = seeded_sqlite(&dir).await;
        let memory = MemoryStore::with_quotes(sample_quotes());

        for query in ["cslewis", "grace", "rest", "hope", "o", "zebra"] {
            let a = sqlite.exact_query(query, 50).await.unwrap();
            let b = memory.exact_query(query, 50).await.unwrap();
            assert_eq!(authors(&a), authors(&b), "Backends disagree on {:?}", query);
        }
    }

    #[tokio::test]
    async fn test_sqlite_random_quote() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.random_quote().await.unwrap().is_none());

        store.insert_quotes(sample_quotes()).await.unwrap();
        let quote = store.random_quote().await.unwrap().unwrap();
        assert!(sample_quotes().contains(&quote));
    }

    #[tokio::test]
    async fn test_sqlite_api_keys_and_usage() {
        let store = SqliteStore::open_in_memory().unwrap();

        let id = store.insert_user("secret").await.unwrap();
        assert_eq!(store.insert_user("secret").await.unwrap(), id);
        assert_eq!(store.resolve_api_key("secret").await.unwrap(), Some(id));
        assert_eq!(store.resolve_api_key("other").await.unwrap(), None);

        store
            .record_usage(&UsageEntry::new(Some(id), "/v1/quotes/random", "GET", 200))
            .await
            .unwrap();
        store
            .record_usage(&UsageEntry::new(None, "/v1/quotes", "GET", 404))
            .await
            .unwrap();

        assert_eq!(store.usage_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_sqlite_duplicate_usage_id_is_storage_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        let entry = UsageEntry::new(None, "/v1/quotes", "GET", 200);

        store.record_usage(&entry).await.unwrap();
        let result = store.record_usage(&entry).await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_sqlite_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let _store = seeded_sqlite(&dir).await;
        }

        let reopened = SqliteStore::open(dir.path().join("quotes.db")).unwrap();

        assert_eq!(reopened.scan(10).await.unwrap().len(), 3);
    }

    #[test]
    fn test_sqlite_open_bad_path_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let result = SqliteStore::open(dir.path().join("missing").join("quotes.db"));

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    // ============================================================
    // SEED TESTS
    // ============================================================

    #[test]
    fn test_seed_accepts_bare_array() {
        let seed: SeedFile = serde_json::from_str(
            r#"[{"author":"C.S. Lewis","quote":"Hope.","topics":"hope"}]"#,
        )
        .unwrap();

        let (quotes, keys) = seed.into_parts();
        assert_eq!(quotes.len(), 1);
        assert!(keys.is_empty());
    }

    #[test]
    fn test_seed_accepts_object_with_keys() {
        let seed: SeedFile = serde_json::from_str(
            r#"{"quotes":[{"author":"A","quote":"B","topics":"c","likes":2}],"api_keys":["k1","k2"]}"#,
        )
        .unwrap();

        let (quotes, keys) = seed.into_parts();
        assert_eq!(quotes[0].likes, Some(2));
        assert_eq!(keys, vec!["k1".to_string(), "k2".to_string()]);
    }

    #[tokio::test]
    async fn test_load_and_apply_seed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seed.json");
        let body = serde_json::json!({
            "quotes": sample_quotes(),
            "api_keys": ["alpha"],
        });
        std::fs::write(&path, body.to_string()).unwrap();

        let store = MemoryStore::new();
        let counts = apply_seed(&store, load_seed(&path).unwrap()).await.unwrap();

        assert_eq!(counts, (3, 1));
        assert_eq!(store.quote_count(), 3);
        assert!(store.resolve_api_key("alpha").await.unwrap().is_some());
    }

    #[test]
    fn test_load_seed_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_seed(&dir.path().join("absent.json")).unwrap_err();

        assert!(err.to_string().contains("failed to read seed file"));
    }
}
