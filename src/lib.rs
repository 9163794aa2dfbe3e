//! Quote Service Library
//!
//! A read-only HTTP API over a small quote corpus, with random retrieval and
//! topic/author search that falls back from substring to edit-distance matching.
//!
//! ## Modules
//! - **`search`**: normalization, the exact/fuzzy matcher and the quote endpoints.
//! - **`storage`**: the `QuoteStore` trait with in-memory and SQLite backends.
//! - **`usage`**: asynchronous usage logging for API-key attribution.
//! - **`server`**: the Axum router (routes, 404 fallback, CORS).
//! - **`config`**: command-line and environment configuration.

pub mod config;
pub mod search;
pub mod server;
pub mod storage;
pub mod usage;
