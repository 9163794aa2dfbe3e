//! Quote Search Module
//!
//! The matching core of the service and the HTTP handlers in front of it.
//!
//! ## Pipeline
//! 1. **Normalize**: the query is lowercased and stripped of periods and whitespace.
//! 2. **Exact phase**: substring match against normalized authors and topic lists.
//! 3. **Fuzzy phase**: only after an exact miss on a query of four or more characters,
//!    a capped corpus snapshot is scored by Levenshtein distance per author and per topic.
//! 4. **Shuffle and cap**: matches come back in random order, at most `limit` of them.
//!
//! ## Submodules
//! - **`normalizer`**: canonical text form shared by queries, stored rows and the SQLite columns.
//! - **`engine`**: the two phases, the edit distance and their composition.
//! - **`types`**: `Quote`, `MatchPolicy`, `SearchOutcome` and limit parsing.
//! - **`protocol`**: routes and non-quote response bodies.
//! - **`handlers`**: Axum handlers for the random and search endpoints.

pub mod engine;
pub mod handlers;
pub mod normalizer;
pub mod protocol;
pub mod types;
