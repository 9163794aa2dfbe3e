//! Quote Storage Module
//!
//! Read access to the quote corpus plus the bookkeeping tables (API keys and
//! usage logs) the HTTP layer writes to.
//!
//! ## Backends
//! - **`memory`**: `MemoryStore`, concurrent in-process maps. Default when no database is configured.
//! - **`sqlite`**: `SqliteStore`, a single SQLite file with normalized search columns.
//!
//! Both implement the `QuoteStore` trait from **`store`**, which is the only thing the
//! search engine and handlers depend on. **`seed`** bulk-loads either backend from JSON.

pub mod memory;
pub mod seed;
pub mod sqlite;
pub mod store;

#[cfg(test)]
mod tests;
