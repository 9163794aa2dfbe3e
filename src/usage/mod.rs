//! Usage Attribution Module
//!
//! Every quote endpoint logs who called it and what it answered, without making
//! the caller wait for the write.
//!
//! ## Submodules
//! - **`types`**: the `UsageEntry` record.
//! - **`recorder`**: the channel-fed worker pool that persists entries through the store.

pub mod recorder;
pub mod types;
