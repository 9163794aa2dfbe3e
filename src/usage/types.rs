use serde::{Deserialize, Serialize};

/// One API call, recorded for usage attribution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsageEntry {
    /// UUID v4, unique per entry.
    pub id: String,
    /// Owner of the presented API key, `None` for anonymous calls.
    pub user_id: Option<i64>,
    pub endpoint: String,
    pub method: String,
    /// HTTP status returned to the caller.
    pub status: u16,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
}

impl UsageEntry {
    pub fn new(user_id: Option<i64>, endpoint: &str, method: &str, status: u16) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            status,
            created_at: now_ms(),
        }
    }
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
