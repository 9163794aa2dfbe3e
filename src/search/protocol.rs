//! Quote API Protocol
//!
//! Public routes and the JSON bodies that are not plain quotes.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

pub const ENDPOINT_ROOT: &str = "/";
/// One random quote.
pub const ENDPOINT_RANDOM: &str = "/v1/quotes/random";
/// Topic/author search, `?q=<text>&limit=<n>`.
pub const ENDPOINT_QUOTES: &str = "/v1/quotes";

// --- Response bodies ---

pub const WELCOME_MESSAGE: &str = "Welcome to the Quotes API. See /docs for available endpoints.";
pub const DETAIL_NO_QUOTES: &str = "No quotes available.";
pub const DETAIL_MISSING_QUERY: &str = "Missing or invalid query param: q";
pub const DETAIL_NO_MATCHES: &str = "No quotes found for that topic.";
pub const DETAIL_NOT_FOUND: &str = "Not Found";
pub const DETAIL_STORAGE_UNAVAILABLE: &str = "Storage unavailable.";

/// Body of every non-2xx JSON response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: &str) -> Self {
        Self {
            detail: detail.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Query string of the search endpoint.
///
/// Both fields stay raw strings so a malformed `limit` falls back to the
/// default instead of rejecting the request. Repeated keys keep their first
/// value.
#[derive(Debug, Default, PartialEq)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<String>,
}

impl SearchParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "q" if params.q.is_none() => params.q = Some(value),
                "limit" if params.limit.is_none() => params.limit = Some(value),
                _ => {}
            }
        }
        params
    }
}
