use super::engine::search;
use super::protocol::{
    DETAIL_MISSING_QUERY, DETAIL_NO_MATCHES, DETAIL_NO_QUOTES, DETAIL_STORAGE_UNAVAILABLE,
    ENDPOINT_QUOTES, ENDPOINT_RANDOM, ErrorResponse, SearchParams,
};
use super::types::{MatchPolicy, parse_limit};
use crate::storage::store::QuoteStore;
use crate::usage::recorder::UsageRecorder;
use crate::usage::types::UsageEntry;

use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use std::sync::Arc;

pub const API_KEY_HEADER: &str = "x-api-key";

pub async fn handle_random_quote(
    Extension(store): Extension<Arc<dyn QuoteStore>>,
    Extension(recorder): Extension<Arc<UsageRecorder>>,
    headers: HeaderMap,
) -> Response {
    let user_id = resolve_user(store.as_ref(), &headers).await;

    let (status, response) = match store.random_quote().await {
        Ok(Some(quote)) => (StatusCode::OK, Json(quote).into_response()),
        Ok(None) => error_response(StatusCode::NOT_FOUND, DETAIL_NO_QUOTES),
        Err(e) => {
            tracing::error!("Failed to load random quote: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, DETAIL_STORAGE_UNAVAILABLE)
        }
    };

    recorder.record(UsageEntry::new(user_id, ENDPOINT_RANDOM, "GET", status.as_u16()));
    response
}

pub async fn handle_search_quotes(
    Extension(store): Extension<Arc<dyn QuoteStore>>,
    Extension(recorder): Extension<Arc<UsageRecorder>>,
    Extension(policy): Extension<MatchPolicy>,
    headers: HeaderMap,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let user_id = resolve_user(store.as_ref(), &headers).await;
    let params = match pairs {
        Ok(Query(pairs)) => SearchParams::from_pairs(pairs),
        Err(e) => {
            tracing::debug!("Unreadable query string: {}", e);
            SearchParams::default()
        }
    };
    let limit = parse_limit(params.limit.as_deref());

    let (status, response) = match params.q.as_deref().map(str::trim) {
        None | Some("") => error_response(StatusCode::BAD_REQUEST, DETAIL_MISSING_QUERY),
        Some(query) => match search(store.as_ref(), query, limit, &policy).await {
            Ok(outcome) if outcome.is_empty() => {
                tracing::debug!("No quotes for {:?}", query);
                error_response(StatusCode::NOT_FOUND, DETAIL_NO_MATCHES)
            }
            Ok(outcome) => {
                tracing::debug!(
                    "Search {:?} (limit {}) -> {} quote(s) via {:?}",
                    query,
                    limit,
                    outcome.quotes.len(),
                    outcome.phase
                );
                (StatusCode::OK, Json(outcome.quotes).into_response())
            }
            Err(e) => {
                tracing::error!("Search for {:?} failed: {}", query, e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, DETAIL_STORAGE_UNAVAILABLE)
            }
        },
    };

    recorder.record(UsageEntry::new(user_id, ENDPOINT_QUOTES, "GET", status.as_u16()));
    response
}

/// Maps the `x-api-key` header to a user id. Unknown keys, unreadable headers
/// and lookup failures all count as anonymous.
async fn resolve_user(store: &dyn QuoteStore, headers: &HeaderMap) -> Option<i64> {
    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|key| !key.is_empty())?;

    match store.resolve_api_key(api_key).await {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::warn!("API key lookup failed, treating caller as anonymous: {}", e);
            None
        }
    }
}

pub(crate) fn error_response(status: StatusCode, detail: &str) -> (StatusCode, Response) {
    (status, (status, Json(ErrorResponse::new(detail))).into_response())
}
