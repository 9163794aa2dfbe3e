//! HTTP Router
//!
//! Wires the quote handlers, the catch-all fallback and CORS headers into one
//! Axum router. Shared services travel as request extensions.

use crate::search::handlers::{error_response, handle_random_quote, handle_search_quotes};
use crate::search::protocol::{
    DETAIL_NOT_FOUND, ENDPOINT_QUOTES, ENDPOINT_RANDOM, ENDPOINT_ROOT, WELCOME_MESSAGE,
    WelcomeResponse,
};
use crate::search::types::MatchPolicy;
use crate::storage::store::QuoteStore;
use crate::usage::recorder::UsageRecorder;

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, get};
use axum::{Extension, Json, Router, middleware};
use std::sync::Arc;

pub fn build_router(
    store: Arc<dyn QuoteStore>,
    recorder: Arc<UsageRecorder>,
    policy: MatchPolicy,
) -> Router {
    Router::new()
        .route(ENDPOINT_ROOT, get_only(get(handle_root)))
        .route(ENDPOINT_RANDOM, get_only(get(handle_random_quote)))
        .route(ENDPOINT_QUOTES, get_only(get(handle_search_quotes)))
        .fallback(handle_fallback)
        .layer(Extension(store))
        .layer(Extension(recorder))
        .layer(Extension(policy))
        .layer(middleware::map_response(with_cors))
}

/// `get()` also answers `HEAD`; route it and every other method to the fallback.
fn get_only(route: MethodRouter) -> MethodRouter {
    route.head(handle_fallback).fallback(handle_fallback)
}

async fn handle_root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// Answers CORS preflights and turns everything else into a JSON 404.
async fn handle_fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }
    error_response(StatusCode::NOT_FOUND, DETAIL_NOT_FOUND).1
}

async fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, x-api-key"),
    );
    response
}
