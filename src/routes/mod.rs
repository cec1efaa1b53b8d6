//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the building persistence API, the health probe and the
//! static `/data` assets under a single Axum router. Browser editors and
//! viewers call the API cross-origin, so every response carries permissive
//! CORS headers and any `OPTIONS` request is answered as a preflight.

pub mod buildings;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use std::path::Path;

use axum::Router;
use axum::extract::Request;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
    CACHE_CONTROL, CONTENT_TYPE,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde_json::json;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const PREFLIGHT_MAX_AGE_SECS: &str = "86400";

/// Full application router. `static_dir/data` is served at `/data`.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/buildings", get(buildings::list_buildings).fallback(not_found))
        .route(
            "/api/buildings/{id}",
            get(buildings::get_building)
                .post(buildings::save_building)
                .fallback(not_found),
        )
        .route("/healthz", get(healthz))
        .nest_service("/data", ServeDir::new(static_dir.join("data")))
        .fallback(not_found)
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

fn insert_cors_headers(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, POST, OPTIONS"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
}

/// Answer preflights directly; tag everything else with CORS headers and mark
/// JSON responses uncacheable.
async fn cors(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        let headers = response.headers_mut();
        insert_cors_headers(headers);
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(PREFLIGHT_MAX_AGE_SECS));
        return response;
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    insert_cors_headers(headers);
    let is_json = headers
        .get(CONTENT_TYPE)
        .is_some_and(|v| v.to_str().is_ok_and(|ct| ct.starts_with("application/json")));
    if is_json {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    }
    response
}
