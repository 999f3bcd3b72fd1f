//! Contains all the routes that this application can handle.

mod api;
mod home;

use crate::AppState;
use home::home;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::services::{ServeDir, ServeFile};

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn api_data() -> Json<Value> {
    Json(json!({
        "message": "Here is some sample API data",
        "items": ["apple", "banana", "cherry"],
    }))
}

async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({"error": "Method Not Allowed"})),
    )
}

/// All the routes of the server.
/// Anything unmatched falls back to the static assets in 'public/', and from
/// there to the index page (SPA-style).
pub fn routes(app_state: AppState) -> Router {
    let static_assets =
        ServeDir::new("public").not_found_service(ServeFile::new("public/index.html"));

    Router::new()
        .route("/", get(home))
        .route("/mailer-lite", post(api::subscribe_with_group))
        .with_state(app_state.clone())
        .nest("/api", api_routes(app_state))
        .route_service("/about", ServeFile::new("components/about.htm"))
        .route("/api-data", get(api_data))
        .route("/healthz", get(health_check))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback_service(static_assets)
}

/// API - Routes nested under "/api" path
fn api_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/subscribe", post(api::subscribe))
        .with_state(app_state)
        .method_not_allowed_fallback(method_not_allowed)
}
