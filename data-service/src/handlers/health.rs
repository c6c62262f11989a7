use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::startup::AppState;

/// Liveness probe. Independent of the store.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

/// Readiness probe.
///
/// Pings the store when a handle exists. A missing handle is reported as
/// ready; only a failed ping answers 503.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let ping = match &state.store {
        Some(store) => store.ping().await,
        None => Ok(()),
    };

    match ping {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(e) => {
            tracing::error!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not ready",
                    "error": e.message()
                })),
            )
        }
    }
}
