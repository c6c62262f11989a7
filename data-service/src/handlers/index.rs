use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::models::created_at_now;
use crate::startup::AppState;

pub const WELCOME_MESSAGE: &str = "Welcome to the data service!";

/// Welcome page. Always 200; a failed store ping is reported in the body as
/// `degraded` so the probe never flaps.
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let ping = match &state.store {
        Some(store) => store.ping().await,
        None => Ok(()),
    };
    let current_time = created_at_now(state.timestamps);

    let body = match ping {
        Ok(()) => json!({
            "message": WELCOME_MESSAGE,
            "current_time": current_time,
            "status": "healthy"
        }),
        Err(e) => {
            tracing::error!("Error in index route: {}", e);
            json!({
                "message": WELCOME_MESSAGE,
                "current_time": current_time,
                "status": "degraded",
                "error": e.message()
            })
        }
    };

    (StatusCode::OK, Json(body))
}
