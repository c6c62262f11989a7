use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::Serialize;
use service_core::error::AppError;

use crate::models::{created_at_now, parse_record_body, stamp_created_at, Record};
use crate::startup::AppState;

#[derive(Debug, Serialize)]
pub struct InsertResponse {
    pub status: String,
    pub inserted_id: String,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub count: usize,
    pub data: Vec<Record>,
}

/// `POST /data`: store one JSON object stamped with `created_at`.
#[tracing::instrument(skip(state, body))]
pub async fn create_record(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<InsertResponse>), AppError> {
    let mut record = parse_record_body(&body)?;

    let store = state.store().map_err(|e| {
        tracing::error!("POST /data called but the store handle is absent");
        e
    })?;

    stamp_created_at(&mut record, created_at_now(state.timestamps));

    let inserted_id = store.insert(record).await.map_err(|e| {
        tracing::error!("Error inserting data into MongoDB: {}", e);
        AppError::ServiceUnavailable(AppState::STORE_UNAVAILABLE.to_string())
    })?;
    tracing::info!("Data inserted with ID: {}", inserted_id);

    Ok((
        StatusCode::CREATED,
        Json(InsertResponse {
            status: "Data inserted".to_string(),
            inserted_id,
        }),
    ))
}

/// `GET /data`: every stored record, without internal identifiers.
#[tracing::instrument(skip(state))]
pub async fn list_records(State(state): State<AppState>) -> Result<Json<ListResponse>, AppError> {
    let store = state.store()?;

    // Read failures answer 500 with the raw cause, unlike the 503 used for
    // writes.
    let data = store.find_all().await.map_err(|e| {
        tracing::error!("Error retrieving data: {}", e);
        AppError::DatabaseError(anyhow::anyhow!(e.message()))
    })?;
    tracing::info!("Retrieved {} documents", data.len());

    Ok(Json(ListResponse {
        count: data.len(),
        data,
    }))
}
