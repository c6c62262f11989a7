//! Free-form records as submitted by clients.
//!
//! A record is any non-empty JSON object. The only field the service adds is
//! `created_at`; everything else is stored as received.

use bson::{Bson, Document};
use chrono::{Local, Utc};
use serde_json::{Map, Value};
use service_core::error::AppError;

use crate::config::TimestampZone;

pub type Record = Map<String, Value>;

pub const CREATED_AT_FIELD: &str = "created_at";

const ISO_8601_MICROS: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Parse a request body into a record.
///
/// An empty body, malformed JSON, a non-object value and `{}` are all treated
/// as "no data".
pub fn parse_record_body(body: &[u8]) -> Result<Record, AppError> {
    let no_data = || AppError::BadRequest(anyhow::anyhow!("No JSON data provided"));

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(no_data());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => Ok(map),
        Ok(_) => Err(no_data()),
        Err(e) => {
            tracing::debug!("Rejecting malformed JSON body: {}", e);
            Err(no_data())
        }
    }
}

/// Current time as ISO-8601 text. Local time carries no offset; UTC is
/// suffixed with `+00:00`.
pub fn created_at_now(zone: TimestampZone) -> String {
    match zone {
        TimestampZone::Local => Local::now().naive_local().format(ISO_8601_MICROS).to_string(),
        TimestampZone::Utc => format!("{}+00:00", Utc::now().format(ISO_8601_MICROS)),
    }
}

/// Overwrites any client-supplied `created_at`.
pub fn stamp_created_at(record: &mut Record, timestamp: String) {
    record.insert(CREATED_AT_FIELD.to_string(), Value::String(timestamp));
}

pub fn record_to_document(record: &Record) -> Result<Document, AppError> {
    Ok(bson::to_document(record)?)
}

pub fn record_from_document(document: Document) -> Result<Record, AppError> {
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => Ok(map),
        other => Err(AppError::DatabaseError(anyhow::anyhow!(
            "Stored record is not an object: {}",
            other
        ))),
    }
}
