use crate::models::Record;
use crate::services::metrics::record_store_operation;
use crate::services::DocumentStore;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use service_core::error::AppError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-process store for local runs and tests.
///
/// Flipping `healthy` off makes every call fail as an unreachable server would.
pub struct MockStore {
    healthy: AtomicBool,
    records: Mutex<Vec<Record>>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MockStore {
    pub fn new(healthy: bool) -> Self {
        Self {
            healthy: AtomicBool::new(healthy),
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self, operation: &'static str) -> Result<(), AppError> {
        let healthy = self.healthy.load(Ordering::SeqCst);
        record_store_operation(operation, healthy);
        if healthy {
            Ok(())
        } else {
            Err(AppError::DatabaseError(anyhow::anyhow!(
                "Server selection timeout: No available servers"
            )))
        }
    }
}

#[async_trait]
impl DocumentStore for MockStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.check("ping")
    }

    async fn insert(&self, mut record: Record) -> Result<String, AppError> {
        self.check("insert")?;

        // A client-supplied `_id` becomes the identifier, as MongoDB does.
        let id = match record.remove("_id") {
            Some(Value::String(id)) => id,
            Some(other) => other.to_string(),
            None => ObjectId::new().to_hex(),
        };
        self.records
            .lock()
            .map_err(|e| anyhow::anyhow!("Mock store mutex poisoned: {}", e))?
            .push(record);

        tracing::info!(inserted_id = %id, "[MOCK] Record stored");
        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<Record>, AppError> {
        self.check("find_all")?;

        let records = self
            .records
            .lock()
            .map_err(|e| anyhow::anyhow!("Mock store mutex poisoned: {}", e))?
            .clone();
        Ok(records)
    }
}
