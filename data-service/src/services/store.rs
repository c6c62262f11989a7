use crate::config::{DataConfig, MongoConfig, StoreBackend};
use crate::models::{record_from_document, record_to_document, Record};
use crate::services::metrics::record_store_operation;
use crate::services::MockStore;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::{ClientOptions, FindOptions},
    Client as MongoClient, Collection,
};
use service_core::error::AppError;
use std::sync::Arc;

/// Access to the record collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Round-trip liveness check against the server.
    async fn ping(&self) -> Result<(), AppError>;

    /// Persist one record and return its generated identifier as text.
    async fn insert(&self, record: Record) -> Result<String, AppError>;

    /// Every stored record, without the store's `_id` field.
    async fn find_all(&self) -> Result<Vec<Record>, AppError>;
}

#[derive(Clone)]
pub struct MongoStore {
    client: MongoClient,
    collection: Collection<Document>,
}

impl MongoStore {
    /// Open a client and verify it with `ping` before handing it out.
    pub async fn connect(config: &MongoConfig) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB at {}", config.address());

        let mut options = ClientOptions::parse(config.connection_uri())
            .await
            .map_err(|e| {
                tracing::error!("MongoDB connection failed: {}", e);
                AppError::from(e)
            })?;
        options.server_selection_timeout = Some(config.server_selection_timeout);
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("MongoDB connection failed: {}", e);
            AppError::from(e)
        })?;

        let store = Self {
            collection: client
                .database(&config.database)
                .collection(&config.collection),
            client,
        };

        store.ping().await.map_err(|e| {
            tracing::error!("MongoDB connection failed: {}", e);
            e
        })?;

        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "MongoDB connection successful"
        );
        Ok(store)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn ping(&self) -> Result<(), AppError> {
        let result = self
            .client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await;
        record_store_operation("ping", result.is_ok());
        result.map_err(|e| {
            tracing::error!("MongoDB health check failed: {}", e);
            AppError::from(e)
        })?;
        Ok(())
    }

    async fn insert(&self, record: Record) -> Result<String, AppError> {
        let document = record_to_document(&record)?;
        let result = self.collection.insert_one(document, None).await;
        record_store_operation("insert", result.is_ok());
        let result = result.map_err(|e| {
            tracing::error!("Failed to insert record: {}", e);
            AppError::from(e)
        })?;

        Ok(id_to_text(result.inserted_id))
    }

    async fn find_all(&self) -> Result<Vec<Record>, AppError> {
        let find_options = FindOptions::builder()
            .projection(doc! { "_id": 0 })
            .build();

        let documents: Result<Vec<Document>, _> =
            match self.collection.find(doc! {}, find_options).await {
                Ok(cursor) => cursor.try_collect().await,
                Err(e) => Err(e),
            };
        record_store_operation("find_all", documents.is_ok());
        let documents = documents.map_err(|e| {
            tracing::error!("Failed to retrieve records: {}", e);
            AppError::from(e)
        })?;

        documents.into_iter().map(record_from_document).collect()
    }
}

/// Text form of a generated or client-supplied `_id`.
fn id_to_text(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.into_relaxed_extjson().to_string(),
    }
}

/// Open the configured store once at startup.
///
/// Failure is logged and yields `None`; the service then runs without
/// persistence and store-backed routes answer 503.
pub async fn bootstrap(config: &DataConfig) -> Option<Arc<dyn DocumentStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; records are not persisted");
            Some(Arc::new(MockStore::new(true)))
        }
        StoreBackend::Mongo => match MongoStore::connect(&config.mongodb).await {
            Ok(store) => Some(Arc::new(store)),
            Err(e) => {
                tracing::error!("Failed to initialize MongoDB: {}", e);
                None
            }
        },
    }
}
