#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use data_service::config::{DataConfig, MongoConfig, StoreBackend, TimestampZone};
use data_service::services::{DocumentStore, MockStore};
use data_service::{build_router, AppState, Application};
use http_body_util::BodyExt;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

/// Router backed by `store`; `None` simulates a failed bootstrap.
pub fn router_with(store: Option<Arc<MockStore>>) -> Router {
    let store = store.map(|s| s as Arc<dyn DocumentStore>);
    build_router(AppState::new(store, TimestampZone::Local))
}

pub fn healthy_store() -> Arc<MockStore> {
    Arc::new(MockStore::new(true))
}

pub fn unreachable_store() -> Arc<MockStore> {
    Arc::new(MockStore::new(false))
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, body)
}

/// MongoDB settings pointing at a port nothing listens on.
pub fn unreachable_mongo() -> MongoConfig {
    MongoConfig {
        username: "admin".to_string(),
        password: "admin".to_string(),
        host: "127.0.0.1".to_string(),
        port: "1".to_string(),
        database: "flask_db".to_string(),
        collection: "data".to_string(),
        server_selection_timeout: Duration::from_millis(200),
    }
}

pub fn test_config(store_backend: StoreBackend, mongodb: MongoConfig) -> DataConfig {
    DataConfig {
        common: CoreConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        mongodb,
        store_backend,
        timestamps: TimestampZone::Utc,
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Run a real server on a random port.
    pub async fn spawn(config: DataConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }
}
