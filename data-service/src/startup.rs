//! Application startup and lifecycle management.
//!
//! The store is bootstrapped once; its handle (or its absence) is injected
//! into every handler through [`AppState`].

use crate::config::{DataConfig, TimestampZone};
use crate::handlers;
use crate::services::{bootstrap, DocumentStore};
use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Largest accepted `POST /data` body; matches MongoDB's BSON document cap.
pub const MAX_RECORD_BYTES: usize = 16 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// `None` when the bootstrap connection failed.
    pub store: Option<Arc<dyn DocumentStore>>,
    pub timestamps: TimestampZone,
}

impl AppState {
    pub const STORE_UNAVAILABLE: &'static str = "Database connection failed";

    pub fn new(store: Option<Arc<dyn DocumentStore>>, timestamps: TimestampZone) -> Self {
        Self { store, timestamps }
    }

    /// The store handle, or a 503 when bootstrap left it absent.
    pub fn store(&self) -> Result<&Arc<dyn DocumentStore>, AppError> {
        self.store
            .as_ref()
            .ok_or_else(|| AppError::ServiceUnavailable(Self::STORE_UNAVAILABLE.to_string()))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/data",
            get(handlers::list_records)
                .post(handlers::create_record)
                .layer(DefaultBodyLimit::max(MAX_RECORD_BYTES)),
        )
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route_layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Bootstrap the store and bind the listener. A store that cannot be
    /// reached does not fail the build.
    pub async fn build(config: DataConfig) -> Result<Self, AppError> {
        let store = bootstrap(&config).await;
        if store.is_none() {
            tracing::warn!("Starting without a store; /data will answer 503");
        }

        Self::with_state(&config, AppState::new(store, config.timestamps)).await
    }

    /// Bind with an already-prepared state.
    pub async fn with_state(config: &DataConfig, state: AppState) -> Result<Self, AppError> {
        let addr = (config.common.host.as_str(), config.common.port);
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(
                "Failed to bind TCP listener to {}:{}: {}",
                config.common.host,
                config.common.port,
                e
            );
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
