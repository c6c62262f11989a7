//! data-service: CRUD-style HTTP access to a MongoDB record collection, with
//! liveness and readiness probes for orchestration.
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::{build_router, AppState, Application};
