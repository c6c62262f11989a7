//! HTTP handlers for data-service.

pub mod data;
pub mod health;
pub mod index;
pub mod metrics;

pub use data::{create_record, list_records};
pub use health::{health_check, readiness_check};
pub use index::index;
pub use self::metrics::metrics_endpoint;
