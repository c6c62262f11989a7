pub mod metrics;
pub mod mock;
pub mod store;

pub use self::metrics::{get_metrics, init_metrics, record_store_operation};
pub use mock::MockStore;
pub use store::{bootstrap, DocumentStore, MongoStore};
