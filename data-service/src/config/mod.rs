use service_core::config::{self as core_config, get_env};
use service_core::error::AppError;
use std::fmt;
use std::time::Duration;

/// Database holding the record collection.
pub const DATABASE_NAME: &str = "flask_db";
/// Collection every record is written to.
pub const COLLECTION_NAME: &str = "data";
/// Upper bound on server selection before an operation fails.
pub const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone)]
pub struct DataConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub store_backend: StoreBackend,
    pub timestamps: TimestampZone,
}

#[derive(Clone)]
pub struct MongoConfig {
    pub username: String,
    pub password: String,
    pub host: String,
    /// Kept textual; a bad value surfaces as a connection failure.
    pub port: String,
    pub database: String,
    pub collection: String,
    pub server_selection_timeout: Duration,
}

/// Which store the bootstrapper opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

/// Clock used for the `created_at` stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampZone {
    #[default]
    Local,
    Utc,
}

impl DataConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common = core_config::Config::load()?;

        Ok(DataConfig {
            common,
            mongodb: MongoConfig::from_env()?,
            store_backend: get_env("STORE_BACKEND", Some("mongo"))?
                .parse()
                .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            timestamps: get_env("CREATED_AT_TIMEZONE", Some("local"))?
                .parse()
                .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
        })
    }
}

impl MongoConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(MongoConfig {
            username: get_env("MONGO_USERNAME", Some("admin"))?,
            password: get_env("MONGO_PASSWORD", Some("admin"))?,
            host: get_env("MONGO_HOST", Some("localhost"))?,
            port: get_env("MONGO_PORT", Some("27017"))?,
            database: DATABASE_NAME.to_string(),
            collection: COLLECTION_NAME.to_string(),
            server_selection_timeout: SERVER_SELECTION_TIMEOUT,
        })
    }

    /// Credentialed connection string authenticating against `admin`.
    pub fn connection_uri(&self) -> String {
        format!(
            "mongodb://{}:{}@{}:{}/?authSource=admin",
            urlencoding::encode(&self.username),
            urlencoding::encode(&self.password),
            self.host,
            self.port
        )
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("server_selection_timeout", &self.server_selection_timeout)
            .finish()
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

impl std::str::FromStr for TimestampZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(TimestampZone::Local),
            "utc" => Ok(TimestampZone::Utc),
            _ => Err(format!("Invalid timestamp zone: {}", s)),
        }
    }
}
