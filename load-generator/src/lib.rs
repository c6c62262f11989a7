//! Wave-based load generator.
//!
//! Each wave fires `concurrency` GET requests at once and waits for all of
//! them before the next wave starts. Waves continue until the configured
//! duration has elapsed; the wave in flight at the deadline still completes.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinSet;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct LoadConfig {
    pub url: String,
    pub duration: Duration,
    pub concurrency: usize,
    pub request_timeout: Duration,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5000/data".to_string(),
            duration: Duration::from_secs(60),
            concurrency: 50,
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// Result of one request: the HTTP status, or `Error` when no response
/// arrived (connect failure, timeout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    Status(u16),
    Error,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Status(code) => write!(f, "{}", code),
            Outcome::Error => f.write_str("Error"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_requests: u64,
    pub waves: u64,
    pub elapsed: Duration,
    pub outcomes: BTreeMap<Outcome, u64>,
}

impl LoadReport {
    pub fn count(&self, outcome: Outcome) -> u64 {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }
}

pub async fn run(config: &LoadConfig) -> Result<LoadReport, LoadError> {
    if config.concurrency == 0 {
        return Err(LoadError::InvalidConfig(
            "concurrency must be at least 1".to_string(),
        ));
    }

    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;
    let url: Arc<str> = Arc::from(config.url.as_str());
    let completed = Arc::new(AtomicU64::new(0));
    let mut outcomes: BTreeMap<Outcome, u64> = BTreeMap::new();
    let mut waves = 0u64;

    let start = Instant::now();
    while start.elapsed() < config.duration {
        let mut wave = JoinSet::new();
        for _ in 0..config.concurrency {
            let client = client.clone();
            let url = Arc::clone(&url);
            let completed = Arc::clone(&completed);
            wave.spawn(async move {
                let outcome = make_request(&client, &url).await;
                completed.fetch_add(1, Ordering::Relaxed);
                outcome
            });
        }

        while let Some(joined) = wave.join_next().await {
            let outcome = joined.unwrap_or_else(|e| {
                tracing::warn!("Request task failed: {}", e);
                Outcome::Error
            });
            *outcomes.entry(outcome).or_insert(0) += 1;
        }
        waves += 1;
        tracing::debug!(wave = waves, "Wave complete");
    }

    Ok(LoadReport {
        total_requests: completed.load(Ordering::Relaxed),
        waves,
        elapsed: start.elapsed(),
        outcomes,
    })
}

async fn make_request(client: &reqwest::Client, url: &str) -> Outcome {
    match client.get(url).send().await {
        Ok(response) => Outcome::Status(response.status().as_u16()),
        Err(e) => {
            tracing::trace!("Request failed: {}", e);
            Outcome::Error
        }
    }
}
