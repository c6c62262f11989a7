//! Load generator against an in-process server.

use axum::{http::StatusCode, routing::get, Router};
use load_generator::{run, LoadConfig, Outcome};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

async fn start_backend(status: StatusCode) -> SocketAddr {
    let app = Router::new().route("/data", get(move || async move { (status, "{}") }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

#[tokio::test]
async fn counts_every_request_in_whole_waves() {
    let addr = start_backend(StatusCode::OK).await;
    let config = LoadConfig {
        url: format!("http://{}/data", addr),
        duration: Duration::from_millis(300),
        concurrency: 4,
        request_timeout: Duration::from_secs(5),
    };

    let report = run(&config).await.unwrap();

    assert!(report.waves >= 1);
    assert_eq!(report.total_requests, report.waves * 4);
    assert_eq!(report.count(Outcome::Status(200)), report.total_requests);
    assert!(report.elapsed >= Duration::from_millis(300));
}

#[tokio::test]
async fn records_error_statuses_verbatim() {
    let addr = start_backend(StatusCode::SERVICE_UNAVAILABLE).await;
    let config = LoadConfig {
        url: format!("http://{}/data", addr),
        duration: Duration::from_millis(100),
        concurrency: 2,
        request_timeout: Duration::from_secs(5),
    };

    let report = run(&config).await.unwrap();

    assert_eq!(report.count(Outcome::Status(503)), report.total_requests);
    assert_eq!(report.count(Outcome::Error), 0);
}

#[tokio::test]
async fn unreachable_target_counts_as_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = LoadConfig {
        url: format!("http://{}/data", addr),
        duration: Duration::from_millis(100),
        concurrency: 3,
        request_timeout: Duration::from_secs(1),
    };

    let report = run(&config).await.unwrap();

    assert!(report.total_requests >= 3);
    assert_eq!(report.count(Outcome::Error), report.total_requests);
}
