use clap::Parser;
use load_generator::{run, LoadConfig};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "load-generator")]
#[command(about = "Hammer an endpoint with waves of concurrent GET requests", long_about = None)]
struct Cli {
    /// Target URL
    #[arg(short, long, default_value = "http://127.0.0.1:5000/data")]
    url: String,

    /// Wall-clock duration of the test in seconds
    #[arg(short, long, default_value_t = 60)]
    duration_secs: u64,

    /// Requests per wave
    #[arg(short, long, default_value_t = 50)]
    concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value_t = 5)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = LoadConfig {
        url: cli.url,
        duration: Duration::from_secs(cli.duration_secs),
        concurrency: cli.concurrency,
        request_timeout: Duration::from_secs(cli.timeout_secs),
    };

    println!(
        "Starting load test: {} concurrent requests for {} seconds",
        config.concurrency,
        config.duration.as_secs()
    );

    let report = run(&config).await?;

    println!("Total requests: {}", report.total_requests);
    println!("Completed in {:.1} seconds", report.elapsed.as_secs_f64());
    for (outcome, count) in &report.outcomes {
        println!("  {}: {}", outcome, count);
    }

    Ok(())
}
