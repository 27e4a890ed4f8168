//! Health check command - checks a running warehouse server.

use std::time::Duration;

use warehouse::protocol::HealthResponse;

use crate::cli::HealthArgs;

/// Build the health endpoint URL from a base URL.
fn health_url(base: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.ends_with("/health") {
        base.to_string()
    } else {
        format!("{base}/health")
    }
}

/// Run the health check command
pub async fn run(args: &HealthArgs) -> Result<(), Box<dyn std::error::Error>> {
    let url = health_url(&args.url);
    let timeout = Duration::from_secs(args.timeout);

    let client = reqwest::Client::builder().timeout(timeout).build()?;

    match client.get(&url).send().await {
        Ok(response) if response.status().is_success() => {
            let body: HealthResponse = response.json().await?;
            if body.status == "healthy" {
                println!("healthy: backend={}", body.backend);
                Ok(())
            } else {
                eprintln!("unhealthy: server returned status {}", body.status);
                std::process::exit(1);
            }
        }
        Ok(response) => {
            eprintln!(
                "unhealthy: server returned HTTP status {}",
                response.status()
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("unhealthy: failed to connect to {}: {}", url, e);
            std::process::exit(1);
        }
    }
}
