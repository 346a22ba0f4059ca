//! Standalone batch trigger.
//!
//! Posts to the API's `/agent/run` endpoint with the shared service key,
//! prints the outcome, and exits non-zero on any failure. Intended to be
//! invoked by an external scheduler (cron); the API has no scheduler of its
//! own.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Batch runs iterate every tenant and may call the text-generation service;
/// give them a generous ceiling.
const RUN_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Deserialize)]
struct RunOutcome {
    message: String,
    items_processed: u64,
    logs_created: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(outcome) => {
            println!("SUCCESS: {}", outcome.message);
            println!("Items processed: {}", outcome.items_processed);
            println!("Logs created: {}", outcome.logs_created);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<RunOutcome> {
    let backend_url =
        std::env::var("BACKEND_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let service_key = std::env::var("SERVICE_KEY").context("SERVICE_KEY not set")?;

    let client = reqwest::Client::builder()
        .timeout(RUN_TIMEOUT)
        .build()
        .context("failed to build HTTP client")?;

    let response = client
        .post(format!("{}/agent/run", backend_url.trim_end_matches('/')))
        .bearer_auth(service_key)
        .send()
        .await
        .context("agent run request failed")?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("agent run returned {status}: {body}");
    }

    response
        .json()
        .await
        .context("agent run returned an unparsable body")
}
