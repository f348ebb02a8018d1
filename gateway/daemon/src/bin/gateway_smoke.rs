//! Gateway Smoke Check
//!
//! Manual integration check for a running gateway: POSTs one fixed legal
//! question to `/api/v1/ask` and prints the status line and response body.
//! Useful while wiring up a backend; not part of the automated test suite.
//!
//! ```bash
//! gateway-smoke
//! gateway-smoke --gateway-url http://staging:3000
//! ```

use anyhow::{Context, Result};
use clap::Parser;

/// The fixed question sent on every run.
const SMOKE_QUESTION: &str = "What is the punishment for murder?";

/// Gateway smoke check - one fixed question against a running gateway
#[derive(Parser, Debug)]
#[command(name = "gateway-smoke")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the gateway under test
    #[arg(long, env = "GATEWAY_URL", default_value = "http://127.0.0.1:3000")]
    gateway_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let url = format!("{}/api/v1/ask", args.gateway_url.trim_end_matches('/'));

    println!("POST {url}");
    println!("Question: {SMOKE_QUESTION}");

    let response = reqwest::Client::new()
        .post(&url)
        .json(&serde_json::json!({ "question": SMOKE_QUESTION }))
        .send()
        .await
        .context("Request failed; is the gateway running?")?;

    println!("Status: {}", response.status());

    let body = response
        .text()
        .await
        .context("Failed to read response body")?;
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => println!("{body}"),
    }

    Ok(())
}
