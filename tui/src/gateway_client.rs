//! Gateway Client
//!
//! Thin HTTP client for the Counsel gateway's ask endpoint. The client
//! never retries and never interprets failures; callers fold any error
//! into a failed turn.

use anyhow::Result;
use gateway_core::backend::http::DEFAULT_REQUEST_TIMEOUT_SECS;
use gateway_core::{AskRequest, AskResponse};
use std::time::Duration;

/// Gateway address used when `GATEWAY_URL` is not set.
pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:3000";

/// HTTP client for the gateway's question endpoint.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl GatewayClient {
    /// Creates a client for the given gateway address.
    ///
    /// A `request_timeout_secs` of 0 disables the request timeout so
    /// slow retrieval pipelines can finish.
    #[must_use]
    pub fn new(base_url: impl Into<String>, request_timeout_secs: u64) -> Self {
        let mut builder = reqwest::Client::builder();
        if request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(request_timeout_secs));
        }

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client: builder.build().expect("Failed to create HTTP client"),
        }
    }

    /// Creates a client from the `GATEWAY_URL` environment variable,
    /// falling back to [`DEFAULT_GATEWAY_URL`].
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("GATEWAY_URL").unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string());
        Self::new(base_url, DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// The gateway address this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn ask_url(&self) -> String {
        format!("{}/api/v1/ask", self.base_url)
    }

    /// Sends one question and returns the gateway's answer.
    ///
    /// The question is sent exactly as given. Any transport error or
    /// non-success status is an error; there is no retry.
    pub async fn ask(&self, question: &str) -> Result<AskResponse> {
        let response = self
            .http_client
            .post(self.ask_url())
            .json(&AskRequest::new(question))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gateway returned {status}: {body}");
        }

        Ok(response.json::<AskResponse>().await?)
    }
}

impl Default for GatewayClient {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY_URL, DEFAULT_REQUEST_TIMEOUT_SECS)
    }
}
