//! HTTP Retrieval Backend
//!
//! Production [`RetrievalBackend`] implementation for the Counsel retrieval
//! service.
//!
//! # Backend API
//!
//! The service exposes a single endpoint:
//! - `POST {base}/chat` with body `{"query": ..., "use_local": false}`,
//!   answering `{"response": ..., "context_used": ...}`.

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{BackendReply, RetrievalBackend};
use crate::error::BackendError;

/// Default base URL of the retrieval backend.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Default per-request timeout towards the backend, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// HTTP client for the retrieval backend.
#[derive(Clone)]
pub struct HttpRetrievalBackend {
    /// Base URL without a trailing slash.
    base_url: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpRetrievalBackend {
    /// Create a backend client for a base URL.
    ///
    /// `request_timeout_secs` bounds each request; `0` leaves requests
    /// unbounded.
    pub fn new(base_url: impl Into<String>, request_timeout_secs: u64) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let mut builder = reqwest::Client::builder();
        if request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(request_timeout_secs));
        }

        Self {
            base_url,
            http_client: builder.build().expect("Failed to create HTTP client"),
        }
    }

    /// Create from environment variables.
    ///
    /// Reads `BACKEND_URL`, falling back to [`DEFAULT_BACKEND_URL`], with
    /// the default request timeout.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        Self::new(base_url, DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the chat endpoint URL
    fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url)
    }
}

impl Default for HttpRetrievalBackend {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL, DEFAULT_REQUEST_TIMEOUT_SECS)
    }
}

#[async_trait]
impl RetrievalBackend for HttpRetrievalBackend {
    fn name(&self) -> &'static str {
        "Counsel"
    }

    async fn ask(&self, query: &str) -> Result<BackendReply, BackendError> {
        let body = serde_json::json!({
            "query": query,
            "use_local": false,
        });

        let response = self
            .http_client
            .post(self.chat_url())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            // An unparsable error body degrades to an empty object; the
            // request itself must not fail over logging detail.
            let detail = response
                .json::<serde_json::Value>()
                .await
                .unwrap_or_else(|_| serde_json::json!({}));
            return Err(BackendError::Upstream { status, detail });
        }

        Ok(response.json::<BackendReply>().await?)
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(&self.base_url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok()
    }
}
