//! Gateway - The Ask Orchestrator
//!
//! The Gateway owns one ask end to end: forward the question to the
//! retrieval backend, reshape the raw reply's citation blob into structured
//! records, and hand back the caller-facing envelope.
//!
//! # Design Philosophy
//!
//! The Gateway is transport-agnostic. It doesn't know whether it's mounted
//! behind axum, driven from a test, or called by some future surface. HTTP
//! status mapping lives in [`crate::server`]; parsing lives in
//! [`crate::citation`]; this type just sequences them.

use std::sync::Arc;

use crate::api::AskResponse;
use crate::backend::RetrievalBackend;
use crate::citation::parse_context_used;
use crate::error::BackendError;

/// The Gateway - orchestrates ask requests against one backend.
pub struct Gateway<B: RetrievalBackend> {
    /// Retrieval backend
    backend: Arc<B>,
}

impl<B: RetrievalBackend + 'static> Gateway<B> {
    /// Create a new Gateway over the given backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Name of the underlying backend, for logs and error text.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Ask one question and assemble the response envelope.
    ///
    /// The question is forwarded verbatim. Citations come from the reply's
    /// `context_used` field; the sentinel and absent fields both produce an
    /// empty list. There is no retry on any failure.
    ///
    /// # Errors
    ///
    /// Propagates [`BackendError`] from the backend untouched; the caller
    /// decides how to surface it.
    pub async fn ask(&self, question: &str) -> Result<AskResponse, BackendError> {
        let reply = self.backend.ask(question).await?;

        let parsed = parse_context_used(reply.context_used.as_deref());
        let sources = parsed.into_citations();

        tracing::debug!(
            backend = self.backend.name(),
            sources = sources.len(),
            "Ask completed"
        );

        Ok(AskResponse {
            answer: reply.response,
            sources,
        })
    }

    /// Check whether the backend is reachable.
    pub async fn health_check(&self) -> bool {
        self.backend.health_check().await
    }
}

impl<B: RetrievalBackend> Clone for Gateway<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}
