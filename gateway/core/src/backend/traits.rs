//! Retrieval Backend Trait
//!
//! Trait definition for the external retrieval-augmented-generation service.
//! This abstraction lets the gateway work against the production HTTP
//! service or an in-process mock without changing core logic.
//!
//! # Design Philosophy
//!
//! The trait covers exactly what the gateway needs:
//! - Sending one question and receiving one raw reply
//! - Health checking the backend
//!
//! Implementations handle service-specific details (URLs, timeouts, auth).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// Raw reply from the backend's chat endpoint.
///
/// `context_used` deserializes as `Option` so an absent field and the
/// no-context sentinel both end up on the empty-citations path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendReply {
    /// The backend's answer text.
    pub response: String,
    /// Semi-structured citation blob, if the backend sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_used: Option<String>,
}

/// Retrieval backend trait
///
/// Implement this trait to substitute a different retrieval service or a
/// test double.
#[async_trait]
pub trait RetrievalBackend: Send + Sync {
    /// Get the backend name used in logs and caller-facing error text.
    fn name(&self) -> &str;

    /// Send one question and wait for the complete reply.
    ///
    /// The query is forwarded verbatim; the gateway does not trim or
    /// normalize it.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Upstream`] when the backend answers with a
    /// non-success status and [`BackendError::Transport`] when it cannot be
    /// reached or its reply cannot be read.
    async fn ask(&self, query: &str) -> Result<BackendReply, BackendError>;

    /// Check if the backend is reachable.
    async fn health_check(&self) -> bool;
}
