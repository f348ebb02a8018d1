//! Backend Error Types
//!
//! Errors produced while talking to the retrieval backend. The HTTP layer
//! maps these onto the two caller-facing shapes: upstream failures pass the
//! backend's status through, everything else collapses to a generic 500.

use thiserror::Error;

/// Failure while asking the retrieval backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered with a non-success HTTP status.
    ///
    /// `detail` is the backend's error body parsed as JSON, or an empty
    /// object when that body is unparsable. It is logged, never forwarded.
    #[error("backend returned status {status}")]
    Upstream {
        /// HTTP status code the backend responded with.
        status: u16,
        /// Parsed error payload for server-side logging.
        detail: serde_json::Value,
    },

    /// The backend could not be reached or the reply could not be read
    /// (connection refused, timeout, malformed success body).
    #[error("failed to communicate with backend: {0}")]
    Transport(#[from] reqwest::Error),
}

impl BackendError {
    /// The upstream status for pass-through responses, if this is an
    /// upstream failure.
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }
}
