//! Wire Envelopes for the Ask Route
//!
//! Request and response shapes exchanged between clients and the gateway.
//! These are the only shapes clients ever see; the raw backend reply
//! ([`crate::backend::BackendReply`]) never crosses the gateway boundary.

use serde::{Deserialize, Serialize};

use crate::citation::Citation;

/// A question submitted to `POST /api/v1/ask`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    /// The user's question, sent verbatim (no trimming or normalization).
    pub question: String,
}

impl AskRequest {
    /// Create a request from a question.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// The gateway's answer envelope for a successful ask.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    /// The backend's answer text, passed through unchanged.
    pub answer: String,
    /// Structured citations extracted from the backend's `context_used`
    /// blob. Empty when the backend found no relevant context.
    pub sources: Vec<Citation>,
}
