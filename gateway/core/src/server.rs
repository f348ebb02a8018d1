//! HTTP Routes and Error Mapping
//!
//! The axum layer over [`Gateway`]: one ask route plus a liveness probe.
//! All caller-facing error shaping happens here so the Gateway itself stays
//! transport-agnostic.
//!
//! # Error Contract
//!
//! - Backend answered non-success: same status back, body
//!   `{"error": "Failed to communicate with <backend> backend"}`.
//! - Anything else (unreachable backend, timeout, malformed request body):
//!   `500` with `{"error": "Internal Server Error"}`.
//!
//! Details are logged server-side and never forwarded to callers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::{error, warn};

use crate::api::AskRequest;
use crate::backend::RetrievalBackend;
use crate::error::BackendError;
use crate::gateway::Gateway;

/// Shared state for the ask routes.
pub struct AppState<B: RetrievalBackend> {
    gateway: Gateway<B>,
}

impl<B: RetrievalBackend + 'static> AppState<B> {
    /// Wrap a gateway for use as router state.
    pub fn new(gateway: Gateway<B>) -> Self {
        Self { gateway }
    }
}

impl<B: RetrievalBackend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
        }
    }
}

/// Build the gateway router.
///
/// Routes:
/// - `POST /api/v1/ask`: forward a question, answer with the ask envelope
/// - `GET /healthz`: gateway process liveness (does not probe the backend)
pub fn build_router<B: RetrievalBackend + 'static>(state: AppState<B>) -> Router {
    Router::new()
        .route("/api/v1/ask", post(ask_handler::<B>))
        .route("/healthz", get(healthz_handler))
        .with_state(state)
}

/// `POST /api/v1/ask`
///
/// The JSON rejection branch covers malformed client bodies; those surface
/// as the generic 500 like every other unexpected failure.
async fn ask_handler<B: RetrievalBackend + 'static>(
    State(state): State<AppState<B>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected malformed ask request body");
            return internal_error_response();
        }
    };

    match state.gateway.ask(&request.question).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(BackendError::Upstream { status, detail }) => {
            error!(status, detail = %detail, "Backend returned an error");
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let message =
                format!("Failed to communicate with {} backend", state.gateway.backend_name());
            (code, Json(json!({ "error": message }))).into_response()
        }
        Err(BackendError::Transport(error)) => {
            error!(error = %error, "Ask request failed");
            internal_error_response()
        }
    }
}

/// `GET /healthz`
async fn healthz_handler() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal Server Error" })),
    )
        .into_response()
}
