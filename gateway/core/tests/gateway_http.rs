//! Integration Tests for the Gateway HTTP Contract
//!
//! These tests stand up a stub retrieval backend on an ephemeral port and
//! drive the gateway router through real HTTP, verifying:
//!
//! 1. **Round trip**: a question comes back with the answer and parsed
//!    citations
//! 2. **Sentinel handling**: the no-context sentinel yields empty sources
//! 3. **Pass-through failures**: upstream statuses survive unchanged, with
//!    the fixed error body and exactly one backend request (no retry)
//! 4. **Generic failures**: unreachable backend and malformed client bodies
//!    both collapse to the generic 500
//! 5. **Forwarding**: the question reaches the backend verbatim with
//!    `use_local: false`

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use pretty_assertions::assert_eq;

use gateway_core::{build_router, AppState, Gateway, HttpRetrievalBackend};

// ============================================================================
// Stub Retrieval Backend
// ============================================================================

/// What the stub backend answers with.
#[derive(Clone)]
enum UpstreamMode {
    /// Answer 200 with this reply shape.
    Reply {
        response: String,
        context_used: Option<String>,
    },
    /// Answer this status with a fixed raw body.
    Fail { status: u16, body: &'static str },
}

#[derive(Clone)]
struct UpstreamState {
    /// Number of /chat requests received.
    requests: Arc<AtomicUsize>,
    /// Request bodies seen, for forwarding assertions.
    seen: Arc<Mutex<Vec<serde_json::Value>>>,
    mode: UpstreamMode,
}

impl UpstreamState {
    fn new(mode: UpstreamMode) -> Self {
        Self {
            requests: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
            mode,
        }
    }
}

async fn chat_handler(
    State(state): State<UpstreamState>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    state.seen.lock().unwrap().push(body);

    match &state.mode {
        UpstreamMode::Reply {
            response,
            context_used,
        } => {
            let mut reply = serde_json::json!({ "response": response });
            if let Some(context) = context_used {
                reply["context_used"] = serde_json::Value::String(context.clone());
            }
            (StatusCode::OK, Json(reply)).into_response()
        }
        UpstreamMode::Fail { status, body } => (
            StatusCode::from_u16(*status).unwrap(),
            (*body).to_string(),
        )
            .into_response(),
    }
}

/// Serve a router on an ephemeral local port.
async fn spawn_server(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Stand up a stub backend, returning its state handle and address.
async fn spawn_upstream(mode: UpstreamMode) -> (UpstreamState, SocketAddr) {
    let state = UpstreamState::new(mode);
    let router = Router::new()
        .route("/chat", post(chat_handler))
        .with_state(state.clone());
    let addr = spawn_server(router).await;
    (state, addr)
}

/// Stand up a gateway pointed at the given backend address.
async fn spawn_gateway(upstream: SocketAddr) -> SocketAddr {
    let backend = HttpRetrievalBackend::new(format!("http://{upstream}"), 5);
    let state = AppState::new(Gateway::new(backend));
    spawn_server(build_router(state)).await
}

async fn post_question(gateway: SocketAddr, question: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{gateway}/api/v1/ask"))
        .json(&serde_json::json!({ "question": question }))
        .send()
        .await
        .unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn ask_round_trips_answer_and_citations() {
    let (_upstream, upstream_addr) = spawn_upstream(UpstreamMode::Reply {
        response: "Murder is punished under Section 302.".to_string(),
        context_used: Some(
            "Source: Act: IPC, Section: 302\nContent: Punishment for murder.\n\n".to_string(),
        ),
    })
    .await;
    let gateway = spawn_gateway(upstream_addr).await;

    let response = post_question(gateway, "What is the punishment for murder?").await;

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["answer"], "Murder is punished under Section 302.");
    assert_eq!(body["sources"].as_array().unwrap().len(), 1);
    assert_eq!(
        body["sources"][0]["metadata"]["source"],
        "Act: IPC, Section: 302"
    );
    assert_eq!(body["sources"][0]["content"], "Punishment for murder.");
    assert_eq!(body["sources"][0]["metadata"]["page_label"], "N/A");
    assert_eq!(body["sources"][0]["metadata"]["total_pages"], 1);
    assert_eq!(body["sources"][0]["metadata"]["page"], 1);
}

#[tokio::test]
async fn sentinel_context_yields_empty_sources() {
    let (_upstream, upstream_addr) = spawn_upstream(UpstreamMode::Reply {
        response: "I found no supporting law.".to_string(),
        context_used: Some("No relevant legal context found.".to_string()),
    })
    .await;
    let gateway = spawn_gateway(upstream_addr).await;

    let response = post_question(gateway, "Is teleportation regulated?").await;

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["sources"], serde_json::json!([]));
}

#[tokio::test]
async fn absent_context_yields_empty_sources() {
    let (_upstream, upstream_addr) = spawn_upstream(UpstreamMode::Reply {
        response: "Short answer.".to_string(),
        context_used: None,
    })
    .await;
    let gateway = spawn_gateway(upstream_addr).await;

    let response = post_question(gateway, "Anything at all?").await;

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["sources"], serde_json::json!([]));
}

#[tokio::test]
async fn upstream_503_passes_through_without_retry() {
    let (upstream, upstream_addr) = spawn_upstream(UpstreamMode::Fail {
        status: 503,
        body: "Service Unavailable",
    })
    .await;
    let gateway = spawn_gateway(upstream_addr).await;

    let response = post_question(gateway, "What is the punishment for murder?").await;

    assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to communicate with Counsel backend");
    // No retry: exactly one backend request was made.
    assert_eq!(upstream.requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn upstream_json_error_body_is_tolerated() {
    let (upstream, upstream_addr) = spawn_upstream(UpstreamMode::Fail {
        status: 500,
        body: r#"{"detail": "backend exploded"}"#,
    })
    .await;
    let gateway = spawn_gateway(upstream_addr).await;

    let response = post_question(gateway, "q").await;

    // Still the pass-through shape, not the generic transport 500.
    assert_eq!(
        response.status(),
        reqwest::StatusCode::INTERNAL_SERVER_ERROR
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to communicate with Counsel backend");
    assert_eq!(upstream.requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unreachable_backend_maps_to_generic_500() {
    // Grab a port with nothing listening on it.
    let dead_addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let gateway = spawn_gateway(dead_addr).await;

    let response = post_question(gateway, "hello?").await;

    assert_eq!(
        response.status(),
        reqwest::StatusCode::INTERNAL_SERVER_ERROR
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Internal Server Error");
}

#[tokio::test]
async fn malformed_request_body_maps_to_generic_500() {
    let (upstream, upstream_addr) = spawn_upstream(UpstreamMode::Reply {
        response: "unused".to_string(),
        context_used: None,
    })
    .await;
    let gateway = spawn_gateway(upstream_addr).await;

    let response = reqwest::Client::new()
        .post(format!("http://{gateway}/api/v1/ask"))
        .header("content-type", "application/json")
        .body("this is not json")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        reqwest::StatusCode::INTERNAL_SERVER_ERROR
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Internal Server Error");
    // The backend is never consulted for a request we could not read.
    assert_eq!(upstream.requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn question_is_forwarded_verbatim() {
    let (upstream, upstream_addr) = spawn_upstream(UpstreamMode::Reply {
        response: "ok".to_string(),
        context_used: None,
    })
    .await;
    let gateway = spawn_gateway(upstream_addr).await;

    let question = "  What about anticipatory bail?  ";
    let response = post_question(gateway, question).await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let seen = upstream.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0]["query"], question);
    assert_eq!(seen[0]["use_local"], false);
}

#[tokio::test]
async fn healthz_answers_ok() {
    let (_upstream, upstream_addr) = spawn_upstream(UpstreamMode::Reply {
        response: String::new(),
        context_used: None,
    })
    .await;
    let gateway = spawn_gateway(upstream_addr).await;

    let response = reqwest::Client::new()
        .get(format!("http://{gateway}/healthz"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}
