//! Gateway Core - Headless Ask-Proxy Logic for Counsel
//!
//! This crate provides the core logic for the Counsel gateway, completely
//! independent of any particular binary. It can be embedded in the daemon,
//! driven from integration tests, or mounted inside another axum router.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Clients                              │
//! │   ┌─────────────┐   ┌──────────────┐   ┌────────────────┐    │
//! │   │ counsel-tui │   │ gateway-smoke│   │  curl / tests  │    │
//! │   └──────┬──────┘   └──────┬───────┘   └───────┬────────┘    │
//! │          └─────────────────┴────────────────────┘            │
//! │                            │                                 │
//! │                   POST /api/v1/ask                           │
//! └────────────────────────────┼─────────────────────────────────┘
//!                              │
//! ┌────────────────────────────┼─────────────────────────────────┐
//! │                       GATEWAY CORE                           │
//! │  ┌─────────────────────────┴───────────────────────────────┐ │
//! │  │                       Gateway                           │ │
//! │  │  ┌──────────┐  ┌───────────────┐  ┌──────────────────┐  │ │
//! │  │  │  server  │  │   citation    │  │     backend      │  │ │
//! │  │  │  (axum)  │  │   (parser)    │  │  (RetrievalBackend)│ │
//! │  │  └──────────┘  └───────────────┘  └────────┬─────────┘  │ │
//! │  └─────────────────────────────────────────────┼───────────┘ │
//! └────────────────────────────────────────────────┼─────────────┘
//!                                                  │
//!                                         POST {base}/chat
//!                                     (retrieval backend)
//! ```
//!
//! # Key Types
//!
//! - [`Gateway`]: orchestrates one ask end to end (backend call + parse)
//! - [`RetrievalBackend`]: trait seam over the external retrieval service
//! - [`HttpRetrievalBackend`]: production reqwest implementation
//! - [`parse_context_used`]: turns the backend's citation blob into records
//! - [`build_router`]: axum router exposing `/api/v1/ask` and `/healthz`
//!
//! # Quick Start
//!
//! ```ignore
//! use gateway_core::{AppState, Gateway, HttpRetrievalBackend, build_router};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = HttpRetrievalBackend::from_env();
//!     let gateway = Gateway::new(backend);
//!     let app = build_router(AppState::new(gateway));
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`api`]: wire envelopes for the ask route
//! - [`backend`]: retrieval backend abstraction and HTTP implementation
//! - [`citation`]: citation records and the `context_used` parser
//! - [`config`]: layered TOML/env/CLI configuration
//! - [`error`]: backend error types
//! - [`gateway`]: the `Gateway` orchestrator
//! - [`server`]: axum routes and error mapping
//!
//! # No UI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework. It's pure request/response logic that can be used anywhere.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod backend;
pub mod citation;
pub mod config;
pub mod error;
pub mod gateway;
pub mod server;

// Re-exports for convenience
pub use api::{AskRequest, AskResponse};
pub use backend::{BackendReply, HttpRetrievalBackend, RetrievalBackend};
pub use citation::{parse_context_used, Citation, CitationMetadata, ParsedContext};
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, GatewayConfig,
};
pub use error::BackendError;
pub use gateway::Gateway;
pub use server::{build_router, AppState};
