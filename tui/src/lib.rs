//! Counsel TUI - Terminal chat client for Counsel legal research
//!
//! This crate provides a full-screen terminal UI for asking legal
//! questions through the Counsel gateway and reading cited answers.
//!
//! # Architecture
//!
//! - **App**: Event loop, one ask in flight at a time
//! - **Chat**: Transcript and turn state machine, UI-free and testable
//! - **Ui**: Pure state-to-lines rendering with source disclosures
//! - **GatewayClient**: Thin HTTP client for the gateway's ask endpoint

pub mod app;
pub mod chat;
pub mod gateway_client;
pub mod theme;
pub mod ui;

pub use app::App;
