//! Retrieval Backend Abstraction
//!
//! The gateway never talks to the retrieval service directly; it goes
//! through the [`RetrievalBackend`] trait so tests can substitute mocks
//! and the production HTTP client stays swappable.

pub mod http;
pub mod traits;

pub use http::HttpRetrievalBackend;
pub use traits::{BackendReply, RetrievalBackend};
