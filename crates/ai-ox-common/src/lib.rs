#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(clippy::pedantic, clippy::unwrap_used)]

//! Shared HTTP client abstractions for AI provider clients
//!
//! This crate provides the request plumbing used by the ai-ox provider
//! clients: authenticated JSON POSTs, error-body parsing and a line decoder
//! for `data: ` event streams.

pub mod error;
pub mod request_builder;
pub mod streaming;

pub use error::CommonRequestError;
pub use request_builder::{AuthMethod, Endpoint, RequestBuilder, RequestConfig};
pub use streaming::SseParser;

/// Re-export common types for convenience
pub use futures_util::stream::BoxStream;
