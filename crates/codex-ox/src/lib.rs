//! OpenAI legacy completions adapter for Rust
//!
//! This crate lets a chat-style, multi-turn conversation drive the
//! single-prompt `/v1/completions` endpoint:
//! - Normalization of string-typed editor options into a typed request
//! - Compilation of the conversation into one prompt
//! - Streaming and non-streaming decoding of the response
//! - Bearer and `api-key` authentication
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use codex_ox::{DefaultHost, Message, OpenAICodex, RawOptions};
//! use futures_util::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OpenAICodex::new("complete", RawOptions::new(), Arc::new(DefaultHost))?;
//!
//!     let mut chunks = provider.request(&[
//!         Message::system("You complete Rust code."),
//!         Message::user("fn fibonacci(n: u64) -> u64 {"),
//!     ]);
//!
//!     while let Some(chunk) = chunks.next().await {
//!         print!("{}", chunk?.content());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod host;
pub mod message;
pub mod options;
pub mod prompt;
pub mod request;
pub mod response;

// Re-export main types
pub use auth::{ApiCredential, AuthMode};
pub use client::{CommandType, OpenAICodex};
pub use error::CodexError;
pub use host::{DefaultHost, ProviderHost};
pub use message::{ContentPart, Message, Role};
pub use options::{CompletionOptions, RawOptions};
pub use prompt::compile_prompt;
pub use request::CompletionRequest;
pub use response::{CompletionChoice, CompletionResponse, ImageChunk, OutputChunk, Usage};
