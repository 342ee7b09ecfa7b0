//! Completion-service integration for pp.
//!
//! This crate is the boundary to the remote chat-completion endpoint. It
//! exposes a provider-agnostic streaming trait and an OpenAI-compatible
//! implementation.
//!
//! # Providers
//! - **OpenAI**: the public chat completions API (default)
//! - **Ollama**: local runtime through its OpenAI-compatible `/v1` API
//! - **Mock**: scripted replies for tests
//!
//! # Example
//! ```no_run
//! use futures::StreamExt;
//! use pp_llm::{ChatRequest, LlmClient, OpenAiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new("sk-...");
//! let request = ChatRequest::single("gpt-4o-mini", "Hello, world!").with_streaming();
//! let mut stream = client.stream(&request).await?;
//! while let Some(chunk) = stream.next().await {
//!     print!("{}", chunk?.content);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{ChatMessage, ChatRequest, LlmClient, LlmStream, Role, StreamChunk};
pub use factory::{client_from_config, create_client};
pub use providers::{MockClient, MockEvent, OpenAiClient};
