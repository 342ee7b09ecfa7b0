//! LLM client abstraction and request/response types.
//!
//! This module defines the boundary to the external chat-completion service.

use futures::Stream;
use pp_core::AppResult;
use serde::Serialize;
use std::pin::Pin;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    /// Model identifier (e.g., "gpt-4o-mini")
    pub model: String,

    /// Conversation sent to the model
    pub messages: Vec<ChatMessage>,

    /// Enable streaming responses
    pub stream: bool,
}

impl ChatRequest {
    /// Create a request carrying a single user message.
    pub fn single(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(content)],
            stream: false,
        }
    }

    /// Enable streaming for this request.
    pub fn with_streaming(mut self) -> Self {
        self.stream = true;
        self
    }
}

/// A chunk from a streaming completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamChunk {
    /// Incremental text content; may be empty for role or finish events
    pub content: String,

    /// Whether this is the final chunk
    pub done: bool,
}

impl StreamChunk {
    /// A content delta.
    pub fn delta(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            done: false,
        }
    }

    /// The end-of-stream marker.
    pub fn end() -> Self {
        Self {
            content: String::new(),
            done: true,
        }
    }
}

/// Stream of completion chunks.
///
/// Owns the underlying connection; dropping the stream releases it.
pub type LlmStream = Pin<Box<dyn Stream<Item = AppResult<StreamChunk>> + Send>>;

/// Trait for completion providers.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the provider name (e.g., "openai").
    fn provider_name(&self) -> &str;

    /// Open a streaming completion.
    ///
    /// Errors raised before the first chunk (connection, status, auth) are
    /// returned directly; later failures arrive as `Err` items in the stream.
    async fn stream(&self, request: &ChatRequest) -> AppResult<LlmStream>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = ChatRequest::single("gpt-4o-mini", "Summarize: hi").with_streaming();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "Summarize: hi"}],
                "stream": true
            })
        );
    }
}
