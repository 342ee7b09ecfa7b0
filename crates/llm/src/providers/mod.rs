//! Completion provider implementations.

pub mod mock;
pub mod openai;

pub use mock::{MockClient, MockEvent};
pub use openai::{OpenAiClient, SseDecoder};
