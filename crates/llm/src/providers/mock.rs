//! Scripted provider for tests and offline development.

use crate::client::{ChatRequest, LlmClient, LlmStream, StreamChunk};
use pp_core::{AppError, AppResult};
use std::sync::{Arc, Mutex};

/// One scripted stream event.
#[derive(Debug, Clone)]
pub enum MockEvent {
    /// Emit a content delta
    Delta(String),
    /// Fail the stream with a completion error
    Fail(String),
}

/// Provider that replays a fixed script and records every request.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    script: Vec<MockEvent>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockClient {
    /// Reply with the given deltas, then end the stream normally.
    pub fn with_deltas<I, S>(deltas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_script(deltas.into_iter().map(|d| MockEvent::Delta(d.into())).collect())
    }

    /// Replay an arbitrary script. A `Fail` event ends the stream.
    pub fn with_script(script: Vec<MockEvent>) -> Self {
        Self {
            script,
            requests: Arc::default(),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn stream(&self, request: &ChatRequest) -> AppResult<LlmStream> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let mut items: Vec<AppResult<StreamChunk>> = Vec::new();
        let mut failed = false;
        for event in &self.script {
            match event {
                MockEvent::Delta(text) => items.push(Ok(StreamChunk::delta(text.clone()))),
                MockEvent::Fail(msg) => {
                    items.push(Err(AppError::Completion(msg.clone())));
                    failed = true;
                    break;
                }
            }
        }
        if !failed {
            items.push(Ok(StreamChunk::end()));
        }

        Ok(Box::pin(futures::stream::iter(items)))
    }
}
