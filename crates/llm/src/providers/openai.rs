//! OpenAI-compatible chat completion provider.
//!
//! Speaks `POST {base_url}/chat/completions` with `stream: true` and decodes
//! the server-sent event stream. Ollama exposes the same API under `/v1`, so
//! this client serves both providers.

use crate::client::{ChatRequest, LlmClient, LlmStream, StreamChunk};
use futures::StreamExt;
use pp_core::{AppError, AppResult};
use serde::Deserialize;

/// Default OpenAI API base URL.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// One `data:` event of the streaming response.
#[derive(Debug, Deserialize)]
struct StreamEvent {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Option<StreamDelta>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Incremental decoder for `text/event-stream` bodies.
///
/// Network chunks do not respect line (or UTF-8) boundaries, so bytes are
/// buffered until a full line is available.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    finished: bool,
}

impl SseDecoder {
    /// Feed raw bytes, returning every chunk completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<AppResult<StreamChunk>> {
        if self.finished {
            return Vec::new();
        }
        self.buffer.extend_from_slice(bytes);

        let mut out = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(item) = self.decode_line(line.trim_end_matches(['\r', '\n'])) {
                out.push(item);
            }
            if self.finished {
                self.buffer.clear();
                break;
            }
        }
        out
    }

    /// Flush a trailing line left without a newline when the body ends.
    ///
    /// A body that closes before `data: [DONE]` ends with an error item.
    pub fn finish(&mut self) -> Vec<AppResult<StreamChunk>> {
        if self.finished {
            return Vec::new();
        }
        let rest = std::mem::take(&mut self.buffer);
        let line = String::from_utf8_lossy(&rest);
        let mut out: Vec<_> = self.decode_line(line.trim_end()).into_iter().collect();

        if !self.finished {
            self.finished = true;
            out.push(Err(AppError::Completion(
                "Stream ended before completion".to_string(),
            )));
        }
        out
    }

    fn decode_line(&mut self, line: &str) -> Option<AppResult<StreamChunk>> {
        // Comments, `event:`/`id:` fields and blank separators carry no content
        let data = line.strip_prefix("data:")?.trim_start();

        if data == "[DONE]" {
            self.finished = true;
            return Some(Ok(StreamChunk::end()));
        }

        let event: StreamEvent = match serde_json::from_str(data) {
            Ok(event) => event,
            Err(e) => {
                return Some(Err(AppError::Completion(format!(
                    "Failed to parse stream event: {}",
                    e
                ))))
            }
        };

        if let Some(error) = event.error {
            return Some(Err(AppError::Completion(error.message)));
        }

        let content: String = event
            .choices
            .into_iter()
            .filter_map(|choice| choice.delta.and_then(|delta| delta.content))
            .collect();

        Some(Ok(StreamChunk::delta(content)))
    }
}

/// OpenAI-compatible completion client.
pub struct OpenAiClient {
    /// Provider name reported to callers
    name: String,

    /// Base URL, without the `/chat/completions` suffix
    base_url: String,

    /// Bearer token, if the endpoint requires one
    api_key: Option<String>,

    /// HTTP client
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a client for the public OpenAI API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url("openai", OPENAI_BASE_URL, Some(api_key.into()))
    }

    /// Create a client against any OpenAI-compatible endpoint.
    pub fn with_base_url(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    fn provider_name(&self) -> &str {
        &self.name
    }

    async fn stream(&self, request: &ChatRequest) -> AppResult<LlmStream> {
        tracing::info!("Starting streaming request to {}", self.name);
        tracing::debug!("Request: {:?}", request);

        let mut request = request.clone();
        request.stream = true;

        let mut builder = self.client.post(self.completions_url()).json(&request);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            AppError::Completion(format!("Failed to send streaming request: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Completion(format!(
                "{} API error ({}): {}",
                self.name, status, error_text
            )));
        }

        let body = response.bytes_stream().map(Some).chain(futures::stream::once(async { None }));

        let stream = body
            .scan(SseDecoder::default(), |decoder, item| {
                let chunks = match item {
                    Some(Ok(bytes)) => decoder.push(&bytes),
                    Some(Err(e)) => vec![Err(AppError::Completion(format!("Stream error: {}", e)))],
                    None => decoder.finish(),
                };
                futures::future::ready(Some(futures::stream::iter(chunks)))
            })
            .flatten();

        Ok(Box::pin(stream))
    }
}
