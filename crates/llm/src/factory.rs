//! LLM provider factory.
//!
//! Creates a completion client from the configured provider name,
//! endpoint override, and API key.

use crate::client::LlmClient;
use crate::providers::openai::{OpenAiClient, OPENAI_BASE_URL};
use pp_core::{AppConfig, AppError, AppResult};
use std::sync::Arc;

/// Default base URL of Ollama's OpenAI-compatible API.
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

/// Create a completion client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("openai", "ollama")
/// * `endpoint` - Optional custom base URL
/// * `api_key` - Optional API key (required by OpenAI)
///
/// # Errors
/// Returns a completion error if the provider is unknown or a required
/// secret is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "openai" => {
            let Some(key) = api_key else {
                return Err(AppError::Completion(
                    "OpenAI provider requires an API key (set OPENAI_API_KEY)".to_string(),
                ));
            };
            let base_url = endpoint.unwrap_or(OPENAI_BASE_URL);
            Ok(Arc::new(OpenAiClient::with_base_url(
                "openai",
                base_url,
                Some(key.to_string()),
            )))
        }
        "ollama" => {
            let base_url = endpoint.unwrap_or(OLLAMA_BASE_URL);
            Ok(Arc::new(OpenAiClient::with_base_url(
                "ollama",
                base_url,
                api_key.map(str::to_string),
            )))
        }
        _ => Err(AppError::Completion(format!("Unknown provider: {}", provider))),
    }
}

/// Create the client selected by the application settings.
pub fn client_from_config(config: &AppConfig) -> AppResult<Arc<dyn LlmClient>> {
    create_client(
        &config.provider,
        config.endpoint.as_deref(),
        config.api_key.as_deref(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_openai_client() {
        let client = create_client("openai", None, Some("sk-test")).unwrap();
        assert_eq!(client.provider_name(), "openai");
    }

    #[test]
    fn test_openai_requires_api_key() {
        match create_client("openai", None, None) {
            Err(AppError::Completion(msg)) => assert!(msg.contains("requires an API key")),
            Err(other) => panic!("Unexpected error: {}", other),
            Ok(_) => panic!("Expected error for OpenAI without API key"),
        }
    }

    #[test]
    fn test_create_ollama_without_key() {
        let client = create_client("Ollama", Some("http://localhost:8080/v1"), None).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None, None) {
            Err(err) => assert!(err.to_string().contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
