//! Text-generation collaborators.
//!
//! The explanation pipeline only needs "prompt in, text out". Backends
//! are chosen from `LlmConfig`; tests use `MockLlmClient`.

pub mod gemini;
pub mod mock;
pub mod ollama;

pub use gemini::GeminiClient;
pub use mock::MockLlmClient;
pub use ollama::OllamaClient;

use std::future::Future;

use thiserror::Error;

use crate::config::{LlmBackend, LlmConfig};

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Text-generation service is not reachable at {0}")]
    Connection(String),

    #[error("Text-generation service returned error (status {status}): {body}")]
    Service { status: u16, body: String },

    #[error("Text-generation quota exceeded")]
    QuotaExceeded,

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("No API key configured for the text-generation service")]
    MissingApiKey,

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

impl LlmError {
    /// Map a transport error the way every HTTP backend reports it.
    pub(crate) fn from_reqwest(e: reqwest::Error, base_url: &str, timeout_secs: u64) -> Self {
        if e.is_timeout() {
            LlmError::Timeout(timeout_secs)
        } else if e.is_connect() {
            LlmError::Connection(base_url.to_string())
        } else {
            LlmError::HttpClient(e.to_string())
        }
    }

    /// Map a non-success HTTP status.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            LlmError::QuotaExceeded
        } else {
            LlmError::Service {
                status: status.as_u16(),
                body,
            }
        }
    }
}

/// Text-generation client abstraction (allows mocking).
pub trait LlmClient: Send + Sync {
    /// Generate a completion for a single prompt.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, LlmError>> + Send;

    /// Short backend label for logs.
    fn backend_name(&self) -> &'static str;
}

/// Client selected at runtime from configuration.
pub enum ConfiguredClient {
    Gemini(GeminiClient),
    Ollama(OllamaClient),
}

impl ConfiguredClient {
    /// Build the configured backend. Gemini requires an API key.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        match config.backend {
            LlmBackend::Gemini => {
                let key = config.api_key.clone().ok_or(LlmError::MissingApiKey)?;
                let client = GeminiClient::new(
                    &config.gemini_base_url,
                    &config.gemini_model,
                    key,
                    config.explain_timeout,
                )?;
                Ok(Self::Gemini(client))
            }
            LlmBackend::Ollama => {
                let client = OllamaClient::new(
                    &config.ollama_host,
                    &config.ollama_model,
                    config.explain_timeout,
                )?;
                Ok(Self::Ollama(client))
            }
        }
    }
}

impl LlmClient for ConfiguredClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        match self {
            Self::Gemini(client) => client.generate(prompt).await,
            Self::Ollama(client) => client.generate(prompt).await,
        }
    }

    fn backend_name(&self) -> &'static str {
        match self {
            Self::Gemini(client) => client.backend_name(),
            Self::Ollama(client) => client.backend_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_without_key_is_rejected() {
        let config = LlmConfig::default();
        assert!(matches!(
            ConfiguredClient::from_config(&config),
            Err(LlmError::MissingApiKey)
        ));
    }

    #[test]
    fn gemini_with_key_builds() {
        let config = LlmConfig {
            api_key: Some("test-key".into()),
            ..LlmConfig::default()
        };
        let client = ConfiguredClient::from_config(&config).unwrap();
        assert_eq!(client.backend_name(), "gemini");
    }

    #[test]
    fn ollama_needs_no_key() {
        let config = LlmConfig {
            backend: LlmBackend::Ollama,
            ..LlmConfig::default()
        };
        let client = ConfiguredClient::from_config(&config).unwrap();
        assert_eq!(client.backend_name(), "ollama");
    }

    #[test]
    fn too_many_requests_maps_to_quota() {
        let err = LlmError::from_status(reqwest::StatusCode::TOO_MANY_REQUESTS, String::new());
        assert!(matches!(err, LlmError::QuotaExceeded));
        let err = LlmError::from_status(reqwest::StatusCode::BAD_GATEWAY, "upstream".into());
        assert!(matches!(err, LlmError::Service { status: 502, .. }));
    }
}
