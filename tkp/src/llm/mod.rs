//! LLM client module for TicketPlease
//!
//! One-shot completion requests against the configured provider.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

mod anthropic;
pub mod client;
mod error;
mod openai;
mod types;

pub use anthropic::{ANTHROPIC_BASE_URL, AnthropicClient};
pub use client::LlmClient;
pub use error::LlmError;
pub use openai::{GEMINI_BASE_URL, OPENAI_BASE_URL, OPENROUTER_BASE_URL, OpenAIClient};
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage};

use crate::config::Config;

/// Everything a client needs, resolved from the user configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub provider: String,
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub timeout_ms: u64,
}

impl ClientSettings {
    /// Resolve settings, filling in the provider's default endpoint
    pub fn resolve(config: &Config) -> Result<Self, LlmError> {
        let provider = config.api_keys.provider.trim().to_lowercase();
        debug!(%provider, model = %config.llm.model, "resolve: called");

        let default_base_url = default_base_url(&provider).ok_or_else(|| {
            LlmError::Config(format!(
                "Unknown LLM provider: '{}'. Supported: openai, anthropic, openrouter, gemini",
                provider
            ))
        })?;

        if config.api_keys.api_key.trim().is_empty() {
            debug!("resolve: no api key");
            return Err(LlmError::Config(format!("No API key configured for provider '{}'", provider)));
        }
        if config.llm.model.trim().is_empty() {
            debug!("resolve: no model");
            return Err(LlmError::Config("No model configured".to_string()));
        }

        let base_url = if config.llm.base_url.trim().is_empty() {
            default_base_url.to_string()
        } else {
            debug!(base_url = %config.llm.base_url, "resolve: using base url override");
            config.llm.base_url.trim().to_string()
        };

        Ok(Self {
            provider,
            model: config.llm.model.trim().to_string(),
            api_key: config.api_keys.api_key.trim().to_string(),
            base_url,
            max_tokens: config.llm.max_tokens,
            timeout_ms: config.llm.timeout_ms,
        })
    }
}

/// Default endpoint per provider; None for unknown providers
pub fn default_base_url(provider: &str) -> Option<&'static str> {
    match provider {
        "openai" => Some(OPENAI_BASE_URL),
        "anthropic" => Some(ANTHROPIC_BASE_URL),
        "openrouter" => Some(OPENROUTER_BASE_URL),
        "gemini" => Some(GEMINI_BASE_URL),
        _ => None,
    }
}

/// Create an LLM client based on the provider specified in config
///
/// Anthropic gets its own client; every other provider speaks the
/// OpenAI Chat Completions protocol.
pub fn create_client(config: &Config) -> Result<Arc<dyn LlmClient>, LlmError> {
    let settings = ClientSettings::resolve(config)?;
    create_client_from_settings(&settings)
}

/// Create an LLM client from already-resolved settings
pub fn create_client_from_settings(settings: &ClientSettings) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %settings.provider, model = %settings.model, "create_client_from_settings: called");
    match settings.provider.as_str() {
        "anthropic" => {
            debug!("create_client_from_settings: creating Anthropic client");
            Ok(Arc::new(AnthropicClient::from_settings(settings)?))
        }
        _ => {
            debug!("create_client_from_settings: creating OpenAI-compatible client");
            Ok(Arc::new(OpenAIClient::from_settings(settings)?))
        }
    }
}

/// Map a non-success HTTP status to an LlmError
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = response.status().as_u16();
    if response.status().is_success() {
        return Ok(response);
    }

    if status == 429 {
        debug!("check_status: rate limited (429)");
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);

        return Err(LlmError::RateLimited {
            retry_after: Duration::from_secs(retry_after),
        });
    }

    debug!(%status, "check_status: API error");
    let text = response.text().await.unwrap_or_default();
    Err(LlmError::ApiError {
        status,
        message: api_error_message(&text),
    })
}

/// Pull `error.message` out of a JSON error body, falling back to the raw text
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str, key: &str) -> Config {
        let mut config = Config::default();
        config.api_keys.provider = provider.to_string();
        config.api_keys.api_key = key.to_string();
        config
    }

    #[test]
    fn test_resolve_default_base_urls() {
        for (provider, url) in [
            ("openai", OPENAI_BASE_URL),
            ("anthropic", ANTHROPIC_BASE_URL),
            ("openrouter", OPENROUTER_BASE_URL),
            ("gemini", GEMINI_BASE_URL),
        ] {
            let settings = ClientSettings::resolve(&config(provider, "sk-test")).unwrap();
            assert_eq!(settings.base_url, url, "provider {}", provider);
        }
    }

    #[test]
    fn test_resolve_base_url_override() {
        let mut cfg = config("openai", "sk-test");
        cfg.llm.base_url = "http://localhost:8080/v1".to_string();

        let settings = ClientSettings::resolve(&cfg).unwrap();

        assert_eq!(settings.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_resolve_rejects_unknown_provider() {
        let err = ClientSettings::resolve(&config("mistral", "key")).unwrap_err();
        assert!(err.to_string().contains("Unknown LLM provider"));
    }

    #[test]
    fn test_resolve_rejects_blank_key() {
        let err = ClientSettings::resolve(&config("openai", "   ")).unwrap_err();
        assert!(matches!(err, LlmError::Config(_)));
    }

    #[test]
    fn test_create_client_per_provider() {
        let client = create_client(&config("anthropic", "sk-ant")).unwrap();
        assert_eq!(client.model(), "gpt-4o-mini");

        let mut cfg = config("gemini", "key");
        cfg.llm.model = "gemini-2.0-flash".to_string();
        let client = create_client(&cfg).unwrap();
        assert_eq!(client.model(), "gemini-2.0-flash");
    }

    #[test]
    fn test_api_error_message() {
        assert_eq!(
            api_error_message(r#"{"error": {"message": "Invalid API key", "type": "auth"}}"#),
            "Invalid API key"
        );
        assert_eq!(api_error_message("  Bad Gateway \n"), "Bad Gateway");
    }
}
