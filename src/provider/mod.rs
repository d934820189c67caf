mod ollama;
mod openrouter;

pub use ollama::OllamaProvider;
pub use openrouter::OpenRouterProvider;

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Fallback system prompt when a persona leaves its own empty
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a precise reviewer.";

/// A chat-completion backend. Implementations are interchangeable; the
/// orchestrator only sees the returned text.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        timeout: Duration,
    ) -> Result<String, ProviderError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

fn chat_messages<'a>(system_prompt: &'a str, user_prompt: &'a str) -> Vec<ChatMessage<'a>> {
    let system = if system_prompt.trim().is_empty() {
        DEFAULT_SYSTEM_PROMPT
    } else {
        system_prompt
    };
    vec![
        ChatMessage {
            role: "system",
            content: system,
        },
        ChatMessage {
            role: "user",
            content: user_prompt,
        },
    ]
}

/// Send a prepared request under a wall-clock limit and return the body of
/// a successful response
async fn send_with_timeout(
    provider: &'static str,
    request: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<String, ProviderError> {
    let response = tokio::time::timeout(timeout, request.timeout(timeout).send())
        .await
        .map_err(|_| ProviderError::Timeout(timeout))?
        .map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(timeout)
            } else {
                ProviderError::Http(e)
            }
        })?;

    let status = response.status();
    let body = tokio::time::timeout(timeout, response.text())
        .await
        .map_err(|_| ProviderError::Timeout(timeout))??;

    if !status.is_success() {
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
            body: truncate_chars(&body, 500).to_string(),
        });
    }

    Ok(body)
}

/// Unicode-safe prefix of at most `max_chars` characters
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Create the provider selected in configuration
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let client = reqwest::Client::new();
    let model = config.model_or_default();
    let url = config.base_url_or_default();

    match config.kind {
        ProviderKind::OpenRouter => {
            let api_key = config
                .resolve_api_key()
                .ok_or_else(|| ProviderError::MissingApiKey(config.api_key_env.clone()))?;
            Ok(Arc::new(OpenRouterProvider {
                client,
                url,
                api_key,
                model,
                temperature: config.temperature,
            }))
        }
        ProviderKind::Ollama => Ok(Arc::new(OllamaProvider {
            client,
            url,
            model,
            temperature: config.temperature,
        })),
    }
}
