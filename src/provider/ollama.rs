use super::{chat_messages, send_with_timeout, ChatMessage, Provider};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Local Ollama server (`/api/chat`, non-streaming)
pub struct OllamaProvider {
    pub client: reqwest::Client,
    pub url: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    options: Options,
    stream: bool,
}

#[derive(Serialize)]
struct Options {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<Message>,
}

#[derive(Deserialize)]
struct Message {
    #[serde(default)]
    content: String,
}

fn extract_content(body: &str) -> Result<String, ProviderError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("{}: {}", e, super::truncate_chars(body, 200))))?;
    Ok(parsed.message.map(|m| m.content).unwrap_or_default())
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        timeout: Duration,
    ) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            messages: chat_messages(system_prompt, user_prompt),
            options: Options {
                temperature: self.temperature,
            },
            stream: false,
        };

        let builder = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&request);

        let body = send_with_timeout(self.name(), builder, timeout).await?;
        extract_content(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_content() {
        let body = r#"{"model":"llama3.1:8b","message":{"role":"assistant","content":"hello"},"done":true}"#;
        assert_eq!(extract_content(body).unwrap(), "hello");
    }

    #[test]
    fn test_extract_missing_message() {
        assert_eq!(extract_content(r#"{"done":true}"#).unwrap(), "");
    }

    #[test]
    fn test_request_disables_streaming() {
        let request = ChatRequest {
            model: "llama3.1:8b",
            messages: chat_messages("", "doc"),
            options: Options { temperature: 0.2 },
            stream: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["stream"], false);
        assert_eq!(value["messages"][0]["content"], super::super::DEFAULT_SYSTEM_PROMPT);
    }
}
