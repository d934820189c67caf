use super::{chat_messages, send_with_timeout, ChatMessage, Provider};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub struct OpenRouterProvider {
    pub client: reqwest::Client,
    pub url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: Option<String>,
}

/// Pull `choices[0].message.content` out of an OpenAI-style response body
fn extract_content(body: &str) -> Result<String, ProviderError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("{}: {}", e, super::truncate_chars(body, 200))))?;

    Ok(parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default())
}

#[async_trait]
impl Provider for OpenRouterProvider {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        timeout: Duration,
    ) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: chat_messages(system_prompt, user_prompt),
        };

        let builder = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", "https://github.com/personarev/personarev")
            .header("X-Title", "personarev")
            .header("Authorization", format!("Bearer {}", self.api_key))
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
        let body = r#"{"id":"x","choices":[{"message":{"role":"assistant","content":"{\"scores\":{}}"}}]}"#;
        assert_eq!(extract_content(body).unwrap(), r#"{"scores":{}}"#);
    }

    #[test]
    fn test_extract_content_empty_choices() {
        assert_eq!(extract_content(r#"{"choices":[]}"#).unwrap(), "");
        assert_eq!(
            extract_content(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap(),
            ""
        );
    }

    #[test]
    fn test_extract_content_invalid_envelope() {
        assert!(matches!(
            extract_content("<html>bad gateway</html>"),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "openrouter/auto",
            temperature: 0.2,
            messages: chat_messages("sys", "user"),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "openrouter/auto");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "user");
    }
}
