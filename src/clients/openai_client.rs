use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clients::prompts;
use crate::service::llm_service::{LlmClient, LlmError, PromptKind};

const PROVIDER: &str = "OpenAI";
const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAIClient {
    pub fn new(http: reqwest::Client, api_key: String, model: String) -> Self {
        Self { http, api_key, model }
    }

    async fn query_openai(&self, kind: PromptKind, prompt: String) -> Result<String, LlmError> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey { provider: PROVIDER });
        }

        let request = OpenAIRequest {
            model: self.model.clone(),
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: prompts::system_message(kind).to_string(),
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            max_tokens: 500,
            temperature: 0.1,
        };

        let response = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| LlmError::Http { provider: PROVIDER, source })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| LlmError::Http { provider: PROVIDER, source })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %text, "OpenAI request failed");
            return Err(LlmError::Status { provider: PROVIDER, status: status.as_u16() });
        }

        let parsed: OpenAIResponse = serde_json::from_str(&text)
            .map_err(|source| LlmError::Decode { provider: PROVIDER, source })?;

        match parsed.choices.into_iter().next().and_then(|c| c.message.content) {
            Some(content) if !content.trim().is_empty() => {
                debug!(kind = ?kind, "OpenAI reply received");
                Ok(content)
            }
            _ => Err(LlmError::Empty { provider: PROVIDER }),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn generate_prompt(&self, input: &str, kind: PromptKind) -> Result<String, LlmError> {
        let prompt = prompts::build_prompt(input, kind, Utc::now());
        self.query_openai(kind, prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_chat_completion_shape() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"{\"time\":\"9:00 AM\"}"}}]}"#;
        let parsed: OpenAIResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("{\"time\":\"9:00 AM\"}")
        );
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let client = OpenAIClient::new(reqwest::Client::new(), String::new(), "gpt-4o-mini".to_string());
        let err = client.generate_prompt("2pm in Tokyo", PromptKind::TimeQuery).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey { .. }));
    }
}
