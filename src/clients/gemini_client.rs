use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clients::prompts;
use crate::service::llm_service::{LlmClient, LlmError, PromptKind};

const PROVIDER: &str = "Gemini";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, api_key: String, model: String) -> Self {
        Self { http, api_key, model }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", API_BASE, self.model)
    }
}

fn first_candidate_text(response: GeminiResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().map(|p| p.text).collect();
    if text.trim().is_empty() { None } else { Some(text) }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn generate_prompt(&self, input: &str, kind: PromptKind) -> Result<String, LlmError> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey { provider: PROVIDER });
        }

        let request = GeminiRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: prompts::system_message(kind).to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompts::build_prompt(input, kind, Utc::now()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.1,
                response_mime_type: "application/json",
            },
        };

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
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
            warn!(status = status.as_u16(), body = %text, "Gemini request failed");
            return Err(LlmError::Status { provider: PROVIDER, status: status.as_u16() });
        }

        let parsed: GeminiResponse = serde_json::from_str(&text)
            .map_err(|source| LlmError::Decode { provider: PROVIDER, source })?;
        debug!(kind = ?kind, "Gemini reply received");
        first_candidate_text(parsed).ok_or(LlmError::Empty { provider: PROVIDER })
    }
}
