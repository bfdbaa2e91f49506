use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    TimeQuery,
    MeetingTime,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{provider} API key is not configured")]
    MissingApiKey { provider: &'static str },
    #[error("request to {provider} failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} returned status {status}")]
    Status { provider: &'static str, status: u16 },
    #[error("no response content from {provider}")]
    Empty { provider: &'static str },
    #[error("failed to decode {provider} response: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The seam between the app and whichever model provider is configured.
#[async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> &'static str;

    async fn generate_prompt(&self, input: &str, kind: PromptKind) -> Result<String, LlmError>;
}

/// Pulls the JSON object out of a model reply that may carry code fences or prose.
pub fn extract_json(reply: &str) -> &str {
    let trimmed = reply.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|rest| rest.trim_end().trim_end_matches("```"))
        .unwrap_or(trimmed)
        .trim();

    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => unfenced,
    }
}
