use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::models::time_query::TimeQueryResult;
use crate::service::llm_service::{self, LlmClient, LlmError, PromptKind};
use crate::service::timezone_offset::is_valid_timezone;

const COMMON_TIMEZONES: [(&str, &str); 10] = [
    ("new york", "America/New_York"),
    ("london", "Europe/London"),
    ("paris", "Europe/Paris"),
    ("tokyo", "Asia/Tokyo"),
    ("singapore", "Asia/Singapore"),
    ("sydney", "Australia/Sydney"),
    ("dubai", "Asia/Dubai"),
    ("hong kong", "Asia/Hong_Kong"),
    ("los angeles", "America/Los_Angeles"),
    ("chicago", "America/Chicago"),
];

#[derive(Debug, Error)]
pub enum TimeQueryError {
    #[error("no query provided")]
    EmptyQuery,
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("unreadable reply from language model: {0}")]
    InvalidReply(#[source] serde_json::Error),
    #[error("reply is missing the location or timezone")]
    MissingLocation,
}

pub struct TimeQueryService {
    llm: Arc<dyn LlmClient>,
}

impl TimeQueryService {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn parse_query(&self, query: &str) -> Result<TimeQueryResult, TimeQueryError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(TimeQueryError::EmptyQuery);
        }
        info!(provider = self.llm.provider(), query, "parsing time query");

        let reply = self.llm.generate_prompt(query, PromptKind::TimeQuery).await?;
        let mut result: TimeQueryResult = serde_json::from_str(llm_service::extract_json(&reply))
            .map_err(TimeQueryError::InvalidReply)?;

        if result.location.trim().is_empty() && result.timezone.trim().is_empty() {
            return Err(TimeQueryError::MissingLocation);
        }
        result.timezone = repair_timezone(&result.timezone, &result.location);
        result.second_timezone = result.second_timezone.take().map(|tz| {
            repair_timezone(&tz, result.second_location.as_deref().unwrap_or(""))
        });
        if !result.has_time {
            result.time = None;
        }
        Ok(result)
    }
}

/// Keeps a valid zone, otherwise guesses one from the place name and ends at UTC.
pub fn repair_timezone(timezone: &str, location: &str) -> String {
    let normalized = normalize_timezone_id(timezone.trim());
    if is_valid_timezone(&normalized) {
        return normalized;
    }
    let fallback = fallback_timezone(location);
    warn!(timezone, location, fallback, "invalid timezone in reply, substituting");
    fallback.to_string()
}

pub fn normalize_timezone_id(timezone: &str) -> String {
    match timezone {
        "Asia/Calcutta" => "Asia/Kolkata".to_string(),
        other => other.to_string(),
    }
}

pub fn fallback_timezone(location: &str) -> &'static str {
    let normalized = location.to_lowercase();
    COMMON_TIMEZONES
        .iter()
        .find(|(city, _)| normalized.contains(city))
        .map(|(_, tz)| *tz)
        .unwrap_or("UTC")
}
