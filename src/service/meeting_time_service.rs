use std::sync::Arc;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};

use crate::models::meeting::{Location, MeetingSuggestion};
use crate::service::llm_service::{self, LlmClient, PromptKind};
use crate::service::meeting_time::{self, MeetingTimeError, MeetingTimeResolver};
use crate::service::time_codec;

static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}(?::\d{2})?(?:\s*[AaPp][Mm])?)").expect("time pattern is a valid regex")
});

/// First time-looking fragment of a free-text request, e.g. "10:30 am" from "call at 10:30 am?".
pub fn extract_preferred_time(query: &str) -> Option<&str> {
    TIME_PATTERN
        .captures(query)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Local,
    Ai,
}

#[derive(Debug, Deserialize)]
struct AssistantSuggestion {
    time: String,
    #[serde(default)]
    explanation: Option<String>,
}

pub struct MeetingTimeService {
    resolver: MeetingTimeResolver,
    llm: Option<Arc<dyn LlmClient>>,
}

impl MeetingTimeService {
    pub fn new(llm: Option<Arc<dyn LlmClient>>) -> Self {
        Self {
            resolver: MeetingTimeResolver::new(),
            llm,
        }
    }

    pub async fn suggest(
        &self,
        locations: &[Location],
        query: Option<&str>,
        strategy: Strategy,
        at: DateTime<Utc>,
    ) -> Result<MeetingSuggestion, MeetingTimeError> {
        let preferred = query.and_then(extract_preferred_time);

        if strategy == Strategy::Ai {
            match &self.llm {
                Some(llm) => {
                    if let Some(suggestion) = self.ask_assistant(llm.as_ref(), locations, query, at).await? {
                        return Ok(suggestion);
                    }
                }
                None => warn!("AI meeting strategy requested without a language model, using local resolver"),
            }
        }

        let suggestion = self.resolver.resolve(locations, preferred, at)?;
        info!(
            reference = %suggestion.reference_timezone,
            time = %suggestion.time,
            choice = ?suggestion.choice,
            outside = suggestion.is_outside_business_hours,
            "meeting time resolved"
        );
        Ok(suggestion)
    }

    /// `Ok(None)` means the assistant was unusable and the caller should fall back.
    async fn ask_assistant(
        &self,
        llm: &dyn LlmClient,
        locations: &[Location],
        query: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<Option<MeetingSuggestion>, MeetingTimeError> {
        // Validate first so bad input never costs a model call.
        self.resolver.evaluate(locations, time_codec::CanonicalTime::MIDNIGHT, at)?;

        let reply = match llm.generate_prompt(&describe_request(locations, query), PromptKind::MeetingTime).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(provider = llm.provider(), error = %err, "assistant meeting suggestion failed");
                return Ok(None);
            }
        };

        let parsed: AssistantSuggestion = match serde_json::from_str(llm_service::extract_json(&reply)) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "assistant reply was not valid JSON");
                return Ok(None);
            }
        };
        let time = match time_codec::parse(&parsed.time) {
            Ok(time) => time,
            Err(err) => {
                warn!(time = %parsed.time, error = %err, "assistant proposed an unreadable time");
                return Ok(None);
            }
        };

        let mut suggestion = self.resolver.evaluate(locations, time, at)?;
        suggestion.explanation = match parsed.explanation.filter(|e| !e.trim().is_empty()) {
            Some(explanation) => explanation,
            None => meeting_time::describe(&suggestion, self.resolver.business_hours()),
        };
        info!(time = %suggestion.time, outside = suggestion.is_outside_business_hours, "assistant meeting time accepted");
        Ok(Some(suggestion))
    }
}

fn describe_request(locations: &[Location], query: Option<&str>) -> String {
    let mut body = String::from("Participants (first is the reference timezone):\n");
    for location in locations {
        body.push_str(&format!("- {} ({})\n", location.label, location.timezone));
    }
    if let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) {
        body.push_str(&format!("Request: \"{}\"", query));
    }
    body
}
