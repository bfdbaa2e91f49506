use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

pub const DEFAULT_MEETING_LENGTH_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub description: Option<String>,
    pub timezone: String,
}

impl CalendarEvent {
    /// One-hour event starting at `start_time`.
    pub fn starting_at(
        title: impl Into<String>,
        description: Option<String>,
        start_time: DateTime<Utc>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            start_time,
            end_time: start_time + Duration::minutes(DEFAULT_MEETING_LENGTH_MINUTES),
            description,
            timezone: timezone.into(),
        }
    }
}

/// OAuth token grant as returned by Google's token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}
