use serde::{Deserialize, Serialize, Serializer};

use crate::models::meeting::{Location, MeetingSuggestion, SlotChoice};
use crate::service::meeting_time_service::Strategy;
use crate::service::time_codec;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeetingTimeRequest {
    #[serde(default)]
    pub locations: Option<Vec<Location>>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub strategy: Strategy,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingTimeResponse {
    pub time: String,
    pub timezone: String,
    pub local_times: LocalTimes,
    pub explanation: String,
    pub is_outside_business_hours: bool,
    pub choice: SlotChoice,
}

/// Label to formatted local time, serialized as a JSON object in participant order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalTimes(Vec<(String, String)>);

impl LocalTimes {
    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, time)| time.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }
}

impl From<Vec<(String, String)>> for LocalTimes {
    fn from(entries: Vec<(String, String)>) -> Self {
        Self(entries)
    }
}

impl Serialize for LocalTimes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, time)| (name, time)))
    }
}

impl From<MeetingSuggestion> for MeetingTimeResponse {
    fn from(suggestion: MeetingSuggestion) -> Self {
        Self {
            time: time_codec::format(suggestion.time, true),
            local_times: suggestion
                .local_times
                .iter()
                .map(|local| (local.label.clone(), time_codec::format(local.time, true)))
                .collect::<Vec<_>>()
                .into(),
            timezone: suggestion.reference_timezone,
            explanation: suggestion.explanation,
            is_outside_business_hours: suggestion.is_outside_business_hours,
            choice: suggestion.choice,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeQueryRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMeetRequest {
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: String,
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMeetResponse {
    pub meet_link: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthCallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OAuthCallbackResponse {
    pub message: String,
    pub refresh_token: Option<String>,
    pub note: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CoordinatesQuery {
    pub lat: f64,
    pub lon: f64,
}
