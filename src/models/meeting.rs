use serde::{Deserialize, Serialize};

use crate::service::time_codec::CanonicalTime;

/// A participant's place. `label` is the human name shown back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub timezone: String,
    #[serde(default, alias = "location")]
    pub label: String,
}

impl Location {
    pub fn new(timezone: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            timezone: timezone.into(),
            label: label.into(),
        }
    }
}

/// Local window a meeting should land in, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    pub start: CanonicalTime,
    pub end: CanonicalTime,
}

impl BusinessHours {
    pub const START_HOUR: u32 = 9;
    pub const END_HOUR: u32 = 20;

    pub fn contains(&self, time: CanonicalTime) -> bool {
        time >= self.start && time <= self.end
    }
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            start: CanonicalTime::at_hour(Self::START_HOUR),
            end: CanonicalTime::at_hour(Self::END_HOUR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTime {
    pub label: String,
    pub timezone: String,
    pub time: CanonicalTime,
    pub within_business_hours: bool,
}

/// How the suggested slot was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotChoice {
    Preferred,
    ClosestToPreferred,
    EarliestCommon,
    Fallback,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeetingSuggestion {
    /// Slot in the reference timezone.
    pub time: CanonicalTime,
    pub reference_timezone: String,
    pub local_times: Vec<LocalTime>,
    pub is_outside_business_hours: bool,
    pub choice: SlotChoice,
    pub explanation: String,
}

impl MeetingSuggestion {
    pub fn local_time(&self, label: &str) -> Option<CanonicalTime> {
        self.local_times
            .iter()
            .find(|local| local.label == label)
            .map(|local| local.time)
    }
}
