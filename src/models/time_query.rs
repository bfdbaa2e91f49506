use serde::{Deserialize, Serialize};

/// Structured reading of a natural-language query such as "2pm in Tokyo, Singapore".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeQueryResult {
    #[serde(default)]
    pub has_time: bool,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub current_location_time: Option<String>,
    #[serde(default)]
    pub second_location: Option<String>,
    #[serde(default)]
    pub second_timezone: Option<String>,
    #[serde(default)]
    pub second_location_time: Option<String>,
}
