use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::calendar::{CalendarEvent, TokenGrant};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const EVENTS_URL: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Google Calendar OAuth is not configured")]
    NotConfigured,
    #[error("request to Google failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Google returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("event was created without a Google Meet link")]
    MissingMeetLink,
}

#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub refresh_token: Option<String>,
}

#[async_trait]
pub trait CalendarClient: Send + Sync {
    /// Inserts the event with a Meet conference and returns the video link.
    async fn create_meet_event(&self, event: &CalendarEvent) -> Result<String, CalendarError>;

    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, CalendarError>;
}

pub struct GoogleCalendarClient {
    http: reqwest::Client,
    oauth: GoogleOAuthConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryPoint {
    entry_point_type: String,
    uri: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConferenceData {
    #[serde(default)]
    entry_points: Vec<EntryPoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertedEvent {
    #[serde(default)]
    conference_data: Option<ConferenceData>,
}

impl GoogleCalendarClient {
    pub fn new(http: reqwest::Client, oauth: GoogleOAuthConfig) -> Self {
        Self { http, oauth }
    }

    async fn access_token(&self) -> Result<String, CalendarError> {
        let refresh_token = self
            .oauth
            .refresh_token
            .as_deref()
            .ok_or(CalendarError::NotConfigured)?;
        let params = [
            ("client_id", self.oauth.client_id.as_str()),
            ("client_secret", self.oauth.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        let grant = self.token_request(&params).await?;
        Ok(grant.access_token)
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> Result<TokenGrant, CalendarError> {
        let response = self.http.post(TOKEN_URL).form(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Google token request failed");
            return Err(CalendarError::Status { status: status.as_u16(), body });
        }
        Ok(response.json::<TokenGrant>().await?)
    }
}

pub fn event_body(event: &CalendarEvent, request_id: &str) -> serde_json::Value {
    json!({
        "summary": event.title,
        "description": event.description.clone().unwrap_or_default(),
        "start": {
            "dateTime": event.start_time.to_rfc3339(),
            "timeZone": event.timezone,
        },
        "end": {
            "dateTime": event.end_time.to_rfc3339(),
            "timeZone": event.timezone,
        },
        "conferenceData": {
            "createRequest": {
                "requestId": request_id,
                "conferenceSolutionKey": { "type": "hangoutsMeet" },
            },
        },
    })
}

fn meet_link(event: InsertedEvent) -> Option<String> {
    event
        .conference_data?
        .entry_points
        .into_iter()
        .find(|ep| ep.entry_point_type == "video")
        .map(|ep| ep.uri)
}

#[async_trait]
impl CalendarClient for GoogleCalendarClient {
    async fn create_meet_event(&self, event: &CalendarEvent) -> Result<String, CalendarError> {
        let token = self.access_token().await?;
        let request_id = Uuid::new_v4().to_string();

        let response = self
            .http
            .post(EVENTS_URL)
            .query(&[("conferenceDataVersion", "1")])
            .bearer_auth(token)
            .json(&event_body(event, &request_id))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Google Calendar insert failed");
            return Err(CalendarError::Status { status: status.as_u16(), body });
        }

        let inserted: InsertedEvent = response.json().await?;
        let link = meet_link(inserted).ok_or(CalendarError::MissingMeetLink)?;
        info!(request_id = %request_id, "Google Meet link generated");
        Ok(link)
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, CalendarError> {
        let params = [
            ("code", code),
            ("client_id", self.oauth.client_id.as_str()),
            ("client_secret", self.oauth.client_secret.as_str()),
            ("redirect_uri", self.oauth.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];
        self.token_request(&params).await
    }
}
