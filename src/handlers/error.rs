use serde_json::{Value, json};
use warp::Reply;
use warp::http::StatusCode;

use crate::clients::LookupError;
use crate::clients::google_calendar::CalendarError;
use crate::clients::mailer::MailError;
use crate::service::llm_service::LlmError;
use crate::service::meeting_time::MeetingTimeError;
use crate::service::time_query_service::TimeQueryError;

/// Status plus JSON body for a failed request.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": error, "message": message.into() }),
        }
    }

    pub fn bad_request(error: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Configuration error", message)
    }

    pub fn upstream(error: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, error, message)
    }

    /// Shape used by the meeting-time endpoint: nulls where a suggestion would be.
    pub fn meeting(status: StatusCode, error: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({
                "error": error.into(),
                "time": Value::Null,
                "timezone": Value::Null,
                "explanation": explanation.into(),
            }),
        }
    }

    pub fn into_response(self) -> warp::reply::Response {
        warp::reply::with_status(warp::reply::json(&self.body), self.status).into_response()
    }
}

impl From<MeetingTimeError> for ApiError {
    fn from(err: MeetingTimeError) -> Self {
        match &err {
            MeetingTimeError::InsufficientLocations(_) => ApiError::meeting(
                StatusCode::BAD_REQUEST,
                "Invalid input: At least two locations are required",
                "Please provide at least two valid locations",
            ),
            MeetingTimeError::InvalidLocation { .. } => ApiError::meeting(
                StatusCode::BAD_REQUEST,
                "Invalid location data",
                "Each location must have a timezone and location name",
            ),
            MeetingTimeError::DuplicateLabel(_) => ApiError::meeting(
                StatusCode::BAD_REQUEST,
                "Invalid location data",
                format!("{}; give each location a distinct name", err),
            ),
            MeetingTimeError::InvalidTimezone(_) => {
                ApiError::meeting(StatusCode::BAD_REQUEST, err.to_string(), "Every location needs a valid IANA timezone")
            }
        }
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey { .. } => ApiError::configuration(err.to_string()),
            other => ApiError::upstream("Language model error", other.to_string()),
        }
    }
}

impl From<TimeQueryError> for ApiError {
    fn from(err: TimeQueryError) -> Self {
        match err {
            TimeQueryError::EmptyQuery => ApiError::bad_request("Invalid input", err.to_string()),
            TimeQueryError::Llm(inner) => inner.into(),
            other => ApiError::upstream("Failed to parse time query", other.to_string()),
        }
    }
}

impl From<CalendarError> for ApiError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::NotConfigured => ApiError::configuration(
                "Google Calendar OAuth is not configured. Please check your environment variables.",
            ),
            other => ApiError::upstream("Failed to generate meeting link", other.to_string()),
        }
    }
}

impl From<MailError> for ApiError {
    fn from(err: MailError) -> Self {
        match err {
            MailError::NotConfigured => ApiError::configuration(
                "Email configuration is incomplete. Please check your environment variables.",
            ),
            MailError::InvalidAddress { .. } => ApiError::bad_request("Invalid email address", err.to_string()),
            other => ApiError::upstream("Email sending error", other.to_string()),
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotConfigured(_) => ApiError::configuration(err.to_string()),
            other => ApiError::upstream("Lookup failed", other.to_string()),
        }
    }
}
