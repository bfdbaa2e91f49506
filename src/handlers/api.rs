use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::handlers::dto::{
    CoordinatesQuery, GenerateMeetRequest, GenerateMeetResponse, MeetingTimeRequest, MeetingTimeResponse,
    MessageResponse, OAuthCallbackQuery, OAuthCallbackResponse, TimeQueryRequest,
};
use crate::handlers::error::ApiError;
use crate::handlers::state::AppState;
use crate::models::calendar::CalendarEvent;
use crate::models::geo::{GeoTimezone, Weather};
use crate::models::time_query::TimeQueryResult;
use crate::service::invite_service::{self, InviteRequest};
use crate::service::meeting_time::MeetingTimeError;
use crate::service::timezone_offset::resolve_timezone;

pub async fn meeting_time(
    state: &AppState,
    request: MeetingTimeRequest,
    at: DateTime<Utc>,
) -> Result<MeetingTimeResponse, ApiError> {
    let locations = request
        .locations
        .ok_or(MeetingTimeError::InsufficientLocations(0))?;
    let suggestion = state
        .meeting_times
        .suggest(&locations, request.query.as_deref(), request.strategy, at)
        .await
        .inspect_err(|err| warn!(error = %err, "meeting time request rejected"))?;
    Ok(suggestion.into())
}

pub async fn time_query(state: &AppState, request: TimeQueryRequest) -> Result<TimeQueryResult, ApiError> {
    let service = state
        .time_queries
        .as_ref()
        .ok_or_else(|| ApiError::configuration("No language model API key is configured"))?;
    let query = request.query.unwrap_or_default();
    let result = service.parse_query(&query).await.inspect_err(|err| {
        error!(error = %err, "time query failed");
    })?;
    Ok(result)
}

pub async fn generate_meet(state: &AppState, request: GenerateMeetRequest) -> Result<GenerateMeetResponse, ApiError> {
    let calendar = state.calendar.as_ref().ok_or_else(|| {
        ApiError::configuration("Google Calendar OAuth is not configured. Please check your environment variables.")
    })?;

    resolve_timezone(&request.timezone)
        .map_err(|err| ApiError::bad_request("Invalid timezone", err.to_string()))?;
    let start = DateTime::parse_from_rfc3339(request.start_time.trim())
        .map_err(|err| ApiError::bad_request("Invalid start time", err.to_string()))?
        .with_timezone(&Utc);

    let event = CalendarEvent::starting_at(request.summary, request.description, start, request.timezone);
    let meet_link = calendar.create_meet_event(&event).await.inspect_err(|err| {
        error!(error = %err, "Google Meet link generation failed");
    })?;
    Ok(GenerateMeetResponse { meet_link })
}

pub async fn send_invite(state: &AppState, request: InviteRequest) -> Result<MessageResponse, ApiError> {
    let (Some(mailer), Some(from)) = (state.mailer.as_ref(), state.mail_from.as_deref()) else {
        return Err(ApiError::configuration(
            "Email configuration is incomplete. Please check your environment variables.",
        ));
    };

    let invitation = invite_service::compose_invitation(&request, from);
    if invitation.recipients.is_empty() {
        return Err(ApiError::bad_request("Invalid input", "At least one recipient email is required"));
    }
    mailer.send(&invitation).await.inspect_err(|err| {
        error!(error = %err, "sending invitation failed");
    })?;
    Ok(MessageResponse {
        message: "Email sent successfully".to_string(),
    })
}

pub async fn oauth_callback(state: &AppState, query: OAuthCallbackQuery) -> Result<OAuthCallbackResponse, ApiError> {
    let code = query
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("No code provided", "The OAuth redirect did not carry a code"))?;
    let calendar = state
        .calendar
        .as_ref()
        .ok_or_else(|| ApiError::configuration("Google OAuth client is not configured"))?;

    let grant = calendar.exchange_code(&code).await?;
    match &grant.refresh_token {
        Some(token) => info!(
            refresh_token = %redact(token),
            "received refresh token; store it as GOOGLE_REFRESH_TOKEN"
        ),
        None => warn!("token exchange returned no refresh token"),
    }
    Ok(OAuthCallbackResponse {
        message: "Success! Check your server logs for the refresh token.".to_string(),
        refresh_token: grant.refresh_token,
        note: "For security, store this in your configuration and do not expose it to the frontend.".to_string(),
    })
}

pub async fn location_timezone(
    state: &AppState,
    query: CoordinatesQuery,
    at: DateTime<Utc>,
) -> Result<GeoTimezone, ApiError> {
    validate_coordinates(query)?;
    let maps = state
        .maps
        .as_ref()
        .ok_or_else(|| ApiError::configuration("Google Maps API key is not configured"))?;
    Ok(maps.timezone_at(query.lat, query.lon, at).await?)
}

pub async fn weather(state: &AppState, query: CoordinatesQuery) -> Result<Weather, ApiError> {
    validate_coordinates(query)?;
    match &state.weather {
        Some(client) => Ok(client.current(query.lat, query.lon).await?),
        None => Ok(Weather::mock()),
    }
}

/// Keeps the last four characters so a token can be recognised in logs.
fn redact(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

fn validate_coordinates(query: CoordinatesQuery) -> Result<(), ApiError> {
    if (-90.0..=90.0).contains(&query.lat) && (-180.0..=180.0).contains(&query.lon) {
        Ok(())
    } else {
        Err(ApiError::bad_request("Invalid coordinates", format!("{},{} is out of range", query.lat, query.lon)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redaction_hides_all_but_the_tail() {
        assert_eq!(redact("1//0gExampleRefreshToken"), "********************oken");
        assert_eq!(redact("short"), "*****");
        assert_eq!(redact(""), "");
    }
}
