use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tyme::clients::google_calendar::{CalendarClient, CalendarError};
use tyme::clients::mailer::{InviteMailer, MailError};
use tyme::handlers::api;
use tyme::handlers::dto::{
    CoordinatesQuery, GenerateMeetRequest, MeetingTimeRequest, OAuthCallbackQuery, TimeQueryRequest,
};
use tyme::handlers::state::AppState;
use tyme::models::calendar::{CalendarEvent, TokenGrant};
use tyme::models::invite::Invitation;
use tyme::models::meeting::Location;
use tyme::service::invite_service::InviteRequest;
use tyme::service::meeting_time_service::{MeetingTimeService, Strategy};
use warp::http::StatusCode;

#[derive(Default)]
struct FakeCalendar {
    events: Mutex<Vec<CalendarEvent>>,
    fail: bool,
}

#[async_trait]
impl CalendarClient for FakeCalendar {
    async fn create_meet_event(&self, event: &CalendarEvent) -> Result<String, CalendarError> {
        if self.fail {
            return Err(CalendarError::MissingMeetLink);
        }
        self.events.lock().unwrap().push(event.clone());
        Ok("https://meet.google.com/abc-defg-hij".to_string())
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, CalendarError> {
        Ok(TokenGrant {
            access_token: format!("access-{}", code),
            refresh_token: Some("refresh-1".to_string()),
            expires_in: Some(3599),
            scope: None,
        })
    }
}

#[derive(Default)]
struct FakeMailer {
    sent: Mutex<Vec<Invitation>>,
}

#[async_trait]
impl InviteMailer for FakeMailer {
    async fn send(&self, invitation: &Invitation) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(invitation.clone());
        Ok(())
    }
}

fn bare_state() -> AppState {
    AppState::new(Arc::new(MeetingTimeService::new(None)))
}

fn january() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
}

fn invite_request(recipients: &str) -> InviteRequest {
    serde_json::from_value(serde_json::json!({
        "senderName": "Ada",
        "senderEmail": "ada@example.com",
        "recipientEmails": recipients,
        "meetingLink": "https://meet.google.com/abc-defg-hij",
        "description": "Quarterly planning",
        "meetingTime": "9:00 AM",
        "meetingDate": "2026-01-15",
        "timezone": "America/New_York"
    }))
    .unwrap()
}

#[tokio::test]
async fn meeting_time_returns_labelled_local_times() {
    let request = MeetingTimeRequest {
        locations: Some(vec![
            Location::new("America/New_York", "New York"),
            Location::new("Europe/London", "London"),
        ]),
        query: None,
        strategy: Strategy::Local,
    };
    let response = api::meeting_time(&bare_state(), request, january()).await.unwrap();

    assert_eq!(response.time, "9:00 AM");
    assert_eq!(response.timezone, "America/New_York");
    assert_eq!(response.local_times.get("London"), Some("2:00 PM"));
    assert_eq!(response.local_times.labels().collect::<Vec<_>>(), vec!["New York", "London"]);
    assert!(!response.is_outside_business_hours);

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["localTimes"]["New York"], "9:00 AM");
    assert_eq!(json["isOutsideBusinessHours"], false);
}

#[tokio::test]
async fn meeting_time_rejects_missing_and_invalid_locations() {
    let state = bare_state();

    let err = api::meeting_time(&state, MeetingTimeRequest::default(), january()).await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert!(err.body["time"].is_null());

    let request = MeetingTimeRequest {
        locations: Some(vec![Location::new("Europe/London", "London"), Location::new("Not/AZone", "X")]),
        ..MeetingTimeRequest::default()
    };
    let err = api::meeting_time(&state, request, january()).await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert!(err.body["error"].as_str().unwrap().contains("Not/AZone"));
    assert!(err.body["timezone"].is_null());
}

#[tokio::test]
async fn time_query_without_model_is_a_configuration_error() {
    let request = TimeQueryRequest { query: Some("2pm Tokyo".into()) };
    let err = api::time_query(&bare_state(), request).await.unwrap_err();
    assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.body["error"], "Configuration error");
}

#[tokio::test]
async fn generate_meet_creates_one_hour_event() {
    let calendar = Arc::new(FakeCalendar::default());
    let mut state = bare_state();
    state.calendar = Some(calendar.clone());

    let request = GenerateMeetRequest {
        summary: "Planning".into(),
        description: None,
        start_time: "2026-01-15T14:00:00Z".into(),
        timezone: "Europe/London".into(),
    };
    let response = api::generate_meet(&state, request).await.unwrap();
    assert_eq!(response.meet_link, "https://meet.google.com/abc-defg-hij");

    let events = calendar.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].start_time, Utc.with_ymd_and_hms(2026, 1, 15, 14, 0, 0).unwrap());
    assert_eq!(events[0].end_time, Utc.with_ymd_and_hms(2026, 1, 15, 15, 0, 0).unwrap());
}

#[tokio::test]
async fn generate_meet_validates_and_maps_failures() {
    let request = |timezone: &str, start: &str| GenerateMeetRequest {
        summary: "Planning".into(),
        description: None,
        start_time: start.into(),
        timezone: timezone.into(),
    };

    let err = api::generate_meet(&bare_state(), request("UTC", "2026-01-15T14:00:00Z")).await.unwrap_err();
    assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

    let mut state = bare_state();
    state.calendar = Some(Arc::new(FakeCalendar::default()));
    let err = api::generate_meet(&state, request("Not/AZone", "2026-01-15T14:00:00Z")).await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    let err = api::generate_meet(&state, request("UTC", "tomorrow at two")).await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);

    state.calendar = Some(Arc::new(FakeCalendar { fail: true, ..FakeCalendar::default() }));
    let err = api::generate_meet(&state, request("UTC", "2026-01-15T14:00:00Z")).await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn send_invite_mails_every_recipient_and_the_sender() {
    let mailer = Arc::new(FakeMailer::default());
    let mut state = bare_state();
    state.mailer = Some(mailer.clone());
    state.mail_from = Some("tyme@example.com".into());

    let response = api::send_invite(&state, invite_request("bob@example.com, carol@example.com"))
        .await
        .unwrap();
    assert_eq!(response.message, "Email sent successfully");

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(
        sent[0].recipients,
        vec!["bob@example.com", "carol@example.com", "ada@example.com"]
    );
    assert_eq!(sent[0].from_address, "tyme@example.com");
    assert!(sent[0].subject.contains("2026-01-15 at 9:00 AM America/New_York"));
}

#[tokio::test]
async fn send_invite_requires_configuration() {
    let err = api::send_invite(&bare_state(), invite_request("bob@example.com")).await.unwrap_err();
    assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.body["error"], "Configuration error");
}

#[tokio::test]
async fn oauth_callback_exchanges_code_for_refresh_token() {
    let mut state = bare_state();
    state.calendar = Some(Arc::new(FakeCalendar::default()));

    let response = api::oauth_callback(&state, OAuthCallbackQuery { code: Some("4/abc".into()) })
        .await
        .unwrap();
    assert_eq!(response.refresh_token.as_deref(), Some("refresh-1"));

    let err = api::oauth_callback(&state, OAuthCallbackQuery { code: None }).await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.body["error"], "No code provided");
}

#[tokio::test]
async fn coordinates_are_range_checked() {
    let state = bare_state();
    let err = api::weather(&state, CoordinatesQuery { lat: 91.0, lon: 0.0 }).await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);

    let err = api::location_timezone(&state, CoordinatesQuery { lat: 51.5, lon: -0.12 }, january())
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

    let weather = api::weather(&state, CoordinatesQuery { lat: 51.5, lon: -0.12 }).await.unwrap();
    assert_eq!(weather, tyme::models::geo::Weather::mock());
}
