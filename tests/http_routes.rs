use std::sync::Arc;

use serde_json::Value;
use tyme::handlers::routes::routes;
use tyme::handlers::state::AppState;
use tyme::service::meeting_time_service::MeetingTimeService;
use warp::http::StatusCode;

fn state() -> AppState {
    AppState::new(Arc::new(MeetingTimeService::new(None)))
}

fn json(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("response body is JSON")
}

async fn post(path: &str, body: &str) -> (StatusCode, Value) {
    let response = warp::test::request()
        .method("POST")
        .path(path)
        .header("content-type", "application/json")
        .body(body)
        .reply(&routes(state()))
        .await;
    (response.status(), json(response.body()))
}

fn assert_meeting_error(body: &Value) {
    assert!(body["error"].is_string(), "{}", body);
    assert!(body["explanation"].is_string(), "{}", body);
    assert!(body["time"].is_null());
    assert!(body["timezone"].is_null());
}

#[tokio::test]
async fn meeting_time_route_resolves_a_valid_request() {
    let (status, body) = post(
        "/api/meeting-time",
        r#"{"locations":[{"timezone":"Europe/London","location":"London"},
                         {"timezone":"Europe/Athens","location":"Athens"}],
            "query":"10:00 AM works"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timezone"], "Europe/London");
    assert!(body["time"].is_string());
    assert!(body["localTimes"]["Athens"].is_string());
}

#[tokio::test]
async fn meeting_time_route_answers_unreadable_bodies_with_error_shape() {
    for body in [
        r#"{"locations":"Tokyo"}"#,
        r#"{"locations":[{"timezone":5,"location":"Tokyo"},{"timezone":"UTC","location":"X"}]}"#,
        "not json",
    ] {
        let (status, json) = post("/api/meeting-time", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_meeting_error(&json);
    }
}

#[tokio::test]
async fn meeting_time_route_reports_validation_failures() {
    let (status, body) = post(
        "/api/meeting-time",
        r#"{"locations":[{"timezone":"Europe/London","location":"London"}]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_meeting_error(&body);

    let (status, body) = post(
        "/api/meeting-time",
        r#"{"locations":[{"timezone":"Europe/London","location":"HQ"},
                         {"timezone":"Asia/Tokyo","location":"HQ"}]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid location data");
    assert_meeting_error(&body);
}

#[tokio::test]
async fn other_routes_answer_bad_bodies_with_json() {
    let (status, body) = post("/api/generate-meet", r#"{"summary":3}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");
    assert!(body.get("time").is_none());
}

#[tokio::test]
async fn unknown_paths_and_bad_queries_are_json() {
    let filter = routes(state());

    let response = warp::test::request().path("/api/nowhere").reply(&filter).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json(response.body())["error"], "Not found");

    let response = warp::test::request().path("/api/weather?lat=north&lon=1").reply(&filter).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(response.body())["error"], "Invalid query");

    let response = warp::test::request().path("/health").reply(&filter).await;
    assert_eq!(response.status(), StatusCode::OK);
}
