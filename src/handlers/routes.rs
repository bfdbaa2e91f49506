use std::convert::Infallible;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, warn};
use warp::http::StatusCode;
use warp::reject::{InvalidQuery, LengthRequired, MethodNotAllowed, PayloadTooLarge, UnsupportedMediaType};
use warp::{Filter, Rejection, Reply};

use crate::handlers::api;
use crate::handlers::dto::{
    CoordinatesQuery, GenerateMeetRequest, MeetingTimeRequest, OAuthCallbackQuery, TimeQueryRequest,
};
use crate::handlers::error::ApiError;
use crate::handlers::state::AppState;
use crate::service::invite_service::InviteRequest;

const MAX_BODY_BYTES: u64 = 64 * 1024;

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: DeserializeOwned + Send + 'static,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

fn respond<T: Serialize>(result: Result<T, ApiError>) -> warp::reply::Response {
    match result {
        Ok(body) => warp::reply::json(&body).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Status and message for a request whose body never made it to a handler.
fn body_rejection(rejection: &Rejection) -> Option<(StatusCode, String)> {
    if let Some(err) = rejection.find::<warp::body::BodyDeserializeError>() {
        Some((StatusCode::BAD_REQUEST, err.to_string()))
    } else if rejection.find::<PayloadTooLarge>().is_some() {
        Some((StatusCode::PAYLOAD_TOO_LARGE, "The request body is too large".to_string()))
    } else if rejection.find::<LengthRequired>().is_some() {
        Some((StatusCode::LENGTH_REQUIRED, "A content-length header is required".to_string()))
    } else if rejection.find::<UnsupportedMediaType>().is_some() {
        Some((StatusCode::UNSUPPORTED_MEDIA_TYPE, "The request body must be JSON".to_string()))
    } else {
        None
    }
}

async fn recover_meeting_body(rejection: Rejection) -> Result<warp::reply::Response, Rejection> {
    let Some((status, cause)) = body_rejection(&rejection) else {
        return Err(rejection);
    };
    warn!(%cause, "unreadable meeting time request");
    Ok(ApiError::meeting(
        status,
        "Invalid input: At least two locations are required",
        "Please provide at least two valid locations, each with a timezone and location name",
    )
    .into_response())
}

async fn handle_rejection(rejection: Rejection) -> Result<warp::reply::Response, Infallible> {
    let err = if rejection.is_not_found() {
        ApiError::new(StatusCode::NOT_FOUND, "Not found", "No such endpoint")
    } else if let Some((status, cause)) = body_rejection(&rejection) {
        ApiError::new(status, "Invalid request body", cause)
    } else if rejection.find::<InvalidQuery>().is_some() {
        ApiError::bad_request("Invalid query", "The query string could not be read")
    } else if rejection.find::<MethodNotAllowed>().is_some() {
        ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed", "Method not allowed")
    } else {
        error!(?rejection, "unhandled rejection");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal error", "An unexpected error occurred")
    };
    Ok(err.into_response())
}

pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let meeting_time = warp::path!("api" / "meeting-time")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(json_body())
        .then(|state: AppState, body: MeetingTimeRequest| async move {
            respond(api::meeting_time(&state, body, Utc::now()).await)
        })
        .recover(recover_meeting_body)
        .unify();

    let time_query = warp::path!("api" / "time")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(json_body())
        .then(|state: AppState, body: TimeQueryRequest| async move {
            respond(api::time_query(&state, body).await)
        });

    let generate_meet = warp::path!("api" / "generate-meet")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(json_body())
        .then(|state: AppState, body: GenerateMeetRequest| async move {
            respond(api::generate_meet(&state, body).await)
        });

    let send_invite = warp::path!("api" / "send-invite")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(json_body())
        .then(|state: AppState, body: InviteRequest| async move {
            respond(api::send_invite(&state, body).await)
        });

    let oauth_callback = warp::path!("api" / "oauth2callback")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and(warp::query())
        .then(|state: AppState, query: OAuthCallbackQuery| async move {
            respond(api::oauth_callback(&state, query).await)
        });

    let location_timezone = warp::path!("api" / "timezone")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and(warp::query())
        .then(|state: AppState, query: CoordinatesQuery| async move {
            respond(api::location_timezone(&state, query, Utc::now()).await)
        });

    let weather = warp::path!("api" / "weather")
        .and(warp::get())
        .and(with_state(state))
        .and(warp::query())
        .then(|state: AppState, query: CoordinatesQuery| async move {
            respond(api::weather(&state, query).await)
        });

    let health = warp::path!("health").and(warp::get()).map(|| "ok");

    meeting_time
        .or(time_query)
        .or(generate_meet)
        .or(send_invite)
        .or(oauth_callback)
        .or(location_timezone)
        .or(weather)
        .or(health)
        .recover(handle_rejection)
}
