use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::clients::gemini_client::GeminiClient;
use crate::clients::google_calendar::{CalendarClient, GoogleCalendarClient, GoogleOAuthConfig};
use crate::clients::google_maps::GoogleMapsClient;
use crate::clients::mailer::{InviteMailer, SmtpConfig, SmtpMailer};
use crate::clients::openai_client::OpenAIClient;
use crate::clients::openweather::OpenWeatherClient;
use crate::config::{LlmProvider, Settings};
use crate::handlers::routes;
use crate::handlers::state::AppState;
use crate::service::llm_service::LlmClient;
use crate::service::meeting_time_service::MeetingTimeService;
use crate::service::time_query_service::TimeQueryService;

pub fn http_client(settings: &Settings) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.http_timeout_secs))
        .build()
}

/// The configured language model, if its key is present.
pub fn llm_client(settings: &Settings, http: &reqwest::Client) -> Option<Arc<dyn LlmClient>> {
    match settings.llm_provider {
        LlmProvider::OpenAI => settings.openai_api_key.clone().map(|key| {
            Arc::new(OpenAIClient::new(http.clone(), key, settings.openai_model.clone())) as Arc<dyn LlmClient>
        }),
        LlmProvider::Gemini => settings.gemini_api_key.clone().map(|key| {
            Arc::new(GeminiClient::new(http.clone(), key, settings.gemini_model.clone())) as Arc<dyn LlmClient>
        }),
    }
}

pub fn build_state(settings: &Settings, http: reqwest::Client) -> AppState {
    let llm = llm_client(settings, &http);
    if llm.is_none() {
        warn!(provider = ?settings.llm_provider, "no language model key configured; /api/time is disabled");
    }

    let mut state = AppState::new(Arc::new(MeetingTimeService::new(llm.clone())));
    state.time_queries = llm.map(|llm| Arc::new(TimeQueryService::new(llm)));

    let google = &settings.google;
    if let (Some(client_id), Some(client_secret)) = (&google.client_id, &google.client_secret) {
        let calendar = GoogleCalendarClient::new(
            http.clone(),
            GoogleOAuthConfig {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
                redirect_uri: google.redirect_uri.clone(),
                refresh_token: google.refresh_token.clone(),
            },
        );
        state.calendar = Some(Arc::new(calendar) as Arc<dyn CalendarClient>);
    } else {
        warn!("Google OAuth client is not configured; Meet links are disabled");
    }

    if let (Some(user), Some(password)) = (&settings.email.user, &settings.email.password) {
        let smtp = SmtpConfig {
            host: settings.email.smtp_host.clone(),
            username: user.clone(),
            password: password.clone(),
        };
        match SmtpMailer::new(&smtp) {
            Ok(mailer) => {
                state.mailer = Some(Arc::new(mailer) as Arc<dyn InviteMailer>);
                state.mail_from = Some(user.clone());
            }
            Err(err) => warn!(error = %err, "SMTP mailer unavailable"),
        }
    }

    state.maps = google
        .maps_api_key
        .clone()
        .map(|key| Arc::new(GoogleMapsClient::new(http.clone(), key)));
    state.weather = Some(Arc::new(OpenWeatherClient::new(http, settings.openweather_api_key.clone())));
    state
}

pub async fn run_api(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = settings.bind_address().parse()?;
    let http = http_client(&settings)?;
    let state = build_state(&settings, http);

    info!(%addr, "Tyme API listening");
    warp::serve(routes::routes(state)).run(addr).await;
    Ok(())
}
