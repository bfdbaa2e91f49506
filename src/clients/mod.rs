use thiserror::Error;

pub mod gemini_client;
pub mod google_calendar;
pub mod google_maps;
pub mod mailer;
pub mod openai_client;
pub mod openweather;
pub mod prompts;

/// Failures of the read-only lookups (maps, weather).
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{0} API key is not configured")]
    NotConfigured(&'static str),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("{0}")]
    Api(String),
}
