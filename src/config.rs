use std::collections::HashMap;
use std::env;
use std::fs;
use std::str::FromStr;

use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000/oauth2callback";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config line {line}: {content}")]
    InvalidLine { line: usize, content: String },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Key/value pairs from a dotenv-style file.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::InvalidLine {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// File value first, then the process environment; blank values count as unset.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.get(key)
            .or_else(|| env::var(key).ok())
            .filter(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Cli,
    Api,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAI,
    Gemini,
}

#[derive(Debug, Clone)]
pub struct GoogleSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
    pub redirect_uri: String,
    pub maps_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Typed settings, built once at startup and handed to whoever needs them.
#[derive(Debug, Clone)]
pub struct Settings {
    pub run_mode: RunMode,
    pub host: String,
    pub port: u16,
    pub http_timeout_secs: u64,
    pub llm_provider: LlmProvider,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub google: GoogleSettings,
    pub openweather_api_key: Option<String>,
    pub email: EmailSettings,
}

impl Settings {
    pub fn load(config: &AppConfig) -> Result<Self, ConfigError> {
        let get_prop = |key: &str| config.lookup(key);

        let run_mode = match get_prop("RUN_MODE").as_deref() {
            None | Some("cli") => RunMode::Cli,
            Some("api") => RunMode::Api,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "RUN_MODE",
                    value: other.to_string(),
                });
            }
        };
        let llm_provider = match get_prop("LLM_PROVIDER").map(|p| p.to_lowercase()).as_deref() {
            None | Some("openai") => LlmProvider::OpenAI,
            Some("gemini") => LlmProvider::Gemini,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "LLM_PROVIDER",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            run_mode,
            host: get_prop("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(config, "PORT", DEFAULT_PORT)?,
            http_timeout_secs: parse_or(config, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
            llm_provider,
            openai_api_key: get_prop("OPENAI_API_KEY"),
            openai_model: get_prop("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            gemini_api_key: get_prop("GEMINI_API_KEY"),
            gemini_model: get_prop("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            google: GoogleSettings {
                client_id: get_prop("GOOGLE_CLIENT_ID"),
                client_secret: get_prop("GOOGLE_CLIENT_SECRET"),
                refresh_token: get_prop("GOOGLE_REFRESH_TOKEN"),
                redirect_uri: get_prop("GOOGLE_REDIRECT_URI")
                    .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
                maps_api_key: get_prop("GOOGLE_MAPS_API_KEY"),
            },
            openweather_api_key: get_prop("OPENWEATHER_API_KEY"),
            email: EmailSettings {
                smtp_host: get_prop("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                user: get_prop("EMAIL_USER"),
                password: get_prop("EMAIL_PASS"),
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(config: &AppConfig, key: &'static str, default: T) -> Result<T, ConfigError> {
    match config.lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}
