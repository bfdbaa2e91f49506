use std::env;
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use tyme::cli;
use tyme::config::{AppConfig, RunMode, Settings};
use tyme::runtime;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => match AppConfig::from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                error!(error = %err, "unable to read config file");
                return ExitCode::FAILURE;
            }
        },
        Err(_) => AppConfig::default(),
    };
    let settings = match Settings::load(&config) {
        Ok(settings) => settings,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match settings.run_mode {
        RunMode::Api => runtime::run_api(settings).await,
        RunMode::Cli => cli::cli(settings).await,
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "tyme failed");
            ExitCode::FAILURE
        }
    }
}
