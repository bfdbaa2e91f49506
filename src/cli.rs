use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use inquire::Text;

use crate::config::Settings;
use crate::models::meeting::{Location, MeetingSuggestion};
use crate::runtime;
use crate::service::meeting_time::MeetingTimeResolver;
use crate::service::time_codec;
use crate::service::time_query_service::TimeQueryService;
use crate::service::timezone_offset;

#[derive(Parser)]
#[command(name = "tyme", about = "Find meeting times across timezones")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest a meeting time; the first location is the reference zone.
    Resolve {
        /// TIMEZONE=LABEL, e.g. America/New_York=NYC. Repeat for each participant.
        #[arg(short, long = "location", value_parser = parse_location, required = true)]
        locations: Vec<Location>,
        #[arg(short, long)]
        preferred: Option<String>,
        #[arg(long)]
        twenty_four_hour: bool,
    },
    /// Type a request like "2pm in Tokyo, Singapore" and let the language model read it.
    Ask {},
    /// Start the HTTP API.
    Serve {},
}

fn parse_location(raw: &str) -> Result<Location, String> {
    match raw.split_once('=') {
        Some((tz, label)) if !tz.trim().is_empty() && !label.trim().is_empty() => {
            Ok(Location::new(tz.trim(), label.trim()))
        }
        Some(_) => Err(format!("expected TIMEZONE=LABEL, got {}", raw)),
        // Bare zone: label it with its own name.
        None => Ok(Location::new(raw.trim(), raw.trim())),
    }
}

pub async fn cli(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve {
            locations,
            preferred,
            twenty_four_hour,
        } => {
            let now = Utc::now();
            let suggestion = MeetingTimeResolver::new().resolve(&locations, preferred.as_deref(), now)?;
            print_suggestion(&suggestion, !twenty_four_hour, now);
            Ok(())
        }
        Commands::Ask {} => ask(&settings).await,
        Commands::Serve {} => runtime::run_api(settings).await,
    }
}

async fn ask(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let http = runtime::http_client(settings)?;
    let Some(llm) = runtime::llm_client(settings, &http) else {
        return Err("No language model API key configured".into());
    };
    let query = specify_prompt()?;

    let result = TimeQueryService::new(llm).parse_query(&query).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if let (Some(second_tz), Some(second_location)) = (&result.second_timezone, &result.second_location) {
        let locations = [
            Location::new(result.timezone.clone(), result.location.clone()),
            Location::new(second_tz.clone(), second_location.clone()),
        ];
        let now = Utc::now();
        let suggestion = MeetingTimeResolver::new().resolve(&locations, result.time.as_deref(), now)?;
        print_suggestion(&suggestion, true, now);
    }
    Ok(())
}

fn print_suggestion(suggestion: &MeetingSuggestion, twelve_hour: bool, at: DateTime<Utc>) {
    println!(
        "Suggested: {} ({})",
        time_codec::format(suggestion.time, twelve_hour),
        suggestion.reference_timezone
    );
    for local in &suggestion.local_times {
        let marker = if local.within_business_hours { "" } else { "  (outside business hours)" };
        println!(
            "  {:<20} {:>8}  {} ({}){}",
            local.label,
            time_codec::format(local.time, twelve_hour),
            local.timezone,
            offset_label(&local.timezone, at),
            marker
        );
    }
    println!("{}", suggestion.explanation);
}

/// "UTC+5.5", "UTC-4", or "UTC" for a zero offset.
fn offset_label(timezone: &str, at: DateTime<Utc>) -> String {
    match timezone_offset::utc_offset_hours(timezone, at) {
        Ok(hours) if hours == 0.0 => "UTC".to_string(),
        Ok(hours) => format!("UTC{:+}", hours),
        Err(_) => "UTC?".to_string(),
    }
}

fn specify_prompt() -> Result<String, Box<dyn std::error::Error>> {
    Ok(Text::new("What time do you want to check?").prompt()?)
}
