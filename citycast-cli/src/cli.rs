use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, Text};

use citycast_core::{Config, LookupSession, OpenWeatherProvider, WeatherSnapshot, format_temperature};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citycast", version, about = "Current weather lookup by city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key used for lookups.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, optionally with a country suffix, e.g. "Paris,FR".
        /// Prompts interactively when omitted.
        city: Option<String>,

        /// API key override; falls back to OPENWEATHER_API_KEY, then the
        /// config file.
        #[arg(long)]
        api_key: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, api_key } => show(city, api_key).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key);
    config.save()?;

    println!("API key saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(city: Option<String>, api_key: Option<String>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let api_key = api_key.or_else(|| config.resolve_api_key());

    let provider = OpenWeatherProvider::new();
    let mut session = LookupSession::new();

    match city {
        Some(city) => {
            lookup(&mut session, &provider, &city, api_key.as_deref()).await;
            match render_outcome(&session) {
                Some(message) => anyhow::bail!("{message}"),
                None => Ok(()),
            }
        }
        None => prompt_loop(&mut session, &provider, api_key.as_deref()).await,
    }
}

/// Prompt for cities until the user submits nothing. Each submission
/// replaces the previous outcome wholesale; the form stays usable after any
/// failure.
async fn prompt_loop(
    session: &mut LookupSession,
    provider: &OpenWeatherProvider,
    api_key: Option<&str>,
) -> anyhow::Result<()> {
    loop {
        let city = Text::new("City:")
            .with_placeholder("e.g. Tokyo, Paris, Toronto")
            .prompt_skippable()
            .context("Failed to read city input")?;

        let Some(city) = city.filter(|city| !city.trim().is_empty()) else {
            return Ok(());
        };

        lookup(session, provider, &city, api_key).await;
        if let Some(message) = render_outcome(session) {
            eprintln!("{message}");
        }
    }
}

/// Drive one submission, showing the loading notice only while a request
/// is actually in flight. Precondition failures settle inside `begin`.
async fn lookup(
    session: &mut LookupSession,
    provider: &OpenWeatherProvider,
    city: &str,
    api_key: Option<&str>,
) {
    let Ok(submission) = session.begin(city, api_key) else {
        return;
    };

    println!("Searching…");
    let outcome = provider
        .current_weather(submission.query(), submission.credentials())
        .await;
    session.settle(&submission, outcome);
}

/// Print the snapshot card on success; hand back the error message on
/// failure so each caller can decide how fatal it is.
fn render_outcome(session: &LookupSession) -> Option<String> {
    if let Some(snapshot) = session.snapshot() {
        print_snapshot(snapshot);
        return None;
    }

    session.error().map(str::to_string)
}

fn print_snapshot(snapshot: &WeatherSnapshot) {
    println!();
    println!("{}", snapshot.location);
    println!(
        "{}  {}",
        format_temperature(snapshot.temperature),
        snapshot.description
    );
    println!("Feels like  {}", format_temperature(snapshot.feels_like));
    println!(
        "Humidity    {}%",
        snapshot
            .humidity
            .map(|h| h.to_string())
            .unwrap_or_else(|| "—".to_string())
    );
    println!();
}
