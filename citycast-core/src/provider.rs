use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    error::LookupError,
    model::{CityQuery, Credentials, WeatherSnapshot},
};

const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Reason shown when a rejection body carries no usable `message`.
const FALLBACK_REJECTION: &str = "Unable to fetch weather data.";

/// Placeholder when the response has no weather-condition description.
const NO_DESCRIPTION: &str = "No description available";

/// Client for the OpenWeather current-weather endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    endpoint: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Point the provider at a different endpoint. Tests use this to talk
    /// to a local server.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: Client::new(),
        }
    }

    /// Fetch current weather for `query`, metric units. Exactly one request
    /// per call: no retries, and no timeout beyond the transport default.
    pub async fn current_weather(
        &self,
        query: &CityQuery,
        credentials: &Credentials,
    ) -> Result<WeatherSnapshot, LookupError> {
        debug!(city = query.as_str(), "requesting current weather");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", query.as_str()),
                ("units", "metric"),
                ("appid", credentials.as_str()),
            ])
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "weather request failed to send");
                LookupError::Transport(err.to_string())
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|err| {
            warn!(error = %err, "failed to read weather response body");
            LookupError::Transport(err.to_string())
        })?;

        if !status.is_success() {
            let reason = rejection_reason(&body);
            debug!(%status, %reason, "upstream rejected the lookup");
            return Err(LookupError::UpstreamRejected(reason));
        }

        snapshot_from_body(&body)
    }
}

impl Default for OpenWeatherProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct OwRejection {
    message: Option<String>,
}

/// Extract the upstream `message` from a rejection body; a missing, empty,
/// or unparseable message falls back to a fixed reason.
fn rejection_reason(body: &str) -> String {
    serde_json::from_str::<OwRejection>(body)
        .ok()
        .and_then(|r| r.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| FALLBACK_REJECTION.to_string())
}

#[derive(Debug, Deserialize, Default)]
struct OwMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    sys: Option<OwSys>,
    #[serde(default)]
    weather: Vec<OwWeather>,
    main: Option<OwMain>,
}

/// Map a success body onto a snapshot. Missing optional fields become
/// absent values; a body that is not valid JSON is a transport-level
/// failure, not a panic.
fn snapshot_from_body(body: &str) -> Result<WeatherSnapshot, LookupError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body).map_err(|err| {
        warn!(error = %err, "failed to parse weather response JSON");
        LookupError::Transport(err.to_string())
    })?;

    let description = parsed
        .weather
        .first()
        .and_then(|w| w.description.clone())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    let country = parsed.sys.and_then(|sys| sys.country);
    let main = parsed.main.unwrap_or_default();

    Ok(WeatherSnapshot {
        location: compose_location(parsed.name.as_deref(), country.as_deref()),
        description,
        temperature: main.temp,
        feels_like: main.feels_like,
        humidity: main.humidity,
    })
}

/// Join city name and country code with ", ", dropping the separator when
/// the country is absent or empty.
fn compose_location(name: Option<&str>, country: Option<&str>) -> String {
    let name = name.unwrap_or_default();
    match country {
        Some(country) if !country.is_empty() => format!("{name}, {country}"),
        _ => name.trim().trim_end_matches(',').to_string(),
    }
}
