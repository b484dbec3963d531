use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// A validated city query: trimmed, non-empty text, passed to the upstream
/// API verbatim (a country suffix like "Paris,FR" goes through untouched).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery(String);

impl CityQuery {
    /// Trim and validate raw input. Blank input never reaches the network.
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LookupError::EmptyInput);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CityQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The API key authorizing calls to the upstream provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials(String);

impl Credentials {
    /// An absent, empty, or whitespace-only key never reaches the network.
    pub fn parse(raw: Option<&str>) -> Result<Self, LookupError> {
        match raw.map(str::trim) {
            Some(key) if !key.is_empty() => Ok(Self(key.to_string())),
            _ => Err(LookupError::MissingCredentials),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Immutable record of one completed successful weather lookup.
///
/// Missing upstream fields are absent here, never an error; `description`
/// falls back to a fixed placeholder during mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: String,
    pub description: String,
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<u8>,
}

/// Render a temperature for display: absent and NaN values become an
/// em-dash placeholder, everything else rounds to the nearest integer with
/// a degree mark. Total for any input.
pub fn format_temperature(temperature: Option<f64>) -> String {
    match temperature {
        Some(t) if !t.is_nan() => format!("{}°", t.round()),
        _ => "—".to_string(),
    }
}
