//! Core library for the `citycast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The lookup operation against the OpenWeather current-weather endpoint
//! - The submission state machine and shared domain models
//!
//! It is used by `citycast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod session;

pub use config::Config;
pub use error::LookupError;
pub use model::{CityQuery, Credentials, WeatherSnapshot, format_temperature};
pub use provider::OpenWeatherProvider;
pub use session::{LookupSession, LookupState, Submission};
