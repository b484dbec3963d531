use tracing::{debug, warn};

use crate::{
    error::LookupError,
    model::{CityQuery, Credentials, WeatherSnapshot},
    provider::OpenWeatherProvider,
};

/// Lifecycle of the most recent submission, from submit to settle.
///
/// One sum type internally; callers read the three projections
/// (`is_loading`, `error`, `snapshot`). `Loading` and `Failed` carry no
/// snapshot, so a stale forecast can never show up next to a spinner or an
/// error.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LookupState {
    #[default]
    Idle,
    Loading,
    Succeeded(WeatherSnapshot),
    Failed(String),
}

impl LookupState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LookupState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LookupState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            LookupState::Succeeded(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

/// Ticket for one in-flight submission: the validated inputs plus the
/// sequence number that decides whether its outcome still applies when it
/// settles.
#[derive(Debug, Clone)]
pub struct Submission {
    seq: u64,
    query: CityQuery,
    credentials: Credentials,
}

impl Submission {
    pub fn query(&self) -> &CityQuery {
        &self.query
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// State machine for the lookup form. Holds the latest outcome and hands
/// out sequence-numbered tickets so that when submissions overlap, only the
/// newest one can settle into visible state.
#[derive(Debug, Default)]
pub struct LookupSession {
    state: LookupState,
    seq: u64,
}

impl LookupSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    /// Whether a request is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Message of the most recent failed submission, if any.
    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    /// Result of the most recent successful submission, if any.
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.state.snapshot()
    }

    /// Start a submission. Preconditions are checked in order, each
    /// short-circuiting before any network activity: blank city first, then
    /// missing credentials. A precondition failure replaces the session
    /// state with `Failed` (clearing any snapshot) and is returned.
    ///
    /// On success the session enters `Loading` and the caller gets a ticket
    /// to fetch with and settle afterwards.
    pub fn begin(&mut self, city: &str, api_key: Option<&str>) -> Result<Submission, LookupError> {
        let validated = CityQuery::parse(city)
            .and_then(|query| Credentials::parse(api_key).map(|credentials| (query, credentials)));

        match validated {
            Ok((query, credentials)) => {
                self.seq += 1;
                self.state = LookupState::Loading;
                debug!(seq = self.seq, city = query.as_str(), "submission started");
                Ok(Submission {
                    seq: self.seq,
                    query,
                    credentials,
                })
            }
            Err(err) => {
                self.state = LookupState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Apply a submission's outcome. Returns `false` when the ticket has
    /// been superseded by a newer `begin`: a stale outcome is discarded
    /// silently, so the newest submission wins regardless of settle order.
    pub fn settle(
        &mut self,
        submission: &Submission,
        outcome: Result<WeatherSnapshot, LookupError>,
    ) -> bool {
        if submission.seq != self.seq {
            debug!(
                seq = submission.seq,
                current = self.seq,
                "discarding superseded submission outcome"
            );
            return false;
        }

        self.state = match outcome {
            Ok(snapshot) => LookupState::Succeeded(snapshot),
            Err(err) => {
                warn!(seq = submission.seq, error = %err, "submission failed");
                LookupState::Failed(err.to_string())
            }
        };
        true
    }

    /// Run one whole submission: begin, fetch, settle. For callers with no
    /// overlapping submissions; event-driven callers drive `begin` and
    /// `settle` themselves.
    pub async fn submit(
        &mut self,
        provider: &OpenWeatherProvider,
        city: &str,
        api_key: Option<&str>,
    ) {
        let Ok(submission) = self.begin(city, api_key) else {
            return;
        };

        let outcome = provider
            .current_weather(submission.query(), submission.credentials())
            .await;
        self.settle(&submission, outcome);
    }
}
