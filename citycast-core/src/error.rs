use thiserror::Error;

/// Failure reasons for a single lookup submission.
///
/// `Display` is the user-visible message for every variant. `Transport`
/// carries diagnostic detail for logs, but always renders the same generic
/// message: a transport failure has no body to quote.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Blank or whitespace-only city input.
    #[error("Please enter a city name.")]
    EmptyInput,

    /// No API key configured.
    #[error("Missing API key configuration.")]
    MissingCredentials,

    /// Upstream answered with a non-success status; the message comes from
    /// the response body when it has one.
    #[error("{0}")]
    UpstreamRejected(String),

    /// Network-level failure or malformed response body.
    #[error("Something went wrong.")]
    Transport(String),
}
