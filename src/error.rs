use thiserror::Error;

/// Failure surface of the API client.
///
/// Every operation resolves to exactly one of these kinds; the UI shell
/// renders the `Display` form in an error dialog and nothing is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// A pre-flight input check failed; no request was sent.
    #[error("invalid input: {0}")]
    Validation(&'static str),

    /// The server answered with a non-success HTTP status.
    #[error("server returned HTTP {status}: {body}")]
    Server { status: u16, body: String },

    /// The response body was not JSON, or a required field was
    /// absent or had the wrong type.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The per-call deadline elapsed before a response arrived.
    #[error("request timed out")]
    Timeout(#[source] reqwest::Error),

    /// Any other transport failure (connection refused, DNS, ...).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
}

/// Result type alias for API client operations.
pub type Result<T> = std::result::Result<T, Error>;
