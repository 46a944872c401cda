use thiserror::Error;

/// Rejected input, detected before any request is sent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Enter City")]
    EmptyCity,

    #[error("API key must not be empty")]
    EmptyApiKey,

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

/// Outcome of a failed fetch. Every variant is terminal; nothing is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// DNS, connect, timeout or body read failure.
    #[error("{0}")]
    NetworkFailure(String),

    /// The provider answered with a non-success status.
    ///
    /// `message` is the `message` field of the provider's JSON error body when
    /// there is one (e.g. "city not found"), else the canonical reason phrase
    /// for `status`, else the bare status code.
    #[error("{message}")]
    HttpFailure { status: u16, message: String },

    /// The body was not the expected JSON shape.
    #[error("malformed weather response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    InvalidInput(#[from] InputError),
}
