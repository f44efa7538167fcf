use thiserror::Error;

/// Errors from forecast retrieval.
///
/// Every variant is recoverable at the tool boundary; callers are
/// expected to turn these into a user-facing message rather than retry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WeatherError {
    /// Geocoding returned no result for the given location.
    #[error("location '{0}' not found")]
    LocationNotFound(String),

    /// The upstream call exceeded the request timeout.
    #[error("weather provider request timed out")]
    TimedOut,

    /// The upstream provider rejected the request with HTTP 429.
    #[error("weather provider rate limit exceeded")]
    RateLimited,

    /// The upstream provider returned some other HTTP error.
    #[error("weather provider error: {0}")]
    Provider(u16),

    /// The upstream response could not be interpreted.
    #[error("invalid forecast data: {0}")]
    InvalidResponse(String),

    /// The request never reached the provider.
    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::TimedOut
        } else {
            Self::Network(e.to_string())
        }
    }
}
