use thiserror::Error;

/// Failure taxonomy shared by the client, the aggregator and the HTTP layer.
///
/// The `Display` text doubles as the per-entry description reported by
/// comparisons, so keep it stable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LensError {
    #[error("{0}")]
    Validation(String),
    #[error("User not found")]
    NotFound,
    #[error("GitHub API error: {0}")]
    Remote(u16),
    /// The remote answered with success but the body did not match.
    #[error("GitHub API error: invalid response body")]
    InvalidResponse(String),
    #[error("Request timeout")]
    Timeout,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl LensError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<reqwest::Error> for LensError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Remote(status.as_u16())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl warp::reject::Reject for LensError {}
