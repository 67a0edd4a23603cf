use thiserror::Error;

/// Failure talking to the optimization service.
///
/// `Clone` because a single in-flight detail fetch may be awaited by several
/// rows at once and every waiter receives the same outcome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Service returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl From<ApiError> for String {
    fn from(err: ApiError) -> Self {
        err.to_string()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
