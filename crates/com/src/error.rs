use std::{fmt, time::Duration};

#[derive(Debug)]
pub enum ComError {
    /// The endpoint URL in the configuration cannot be used.
    InvalidEndpoint(String),
    /// No answer within the time budget.
    Timeout(Duration),
    /// The request could not be sent or the response could not be read.
    Transport(String),
    /// The endpoint answered with a non-success status.
    Status(http::StatusCode),
    /// The endpoint answered, but the body is unusable.
    Protocol(String),
}

impl ComError {
    /// Whether a later resubmission of the same payload can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ComError::Timeout(_) | ComError::Transport(_) | ComError::Status(_)
        )
    }
}

impl fmt::Display for ComError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComError::InvalidEndpoint(msg) => write!(f, "invalid endpoint: {msg}"),
            ComError::Timeout(budget) => {
                write!(f, "no response within {} ms", budget.as_millis())
            }
            ComError::Transport(msg) => write!(f, "transport error: {msg}"),
            ComError::Status(status) => write!(f, "endpoint returned {status}"),
            ComError::Protocol(msg) => write!(f, "protocol error: {msg}"),
        }
    }
}

impl std::error::Error for ComError {}

impl From<reqwest::Error> for ComError {
    fn from(err: reqwest::Error) -> Self {
        ComError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ComError {
    fn from(err: serde_json::Error) -> Self {
        ComError::Protocol(err.to_string())
    }
}
