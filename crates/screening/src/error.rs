use {
    com::ComError,
    image::ImageError,
    queue::StoreError,
    std::{fmt, time::Duration},
    video::VideoError,
};

/// Why a capture did not produce a classification.
#[derive(Debug)]
pub enum ScreeningError {
    /// The capture surface is off or produced no frame.
    DeviceUnavailable(String),
    /// The frame could not be decoded, resized or encoded.
    Encoding(String),
    /// The classifier did not answer within the time budget.
    Timeout(Duration),
    /// The classifier could not be reached, or answered with an error status.
    Transport(String),
    /// The classifier answered with something that is not a result.
    Protocol(String),
    /// The offline queue is full.
    StorageExhausted {
        used: u64,
        requested: u64,
        capacity: u64,
    },
    /// The offline queue could not be written.
    Storage(String),
}

impl ScreeningError {
    /// Whether the payload is worth keeping for a later resubmission.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScreeningError::Timeout(_) | ScreeningError::Transport(_)
        )
    }
}

impl fmt::Display for ScreeningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreeningError::DeviceUnavailable(msg) => write!(f, "camera unavailable: {msg}"),
            ScreeningError::Encoding(msg) => write!(f, "image could not be prepared: {msg}"),
            ScreeningError::Timeout(budget) => {
                write!(f, "no response within {} ms", budget.as_millis())
            }
            ScreeningError::Transport(msg) => write!(f, "classifier unreachable: {msg}"),
            ScreeningError::Protocol(msg) => write!(f, "unusable classifier response: {msg}"),
            ScreeningError::StorageExhausted {
                used,
                requested,
                capacity,
            } => write!(
                f,
                "offline storage full ({used} of {capacity} bytes used, {requested} needed)"
            ),
            ScreeningError::Storage(msg) => write!(f, "offline storage failed: {msg}"),
        }
    }
}

impl std::error::Error for ScreeningError {}

impl From<VideoError> for ScreeningError {
    fn from(err: VideoError) -> Self {
        ScreeningError::DeviceUnavailable(err.to_string())
    }
}

impl From<ImageError> for ScreeningError {
    fn from(err: ImageError) -> Self {
        ScreeningError::Encoding(err.to_string())
    }
}

impl From<ComError> for ScreeningError {
    fn from(err: ComError) -> Self {
        match err {
            ComError::Timeout(budget) => ScreeningError::Timeout(budget),
            ComError::Transport(msg) => ScreeningError::Transport(msg),
            ComError::Status(status) => {
                ScreeningError::Transport(format!("endpoint returned {status}"))
            }
            ComError::Protocol(msg) => ScreeningError::Protocol(msg),
            ComError::InvalidEndpoint(msg) => ScreeningError::Protocol(msg),
        }
    }
}

impl From<StoreError> for ScreeningError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::StorageExhausted {
                used,
                requested,
                capacity,
            } => ScreeningError::StorageExhausted {
                used,
                requested,
                capacity,
            },
            other => ScreeningError::Storage(other.to_string()),
        }
    }
}
