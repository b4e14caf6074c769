use std::{fmt, io};

#[derive(Debug)]
pub enum StoreError {
    /// The backing storage failed.
    Io(io::Error),
    /// Storing the record would exceed the byte cap.
    StorageExhausted {
        used: u64,
        requested: u64,
        capacity: u64,
    },
    /// A stored record cannot be read back.
    Corrupt { key: String, reason: String },
    /// Keys are limited to ASCII letters, digits, `-` and `_`.
    InvalidKey(String),
    /// A storage task died before finishing.
    Task(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "storage I/O error: {err}"),
            StoreError::StorageExhausted {
                used,
                requested,
                capacity,
            } => write!(
                f,
                "storage exhausted: {used} of {capacity} bytes used, {requested} more requested"
            ),
            StoreError::Corrupt { key, reason } => write!(f, "record {key} is corrupt: {reason}"),
            StoreError::InvalidKey(key) => write!(f, "invalid key: {key:?}"),
            StoreError::Task(msg) => write!(f, "storage task failed: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::Task(err.to_string())
    }
}
