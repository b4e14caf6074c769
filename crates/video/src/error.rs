use std::fmt;

#[derive(Debug)]
pub enum VideoError {
    /// The surface is off or has nothing to capture.
    Unavailable(String),
    Device(String),
    Stream(String),
    Channel(String),
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::Unavailable(msg) => write!(f, "capture unavailable: {msg}"),
            VideoError::Device(msg) => write!(f, "device error: {msg}"),
            VideoError::Stream(msg) => write!(f, "stream error: {msg}"),
            VideoError::Channel(msg) => write!(f, "channel error: {msg}"),
        }
    }
}

impl std::error::Error for VideoError {}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        VideoError::Device(err.to_string())
    }
}
