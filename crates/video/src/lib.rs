//! Capture surfaces for the scanner.
//!
//! A `CaptureSurface` is the external camera (or upload form) seen from the
//! pipeline: it can be started for a facing mode, stopped, asked whether it
//! is active, and asked for the current frame. `CaptureSession` owns one
//! surface together with its facing mode.

pub mod error;
pub mod feed;
pub mod session;
pub mod surface;
pub mod upload;

pub use error::VideoError;
pub use feed::{DEFAULT_FRAME_TIMEOUT, FeedSender, FeedSurface, feed};
pub use session::CaptureSession;
pub use surface::{CaptureSurface, Facing};
pub use upload::UploadSurface;
