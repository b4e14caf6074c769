//! Retinal screening pipeline.
//!
//! `Orchestrator` drives one capture at a time from a capture session to a
//! classification, falling back to the offline queue when the classifier
//! cannot be reached. `spawn_reconnect_handler` replays that queue when
//! connectivity returns.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod reconnect;
pub mod report;

pub use config::{ConfigError, ScreeningConfig};
pub use error::ScreeningError;
pub use orchestrator::{CaptureReport, CaptureState, Orchestrator, Outcome};
pub use reconnect::spawn_reconnect_handler;
pub use report::{render_capture, render_drain, render_result};
