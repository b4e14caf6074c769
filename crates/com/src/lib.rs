//! Talking to the remote classifier.
//!
//! `InferenceClient` posts one `SubmissionPayload` per call under a fixed
//! time budget and parses the answer into a `ClassificationResult`.
//! `ConnectivitySignal` carries online/offline transitions to whoever
//! replays queued submissions.

pub mod client;
pub mod connectivity;
pub mod error;
pub mod result;

pub use client::{
    Classifier, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, InferenceClient, InferenceConfig, UploadMode,
};
pub use connectivity::{Connectivity, ConnectivitySignal, probe, spawn_probe};
pub use error::ComError;
pub use result::{ClassificationResult, DR_STAGES, Prediction, ResultKind};
pub use http::StatusCode;
pub use reqwest::Url;
