use {
    crate::*,
    image::SubmissionPayload,
    reqwest::multipart::{Form, Part},
    std::{fmt, future::Future, str::FromStr, sync::Arc, time::Duration},
    tokio::sync::oneshot,
};

/// Default endpoint of a locally hosted classifier.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/predict";

/// Default time budget for one submit-and-respond round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// multipart field and file name the classifier expects
const UPLOAD_FIELD: &str = "file";
const UPLOAD_FILE_NAME: &str = "capture.jpg";

/// Something that turns a payload into a classification.
///
/// `InferenceClient` is the HTTP implementation; the offline queue and the
/// orchestrator only depend on this trait.
pub trait Classifier: Send + Sync {
    fn classify(
        &self,
        payload: &SubmissionPayload,
    ) -> impl Future<Output = Result<ClassificationResult, ComError>> + Send;
}

impl<T: Classifier> Classifier for Arc<T> {
    fn classify(
        &self,
        payload: &SubmissionPayload,
    ) -> impl Future<Output = Result<ClassificationResult, ComError>> + Send {
        (**self).classify(payload)
    }
}

/// How the image travels in the POST body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadMode {
    /// `multipart/form-data` with the image in the `file` field.
    #[default]
    Multipart,
    /// The image bytes as the whole body, with the payload content type.
    Raw,
}

impl FromStr for UploadMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "multipart" | "form" => Ok(UploadMode::Multipart),
            "raw" | "body" => Ok(UploadMode::Raw),
            other => Err(format!("unknown upload mode: {other}")),
        }
    }
}

impl fmt::Display for UploadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadMode::Multipart => write!(f, "multipart"),
            UploadMode::Raw => write!(f, "raw"),
        }
    }
}

/// Configuration for the inference client.
#[derive(Clone, Debug)]
pub struct InferenceConfig {
    endpoint: String,
    timeout: Duration,
    upload: UploadMode,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            upload: UploadMode::default(),
        }
    }
}

impl InferenceConfig {
    /// Set the classifier URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the time budget for one submission.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_upload(mut self, upload: UploadMode) -> Self {
        self.upload = upload;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn upload(&self) -> UploadMode {
        self.upload
    }
}

/// HTTP client for the remote classifier.
///
/// Each `submit` sends exactly one request and never retries.
#[derive(Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    endpoint: reqwest::Url,
    config: InferenceConfig,
}

impl InferenceClient {
    pub fn new(config: InferenceConfig) -> Result<Self, ComError> {
        let endpoint = reqwest::Url::parse(config.endpoint())
            .map_err(|e| ComError::InvalidEndpoint(format!("{}: {e}", config.endpoint())))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ComError::InvalidEndpoint(format!(
                "{}: scheme must be http or https",
                config.endpoint()
            )));
        }
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ComError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            endpoint,
            config,
        })
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }

    fn request(&self, payload: &SubmissionPayload) -> Result<reqwest::RequestBuilder, ComError> {
        let request = self.http.post(self.endpoint.clone());
        let data = payload.data().to_vec();
        Ok(match self.config.upload {
            UploadMode::Multipart => {
                let part = Part::bytes(data)
                    .file_name(UPLOAD_FILE_NAME)
                    .mime_str(payload.content_type())
                    .map_err(|e| {
                        ComError::Protocol(format!(
                            "bad content type {}: {e}",
                            payload.content_type()
                        ))
                    })?;
                request.multipart(Form::new().part(UPLOAD_FIELD, part))
            }
            UploadMode::Raw => request
                .header(http::header::CONTENT_TYPE, payload.content_type())
                .body(data),
        })
    }

    /// Submit one payload and wait for the classification.
    ///
    /// The request runs as its own task and reports through a single-use
    /// slot. The slot races a timer of `config.timeout()`; if the timer
    /// wins the request task is aborted and `ComError::Timeout` is returned,
    /// so a late response never produces a result.
    pub async fn submit(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<ClassificationResult, ComError> {
        let request = self.request(payload)?;
        let budget = self.config.timeout;

        let (slot, outcome) = oneshot::channel();
        let task = tokio::spawn(async move {
            // the caller may have stopped listening; the send is then a no-op
            let _ = slot.send(send(request).await);
        });

        log::debug!(
            "submitting {} bytes to {} (budget {} ms)",
            payload.len(),
            self.endpoint,
            budget.as_millis()
        );

        tokio::select! {
            outcome = outcome => match outcome {
                Ok(outcome) => outcome,
                Err(_) => Err(ComError::Transport(
                    "request task ended without a result".to_string(),
                )),
            },
            _ = tokio::time::sleep(budget) => {
                task.abort();
                log::warn!("submission to {} timed out after {} ms", self.endpoint, budget.as_millis());
                Err(ComError::Timeout(budget))
            }
        }
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<ClassificationResult, ComError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ComError::Status(status));
    }
    let body = response.bytes().await?;
    ClassificationResult::parse(&body)
}

impl Classifier for InferenceClient {
    async fn classify(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<ClassificationResult, ComError> {
        self.submit(payload).await
    }
}
