use {
    crate::*,
    com::{ClassificationResult, Classifier},
    image::{NormalizeConfig, QualityScore, RgbFrame, SubmissionPayload, normalize},
    queue::{OfflineQueue, Store},
    std::{path::Path, sync::Arc},
    tokio::sync::watch,
    video::{CaptureSession, CaptureSurface, UploadSurface},
};

/// Where the current capture is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Capturing,
    Normalizing,
    Submitting,
    Succeeded,
    QueuedOffline,
    Failed,
}

impl CaptureState {
    /// True between the start of a capture and its terminal state.
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            CaptureState::Capturing | CaptureState::Normalizing | CaptureState::Submitting
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CaptureState::Succeeded | CaptureState::QueuedOffline | CaptureState::Failed
        )
    }
}

#[derive(Debug)]
pub enum Outcome {
    Succeeded(ClassificationResult),
    /// The classifier was unreachable; the payload waits in the queue under `key`.
    QueuedOffline {
        key: String,
        reason: ScreeningError,
    },
    Failed(ScreeningError),
}

impl Outcome {
    pub fn state(&self) -> CaptureState {
        match self {
            Outcome::Succeeded(_) => CaptureState::Succeeded,
            Outcome::QueuedOffline { .. } => CaptureState::QueuedOffline,
            Outcome::Failed(_) => CaptureState::Failed,
        }
    }
}

/// What one capture produced.
#[derive(Debug)]
pub struct CaptureReport {
    /// Advisory image quality, present once a frame was decoded.
    pub quality: Option<QualityScore>,
    pub outcome: Outcome,
}

/// Runs captures end to end: frame, quality, payload, classification, and
/// the offline fallback.
///
/// `capture` takes `&mut self`, so one orchestrator never has two payloads
/// in flight.
pub struct Orchestrator<S, C, T> {
    session: CaptureSession<S>,
    classifier: Arc<C>,
    queue: Arc<OfflineQueue<T>>,
    normalize: NormalizeConfig,
    state: watch::Sender<CaptureState>,
}

impl<S, C, T> Orchestrator<S, C, T>
where
    S: CaptureSurface,
    C: Classifier,
    T: Store,
{
    pub fn new(
        session: CaptureSession<S>,
        classifier: Arc<C>,
        queue: Arc<OfflineQueue<T>>,
    ) -> Self {
        let (state, _) = watch::channel(CaptureState::Idle);
        Self {
            session,
            classifier,
            queue,
            normalize: NormalizeConfig::default(),
            state,
        }
    }

    pub fn with_normalize(mut self, normalize: NormalizeConfig) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn state(&self) -> CaptureState {
        *self.state.borrow()
    }

    /// Watch state changes, e.g. to show a busy indicator.
    pub fn subscribe(&self) -> watch::Receiver<CaptureState> {
        self.state.subscribe()
    }

    pub fn session(&self) -> &CaptureSession<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut CaptureSession<S> {
        &mut self.session
    }

    pub fn queue(&self) -> &Arc<OfflineQueue<T>> {
        &self.queue
    }

    fn enter(&self, state: CaptureState) {
        log::debug!("capture state {:?}", state);
        self.state.send_replace(state);
    }

    fn finish(&self, quality: Option<QualityScore>, outcome: Outcome) -> CaptureReport {
        match &outcome {
            Outcome::Succeeded(result) => log::info!(
                "classified as {} ({})",
                result.top().label,
                result.confidence_percent()
            ),
            Outcome::QueuedOffline { key, reason } => {
                log::warn!("classifier unavailable ({reason}), queued as {key}")
            }
            Outcome::Failed(err) => log::error!("capture failed: {err}"),
        }
        self.enter(outcome.state());
        CaptureReport { quality, outcome }
    }

    /// Take the current frame and try to get it classified.
    ///
    /// Never retries by itself: a recoverable submission failure ends in the
    /// offline queue, anything else ends the capture as failed.
    pub async fn capture(&mut self) -> CaptureReport {
        self.enter(CaptureState::Capturing);
        let frame = match self.session.frame().await {
            Ok(frame) => frame,
            Err(err) => return self.finish(None, Outcome::Failed(err.into())),
        };

        self.enter(CaptureState::Normalizing);
        let (rgb, quality) = match prepare(frame).await {
            Ok(prepared) => prepared,
            Err(err) => return self.finish(None, Outcome::Failed(err)),
        };
        log::info!("captured {}x{} frame, {}", rgb.width(), rgb.height(), quality);

        let payload = match normalize(rgb, &self.normalize).await {
            Ok(payload) => payload,
            Err(err) => return self.finish(Some(quality), Outcome::Failed(err.into())),
        };

        self.enter(CaptureState::Submitting);
        let outcome = self.submit(payload).await;
        self.finish(Some(quality), outcome)
    }

    async fn submit(&self, payload: SubmissionPayload) -> Outcome {
        let reason = match self.classifier.classify(&payload).await {
            Ok(result) => return Outcome::Succeeded(result),
            Err(err) => ScreeningError::from(err),
        };
        if !reason.is_recoverable() {
            return Outcome::Failed(reason);
        }
        match self.queue.enqueue(payload).await {
            Ok(key) => Outcome::QueuedOffline { key, reason },
            Err(err) => Outcome::Failed(err.into()),
        }
    }
}

impl<C, T> Orchestrator<UploadSurface, C, T>
where
    C: Classifier,
    T: Store,
{
    /// Load the image at `path` as the upload and capture it. A file that
    /// cannot be read ends this capture as failed; the orchestrator stays
    /// usable for the next one.
    pub async fn capture_upload(&mut self, path: &Path) -> CaptureReport {
        self.enter(CaptureState::Capturing);
        let surface = self.session.surface_mut();
        surface.clear();
        if let Err(err) = surface.load_path(path).await {
            return self.finish(None, Outcome::Failed(err.into()));
        }
        if let Err(err) = self.session.start() {
            return self.finish(None, Outcome::Failed(err.into()));
        }
        self.capture().await
    }
}

// decode to RGB and score quality off the async threads
async fn prepare(frame: image::Frame) -> Result<(RgbFrame, QualityScore), ScreeningError> {
    tokio::task::spawn_blocking(move || -> Result<_, ScreeningError> {
        let rgb = frame.to_rgb()?;
        let quality = image::evaluate(&rgb);
        Ok((rgb, quality))
    })
    .await
    .map_err(|e| ScreeningError::Encoding(e.to_string()))?
}
