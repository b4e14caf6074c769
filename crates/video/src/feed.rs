use {
    crate::*,
    image::Frame,
    std::time::Duration,
    tokio::sync::mpsc::{self, error::TrySendError},
};

// capacity of the camera feed channel
const CHANNEL_CAPACITY: usize = 4;

/// How long `frame` waits for the first frame after `start`.
pub const DEFAULT_FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a camera feed: the external camera pushes frames into the sender,
/// the pipeline pulls the newest one from the surface.
pub fn feed() -> (FeedSender, FeedSurface) {
    let (sender, receiver) = mpsc::channel::<Frame>(CHANNEL_CAPACITY);
    (
        FeedSender { sender },
        FeedSurface {
            receiver,
            facing: None,
            current: None,
            frame_timeout: DEFAULT_FRAME_TIMEOUT,
        },
    )
}

/// Producer side of a camera feed.
#[derive(Clone)]
pub struct FeedSender {
    sender: mpsc::Sender<Frame>,
}

impl FeedSender {
    /// Push a frame, waiting for room in the channel.
    pub async fn send(&self, frame: Frame) -> Result<(), VideoError> {
        self.sender
            .send(frame)
            .await
            .map_err(|_| VideoError::Channel("capture surface dropped".to_string()))
    }

    /// Push a frame without waiting. A full channel drops the frame, which
    /// is what a live camera wants.
    pub fn offer(&self, frame: Frame) -> Result<bool, VideoError> {
        match self.sender.try_send(frame) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(_)) => Ok(false),
            Err(TrySendError::Closed(_)) => {
                Err(VideoError::Channel("capture surface dropped".to_string()))
            }
        }
    }
}

/// Consumer side of a camera feed.
///
/// The most recent frame is kept as the current frame, so repeated
/// captures without a new camera frame all see the same picture.
pub struct FeedSurface {
    receiver: mpsc::Receiver<Frame>,
    facing: Option<Facing>,
    current: Option<Frame>,
    frame_timeout: Duration,
}

impl FeedSurface {
    pub fn with_frame_timeout(mut self, frame_timeout: Duration) -> Self {
        self.frame_timeout = frame_timeout;
        self
    }

    pub fn frame_timeout(&self) -> Duration {
        self.frame_timeout
    }

    /// The facing mode the feed was started with, if active.
    pub fn facing(&self) -> Option<Facing> {
        self.facing
    }

    fn discard_buffered(&mut self) {
        while self.receiver.try_recv().is_ok() {}
        self.current = None;
    }
}

impl CaptureSurface for FeedSurface {
    fn start(&mut self, facing: Facing) -> Result<(), VideoError> {
        if self.receiver.is_closed() && self.receiver.is_empty() {
            return Err(VideoError::Unavailable("camera feed closed".to_string()));
        }
        // frames queued before start belong to a previous session
        self.discard_buffered();
        self.facing = Some(facing);
        log::info!("camera feed started ({})", facing);
        Ok(())
    }

    fn stop(&mut self) {
        if self.facing.take().is_some() {
            self.discard_buffered();
            log::info!("camera feed stopped");
        }
    }

    fn is_active(&self) -> bool {
        self.facing.is_some()
    }

    async fn frame(&mut self) -> Result<Frame, VideoError> {
        if self.facing.is_none() {
            return Err(VideoError::Unavailable("camera is off".to_string()));
        }

        // the newest buffered frame replaces the current one
        while let Ok(frame) = self.receiver.try_recv() {
            self.current = Some(frame);
        }
        if let Some(frame) = &self.current {
            return Ok(frame.clone());
        }

        // nothing seen since start, wait a bounded time for the camera
        match tokio::time::timeout(self.frame_timeout, self.receiver.recv()).await {
            Ok(Some(frame)) => {
                self.current = Some(frame.clone());
                Ok(frame)
            }
            Ok(None) => Err(VideoError::Stream("camera feed closed".to_string())),
            Err(_) => Err(VideoError::Unavailable(format!(
                "no frame from camera within {:?}",
                self.frame_timeout
            ))),
        }
    }
}
