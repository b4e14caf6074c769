use {crate::VideoError, image::Frame, std::fmt};

/// Which camera to open, in the browser `facingMode` sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// Front camera, pointing at the operator.
    User,
    /// Rear camera, pointing at the subject.
    #[default]
    Environment,
}

impl Facing {
    pub fn flipped(self) -> Self {
        match self {
            Facing::User => Facing::Environment,
            Facing::Environment => Facing::User,
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facing::User => write!(f, "user"),
            Facing::Environment => write!(f, "environment"),
        }
    }
}

/// Async capture surface.
///
/// Implementations hand out the current frame on demand. `frame` on an
/// inactive surface returns `VideoError::Unavailable`.
#[allow(async_fn_in_trait)]
pub trait CaptureSurface {
    /// Start capturing with the given facing mode.
    fn start(&mut self, facing: Facing) -> Result<(), VideoError>;

    /// Stop capturing. Stopping an inactive surface does nothing.
    fn stop(&mut self);

    fn is_active(&self) -> bool;

    /// The current frame.
    async fn frame(&mut self) -> Result<Frame, VideoError>;
}
