use {crate::*, image::Frame};

/// One capture surface and the facing mode it runs with.
///
/// The session is owned by whoever drives captures; nothing about the
/// camera lives in global state.
pub struct CaptureSession<S> {
    surface: S,
    facing: Facing,
}

impl<S: CaptureSurface> CaptureSession<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            facing: Facing::default(),
        }
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_active(&self) -> bool {
        self.surface.is_active()
    }

    pub fn start(&mut self) -> Result<(), VideoError> {
        self.surface.start(self.facing)
    }

    pub fn stop(&mut self) {
        self.surface.stop();
    }

    /// Switch between front and rear camera, restarting the surface if it
    /// was running.
    pub fn flip(&mut self) -> Result<Facing, VideoError> {
        self.facing = self.facing.flipped();
        if self.surface.is_active() {
            self.surface.stop();
            self.surface.start(self.facing)?;
        }
        Ok(self.facing)
    }

    /// The current frame, or `VideoError::Unavailable` if the surface is off.
    pub async fn frame(&mut self) -> Result<Frame, VideoError> {
        if !self.surface.is_active() {
            return Err(VideoError::Unavailable("capture surface is off".to_string()));
        }
        self.surface.frame().await
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
