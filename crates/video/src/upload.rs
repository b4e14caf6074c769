use {
    crate::*,
    image::Frame,
    std::path::Path,
};

/// File upload seen as a capture surface: the uploaded bytes are the frame.
///
/// The upload is decoded later by the pipeline, so an unreadable file still
/// captures and fails at normalization.
#[derive(Debug, Default)]
pub struct UploadSurface {
    data: Option<Vec<u8>>,
    active: bool,
}

impl UploadSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// An active surface holding `data`.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            data: Some(data),
            active: true,
        }
    }

    /// An active surface holding the contents of `path`.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, VideoError> {
        let data = tokio::fs::read(path.as_ref()).await?;
        Ok(Self::from_bytes(data))
    }

    /// Replace the uploaded image.
    pub fn load(&mut self, data: Vec<u8>) {
        self.data = Some(data);
    }

    pub async fn load_path(&mut self, path: impl AsRef<Path>) -> Result<(), VideoError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        log::debug!("loaded upload {} ({} bytes)", path.display(), data.len());
        self.load(data);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.data = None;
    }
}

impl CaptureSurface for UploadSurface {
    fn start(&mut self, _facing: Facing) -> Result<(), VideoError> {
        if self.data.is_none() {
            return Err(VideoError::Unavailable("no image uploaded".to_string()));
        }
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active && self.data.is_some()
    }

    async fn frame(&mut self) -> Result<Frame, VideoError> {
        match (&self.data, self.active) {
            (Some(data), true) => Ok(Frame::encoded(data.clone())),
            (None, _) => Err(VideoError::Unavailable("no image uploaded".to_string())),
            (Some(_), false) => Err(VideoError::Unavailable("upload surface stopped".to_string())),
        }
    }
}
