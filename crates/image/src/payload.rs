pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Normalized, encoded image ready for transmission. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    data: Vec<u8>,
    content_type: String,
}

impl SubmissionPayload {
    pub fn new(data: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            data,
            content_type: content_type.into(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
