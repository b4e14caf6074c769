use {
    crate::*,
    crates_image::{DynamicImage, ImageEncoder, RgbImage, imageops},
};

/// Default canonical edge length, the classifier's input size.
pub const DEFAULT_SIZE: u32 = 224;

/// Default JPEG quality factor for submissions.
pub const DEFAULT_QUALITY: u8 = 90;

/// Default contrast adjustment applied with `Enhancement::Grayscale`.
pub const DEFAULT_CONTRAST: f32 = 25.0;

/// Optional transform applied after resizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Enhancement {
    None,
    /// Convert to grayscale, then adjust contrast (percent, may be negative).
    /// The result is replicated back into three channels.
    Grayscale { contrast: f32 },
}

/// Configuration for building submission payloads.
#[derive(Clone, Debug)]
pub struct NormalizeConfig {
    size: u32,
    quality: u8,
    enhancement: Enhancement,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            quality: DEFAULT_QUALITY,
            enhancement: Enhancement::None,
        }
    }
}

impl NormalizeConfig {
    /// Set the square output edge length in pixels (at least 1).
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size.max(1);
        self
    }

    /// Set the JPEG quality factor (1-100).
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn with_enhancement(mut self, enhancement: Enhancement) -> Self {
        self.enhancement = enhancement;
        self
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn enhancement(&self) -> Enhancement {
        self.enhancement
    }
}

/// Encode packed RGB as JPEG.
pub fn encode_jpeg(frame: &RgbFrame, quality: u8) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Vec::new();
    crates_image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(
            frame.data(),
            frame.width() as u32,
            frame.height() as u32,
            crates_image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer)
}

fn normalize_inner(frame: RgbFrame, config: &NormalizeConfig) -> Result<SubmissionPayload, ImageError> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(ImageError::Decode("frame has no pixels".to_string()));
    }
    let (width, height) = (frame.width() as u32, frame.height() as u32);
    let source = RgbImage::from_raw(width, height, frame.into_data())
        .ok_or_else(|| ImageError::Decode("RGB buffer does not match frame size".to_string()))?;

    // stretch to the square input size; aspect ratio is not preserved
    let size = config.size;
    let resized = imageops::resize(&source, size, size, imageops::FilterType::Triangle);

    let output = match config.enhancement {
        Enhancement::None => resized,
        Enhancement::Grayscale { contrast } => {
            let gray = imageops::contrast(&imageops::grayscale(&resized), contrast);
            DynamicImage::ImageLuma8(gray).to_rgb8()
        }
    };

    let output = RgbFrame::new(size as usize, size as usize, output.into_raw())?;
    let jpeg = encode_jpeg(&output, config.quality)?;
    log::debug!(
        "normalized {}x{} frame into {} byte payload",
        width,
        height,
        jpeg.len()
    );
    Ok(SubmissionPayload::new(jpeg, JPEG_CONTENT_TYPE))
}

/// Resize, optionally enhance, and JPEG-encode a frame.
///
/// The CPU-bound work runs on tokio's blocking thread pool.
///
/// # Errors
///
/// Returns `ImageError::Decode` for an empty frame and `ImageError::Encode`
/// if JPEG encoding fails.
pub async fn normalize(
    frame: RgbFrame,
    config: &NormalizeConfig,
) -> Result<SubmissionPayload, ImageError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || normalize_inner(frame, &config))
        .await
        .map_err(|e| ImageError::Encode(e.to_string()))?
}

/// Decode an arbitrary encoded image and normalize it.
///
/// # Errors
///
/// Returns `ImageError::Decode` if the data is not a supported image.
pub async fn normalize_encoded(
    data: &[u8],
    config: &NormalizeConfig,
) -> Result<SubmissionPayload, ImageError> {
    let frame = decode_image(data).await?;
    normalize(frame, config).await
}
