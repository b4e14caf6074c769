use {crate::*, std::io::Cursor};

/// One captured or uploaded image before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

/// Packed 8-bit RGB pixels, row-major, `width * height * 3` bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbFrame {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Frame {
    pub fn new(width: usize, height: usize, data: Vec<u8>, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            data,
            format,
        }
    }

    /// Wrap an encoded image (upload or MJPEG frame). The size is read from
    /// the header; an unreadable header gives a 0x0 frame that fails later
    /// at decode time.
    pub fn encoded(data: Vec<u8>) -> Self {
        let (width, height) = crates_image::ImageReader::new(Cursor::new(&data))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.into_dimensions().ok())
            .unwrap_or((0, 0));
        Self::new(width as usize, height as usize, data, PixelFormat::Encoded)
    }

    /// Convert to packed RGB without touching this frame.
    pub fn to_rgb(&self) -> Result<RgbFrame, ImageError> {
        let Some(expected) = self.format.frame_len(self.width, self.height) else {
            return decode_rgb(&self.data);
        };
        if self.data.len() < expected {
            return Err(ImageError::Decode(format!(
                "{:?} frame of {}x{} needs {} bytes, got {}",
                self.format,
                self.width,
                self.height,
                expected,
                self.data.len()
            )));
        }
        let data = &self.data[..expected];

        let rgb = match self.format {
            PixelFormat::Rgba8 => rgba_to_rgb(data),
            PixelFormat::Argb8 => argb_to_rgb(data),
            PixelFormat::Yuyv => yuyv_to_rgb(self.width, self.height, data),
            PixelFormat::Yu12 => yu12_to_rgb(self.width, self.height, data),
            // already packed RGB
            _ => data.to_vec(),
        };
        RgbFrame::new(self.width, self.height, rgb)
    }
}

fn decode_rgb(data: &[u8]) -> Result<RgbFrame, ImageError> {
    let decoded = crates_image::load_from_memory(data)?.to_rgb8();
    let (width, height) = decoded.dimensions();
    RgbFrame::new(width as usize, height as usize, decoded.into_raw())
}

impl RgbFrame {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        if data.len() != width * height * 3 {
            return Err(ImageError::Decode(format!(
                "RGB frame of {}x{} needs {} bytes, got {}",
                width,
                height,
                width * height * 3,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame where every pixel has the same color.
    pub fn filled(width: usize, height: usize, color: [u8; 3]) -> Self {
        Self {
            width,
            height,
            data: color.repeat(width * height),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Decode any supported container into RGB.
///
/// The CPU-bound decoding work runs on tokio's blocking thread pool.
pub async fn decode_image(data: &[u8]) -> Result<RgbFrame, ImageError> {
    let owned = data.to_vec();
    tokio::task::spawn_blocking(move || decode_rgb(&owned))
        .await
        .map_err(|e| ImageError::Decode(e.to_string()))?
}
