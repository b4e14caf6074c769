/// Pixel layout of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Packed R, G, B.
    Rgb8,
    /// Packed R, G, B, A (decoded uploads, canvas readbacks).
    Rgba8,
    /// Packed A, R, G, B.
    Argb8,
    /// Packed 4:2:2, two pixels per Y0 U Y1 V group.
    Yuyv,
    /// Planar 4:2:0, Y plane followed by U and V planes.
    Yu12,
    /// A compressed container (JPEG, PNG, ...), decoded on demand.
    Encoded,
}

impl PixelFormat {
    /// Exact buffer length for a raw frame of the given size, `None` for
    /// encoded frames whose length depends on the content.
    pub fn frame_len(&self, width: usize, height: usize) -> Option<usize> {
        let pixels = width * height;
        match self {
            PixelFormat::Rgb8 => Some(pixels * 3),
            PixelFormat::Rgba8 | PixelFormat::Argb8 => Some(pixels * 4),
            PixelFormat::Yuyv => Some(width.div_ceil(2) * height * 4),
            PixelFormat::Yu12 => Some(pixels + 2 * width.div_ceil(2) * height.div_ceil(2)),
            PixelFormat::Encoded => None,
        }
    }
}

// BT.601 YUV-to-RGB conversion for a single pixel (fixed-point, shift 8)
pub(crate) fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y = y as i32;
    let u = u as i32 - 128;
    let v = v as i32 - 128;
    let r = (y + ((359 * v) >> 8)).clamp(0, 255) as u8;
    let g = (y - ((88 * u + 183 * v) >> 8)).clamp(0, 255) as u8;
    let b = (y + ((454 * u) >> 8)).clamp(0, 255) as u8;
    [r, g, b]
}
