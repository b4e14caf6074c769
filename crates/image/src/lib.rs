//! Frame handling for the scanner pipeline.
//!
//! A `Frame` is whatever the capture surface produced: raw camera pixels in
//! one of several layouts, or an encoded upload. Everything downstream works
//! on `RgbFrame` (packed 8-bit RGB, row-major), which feeds the quality
//! evaluator and the normalizer that builds the `SubmissionPayload`.

pub mod convert;
pub mod error;
pub mod frame;
pub mod normalize;
pub mod payload;
pub mod pixelformat;
pub mod quality;

pub use convert::*;
pub use error::ImageError;
pub use frame::{Frame, RgbFrame, decode_image};
pub use normalize::{
    DEFAULT_CONTRAST, DEFAULT_QUALITY, DEFAULT_SIZE, Enhancement, NormalizeConfig, encode_jpeg,
    normalize, normalize_encoded,
};
pub use payload::{JPEG_CONTENT_TYPE, SubmissionPayload};
pub use pixelformat::PixelFormat;
pub use quality::{QualityScore, evaluate};
