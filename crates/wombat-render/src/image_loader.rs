//! Raster image decoding via the `image` crate.
//!
//! [§ 4.8.3 The img element](https://html.spec.whatwg.org/multipage/embedded-content.html#the-img-element)
//!
//! The crate handles sub-format detection (PNG/JPEG/GIF/WebP/...)
//! internally, so one decoder covers every raster source the loader can
//! fetch.

use image::ImageError;
use wombat_common::image::{DecodeError, DecodedImage, ImageDecoder};

/// Decoder for raster images, backed by `image::load_from_memory`.
#[derive(Default)]
pub struct RasterDecoder;

impl RasterDecoder {
    /// Create a new decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ImageDecoder for RasterDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        let dynamic = image::load_from_memory(bytes).map_err(|e| match e {
            ImageError::Unsupported(_) => DecodeError::UnknownFormat,
            other => DecodeError::Malformed(other.to_string()),
        })?;
        let rgba = dynamic.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(DecodedImage::new(width, height, rgba.into_raw()))
    }
}
