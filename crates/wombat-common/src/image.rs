//! Decoded image data shared between the loader and the layout engine.

use crate::raster::Raster;

/// Errors produced while decoding an image.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The byte stream is not an image format the decoder understands.
    #[error("unknown image format")]
    UnknownFormat,
    /// The format was recognized but the data is corrupt or unsupported.
    #[error("image decode error: {0}")]
    Malformed(String),
}

/// Image decoding seam between layout and the codec backend.
///
/// The layout engine fetches raw bytes through a loader and hands them to
/// this trait; the backend turns them into RGBA pixels.
pub trait ImageDecoder {
    /// Decode raw image bytes into a [`DecodedImage`].
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the bytes cannot be decoded. The caller
    /// is expected to log and render nothing for the image.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError>;
}

/// Decoded pixel data for a loaded image resource.
#[derive(Clone)]
pub struct DecodedImage {
    /// Intrinsic width of the image in pixels.
    width: u32,
    /// Intrinsic height of the image in pixels.
    height: u32,
    /// Raw RGBA pixel data (width * height * 4 bytes).
    rgba_data: Vec<u8>,
}

impl DecodedImage {
    /// Create a new `DecodedImage` from decoded RGBA pixel data.
    ///
    /// `rgba_data` must be `width * height * 4` bytes.
    #[must_use]
    pub const fn new(width: u32, height: u32, rgba_data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba_data,
        }
    }

    /// Intrinsic width of the image in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Intrinsic height of the image in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA pixel data.
    #[must_use]
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }

    /// Copy the pixel data into a [`Raster`] layout can composite.
    #[must_use]
    pub fn to_raster(&self) -> Raster {
        Raster::from_rgba(self.width, self.height, self.rgba_data.clone())
    }
}
