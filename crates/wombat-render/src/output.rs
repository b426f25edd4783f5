//! Saving rendered rasters to disk.

use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;
use wombat_common::raster::Raster;

/// Save a raster as an image file; the format follows the extension.
///
/// # Errors
///
/// Returns an error if the raster buffer is inconsistent or the file
/// cannot be written.
pub fn save_png(raster: &Raster, path: &Path) -> Result<()> {
    let image = RgbaImage::from_raw(raster.width(), raster.height(), raster.data().to_vec())
        .context("raster buffer does not match its dimensions")?;
    image
        .save(path)
        .with_context(|| format!("failed to save image to '{}'", path.display()))?;
    Ok(())
}
