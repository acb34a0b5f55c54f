// Copyright @yucwang 2026

use std::path::Path;

use image::RgbaImage;

use crate::core::error::{ RenderError, Result };

/// Saves a row-major RGBA8 buffer through the `image` crate.
pub fn write_png_file(path: &Path, width: usize, height: usize, rgba: &[u8]) -> Result<()> {
    let image = RgbaImage::from_raw(width as u32, height as u32, rgba.to_vec())
        .ok_or_else(|| RenderError::Encode(
            format!("buffer of {} bytes does not fit {}x{} RGBA", rgba.len(), width, height)))?;
    image.save(path).map_err(|e| RenderError::Encode(e.to_string()))?;
    log::info!("PNG written to: {}.", path.display());
    Ok(())
}
