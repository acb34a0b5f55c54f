/* Copyright 2020 @TwoCookingMice */

use std::path::Path;

use exr::prelude::*;

use crate::core::error::{ RenderError, Result };
use crate::math::spectrum::RGBSpectrum;

/// Writes row-major linear radiance to an RGB OpenEXR file.
pub fn write_exr_file(path: &Path, width: usize, height: usize,
                      pixels: &[RGBSpectrum]) -> Result<()> {
    if pixels.len() != width * height {
        return Err(RenderError::Encode(
            format!("expected {} pixels, got {}", width * height, pixels.len())));
    }
    log::info!("Starting writing openexr images: {}.", path.display());

    write_rgb_file(path, width, height, |x, y| {
        let p = &pixels[y * width + x];
        (p.r(), p.g(), p.b())
    }).map_err(|e| RenderError::Encode(e.to_string()))?;

    log::info!("EXR written to: {}.", path.display());
    Ok(())
}
