// Copyright @yucwang 2026

pub mod exr_utils;
pub mod obj_utils;
pub mod png_utils;
pub mod tga;

use std::path::Path;

use crate::core::error::{ RenderError, Result };
use crate::core::film::Film;

/// Writes the film to `path`, picking the format from the extension.
/// `.tga` and `.png` store the display buffer, `.exr` the averaged radiance.
pub fn save_output(path: &Path, film: &Film, frame: u32) -> Result<()> {
    let ext = path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "tga" => tga::write_tga_file(path, film.width(), film.height(), 4, film.ldr_bytes()),
        "png" => png_utils::write_png_file(path, film.width(), film.height(), film.ldr_bytes()),
        "exr" => exr_utils::write_exr_file(path, film.width(), film.height(), &film.averaged(frame)),
        _ => Err(RenderError::UnsupportedOutput(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_extension_is_rejected() {
        let film = Film::new(1, 1);
        let result = save_output(Path::new("out.bmp"), &film, 1);
        assert!(matches!(result, Err(RenderError::UnsupportedOutput(_))));
    }
}
