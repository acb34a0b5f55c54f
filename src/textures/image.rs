// Copyright @yucwang 2026

use std::path::Path;

use exr::prelude::*;
use image::io::Reader as ImageReader;
use image::GenericImageView;

use crate::core::error::TextureError;
use crate::core::texture::Texture2D;
use crate::math::constants::Float;
use crate::math::spectrum::RGBSpectrum;

pub fn srgb_to_linear(v: Float) -> Float {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

fn decode_error(path: &Path, reason: impl ToString) -> TextureError {
    TextureError::Decode { path: path.to_path_buf(), reason: reason.to_string() }
}

/// Decodes an LDR image. Rows are flipped so that row 0 sits at `v = 0`.
pub fn load_ldr(path: &Path, srgb: bool) -> std::result::Result<Texture2D<RGBSpectrum>, TextureError> {
    let img = ImageReader::open(path)
        .map_err(|e| decode_error(path, e))?
        .decode()
        .map_err(|e| decode_error(path, e))?;

    let (width, height) = img.dimensions();
    let rgb = img.to_rgb32f();
    let mut data = Vec::with_capacity((width * height) as usize);
    for y in (0..height).rev() {
        for x in 0..width {
            let p = rgb.get_pixel(x, y);
            let mut texel = RGBSpectrum::new(p[0], p[1], p[2]);
            if srgb {
                texel = RGBSpectrum::new(srgb_to_linear(p[0]),
                                         srgb_to_linear(p[1]),
                                         srgb_to_linear(p[2]));
            }
            data.push(texel);
        }
    }

    Texture2D::new(width as usize, height as usize, data)
}

/// Reads the first RGB layer of an OpenEXR file as linear radiance.
pub fn load_exr(path: &Path) -> std::result::Result<Texture2D<RGBSpectrum>, TextureError> {
    let image = read()
        .no_deep_data()
        .largest_resolution_level()
        .rgba_channels(
            |resolution, _| {
                let width = resolution.width();
                let height = resolution.height();
                (width, height, vec![RGBSpectrum::default(); width * height])
            },
            |(width, height, pixels), position, (r, g, b, _a): (f32, f32, f32, f32)| {
                let y = *height - 1 - position.y();
                pixels[position.x() + *width * y] = RGBSpectrum::new(r, g, b);
            },
        )
        .first_valid_layer()
        .all_attributes()
        .from_file(path)
        .map_err(|e| decode_error(path, e))?;

    let (width, height, pixels) = image.layer_data.channel_data.pixels;
    Texture2D::new(width, height, pixels)
}

/// Picks a decoder from the file extension. LDR images are treated as sRGB.
pub fn load_texture(path: &Path) -> std::result::Result<Texture2D<RGBSpectrum>, TextureError> {
    let ext = path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let texture = match ext.as_str() {
        "exr" => load_exr(path)?,
        "jpg" | "jpeg" | "png" | "tga" | "bmp" => load_ldr(path, true)?,
        _ => return Err(decode_error(path, format!("unsupported texture format: {}", ext))),
    };
    log::debug!("Loaded texture {} ({}x{})", path.display(), texture.width(), texture.height());
    Ok(texture)
}
