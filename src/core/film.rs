// Copyright @yucwang 2026

use crate::core::tonemapper::{ pack_rgba8, Tonemapper };
use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;
use crate::math::spectrum::RGBSpectrum;

/// Rectangular pixel range handled by one estimate call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Tile {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Row-major tiles of at most `size` squared pixels covering the image.
    pub fn cover(width: usize, height: usize, size: usize) -> Vec<Tile> {
        let size = size.max(1);
        let mut tiles = Vec::new();
        for y in (0..height).step_by(size) {
            for x in (0..width).step_by(size) {
                tiles.push(Tile::new(x, y, size.min(width - x), size.min(height - y)));
            }
        }
        tiles
    }
}

/// Persistent HDR radiance sums plus the packed display buffer.
///
/// The sample count is implicit: the caller passes the current frame,
/// starting at 1, when tonemapping.
#[derive(Debug, Clone)]
pub struct Film {
    hdr: Bitmap<RGBSpectrum>,
    ldr: Vec<u8>,
}

impl Film {
    pub fn new(width: usize, height: usize) -> Self {
        Self { hdr: Bitmap::new(width, height),
               ldr: vec![0u8; width * height * 4] }
    }

    pub fn width(&self) -> usize {
        self.hdr.width()
    }

    pub fn height(&self) -> usize {
        self.hdr.height()
    }

    /// Adds one sample to a pixel's running sum. Non-finite or negative
    /// channels are dropped first; returns false when that happened.
    pub fn accumulate(&mut self, index: usize, sample: &RGBSpectrum) -> bool {
        let clean = sample.sanitized();
        self.hdr.as_mut_slice()[index] += clean;
        clean == *sample
    }

    pub fn sum(&self, index: usize) -> RGBSpectrum {
        self.hdr.as_slice()[index]
    }

    pub fn average(&self, index: usize, frame: u32) -> RGBSpectrum {
        self.sum(index) / frame.max(1) as Float
    }

    /// Averages, tonemaps and packs one pixel into the display buffer.
    pub fn tonemap_pixel(&mut self, index: usize, frame: u32, tonemapper: &dyn Tonemapper) {
        let display = tonemapper.map_spectrum(&self.average(index, frame));
        let packed = pack_rgba8(&display);
        self.ldr[4 * index..4 * index + 4].copy_from_slice(&packed.to_le_bytes());
    }

    pub fn tonemap_all(&mut self, frame: u32, tonemapper: &dyn Tonemapper) {
        for index in 0..self.hdr.len() {
            self.tonemap_pixel(index, frame, tonemapper);
        }
    }

    pub fn packed(&self, index: usize) -> u32 {
        let b = &self.ldr[4 * index..4 * index + 4];
        u32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }

    /// Row-major RGBA8 display buffer.
    pub fn ldr_bytes(&self) -> &[u8] {
        &self.ldr
    }

    /// Per-pixel mean radiance after `frame` frames.
    pub fn averaged(&self, frame: u32) -> Vec<RGBSpectrum> {
        (0..self.hdr.len()).map(|i| self.average(i, frame)).collect()
    }

    pub fn clear(&mut self) {
        self.hdr.as_mut_slice().iter_mut().for_each(|p| *p = RGBSpectrum::default());
        self.ldr.iter_mut().for_each(|b| *b = 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tonemappers::reinhard::Reinhard;

    #[test]
    fn test_tiles_cover_image() {
        let tiles = Tile::cover(10, 5, 4);
        assert_eq!(tiles.len(), 6);
        assert_eq!(tiles[2], Tile::new(8, 0, 2, 4));
        assert_eq!(tiles[5], Tile::new(8, 4, 2, 1));
        let total: usize = tiles.iter().map(|t| t.pixel_count()).sum();
        assert_eq!(total, 50);
    }

    #[test]
    fn test_accumulate_is_running_sum() {
        let mut film = Film::new(2, 1);
        assert!(film.accumulate(1, &RGBSpectrum::splat(1.0)));
        assert!(film.accumulate(1, &RGBSpectrum::splat(3.0)));
        assert_eq!(film.sum(1), RGBSpectrum::splat(4.0));
        assert_eq!(film.average(1, 2), RGBSpectrum::splat(2.0));
        assert_eq!(film.sum(0), RGBSpectrum::default());
    }

    #[test]
    fn test_accumulate_sanitizes() {
        let mut film = Film::new(1, 1);
        assert!(!film.accumulate(0, &RGBSpectrum::new(Float::NAN, 1.0, 2.0)));
        assert_eq!(film.sum(0), RGBSpectrum::default());
        assert!(!film.accumulate(0, &RGBSpectrum::new(-1.0, 0.0, 2.0)));
        assert_eq!(film.sum(0), RGBSpectrum::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_tonemap_packs_rgba() {
        let mut film = Film::new(1, 1);
        film.accumulate(0, &RGBSpectrum::new(2.0, 0.0, 0.0));
        film.tonemap_pixel(0, 2, &Reinhard);
        assert_eq!(film.ldr_bytes(), &[128, 0, 0, 255]);
        assert_eq!(film.packed(0), 0xFF00_0080);
    }
}
