// Copyright @yucwang 2026

use crate::math::constants::{ Float, ONE_MINUS_EPSILON };
use crate::math::spectrum::RGBSpectrum;

/// Display response for one HDR channel.
///
/// `map` is non-decreasing with `map(0) == 0` and stays strictly below one
/// for every input. Negative and NaN inputs map to zero.
pub trait Tonemapper: Send + Sync {
    fn map(&self, x: Float) -> Float;

    fn map_spectrum(&self, s: &RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum::new(self.map(s.r()), self.map(s.g()), self.map(s.b()))
    }
}

/// Clamps a curve output into `[0, 1)`.
pub fn clamp_display(v: Float) -> Float {
    if v.is_nan() {
        return 0.0;
    }
    v.max(0.0).min(ONE_MINUS_EPSILON)
}

/// Packs a display color into `0xAABBGGRR` with opaque alpha.
pub fn pack_rgba8(c: &RGBSpectrum) -> u32 {
    let to_byte = |v: Float| (clamp_display(v) * 255.0 + 0.5) as u32;
    0xFF00_0000 | (to_byte(c.b()) << 16) | (to_byte(c.g()) << 8) | to_byte(c.r())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_rgba8() {
        assert_eq!(pack_rgba8(&RGBSpectrum::default()), 0xFF00_0000);
        assert_eq!(pack_rgba8(&RGBSpectrum::new(0.999999, 0.0, 0.0)), 0xFF00_00FF);
        assert_eq!(pack_rgba8(&RGBSpectrum::new(0.0, 0.5, 0.0)), 0xFF00_8000);
        assert_eq!(pack_rgba8(&RGBSpectrum::new(0.0, 0.0, Float::NAN)), 0xFF00_0000);
    }
}
