// Copyright @yucwang 2026

use crate::core::tonemapper::{ clamp_display, Tonemapper };
use crate::math::constants::Float;

/// `x / (1 + x)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reinhard;

impl Tonemapper for Reinhard {
    fn map(&self, x: Float) -> Float {
        if !(x > 0.0) {
            return 0.0;
        }
        let v = if x <= 1.0 { x / (1.0 + x) } else { 1.0 / (1.0 + 1.0 / x) };
        clamp_display(v)
    }
}
