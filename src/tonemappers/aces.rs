// Copyright @yucwang 2026

use crate::core::tonemapper::{ clamp_display, Tonemapper };
use crate::math::constants::Float;

// Narkowicz fit divided through by its asymptote 2.51 / 2.43.
const A: Float = 0.03 / 2.51;
const B: Float = 0.59 / 2.43;
const C: Float = 0.14 / 2.43;

/// Filmic ACES approximation with the white level scaled to one.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcesFilmic;

impl Tonemapper for AcesFilmic {
    fn map(&self, x: Float) -> Float {
        if !(x > 0.0) {
            return 0.0;
        }
        let v = if x <= 1.0 {
            x * (x + A) / (x * (x + B) + C)
        } else {
            let inv = 1.0 / x;
            (1.0 + A * inv) / (1.0 + B * inv + C * inv * inv)
        };
        clamp_display(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aces_anchor_points() {
        let aces = AcesFilmic;
        assert_eq!(aces.map(0.0), 0.0);
        assert_eq!(aces.map(-1.0), 0.0);
        assert_eq!(aces.map(Float::NAN), 0.0);
        assert!(aces.map(Float::INFINITY) < 1.0);
        assert!(aces.map(Float::MAX) < 1.0);
        assert!(aces.map(1e4) > 0.99);
        let mid = aces.map(0.18);
        assert!(mid > 0.1 && mid < 0.3);
    }

    #[test]
    fn test_aces_is_continuous_at_branch() {
        let aces = AcesFilmic;
        let below = aces.map(1.0);
        let above = aces.map(1.0 + 1e-6);
        assert!((below - above).abs() < 1e-5);
    }
}
