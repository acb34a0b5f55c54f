// Copyright @yucwang 2026

use crate::math::constants::{ Float, Vector3f };
use crate::math::spectrum::RGBSpectrum;

/// Direction towards a light from a shading point.
///
/// A zero `direction` means the light contributes nothing there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    pub direction: Vector3f,
    /// Shadow ray length, infinite for lights at infinity.
    pub distance: Float,
    pub attenuation: Float,
}

impl LightSample {
    pub fn none() -> Self {
        Self { direction: Vector3f::zeros(), distance: 0.0, attenuation: 0.0 }
    }

    pub fn is_valid(&self) -> bool {
        self.direction != Vector3f::zeros() && self.attenuation > 0.0
    }
}

pub trait Light: Send + Sync {
    /// `u` is a scalar sample in `[0, 1)`; delta lights ignore it.
    fn sample(&self, p: &Vector3f, n: &Vector3f, u: Float) -> LightSample;

    /// Unattenuated emitted color, intensity included.
    fn color(&self) -> RGBSpectrum;

    fn describe(&self) -> String {
        String::from("Light")
    }
}

/// Windowed inverse square falloff. `radius` is where the light fades out
/// completely and `bulb_size` the distance under which it stops growing.
pub fn physical_attenuation(distance: Float, radius: Float, bulb_size: Float) -> Float {
    let fadeout = ((radius - distance) / (radius * 0.2)).max(0.0).min(1.0);
    let excess = (distance - bulb_size).max(0.0);
    let denom = 1.0 + excess / bulb_size;
    fadeout * fadeout / (denom * denom)
}
