// Copyright @yucwang 2026

use crate::core::light::{ Light, LightSample };
use crate::math::constants::{ Float, Vector3f };
use crate::math::spectrum::RGBSpectrum;

/// Light at infinity shining along `direction`.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    direction: Vector3f,
    pub color: RGBSpectrum,
    pub intensity: Float,
}

impl DirectionalLight {
    /// `direction` is the way the light travels. A zero vector yields a
    /// light that never contributes.
    pub fn new(direction: Vector3f, color: RGBSpectrum, intensity: Float) -> Self {
        let len = direction.norm();
        let direction = if len > 0.0 { direction / len } else { Vector3f::zeros() };
        Self { direction, color, intensity }
    }

    pub fn direction(&self) -> Vector3f {
        self.direction
    }
}

impl Light for DirectionalLight {
    fn sample(&self, _p: &Vector3f, n: &Vector3f, _u: Float) -> LightSample {
        let to_light = -self.direction;
        if to_light == Vector3f::zeros() || to_light.dot(n) <= 0.0 {
            return LightSample::none();
        }
        LightSample { direction: to_light, distance: Float::INFINITY, attenuation: 1.0 }
    }

    fn color(&self) -> RGBSpectrum {
        self.color * self.intensity
    }

    fn describe(&self) -> String {
        String::from("DirectionalLight")
    }
}
