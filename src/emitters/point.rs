// Copyright @yucwang 2026

use crate::core::light::{ physical_attenuation, Light, LightSample };
use crate::math::constants::{ Float, Vector3f };
use crate::math::spectrum::RGBSpectrum;

/// Omni light with a bounded reach.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub position: Vector3f,
    pub color: RGBSpectrum,
    pub intensity: Float,
    pub radius: Float,
    pub bulb_size: Float,
}

impl PointLight {
    pub fn new(position: Vector3f, color: RGBSpectrum, intensity: Float) -> Self {
        Self { position, color, intensity, radius: Float::MAX, bulb_size: 1.0 }
    }

    pub fn with_range(mut self, radius: Float, bulb_size: Float) -> Self {
        self.radius = radius;
        self.bulb_size = bulb_size;
        self
    }
}

impl Light for PointLight {
    fn sample(&self, p: &Vector3f, n: &Vector3f, _u: Float) -> LightSample {
        let to_light = self.position - p;
        let distance = to_light.norm();
        if !(distance > 0.0) || !distance.is_finite() {
            return LightSample::none();
        }

        let direction = to_light / distance;
        if direction.dot(n) <= 0.0 {
            return LightSample::none();
        }

        let attenuation = physical_attenuation(distance, self.radius, self.bulb_size);
        if attenuation <= 0.0 {
            return LightSample::none();
        }
        LightSample { direction, distance, attenuation }
    }

    fn color(&self) -> RGBSpectrum {
        self.color * self.intensity
    }

    fn describe(&self) -> String {
        format!("PointLight at ({}, {}, {})", self.position.x, self.position.y, self.position.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_light_sample() {
        let light = PointLight::new(Vector3f::new(0.0, 0.0, 3.0), RGBSpectrum::splat(1.0), 2.0);
        let s = light.sample(&Vector3f::zeros(), &Vector3f::new(0.0, 0.0, 1.0), 0.5);
        assert!(s.is_valid());
        assert!((s.direction - Vector3f::new(0.0, 0.0, 1.0)).norm() < 1e-6);
        assert!((s.distance - 3.0).abs() < 1e-6);
        assert!((s.attenuation - 1.0 / 9.0).abs() < 1e-6);
        assert_eq!(light.color(), RGBSpectrum::splat(2.0));
    }

    #[test]
    fn test_point_light_behind_surface() {
        let light = PointLight::new(Vector3f::new(0.0, 0.0, -3.0), RGBSpectrum::splat(1.0), 1.0);
        let s = light.sample(&Vector3f::zeros(), &Vector3f::new(0.0, 0.0, 1.0), 0.5);
        assert!(!s.is_valid());
        assert_eq!(s.direction, Vector3f::zeros());

        let at = light.sample(&Vector3f::new(0.0, 0.0, -3.0), &Vector3f::new(0.0, 0.0, 1.0), 0.5);
        assert!(!at.is_valid());
    }

    #[test]
    fn test_point_light_out_of_range() {
        let light = PointLight::new(Vector3f::new(0.0, 0.0, 20.0), RGBSpectrum::splat(1.0), 1.0)
            .with_range(10.0, 1.0);
        let s = light.sample(&Vector3f::zeros(), &Vector3f::new(0.0, 0.0, 1.0), 0.5);
        assert!(!s.is_valid());
    }
}
