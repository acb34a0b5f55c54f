// Copyright @yucwang 2026

use crate::core::error::RenderError;
use crate::math::constants::Float;
use crate::math::spectrum::RGBSpectrum;

/// Smallest roughness a material can carry.
pub const MIN_ROUGHNESS: Float = 1e-3;

/// Principled surface description, read-only once the scene is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub albedo: RGBSpectrum,
    /// Reflectance at normal incidence.
    pub specular: RGBSpectrum,
    pub emissive: RGBSpectrum,
    pub ior: Float,
    pub metalness: Float,
    roughness: Float,
    /// Index into the scene texture table, multiplies `albedo`.
    pub albedo_texture: Option<usize>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: RGBSpectrum::splat(0.8),
            specular: RGBSpectrum::splat(0.04),
            emissive: RGBSpectrum::default(),
            ior: 1.0,
            metalness: 0.0,
            roughness: 1.0,
            albedo_texture: None,
        }
    }
}

impl Material {
    pub fn diffuse(albedo: RGBSpectrum) -> Self {
        Self { albedo, ..Self::default() }
    }

    pub fn emitter(radiance: RGBSpectrum) -> Self {
        Self { albedo: RGBSpectrum::default(), emissive: radiance, ..Self::default() }
    }

    pub fn with_roughness(mut self, roughness: Float) -> Self {
        self.set_roughness(roughness);
        self
    }

    pub fn set_roughness(&mut self, roughness: Float) {
        self.roughness = roughness.max(MIN_ROUGHNESS).min(1.0);
    }

    pub fn roughness(&self) -> Float {
        self.roughness
    }

    pub fn is_emissive(&self) -> bool {
        self.emissive.is_emissive()
    }

    /// Probability of picking the specular lobe.
    pub fn specular_probability(&self) -> Float {
        crate::math::constants::lerp(0.04, 1.0, self.metalness)
    }

    /// Rejects values the estimator cannot handle. `texture_count` bounds
    /// the albedo texture index.
    pub fn validate(&self, texture_count: usize) -> std::result::Result<(), RenderError> {
        let spectra = [("albedo", &self.albedo), ("specular", &self.specular),
                       ("emissive", &self.emissive)];
        for (name, s) in spectra.iter() {
            if !s.is_finite() || (0..3).any(|c| s[c] < 0.0) {
                return Err(RenderError::InvalidMaterial(
                    format!("{} must be finite and non-negative", name)));
            }
        }
        if !(self.ior.is_finite() && self.ior > 0.0) {
            return Err(RenderError::InvalidMaterial(format!("ior {} out of range", self.ior)));
        }
        if !(0.0..=1.0).contains(&self.metalness) {
            return Err(RenderError::InvalidMaterial(
                format!("metalness {} out of [0, 1]", self.metalness)));
        }
        if let Some(index) = self.albedo_texture {
            if index >= texture_count {
                return Err(RenderError::InvalidMaterial(
                    format!("albedo texture {} does not exist", index)));
            }
        }
        Ok(())
    }
}
