// Copyright @yucwang 2026

use crate::math::constants::Vector2f;
use crate::math::ray::Ray;

/// Camera model generating primary rays from image space samples.
pub trait Sensor: Send + Sync {
    /// `u` spans the image in `[0, 1]^2` with row 0 at the top.
    fn sample_ray(&self, u: &Vector2f) -> Ray;

    /// `(width, height)` in pixels.
    fn resolution(&self) -> (usize, usize);

    fn describe(&self) -> String {
        String::from("Sensor")
    }
}
