// Copyright @yucwang 2026

use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray;

/// Pinhole camera looking from `origin` towards `target`.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    origin: Vector3f,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    tan_half_fov_y: Float,
    aspect: Float,
    near_clip: Float,
    far_clip: Float,
    width: usize,
    height: usize,
}

impl PerspectiveCamera {
    pub fn new(origin: Vector3f,
               target: Vector3f,
               up: Vector3f,
               fov_y_radians: Float,
               width: usize,
               height: usize,
               near_clip: Float,
               far_clip: Float) -> Self {
        let forward = (target - origin).normalize();
        let right = forward.cross(&up).normalize();
        let up = right.cross(&forward).normalize();
        let aspect = if height > 0 { width as Float / height as Float } else { 1.0 };

        Self {
            origin,
            forward,
            right,
            up,
            tan_half_fov_y: (0.5 * fov_y_radians).tan(),
            aspect,
            near_clip,
            far_clip,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }
}

impl Sensor for PerspectiveCamera {
    fn sample_ray(&self, u: &Vector2f) -> Ray {
        let px = (2.0 * u.x - 1.0) * self.aspect * self.tan_half_fov_y;
        let py = (1.0 - 2.0 * u.y) * self.tan_half_fov_y;

        let d_camera = Vector3f::new(px, py, 1.0).normalize();
        let dir = (self.right * d_camera.x + self.up * d_camera.y + self.forward * d_camera.z).normalize();

        let inv_z = 1.0 / d_camera.z;
        let near_t = self.near_clip * inv_z;
        let far_t = if self.far_clip.is_finite() { self.far_clip * inv_z } else { Float::MAX };
        let origin = self.origin + dir * near_t;
        Ray::new(origin, dir, Some(0.0), Some(far_t - near_t))
            .with_backface_culling(false)
    }

    fn resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn describe(&self) -> String {
        format!("PerspectiveCamera {}x{} at ({}, {}, {})", self.width, self.height,
                self.origin.x, self.origin.y, self.origin.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(width: usize, height: usize) -> PerspectiveCamera {
        let origin = Vector3f::new(0.0, 0.0, 0.0);
        let target = Vector3f::new(0.0, 0.0, -1.0);
        let up = Vector3f::new(0.0, 1.0, 0.0);
        PerspectiveCamera::new(origin, target, up, std::f32::consts::FRAC_PI_2,
                               width, height, 0.0, std::f32::MAX)
    }

    #[test]
    fn test_perspective_camera_center_ray() {
        let cam = camera(4, 4);
        let ray = cam.sample_ray(&Vector2f::new(0.5, 0.5));
        let dir = ray.dir();

        assert!((dir.x - 0.0).abs() < 1e-6);
        assert!((dir.y - 0.0).abs() < 1e-6);
        assert!((dir.z + 1.0).abs() < 1e-6);
        assert!(ray.active);
    }

    #[test]
    fn test_top_row_looks_up() {
        let cam = camera(8, 4);
        assert_eq!(cam.resolution(), (8, 4));
        let top = cam.sample_ray(&Vector2f::new(0.5, 0.0)).dir();
        assert!(top.y > 0.0);
        let left = cam.sample_ray(&Vector2f::new(0.0, 0.5)).dir();
        assert!(left.x < 0.0);
        // 2:1 aspect widens the horizontal extent
        assert!((left.x / left.z - 2.0).abs() < 1e-5);
    }
}
