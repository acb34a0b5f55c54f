// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

/// Visibility mask that matches every shape.
pub const MASK_ALL: u32 = 0xFFFF_FFFF;

/// A ray as handed to an intersection device.
///
/// The direction is normalized on construction. A default ray is inactive and
/// must never report a hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Vector3f,
    dir: Vector3f,
    pub min_t: Float,
    pub max_t: Float,
    pub time: Float,
    pub mask: u32,
    pub active: bool,
    pub backface_culling: bool,
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vector3f::zeros(),
            dir: Vector3f::zeros(),
            min_t: 0.0,
            max_t: 0.0,
            time: 0.0,
            mask: 0,
            active: false,
            backface_culling: false,
        }
    }
}

impl Ray {
    pub fn new(o: Vector3f, d: Vector3f,
               min_t: Option<Float>, max_t: Option<Float>) -> Self {
        Self { origin: o, dir: d.normalize(),
               min_t: min_t.unwrap_or(0.0),
               max_t: max_t.unwrap_or(std::f32::MAX),
               time: 0.0,
               mask: MASK_ALL,
               active: true,
               backface_culling: true }
    }

    pub fn with_backface_culling(mut self, culling: bool) -> Self {
        self.backface_culling = culling;
        self
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    pub fn dir(&self) -> Vector3f {
        self.dir
    }

    pub fn at(&self, t: Float) -> Vector3f {
        self.origin + self.dir * t
    }

    pub fn update(&mut self, t: Float) -> bool {
        if t < self.min_t || t > self.max_t {
            false
        } else {
            self.max_t = t;
            true
        }
    }

    pub fn test_segment(&self, t: Float) -> bool {
        t >= self.min_t && t <= self.max_t
    }

    pub fn deactivate(&mut self) {
        *self = Self::default();
    }
}

/* Tests for Ray */

#[cfg(test)]
mod tests {
    use super::Vector3f;
    use super::Ray;

    #[test]
    fn test_ray() {
        let o = Vector3f::new(0.0, 0.0, 0.0);
        let d = Vector3f::new(1.0, 0.0, 1.0);
        let mut ray = Ray::new(o, d, None, None);
        assert_eq!(o, ray.origin());
        assert!((ray.dir().norm() - 1.0).abs() < 1e-6);

        let v1 = ray.at(2.0);
        assert!((v1[0] - std::f32::consts::SQRT_2).abs() < 1e-5);
        assert!((v1[1] - 0.0).abs() < 1e-6);
        assert!((v1[2] - std::f32::consts::SQRT_2).abs() < 1e-5);

        let status1 = ray.update(100.0);
        let status2 = ray.update(105.0);
        assert_eq!(status1, true);
        assert_eq!(status2, false);
    }

    #[test]
    fn test_deactivated_ray_is_inactive() {
        let mut ray = Ray::new(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0), None, None);
        assert!(ray.active);
        ray.deactivate();
        assert!(!ray.active);
        assert_eq!(ray.max_t, 0.0);
    }
}
