// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Vector3f, FLOAT_MAX, FLOAT_MIN };
use super::ray::Ray;

/// Axis aligned bounding box. The default box is empty and absorbs nothing
/// under `union`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AABB {
    pub p_min: Vector3f,
    pub p_max: Vector3f
}

impl Default for AABB {
    fn default() -> Self {
        Self { p_min: Vector3f::repeat(FLOAT_MAX),
               p_max: Vector3f::repeat(FLOAT_MIN) }
    }
}

impl AABB {
    pub fn new(a: Vector3f, b: Vector3f) -> Self {
        Self { p_min: a.inf(&b), p_max: a.sup(&b) }
    }

    pub fn from_points<'a, I>(points: I) -> Self
        where I: IntoIterator<Item = &'a Vector3f> {
        let mut bbox = Self::default();
        for p in points {
            bbox.expand_by_point(p);
        }
        bbox
    }

    pub fn centroid(&self) -> Vector3f {
        0.5 * (self.p_min + self.p_max)
    }

    pub fn expand_by_point(&mut self, p: &Vector3f) {
        self.p_min = self.p_min.inf(p);
        self.p_max = self.p_max.sup(p);
    }

    pub fn union(&self, other: &AABB) -> AABB {
        AABB { p_min: self.p_min.inf(&other.p_min),
               p_max: self.p_max.sup(&other.p_max) }
    }

    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    pub fn surface_area(&self) -> Float {
        if !self.is_valid() {
            return 0.0;
        }
        let d = self.diagonal();
        2.0 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    pub fn max_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    /// Position of `p` relative to the box, 0 at `p_min` and 1 at `p_max`
    /// along each non-degenerate axis.
    pub fn offset(&self, p: &Vector3f) -> Vector3f {
        let mut o = p - self.p_min;
        let d = self.diagonal();
        for idx in 0..3 {
            if d[idx] > 0.0 {
                o[idx] /= d[idx];
            }
        }
        o
    }

    pub fn is_valid(&self) -> bool {
        (0..3).all(|idx| self.p_min[idx] <= self.p_max[idx])
    }

    /// Slab test against the ray's `[min_t, max_t]` segment.
    pub fn ray_intersect_range(&self, ray: &Ray, inv_dir: &Vector3f) -> Option<(Float, Float)> {
        if !self.is_valid() {
            return None;
        }

        let o = ray.origin();
        let mut t_min = ray.min_t;
        let mut t_max = ray.max_t;
        for idx in 0..3 {
            let mut t0 = (self.p_min[idx] - o[idx]) * inv_dir[idx];
            let mut t1 = (self.p_max[idx] - o[idx]) * inv_dir[idx];
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            // NaN from 0 * inf keeps the previous bound
            if t0 > t_min { t_min = t0; }
            if t1 < t_max { t_max = t1; }
            if t_max < t_min {
                return None;
            }
        }

        Some((t_min, t_max))
    }

    pub fn ray_intersect(&self, ray: &Ray) -> bool {
        let d = ray.dir();
        let inv = Vector3f::new(1.0 / d.x, 1.0 / d.y, 1.0 / d.z);
        self.ray_intersect_range(ray, &inv).is_some()
    }
}

/* Test for AABB */
#[cfg(test)]
mod tests {
    use super::AABB;
    use super::Ray;
    use super::Vector3f;

    #[test]
    fn test_aabb_geometry() {
        let bbox = AABB::new(Vector3f::new(1.0, 7.0, 3.0), Vector3f::new(4.0, 4.0, 4.0));
        let center = bbox.centroid();
        assert!((center[0] - 2.5).abs() < 1e-6);
        assert!((center[1] - 5.5).abs() < 1e-6);
        assert!((center[2] - 3.5).abs() < 1e-6);
        assert!((bbox.surface_area() - 30.0).abs() < 1e-5);

        let mut grown = bbox;
        grown.expand_by_point(&Vector3f::new(-1.0, 5.0, 6.0));
        assert_eq!(grown.p_min[0], -1.0);
        assert_eq!(grown.p_max[2], 6.0);
        assert_eq!(grown.max_extent(), 0);

        let merged = AABB::default().union(&grown);
        assert_eq!(merged, grown);
        assert_eq!(AABB::default().surface_area(), 0.0);
    }

    #[test]
    fn test_aabb_intersect() {
        let bbox = AABB::new(Vector3f::new(-1.0, -1.0, -1.0),
                             Vector3f::new(1.0, 1.0, 1.0));

        let o1 = Vector3f::new(0.0, 0.0, 0.0);
        let d1 = Vector3f::new(1.0, 1.0, 1.0);
        assert!(bbox.ray_intersect(&Ray::new(o1, d1, Some(0.0), Some(1.0))));

        let o2 = Vector3f::new(-1.1, 0.0, 0.0);
        let d2 = Vector3f::new(-0.1, 10.0, 10.0);
        assert!(!bbox.ray_intersect(&Ray::new(o2, d2, None, None)));

        // axis aligned ray grazing through the box
        let o3 = Vector3f::new(0.5, 0.5, -5.0);
        let d3 = Vector3f::new(0.0, 0.0, 1.0);
        assert!(bbox.ray_intersect(&Ray::new(o3, d3, None, None)));
    }
}
