// Copyright @yucwang 2023

use crate::math::constants::{ Vector3f };

/// Orthonormal shading basis with `z` along the normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: Vector3f,
    pub y: Vector3f,
    pub z: Vector3f
}

impl Default for Frame {
    fn default() -> Self {
        Frame {
            x: Vector3f::new(1.0, 0.0, 0.0),
            y: Vector3f::new(0.0, 1.0, 0.0),
            z: Vector3f::new(0.0, 0.0, 1.0)
        }
    }
}

impl Frame {
    pub fn from_normal(n: &Vector3f) -> Frame {
        let up = if n.z.abs() < 0.999 {
            Vector3f::new(0.0, 0.0, 1.0)
        } else {
            Vector3f::new(1.0, 0.0, 0.0)
        };
        let x = up.cross(n).normalize();
        Frame { x, y: n.cross(&x), z: *n }
    }

    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.x), v.dot(&self.y), v.dot(&self.z))
    }

    pub fn to_world(&self, v: &Vector3f) -> Vector3f {
        v.x * self.x + v.y * self.y + v.z * self.z
    }
}

/// Rotates a tangent space direction into the hemisphere around `n`.
pub fn tangent_to_world(h: &Vector3f, n: &Vector3f) -> Vector3f {
    Frame::from_normal(n).to_world(h).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_is_orthonormal() {
        for n in [Vector3f::new(0.0, 0.0, 1.0),
                  Vector3f::new(0.0, 1.0, 0.0),
                  Vector3f::new(1.0, 2.0, -3.0).normalize()].iter() {
            let f = Frame::from_normal(n);
            assert!(f.x.dot(&f.y).abs() < 1e-5);
            assert!(f.x.dot(&f.z).abs() < 1e-5);
            assert!(f.y.dot(&f.z).abs() < 1e-5);
            assert!((f.x.norm() - 1.0).abs() < 1e-5);
            assert!((f.y.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_round_trip_and_pole() {
        let n = Vector3f::new(0.3, -0.4, 0.5).normalize();
        let f = Frame::from_normal(&n);
        let v = Vector3f::new(0.1, 0.7, -0.2);
        assert!((f.to_world(&f.to_local(&v)) - v).norm() < 1e-5);

        let z = tangent_to_world(&Vector3f::new(0.0, 0.0, 1.0), &n);
        assert!((z - n).norm() < 1e-5);
    }
}
