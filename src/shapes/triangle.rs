// Copyright @yucwang 2023

use crate::core::mesh::Mesh;
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector3f };
use crate::math::ray::Ray;

/// Below this determinant the ray is treated as parallel to the triangle.
const PARALLEL_EPSILON: Float = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    p0: Vector3f,
    p1: Vector3f,
    p2: Vector3f
}

impl Triangle {
    pub fn new(p0: Vector3f, p1: Vector3f, p2: Vector3f) -> Self {
        Triangle { p0, p1, p2 }
    }

    pub fn from_mesh(mesh: &Mesh, prim: usize) -> Self {
        let [p0, p1, p2] = mesh.vertices(prim);
        Triangle { p0, p1, p2 }
    }

    pub fn bounding_box(&self) -> AABB {
        let mut bound = AABB::new(self.p0, self.p1);
        bound.expand_by_point(&self.p2);
        bound
    }

    pub fn geometric_normal(&self) -> Vector3f {
        (self.p1 - self.p0).cross(&(self.p2 - self.p0)).normalize()
    }

    pub fn surface_area(&self) -> Float {
        0.5 * (self.p1 - self.p0).cross(&(self.p2 - self.p0)).norm()
    }

    /// Moller-Trumbore test returning `(u, v, t)` with `u` weighting `p1`
    /// and `v` weighting `p2`. Counter-clockwise triangles are front facing;
    /// back faces are skipped when the ray asks for culling.
    pub fn intersect(&self, ray: &Ray) -> Option<(Float, Float, Float)> {
        let e1 = self.p1 - self.p0;
        let e2 = self.p2 - self.p0;
        let d = ray.dir();
        let pvec = d.cross(&e2);
        let det = e1.dot(&pvec);

        if ray.backface_culling {
            if det < PARALLEL_EPSILON {
                return None;
            }
        } else if det.abs() < PARALLEL_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let tvec = ray.origin() - self.p0;
        let u = tvec.dot(&pvec) * inv_det;
        if u < 0.0 || u > 1.0 {
            return None;
        }

        let qvec = tvec.cross(&e1);
        let v = d.dot(&qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(&qvec) * inv_det;
        if !ray.test_segment(t) {
            return None;
        }
        Some((u, v, t))
    }
}
