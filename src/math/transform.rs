// Copyright 2020 @TwoCookingMice

use super::constants::{ Matrix4f, Vector3f };

/// Affine transform with a cached inverse, used to place built-in and
/// loaded meshes in the world.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    matrix: Matrix4f,
    inv_matrix: Matrix4f
}

impl Default for Transform {
    fn default() -> Self {
        Self { matrix: Matrix4f::identity(),
               inv_matrix: Matrix4f::identity() }
    }
}

impl Transform {
    /// `None` when the matrix is singular.
    pub fn new(matrix: Matrix4f) -> Option<Self> {
        matrix.try_inverse().map(|inv_matrix| Self { matrix, inv_matrix })
    }

    pub fn translate(t: &Vector3f) -> Self {
        Self { matrix: Matrix4f::new_translation(t),
               inv_matrix: Matrix4f::new_translation(&-t) }
    }

    /// `None` when any factor is zero.
    pub fn scale(s: &Vector3f) -> Option<Self> {
        Self::new(Matrix4f::new_nonuniform_scaling(s))
    }

    /// `other` is applied first, then `self`.
    pub fn compose(&self, other: &Transform) -> Transform {
        Transform { matrix: self.matrix * other.matrix,
                    inv_matrix: other.inv_matrix * self.inv_matrix }
    }

    pub fn matrix(&self) -> &Matrix4f {
        &self.matrix
    }

    pub fn apply_point(&self, p: &Vector3f) -> Vector3f {
        let h = self.matrix * p.push(1.0);
        Vector3f::new(h.x / h.w, h.y / h.w, h.z / h.w)
    }

    pub fn apply_vector(&self, v: &Vector3f) -> Vector3f {
        (self.matrix * v.push(0.0)).xyz()
    }

    // Normals go through the inverse transpose so that n^T x = 0 survives.
    pub fn apply_normal(&self, n: &Vector3f) -> Vector3f {
        (self.inv_matrix.transpose() * n.push(0.0)).xyz()
    }
}
