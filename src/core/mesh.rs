// Copyright @yucwang 2026

use std::ops::{ Add, Mul };

use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::transform::Transform;

/// Blends three vertex attributes with barycentric `(u, v)`.
pub fn barycentric<T>(a: T, b: T, c: T, u: Float, v: Float) -> T
    where T: Add<Output = T> + Mul<Float, Output = T> {
    a * (1.0 - u - v) + b * u + c * v
}

/// Immutable indexed triangle mesh with one material id per triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vector3f>,
    pub normals: Vec<Vector3f>,
    /// Empty when the source carries no texture coordinates.
    pub texcoords: Vec<Vector2f>,
    pub indices: Vec<[u32; 3]>,
    pub material_ids: Vec<u32>,
}

impl Mesh {
    /// Builds a mesh with every triangle using `material_id`. Missing
    /// normals are replaced by area weighted vertex normals.
    pub fn new(positions: Vec<Vector3f>, normals: Vec<Vector3f>, texcoords: Vec<Vector2f>,
               indices: Vec<[u32; 3]>, material_id: u32) -> Self {
        let material_ids = vec![material_id; indices.len()];
        let mut mesh = Self { positions, normals, texcoords, indices, material_ids };
        if mesh.normals.len() != mesh.positions.len() {
            mesh.compute_vertex_normals();
        }
        mesh
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    pub fn has_texcoords(&self) -> bool {
        !self.texcoords.is_empty()
    }

    /// Checks index ranges and attribute lengths.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let n = self.positions.len();
        if self.normals.len() != n {
            return Err(format!("{} normals for {} positions", self.normals.len(), n));
        }
        if self.has_texcoords() && self.texcoords.len() != n {
            return Err(format!("{} texcoords for {} positions", self.texcoords.len(), n));
        }
        if self.material_ids.len() != self.indices.len() {
            return Err(format!("{} material ids for {} triangles",
                               self.material_ids.len(), self.indices.len()));
        }
        for (prim, tri) in self.indices.iter().enumerate() {
            if tri.iter().any(|&i| i as usize >= n) {
                return Err(format!("triangle {} indexes past {} vertices", prim, n));
            }
        }
        if self.positions.iter().any(|p| !p.iter().all(|c| c.is_finite())) {
            return Err(String::from("non-finite vertex position"));
        }
        Ok(())
    }

    pub fn vertices(&self, prim: usize) -> [Vector3f; 3] {
        let [a, b, c] = self.indices[prim];
        [self.positions[a as usize], self.positions[b as usize], self.positions[c as usize]]
    }

    pub fn bounds(&self, prim: usize) -> AABB {
        AABB::from_points(self.vertices(prim).iter())
    }

    pub fn position(&self, prim: usize, u: Float, v: Float) -> Vector3f {
        let [a, b, c] = self.vertices(prim);
        barycentric(a, b, c, u, v)
    }

    /// Interpolated shading normal, normalized.
    pub fn normal(&self, prim: usize, u: Float, v: Float) -> Vector3f {
        let [a, b, c] = self.indices[prim];
        let n = barycentric(self.normals[a as usize], self.normals[b as usize],
                            self.normals[c as usize], u, v);
        let len = n.norm();
        if len > 0.0 { n / len } else { self.face_normal(prim) }
    }

    pub fn face_normal(&self, prim: usize) -> Vector3f {
        let [a, b, c] = self.vertices(prim);
        let n = (b - a).cross(&(c - a));
        let len = n.norm();
        if len > 0.0 { n / len } else { Vector3f::zeros() }
    }

    pub fn texcoord(&self, prim: usize, u: Float, v: Float) -> Option<Vector2f> {
        if !self.has_texcoords() {
            return None;
        }
        let [a, b, c] = self.indices[prim];
        Some(barycentric(self.texcoords[a as usize], self.texcoords[b as usize],
                         self.texcoords[c as usize], u, v))
    }

    pub fn transform(&mut self, transform: &Transform) {
        for p in self.positions.iter_mut() {
            *p = transform.apply_point(p);
        }
        for n in self.normals.iter_mut() {
            let t = transform.apply_normal(n);
            let len = t.norm();
            *n = if len > 0.0 { t / len } else { t };
        }
    }

    fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vector3f::zeros(); self.positions.len()];
        for tri in self.indices.iter() {
            if tri.iter().any(|&i| i as usize >= normals.len()) {
                continue;
            }
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let n = (self.positions[b] - self.positions[a])
                .cross(&(self.positions[c] - self.positions[a]));
            normals[a] += n;
            normals[b] += n;
            normals[c] += n;
        }
        for n in normals.iter_mut() {
            let len = n.norm();
            if len > 0.0 {
                *n /= len;
            }
        }
        self.normals = normals;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        Mesh::new(vec![Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(1.0, 0.0, 0.0),
                       Vector3f::new(1.0, 1.0, 0.0), Vector3f::new(0.0, 1.0, 0.0)],
                  Vec::new(),
                  vec![Vector2f::new(0.0, 0.0), Vector2f::new(1.0, 0.0),
                       Vector2f::new(1.0, 1.0), Vector2f::new(0.0, 1.0)],
                  vec![[0, 1, 2], [0, 2, 3]], 7)
    }

    #[test]
    fn test_barycentric_interpolation() {
        let mesh = quad();
        let p = mesh.position(0, 0.25, 0.5);
        assert!((p - Vector3f::new(0.75, 0.5, 0.0)).norm() < 1e-6);
        let uv = mesh.texcoord(0, 0.25, 0.5).unwrap();
        assert!((uv - Vector2f::new(0.75, 0.5)).norm() < 1e-6);
        assert_eq!(mesh.material_ids, vec![7, 7]);
    }

    #[test]
    fn test_generated_normals() {
        let mesh = quad();
        for n in mesh.normals.iter() {
            assert!((n - Vector3f::new(0.0, 0.0, 1.0)).norm() < 1e-6);
        }
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_indices() {
        let mut mesh = quad();
        mesh.indices.push([0, 1, 9]);
        mesh.material_ids.push(0);
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_transform_moves_positions() {
        let mut mesh = quad();
        mesh.transform(&Transform::translate(&Vector3f::new(0.0, 0.0, 2.0)));
        assert_eq!(mesh.positions[0].z, 2.0);
        assert!((mesh.normals[0] - Vector3f::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }
}
