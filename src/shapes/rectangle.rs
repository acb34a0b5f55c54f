// Copyright @yucwang 2026

use crate::core::mesh::Mesh;
use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::transform::Transform;

const CORNERS: [(Float, Float); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

/// Appends the square `n + a * s + b * t`, `a, b` in [-1, 1], as two
/// counter-clockwise triangles facing `s x t`.
pub(crate) fn push_face(mesh: &mut Mesh, n: Vector3f, s: Vector3f, t: Vector3f) {
    let base = mesh.positions.len() as u32;
    let normal = s.cross(&t);
    for &(a, b) in CORNERS.iter() {
        mesh.positions.push(n + s * a + t * b);
        mesh.normals.push(normal);
        mesh.texcoords.push(Vector2f::new(0.5 * (a + 1.0), 0.5 * (b + 1.0)));
    }
    mesh.indices.push([base, base + 1, base + 2]);
    mesh.indices.push([base, base + 2, base + 3]);
}

/// The [-1, 1]^2 square in the z = 0 plane facing +z, placed by `to_world`.
pub struct Rectangle {
    to_world: Transform,
}

impl Rectangle {
    pub fn new(to_world: Transform) -> Self {
        Self { to_world }
    }

    pub fn to_mesh(&self, material_id: u32) -> Mesh {
        let mut mesh = Mesh::default();
        push_face(&mut mesh, Vector3f::zeros(), Vector3f::x(), Vector3f::y());
        mesh.material_ids = vec![material_id; mesh.indices.len()];
        mesh.transform(&self.to_world);
        mesh
    }
}
