// Copyright @yucwang 2026

use crate::core::mesh::Mesh;
use crate::math::constants::Vector3f;
use crate::math::transform::Transform;

use super::rectangle::push_face;

/// The [-1, 1]^3 box with outward facing sides, placed by `to_world`.
pub struct Cube {
    to_world: Transform,
}

impl Cube {
    pub fn new(to_world: Transform) -> Self {
        Self { to_world }
    }

    pub fn to_mesh(&self, material_id: u32) -> Mesh {
        let (x, y, z) = (Vector3f::x(), Vector3f::y(), Vector3f::z());
        let mut mesh = Mesh::default();
        push_face(&mut mesh, z, x, y);
        push_face(&mut mesh, -z, y, x);
        push_face(&mut mesh, y, z, x);
        push_face(&mut mesh, -y, x, z);
        push_face(&mut mesh, x, y, z);
        push_face(&mut mesh, -x, z, y);
        mesh.material_ids = vec![material_id; mesh.indices.len()];
        mesh.transform(&self.to_world);
        mesh
    }
}
