// Copyright @yucwang 2026

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use wavefront_obj::{ obj, ParseError };

use crate::core::error::SceneLoadError;
use crate::core::mesh::Mesh;
use crate::math::constants::{ Float, Vector2f, Vector3f };

pub fn load_obj_from_str<S: AsRef<str>>(input: S) -> Result<obj::ObjSet, ParseError> {
    let triangulated = triangulate_faces(input.as_ref());
    obj::parse(triangulated)
}

/// Loads every object of an OBJ file into one mesh using `material_id`.
pub fn load_mesh<P: AsRef<Path>>(path: P, material_id: u32) -> Result<Mesh, SceneLoadError> {
    let path = path.as_ref();
    let mesh_error = |reason: String| SceneLoadError::Mesh { path: path.to_path_buf(), reason };

    let data = fs::read_to_string(path)?;
    let obj_set = load_obj_from_str(data).map_err(|e| mesh_error(e.to_string()))?;
    let mesh = mesh_from_obj(&obj_set, material_id).map_err(mesh_error)?;
    log::info!("Loaded {} triangles from {}.", mesh.triangle_count(), path.display());
    Ok(mesh)
}

/// Flattens OBJ position/texcoord/normal index triples into shared
/// vertices. Normals or texcoords are kept only if every corner has one.
pub fn mesh_from_obj(obj_set: &obj::ObjSet, material_id: u32) -> Result<Mesh, String> {
    let mut corners: HashMap<(usize, usize, Option<usize>, Option<usize>), u32> = HashMap::new();
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut texcoords = Vec::new();
    let mut indices = Vec::new();
    let mut all_normals = true;
    let mut all_texcoords = true;

    for (object_id, object) in obj_set.objects.iter().enumerate() {
        for geom in object.geometry.iter() {
            for shape in geom.shapes.iter() {
                let (a, b, c) = match shape.primitive {
                    obj::Primitive::Triangle(a, b, c) => (a, b, c),
                    _ => continue,
                };

                let mut tri = [0u32; 3];
                for (slot, &(vi, ti, ni)) in [a, b, c].iter().enumerate() {
                    if let Some(&index) = corners.get(&(object_id, vi, ti, ni)) {
                        tri[slot] = index;
                        continue;
                    }

                    let v = object.vertices.get(vi)
                        .ok_or_else(|| format!("vertex index {} out of range", vi))?;
                    positions.push(Vector3f::new(v.x as Float, v.y as Float, v.z as Float));

                    match ni.and_then(|i| object.normals.get(i)) {
                        Some(n) => normals.push(Vector3f::new(n.x as Float, n.y as Float, n.z as Float)),
                        None => all_normals = false,
                    }
                    match ti.and_then(|i| object.tex_vertices.get(i)) {
                        Some(t) => texcoords.push(Vector2f::new(t.u as Float, t.v as Float)),
                        None => all_texcoords = false,
                    }

                    let index = (positions.len() - 1) as u32;
                    corners.insert((object_id, vi, ti, ni), index);
                    tri[slot] = index;
                }
                indices.push(tri);
            }
        }
    }

    if indices.is_empty() {
        return Err(String::from("no triangles"));
    }
    if !all_normals {
        normals.clear();
    }
    if !all_texcoords {
        texcoords.clear();
    }
    Ok(Mesh::new(positions, normals, texcoords, indices, material_id))
}

fn triangulate_faces(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 4);
    for line in input.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("f ") || trimmed.starts_with("f\t") {
            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() > 4 {
                for i in 2..(parts.len() - 1) {
                    out.push_str(&format!("f {} {} {}\n", parts[1], parts[i], parts[i + 1]));
                }
                continue;
            }
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
f 1/1 2/2 3/3 4/4
";

    #[test]
    fn test_quad_is_fan_triangulated() {
        let obj_set = load_obj_from_str(QUAD).expect("failed to parse obj");
        let mesh = mesh_from_obj(&obj_set, 2).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.material_ids, vec![2, 2]);
        assert!(mesh.has_texcoords());
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_missing_normals_are_generated() {
        let obj_set = load_obj_from_str(QUAD).unwrap();
        let mesh = mesh_from_obj(&obj_set, 0).unwrap();
        assert_eq!(mesh.normals.len(), 4);
        assert!((mesh.normals[0].z.abs() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_load_mesh_reports_missing_file() {
        let result = load_mesh("does/not/exist.obj", 0);
        assert!(matches!(result, Err(SceneLoadError::Io(_))));
    }
}
