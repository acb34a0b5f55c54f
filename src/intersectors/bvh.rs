// Copyright @yucwang 2026

use rayon::prelude::*;

use crate::core::error::{ RenderError, Result };
use crate::core::intersector::{ DeviceKind, Intersection, IntersectionDevice, Intersector };
use crate::core::mesh::Mesh;
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector3f };
use crate::math::ray::Ray;
use crate::shapes::triangle::Triangle;

const SAH_BUCKETS: usize = 12;
const MAX_LEAF_SIZE: usize = 4;

#[derive(Debug, Clone)]
struct BVHNode {
    bounds: AABB,
    // interior nodes store the right child, the left one follows directly
    right: usize,
    start: usize,
    count: usize,
}

impl BVHNode {
    fn is_leaf(&self) -> bool {
        self.count > 0
    }
}

/// SAH bucketed bounding volume hierarchy over abstract primitives.
/// Primitive tests are supplied by the caller at traversal time.
#[derive(Debug, Clone)]
pub struct BVH {
    nodes: Vec<BVHNode>,
    indices: Vec<usize>,
}

impl BVH {
    pub fn new(prim_bounds: &[AABB]) -> Self {
        let centroids: Vec<Vector3f> = prim_bounds.iter().map(|b| b.centroid()).collect();
        let mut bvh = Self { nodes: Vec::new(), indices: (0..prim_bounds.len()).collect() };
        if !bvh.indices.is_empty() {
            bvh.build(prim_bounds, &centroids, 0, prim_bounds.len());
        }
        bvh
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Closest hit. `hit_fn` returns the hit distance of a primitive
    /// together with its payload; the search segment shrinks as hits arrive.
    pub fn closest_hit<F, T>(&self, ray: &Ray, mut hit_fn: F) -> Option<(usize, T)>
        where F: FnMut(usize, &Ray) -> Option<(T, Float)> {
        if self.nodes.is_empty() || !ray.active {
            return None;
        }

        let mut ray = *ray;
        let inv_dir = inverse(&ray.dir());
        let mut closest = None;
        let mut stack = vec![0usize];
        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            if node.bounds.ray_intersect_range(&ray, &inv_dir).is_none() {
                continue;
            }

            if node.is_leaf() {
                for &prim_idx in &self.indices[node.start..node.start + node.count] {
                    if let Some((hit, t)) = hit_fn(prim_idx, &ray) {
                        if ray.update(t) {
                            closest = Some((prim_idx, hit));
                        }
                    }
                }
            } else {
                stack.push(node.right);
                stack.push(node_idx + 1);
            }
        }

        closest
    }

    /// Any hit, stops at the first primitive `hit_fn` accepts.
    pub fn any_hit<F>(&self, ray: &Ray, mut hit_fn: F) -> bool
        where F: FnMut(usize, &Ray) -> bool {
        if self.nodes.is_empty() || !ray.active {
            return false;
        }

        let inv_dir = inverse(&ray.dir());
        let mut stack = vec![0usize];
        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            if node.bounds.ray_intersect_range(ray, &inv_dir).is_none() {
                continue;
            }
            if node.is_leaf() {
                let prims = &self.indices[node.start..node.start + node.count];
                if prims.iter().any(|&prim_idx| hit_fn(prim_idx, ray)) {
                    return true;
                }
            } else {
                stack.push(node.right);
                stack.push(node_idx + 1);
            }
        }

        false
    }

    fn push_leaf(&mut self, bounds: AABB, start: usize, count: usize) -> usize {
        self.nodes.push(BVHNode { bounds, right: 0, start, count });
        self.nodes.len() - 1
    }

    fn build(&mut self, prim_bounds: &[AABB], centroids: &[Vector3f],
             start: usize, end: usize) -> usize {
        let mut bounds = AABB::default();
        let mut centroid_bounds = AABB::default();
        for &idx in &self.indices[start..end] {
            bounds = bounds.union(&prim_bounds[idx]);
            centroid_bounds.expand_by_point(&centroids[idx]);
        }

        let count = end - start;
        let axis = centroid_bounds.max_extent();
        let extent = centroid_bounds.diagonal()[axis];
        if count <= MAX_LEAF_SIZE || !(extent > 1e-6) {
            return self.push_leaf(bounds, start, count);
        }

        let bucket_of = |c: &Vector3f| -> usize {
            let b = (centroid_bounds.offset(c)[axis] * SAH_BUCKETS as Float) as usize;
            b.min(SAH_BUCKETS - 1)
        };

        let mut buckets = [(0usize, AABB::default()); SAH_BUCKETS];
        for &idx in &self.indices[start..end] {
            let b = bucket_of(&centroids[idx]);
            buckets[b].0 += 1;
            buckets[b].1 = buckets[b].1.union(&prim_bounds[idx]);
        }

        let area = bounds.surface_area().max(1e-6);
        let mut min_cost = Float::MAX;
        let mut min_split = 0usize;
        for split in 0..(SAH_BUCKETS - 1) {
            let (count0, b0) = buckets[..=split].iter()
                .fold((0usize, AABB::default()), |(n, b), (c, bb)| (n + c, b.union(bb)));
            let (count1, b1) = buckets[split + 1..].iter()
                .fold((0usize, AABB::default()), |(n, b), (c, bb)| (n + c, b.union(bb)));
            let cost = 0.125 + (count0 as Float * b0.surface_area()
                                + count1 as Float * b1.surface_area()) / area;
            if cost < min_cost {
                min_cost = cost;
                min_split = split;
            }
        }

        if min_cost >= count as Float {
            return self.push_leaf(bounds, start, count);
        }

        let mut mid = start;
        for i in start..end {
            if bucket_of(&centroids[self.indices[i]]) <= min_split {
                self.indices.swap(i, mid);
                mid += 1;
            }
        }
        if mid == start || mid == end {
            mid = start + count / 2;
        }

        let node_idx = self.push_leaf(bounds, 0, 0);
        self.build(prim_bounds, centroids, start, mid);
        let right = self.build(prim_bounds, centroids, mid, end);
        self.nodes[node_idx].right = right;
        node_idx
    }
}

fn inverse(d: &Vector3f) -> Vector3f {
    Vector3f::new(1.0 / d.x, 1.0 / d.y, 1.0 / d.z)
}

/// CPU reference device.
#[derive(Debug, Default, Clone, Copy)]
pub struct BvhDevice;

impl IntersectionDevice for BvhDevice {
    fn name(&self) -> &str {
        "cpu-bvh"
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::Cpu
    }

    fn build_scene(&self, meshes: &[Mesh]) -> Result<Box<dyn Intersector>> {
        Ok(Box::new(BvhIntersector::new(meshes)?))
    }
}

/// Flattened triangle soup of every mesh behind one hierarchy.
#[derive(Debug, Clone)]
pub struct BvhIntersector {
    triangles: Vec<Triangle>,
    // (shape id, primitive id) per flattened triangle
    owners: Vec<(usize, usize)>,
    bvh: BVH,
}

impl BvhIntersector {
    pub fn new(meshes: &[Mesh]) -> Result<Self> {
        let mut triangles = Vec::new();
        let mut owners = Vec::new();
        for (shape_id, mesh) in meshes.iter().enumerate() {
            mesh.validate()
                .map_err(|e| RenderError::SceneBuild(format!("mesh {}: {}", shape_id, e)))?;
            for prim in 0..mesh.triangle_count() {
                triangles.push(Triangle::from_mesh(mesh, prim));
                owners.push((shape_id, prim));
            }
        }
        if triangles.is_empty() {
            return Err(RenderError::SceneBuild(String::from("scene has no triangles")));
        }

        let bounds: Vec<AABB> = triangles.iter().map(|t| t.bounding_box()).collect();
        let bvh = BVH::new(&bounds);
        log::info!("Built BVH over {} triangles ({} nodes)", triangles.len(), bvh.node_count());
        Ok(Self { triangles, owners, bvh })
    }

    fn intersect_one(&self, ray: &Ray) -> Intersection {
        let hit = self.bvh.closest_hit(ray, |idx, r| {
            self.triangles[idx].intersect(r).map(|(u, v, t)| ((u, v, t), t))
        });
        match hit {
            Some((idx, (u, v, t))) => {
                let (shape_id, prim_id) = self.owners[idx];
                Intersection::new(shape_id, prim_id, u, v, t)
            }
            None => Intersection::miss(),
        }
    }
}

impl Intersector for BvhIntersector {
    fn query_intersection(&self, rays: &[Ray]) -> Vec<Intersection> {
        rays.par_iter().map(|ray| self.intersect_one(ray)).collect()
    }

    fn query_occlusion(&self, rays: &[Ray]) -> Vec<bool> {
        rays.par_iter()
            .map(|ray| self.bvh.any_hit(ray, |idx, r| self.triangles[idx].intersect(r).is_some()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip() -> Mesh {
        let mut positions = Vec::new();
        let mut indices = Vec::new();
        for i in 0..32u32 {
            let x = i as Float * 2.0;
            positions.push(Vector3f::new(x, 0.0, 0.0));
            positions.push(Vector3f::new(x + 0.5, 0.0, 0.0));
            positions.push(Vector3f::new(x, 0.5, 0.0));
            indices.push([3 * i, 3 * i + 1, 3 * i + 2]);
        }
        Mesh::new(positions, Vec::new(), Vec::new(), indices, 0)
    }

    fn down(x: Float, y: Float) -> Ray {
        Ray::new(Vector3f::new(x, y, 1.0), Vector3f::new(0.0, 0.0, -1.0), None, None)
    }

    #[test]
    fn test_bvh_vs_naive_triangles() {
        let mesh = strip();
        let intersector = BvhIntersector::new(&[mesh.clone()]).unwrap();
        let rays: Vec<Ray> = (0..32).map(|i| down(i as Float * 2.0 + 0.1, 0.1)).collect();
        let hits = intersector.query_intersection(&rays);
        for (i, hit) in hits.iter().enumerate() {
            assert!(hit.hit(), "BVH miss for ray {}", i);
            assert_eq!(hit.prim_id, i as i32);
            let naive = Triangle::from_mesh(&mesh, i).intersect(&rays[i]).unwrap();
            assert!((hit.t() - naive.2).abs() < 1e-5);
        }

        let miss = intersector.query_intersection(&[down(100.0, 100.0)]);
        assert!(!miss[0].hit());
    }

    #[test]
    fn test_closest_of_stacked_triangles() {
        let quad = |z: Float| Mesh::new(
            vec![Vector3f::new(-1.0, -1.0, z), Vector3f::new(1.0, -1.0, z), Vector3f::new(0.0, 1.0, z)],
            Vec::new(), Vec::new(), vec![[0, 1, 2]], 0);
        let intersector = BvhIntersector::new(&[quad(-3.0), quad(-1.0), quad(-2.0)]).unwrap();
        let hit = intersector.query_intersection(&[down(0.0, 0.0)])[0];
        assert_eq!(hit.shape_id, 1);
        assert!((hit.t() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_occlusion_and_inactive_rays() {
        let intersector = BvhIntersector::new(&[strip()]).unwrap();
        let mut inactive = down(0.1, 0.1);
        inactive.deactivate();
        let short = Ray::new(Vector3f::new(0.1, 0.1, 1.0), Vector3f::new(0.0, 0.0, -1.0), None, Some(0.5));
        let occluded = intersector.query_occlusion(&[down(0.1, 0.1), inactive, short]);
        assert_eq!(occluded, vec![true, false, false]);
        assert!(!intersector.query_intersection(&[inactive])[0].hit());
    }

    #[test]
    fn test_build_scene_errors() {
        assert!(matches!(BvhDevice.build_scene(&[]), Err(RenderError::SceneBuild(_))));
        let mut broken = strip();
        broken.indices[0] = [0, 1, 500];
        assert!(BvhDevice.build_scene(&[broken]).is_err());
    }
}
