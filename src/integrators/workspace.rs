// Copyright @yucwang 2026

use std::ops::{ Deref, DerefMut };

use crate::core::intersector::Intersection;
use crate::core::material::Material;
use crate::math::constants::{ Vector2f, Vector3f };
use crate::math::ray::Ray;
use crate::math::spectrum::RGBSpectrum;

/// Surface data of a lane's current hit.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadingRecord {
    pub position: Vector3f,
    pub normal: Vector3f,
    /// Direction of the ray that produced the hit.
    pub incoming: Vector3f,
    /// Material with textures already resolved.
    pub material: Material,
}

/// One in-flight path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathState {
    pub pixel: usize,
    pub ray: Ray,
    pub throughput: RGBSpectrum,
    pub radiance: RGBSpectrum,
    /// Direct light contribution waiting on its shadow query.
    pub pending: RGBSpectrum,
    pub random: Vector2f,
    pub active: bool,
    pub shading: Option<ShadingRecord>,
}

impl PathState {
    pub fn new(pixel: usize, ray: Ray) -> Self {
        Self {
            pixel,
            active: ray.active,
            ray,
            throughput: RGBSpectrum::splat(1.0),
            radiance: RGBSpectrum::default(),
            pending: RGBSpectrum::default(),
            random: Vector2f::zeros(),
            shading: None,
        }
    }

    pub fn terminate(&mut self) {
        self.active = false;
        self.ray.deactivate();
        self.shading = None;
    }
}

/// Scratch buffers reused across tiles and frames.
#[derive(Debug, Default)]
pub struct TileWorkspace {
    pub lanes: Vec<PathState>,
    pub rays: Vec<Ray>,
    pub hits: Vec<Intersection>,
    pub shadow_rays: Vec<Ray>,
    pub occluded: Vec<bool>,
}

impl TileWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the buffers for a tile of `lanes` pixels. Capacity grows
    /// as needed and is kept after the guard drops.
    pub fn acquire(&mut self, lanes: usize) -> WorkspaceGuard<'_> {
        self.clear();
        self.lanes.reserve(lanes);
        self.rays.reserve(lanes);
        self.hits.reserve(lanes);
        self.shadow_rays.reserve(lanes);
        self.occluded.reserve(lanes);
        WorkspaceGuard { workspace: self }
    }

    pub fn capacity(&self) -> usize {
        self.lanes.capacity()
    }

    fn clear(&mut self) {
        self.lanes.clear();
        self.rays.clear();
        self.hits.clear();
        self.shadow_rays.clear();
        self.occluded.clear();
    }
}

/// Exclusive access to a workspace for one estimate call; lanes are
/// cleared when it drops.
pub struct WorkspaceGuard<'a> {
    workspace: &'a mut TileWorkspace,
}

impl Deref for WorkspaceGuard<'_> {
    type Target = TileWorkspace;

    fn deref(&self) -> &TileWorkspace {
        self.workspace
    }
}

impl DerefMut for WorkspaceGuard<'_> {
    fn deref_mut(&mut self) -> &mut TileWorkspace {
        self.workspace
    }
}

impl Drop for WorkspaceGuard<'_> {
    fn drop(&mut self) {
        self.workspace.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_clears_on_drop() {
        let mut workspace = TileWorkspace::new();
        {
            let mut guard = workspace.acquire(16);
            guard.lanes.push(PathState::new(0, Ray::default()));
            assert_eq!(guard.lanes.len(), 1);
        }
        assert!(workspace.lanes.is_empty());
        assert!(workspace.capacity() >= 16);
    }

    #[test]
    fn test_path_state_starts_with_unit_throughput() {
        let ray = Ray::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None);
        let mut lane = PathState::new(3, ray);
        assert!(lane.active);
        assert_eq!(lane.throughput, RGBSpectrum::splat(1.0));
        assert!(lane.radiance.is_black());
        lane.terminate();
        assert!(!lane.active && !lane.ray.active);
    }
}
