// Copyright @yucwang 2026

//! Contract between the estimator and an intersection engine.

use crate::core::error::{ RenderError, Result };
use crate::core::mesh::Mesh;
use crate::math::constants::{ Float, Vector4f };
use crate::math::ray::Ray;

/// Id marking an empty shape or primitive slot.
pub const NULL_ID: i32 = -1;

/// Closest hit record: shape id, primitive id and `(u, v, w, t)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub shape_id: i32,
    pub prim_id: i32,
    pub uvwt: Vector4f,
}

impl Default for Intersection {
    fn default() -> Self {
        Self::miss()
    }
}

impl Intersection {
    pub fn miss() -> Self {
        Self { shape_id: NULL_ID, prim_id: NULL_ID, uvwt: Vector4f::zeros() }
    }

    pub fn new(shape_id: usize, prim_id: usize, u: Float, v: Float, t: Float) -> Self {
        Self { shape_id: shape_id as i32,
               prim_id: prim_id as i32,
               uvwt: Vector4f::new(u, v, 1.0 - u - v, t) }
    }

    /// Both slots must be filled before either is used as an index.
    pub fn hit(&self) -> bool {
        self.shape_id != NULL_ID && self.prim_id != NULL_ID
    }

    pub fn u(&self) -> Float {
        self.uvwt.x
    }

    pub fn v(&self) -> Float {
        self.uvwt.y
    }

    pub fn t(&self) -> Float {
        self.uvwt.w
    }
}

/// Built acceleration structure answering batched ray queries.
///
/// Results have the batch's length. Inactive rays report a miss and are
/// never occluded.
pub trait Intersector: Send + Sync {
    fn query_intersection(&self, rays: &[Ray]) -> Vec<Intersection>;

    fn query_occlusion(&self, rays: &[Ray]) -> Vec<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Gpu,
    Cpu,
}

/// Factory for intersectors.
pub trait IntersectionDevice: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> DeviceKind;

    fn build_scene(&self, meshes: &[Mesh]) -> Result<Box<dyn Intersector>>;
}

/// Prefers a GPU device, then a CPU one.
pub fn select_device(devices: &[Box<dyn IntersectionDevice>]) -> Result<&dyn IntersectionDevice> {
    let pick = devices.iter()
        .find(|d| d.kind() == DeviceKind::Gpu)
        .or_else(|| devices.iter().find(|d| d.kind() == DeviceKind::Cpu))
        .ok_or(RenderError::NoDevice)?;
    log::info!("Using intersection device: {}", pick.name());
    Ok(pick.as_ref())
}
