// Copyright @yucwang 2026

use crate::core::error::RenderError;
use crate::core::intersector::Intersection;
use crate::core::light::Light;
use crate::core::material::Material;
use crate::core::mesh::Mesh;
use crate::core::sensor::Sensor;
use crate::core::texture::Texture2D;
use crate::math::constants::Vector2f;
use crate::math::spectrum::RGBSpectrum;
use crate::textures::sampler::Sampler;

/// Everything the estimator reads while rendering. Immutable once setup
/// has validated it.
pub struct Scene {
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    textures: Vec<Texture2D<RGBSpectrum>>,
    lights: Vec<Box<dyn Light>>,
    camera: Box<dyn Sensor>,
    texture_sampler: Sampler,
}

impl Scene {
    pub fn new(camera: Box<dyn Sensor>) -> Self {
        Self {
            meshes: Vec::new(),
            materials: Vec::new(),
            textures: Vec::new(),
            lights: Vec::new(),
            camera,
            texture_sampler: Sampler::default(),
        }
    }

    /// Returns the material id to reference from meshes.
    pub fn add_material(&mut self, material: Material) -> u32 {
        self.materials.push(material);
        (self.materials.len() - 1) as u32
    }

    pub fn add_texture(&mut self, texture: Texture2D<RGBSpectrum>) -> usize {
        self.textures.push(texture);
        self.textures.len() - 1
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn add_light(&mut self, light: Box<dyn Light>) {
        self.lights.push(light);
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn lights(&self) -> &[Box<dyn Light>] {
        &self.lights
    }

    pub fn camera(&self) -> &dyn Sensor {
        self.camera.as_ref()
    }

    /// Checks the material table against itself and the meshes.
    pub fn validate(&self) -> std::result::Result<(), RenderError> {
        if self.materials.is_empty() {
            return Err(RenderError::InvalidMaterial(String::from("scene has no materials")));
        }
        for (id, material) in self.materials.iter().enumerate() {
            material.validate(self.textures.len()).map_err(|e| match e {
                RenderError::InvalidMaterial(msg) => {
                    RenderError::InvalidMaterial(format!("material {}: {}", id, msg))
                }
                other => other,
            })?;
        }
        for (shape_id, mesh) in self.meshes.iter().enumerate() {
            if let Some(&bad) = mesh.material_ids.iter().find(|&&m| m as usize >= self.materials.len()) {
                return Err(RenderError::InvalidMaterial(
                    format!("mesh {} references material {} of {}", shape_id, bad, self.materials.len())));
            }
        }
        Ok(())
    }

    /// Material id behind a hit, `None` for misses and dangling ids.
    pub fn material_id(&self, hit: &Intersection) -> Option<usize> {
        if !hit.hit() {
            return None;
        }
        let mesh = self.meshes.get(hit.shape_id as usize)?;
        let id = *mesh.material_ids.get(hit.prim_id as usize)?;
        Some(id as usize).filter(|&id| id < self.materials.len())
    }

    /// Material with the albedo texture applied at the hit.
    pub fn shading_material(&self, hit: &Intersection) -> Option<Material> {
        let mut material = self.materials[self.material_id(hit)?].clone();
        if let Some(texture) = material.albedo_texture.and_then(|t| self.textures.get(t)) {
            let mesh = &self.meshes[hit.shape_id as usize];
            let uv = mesh.texcoord(hit.prim_id as usize, hit.u(), hit.v())
                .unwrap_or_else(|| Vector2f::new(hit.u(), hit.v()));
            material.albedo = material.albedo * self.texture_sampler.sample_2d(texture, &uv, 0.0);
        }
        Some(material)
    }
}
