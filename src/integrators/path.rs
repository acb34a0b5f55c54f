// Copyright @yucwang 2026

use rayon::prelude::*;

use crate::core::film::{ Film, Tile };
use crate::core::integrator::Integrator;
use crate::core::intersector::{ Intersection, Intersector };
use crate::core::light::Light;
use crate::core::scene::Scene;
use crate::core::sequence::{ SequenceGenerator, DEFAULT_MAX_SAMPLES };
use crate::core::tonemapper::Tonemapper;
use crate::materials::response::{ direct_response, facing_normal, sample };
use crate::math::constants::{ Float, Vector2f };
use crate::math::ray::Ray;
use crate::math::spectrum::RGBSpectrum;
use crate::samplers::cranley_patterson::CranleyPatterson;
use crate::samplers::halton::Halton;
use crate::tonemappers::aces::AcesFilmic;

use super::workspace::{ PathState, ShadingRecord, TileWorkspace };

/// Offset applied along new ray directions to leave the surface.
const RAY_EPSILON: Float = 1e-4;

/// Sequence dimensions consumed per bounce: two for the material, one for
/// the lights. Dimensions 0 and 1 jitter the camera ray.
const DIMS_PER_BOUNCE: usize = 3;

/// Multi-bounce path tracer with next event estimation towards every
/// scene light.
pub struct PathIntegrator {
    num_bounces: usize,
    sequence: Box<dyn SequenceGenerator>,
    tonemapper: Box<dyn Tonemapper>,
}

impl PathIntegrator {
    pub fn new(num_bounces: usize) -> Self {
        Self::with_max_samples(num_bounces, DEFAULT_MAX_SAMPLES)
    }

    pub fn with_max_samples(num_bounces: usize, max_samples: u32) -> Self {
        Self {
            num_bounces,
            sequence: Box::new(CranleyPatterson::new(Halton::new(max_samples))),
            tonemapper: Box::new(AcesFilmic),
        }
    }

    pub fn with_sequence(mut self, sequence: Box<dyn SequenceGenerator>) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_tonemapper(mut self, tonemapper: Box<dyn Tonemapper>) -> Self {
        self.tonemapper = tonemapper;
        self
    }

    fn sample_1d(&self, dimension: usize, frame: u32, pixel: usize) -> Float {
        let dimension = dimension % self.sequence.dimensions();
        self.sequence.sample_scrambled(dimension, frame, pixel as u32)
    }

    fn sample_2d(&self, dimension: usize, frame: u32, pixel: usize) -> Vector2f {
        Vector2f::new(self.sample_1d(dimension, frame, pixel),
                      self.sample_1d(dimension + 1, frame, pixel))
    }

    fn init_lanes(&self, scene: &Scene, film: &Film, lanes: &mut Vec<PathState>,
                  frame: u32, tile: &Tile) {
        let (width, height) = (film.width() as Float, film.height() as Float);
        let camera = scene.camera();
        for y in tile.y..tile.y + tile.height {
            for x in tile.x..tile.x + tile.width {
                let pixel = y * film.width() + x;
                let jitter = self.sample_2d(0, frame, pixel);
                let u = Vector2f::new((x as Float + jitter.x) / width,
                                      (y as Float + jitter.y) / height);
                lanes.push(PathState::new(pixel, camera.sample_ray(&u)));
            }
        }
    }

    /// Resolves a lane's hit: misses end the lane, emitters add their
    /// radiance and end it, surfaces get a shading record.
    fn classify(&self, scene: &Scene, lane: &mut PathState, hit: &Intersection,
                frame: u32, dimension: usize) {
        if !lane.active {
            return;
        }

        let material = match scene.shading_material(hit) {
            Some(material) => material,
            None => {
                lane.terminate();
                return;
            }
        };

        if material.is_emissive() {
            lane.radiance += lane.throughput * material.emissive;
            lane.terminate();
            return;
        }

        let mesh = &scene.meshes()[hit.shape_id as usize];
        let prim = hit.prim_id as usize;
        lane.random = self.sample_2d(dimension, frame, lane.pixel);
        lane.shading = Some(ShadingRecord {
            position: mesh.position(prim, hit.u(), hit.v()),
            normal: mesh.normal(prim, hit.u(), hit.v()),
            incoming: lane.ray.dir(),
            material,
        });
    }

    /// Builds the shadow ray for one lane and parks its contribution.
    fn prepare_shadow_ray(&self, light: &dyn Light, color: &RGBSpectrum, lane: &mut PathState,
                          frame: u32, dimension: usize) -> Ray {
        lane.pending = RGBSpectrum::default();
        if !lane.active {
            return Ray::default();
        }
        let shading = match &lane.shading {
            Some(shading) => shading,
            None => return Ray::default(),
        };

        let n = facing_normal(&shading.incoming, &shading.normal);
        let u = self.sample_1d(dimension, frame, lane.pixel);
        let ls = light.sample(&shading.position, &n, u);
        if !ls.is_valid() {
            return Ray::default();
        }

        let response = direct_response(&shading.incoming, &shading.normal, &ls.direction,
                                       &shading.material);
        let contribution = lane.throughput * response * *color * ls.attenuation;
        debug_assert!(contribution.is_finite(), "non-finite light sample {:?}", contribution);
        if !contribution.is_finite() || contribution.is_black() {
            return Ray::default();
        }

        let max_t = if ls.distance.is_finite() {
            (ls.distance - 2.0 * RAY_EPSILON).max(0.0)
        } else {
            Float::MAX
        };
        lane.pending = contribution;
        Ray::new(shading.position + ls.direction * RAY_EPSILON, ls.direction, Some(0.0), Some(max_t))
            .with_backface_culling(shading.material.ior <= 1.0)
    }

    /// Draws the continuation ray. On the last bounce the lane just ends.
    fn continue_path(&self, lane: &mut PathState, last_bounce: bool) {
        if !lane.active {
            return;
        }
        let shading = match lane.shading.take() {
            Some(shading) => shading,
            None => {
                lane.terminate();
                return;
            }
        };
        if last_bounce {
            lane.terminate();
            return;
        }

        let s = sample(&shading.incoming, &shading.normal, &shading.material, &lane.random);
        let finite = s.weight.is_finite() && s.direction.iter().all(|c| c.is_finite());
        if !finite {
            log::warn!("Dropping non-finite material sample {:?} at pixel {}", s, lane.pixel);
        }
        if !finite || s.weight.is_black() {
            lane.terminate();
            return;
        }

        lane.throughput *= s.weight;
        lane.ray = Ray::new(shading.position + s.direction * RAY_EPSILON, s.direction, None, None)
            .with_backface_culling(shading.material.ior <= 1.0);
    }
}

impl Integrator for PathIntegrator {
    fn estimate(&self, scene: &Scene, intersector: &dyn Intersector, film: &mut Film,
                workspace: &mut TileWorkspace, frame: u32, tile: &Tile) {
        let frame = frame.max(1);
        let mut guard = workspace.acquire(tile.pixel_count());
        let ws: &mut TileWorkspace = &mut guard;

        self.init_lanes(scene, film, &mut ws.lanes, frame, tile);

        for bounce in 0..self.num_bounces {
            let dimension = 2 + DIMS_PER_BOUNCE * bounce;

            ws.rays.clear();
            ws.rays.extend(ws.lanes.iter().map(|lane| lane.ray));
            ws.hits = intersector.query_intersection(&ws.rays);
            debug_assert_eq!(ws.hits.len(), ws.lanes.len());
            ws.hits.resize(ws.lanes.len(), Intersection::miss());

            let hits = &ws.hits;
            ws.lanes.par_iter_mut().zip(hits.par_iter()).for_each(|(lane, hit)| {
                self.classify(scene, lane, hit, frame, dimension);
            });

            if bounce == 0 && !ws.lanes.iter().any(|lane| lane.active) {
                log::debug!("Tile ({}, {}) finished after primary hits", tile.x, tile.y);
                break;
            }

            for light in scene.lights() {
                let color = light.color();
                ws.shadow_rays.clear();
                ws.shadow_rays.resize(ws.lanes.len(), Ray::default());
                ws.lanes.par_iter_mut().zip(ws.shadow_rays.par_iter_mut()).for_each(|(lane, shadow)| {
                    *shadow = self.prepare_shadow_ray(light.as_ref(), &color, lane, frame, dimension + 2);
                });

                ws.occluded = intersector.query_occlusion(&ws.shadow_rays);
                ws.occluded.resize(ws.lanes.len(), true);
                let occluded = &ws.occluded;
                ws.lanes.par_iter_mut().zip(occluded.par_iter()).for_each(|(lane, &blocked)| {
                    if !blocked {
                        lane.radiance += lane.pending;
                    }
                    lane.pending = RGBSpectrum::default();
                });
            }

            let last_bounce = bounce + 1 == self.num_bounces;
            ws.lanes.par_iter_mut().for_each(|lane| self.continue_path(lane, last_bounce));
        }

        let mut dropped = 0usize;
        for lane in ws.lanes.iter() {
            if !film.accumulate(lane.pixel, &lane.radiance) {
                dropped += 1;
            }
        }
        if dropped > 0 {
            log::warn!("Dropped {} invalid samples in tile ({}, {})", dropped, tile.x, tile.y);
        }

        for lane in ws.lanes.iter() {
            film.tonemap_pixel(lane.pixel, frame, self.tonemapper.as_ref());
        }
    }

    fn num_bounces(&self) -> usize {
        self.num_bounces
    }
}
