// Copyright @yucwang 2026

use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::Arc;

use lumiere::core::error::{ RenderError, Result };
use lumiere::core::film::{ Film, Tile };
use lumiere::core::integrator::Integrator;
use lumiere::core::intersector::{ DeviceKind, Intersection, IntersectionDevice, Intersector };
use lumiere::core::material::Material;
use lumiere::core::mesh::Mesh;
use lumiere::core::scene::Scene;
use lumiere::emitters::point::PointLight;
use lumiere::integrators::path::PathIntegrator;
use lumiere::integrators::workspace::TileWorkspace;
use lumiere::intersectors::bvh::BvhDevice;
use lumiere::math::constants::Vector3f;
use lumiere::math::ray::Ray;
use lumiere::math::spectrum::RGBSpectrum;
use lumiere::renderers::progressive::ProgressiveRenderer;
use lumiere::renderers::settings::RenderSettings;
use lumiere::sensors::perspective::PerspectiveCamera;
use lumiere::shapes::rectangle::Rectangle;
use lumiere::math::transform::Transform;

#[derive(Default)]
struct Counters {
    intersection_batches: AtomicUsize,
    occlusion_batches: AtomicUsize,
}

/// Every active ray hits triangle 0 of mesh 0. Shadow rays report
/// `occluded` unconditionally.
struct FixedHit {
    counters: Arc<Counters>,
    occluded: bool,
}

impl FixedHit {
    fn new(counters: &Arc<Counters>, occluded: bool) -> Self {
        Self { counters: counters.clone(), occluded }
    }
}

impl Intersector for FixedHit {
    fn query_intersection(&self, rays: &[Ray]) -> Vec<Intersection> {
        self.counters.intersection_batches.fetch_add(1, Ordering::SeqCst);
        rays.iter()
            .map(|r| if r.active { Intersection::new(0, 0, 0.25, 0.25, 1.0) } else { Intersection::miss() })
            .collect()
    }

    fn query_occlusion(&self, rays: &[Ray]) -> Vec<bool> {
        self.counters.occlusion_batches.fetch_add(1, Ordering::SeqCst);
        vec![self.occluded; rays.len()]
    }
}

struct AlwaysMiss;

impl Intersector for AlwaysMiss {
    fn query_intersection(&self, rays: &[Ray]) -> Vec<Intersection> {
        vec![Intersection::miss(); rays.len()]
    }

    fn query_occlusion(&self, rays: &[Ray]) -> Vec<bool> {
        vec![false; rays.len()]
    }
}

struct NoDevice;

impl IntersectionDevice for NoDevice {
    fn name(&self) -> &str {
        "broken"
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::Gpu
    }

    fn build_scene(&self, _meshes: &[Mesh]) -> Result<Box<dyn Intersector>> {
        Err(RenderError::SceneBuild(String::from("device lost")))
    }
}

const WIDTH: usize = 4;
const HEIGHT: usize = 4;

fn camera(width: usize, height: usize) -> Box<PerspectiveCamera> {
    Box::new(PerspectiveCamera::new(Vector3f::new(0.0, 0.0, 5.0), Vector3f::zeros(), Vector3f::y(),
                                    0.8, width, height, 0.01, 100.0))
}

fn triangle_scene(material: Material) -> Scene {
    let mut scene = Scene::new(camera(WIDTH, HEIGHT));
    let id = scene.add_material(material);
    scene.add_mesh(Mesh::new(vec![Vector3f::new(-1.0, -1.0, 0.0), Vector3f::new(1.0, -1.0, 0.0),
                                  Vector3f::new(0.0, 1.0, 0.0)],
                             Vec::new(), Vec::new(), vec![[0, 1, 2]], id));
    scene
}

fn run_frames(integrator: &PathIntegrator, scene: &Scene, intersector: &dyn Intersector,
              film: &mut Film, frames: u32) {
    let mut workspace = TileWorkspace::new();
    for frame in 1..=frames {
        for tile in Tile::cover(WIDTH, HEIGHT, 2) {
            integrator.estimate(scene, intersector, film, &mut workspace, frame, &tile);
        }
    }
}

#[test]
fn all_emissive_tile_accumulates_emission_per_frame() {
    let emission = RGBSpectrum::new(1.0, 2.0, 3.0);
    let mut scene = triangle_scene(Material::emitter(emission));
    scene.add_light(Box::new(PointLight::new(Vector3f::new(0.0, 0.0, 2.0), RGBSpectrum::splat(1.0), 1.0)));

    let counters = Arc::new(Counters::default());
    let intersector = FixedHit::new(&counters, false);
    let integrator = PathIntegrator::new(3);
    let mut film = Film::new(WIDTH, HEIGHT);
    run_frames(&integrator, &scene, &intersector, &mut film, 3);

    for i in 0..WIDTH * HEIGHT {
        assert_eq!(film.sum(i), emission * 3.0);
        assert_eq!(film.average(i, 3), emission);
        assert_ne!(film.packed(i), 0xFF00_0000);
    }
    // One primary batch per tile and frame, then the early exit.
    assert_eq!(counters.intersection_batches.load(Ordering::SeqCst), 4 * 3);
    assert_eq!(counters.occlusion_batches.load(Ordering::SeqCst), 0);
}

#[test]
fn missing_everything_gives_black() {
    let scene = triangle_scene(Material::default());
    let integrator = PathIntegrator::new(3);
    let mut film = Film::new(WIDTH, HEIGHT);
    run_frames(&integrator, &scene, &AlwaysMiss, &mut film, 2);

    for i in 0..WIDTH * HEIGHT {
        assert!(film.sum(i).is_black());
        assert_eq!(film.packed(i), 0xFF00_0000);
    }
}

#[test]
fn diffuse_surfaces_without_lights_stay_black() {
    let scene = triangle_scene(Material::diffuse(RGBSpectrum::splat(0.9)));
    let counters = Arc::new(Counters::default());
    let intersector = FixedHit::new(&counters, false);
    let integrator = PathIntegrator::new(3);
    let mut film = Film::new(WIDTH, HEIGHT);
    run_frames(&integrator, &scene, &intersector, &mut film, 2);

    for i in 0..WIDTH * HEIGHT {
        assert!(film.sum(i).is_black());
    }
    assert_eq!(counters.intersection_batches.load(Ordering::SeqCst), 4 * 2 * 3);
}

fn lit_triangle_scene() -> Scene {
    let mut scene = triangle_scene(Material::diffuse(RGBSpectrum::splat(0.5)));
    scene.add_light(Box::new(PointLight::new(Vector3f::new(0.0, 0.0, 2.0), RGBSpectrum::splat(1.0), 10.0)));
    scene
}

#[test]
fn occluded_lights_add_nothing() {
    let scene = lit_triangle_scene();
    let counters = Arc::new(Counters::default());
    let intersector = FixedHit::new(&counters, true);
    let integrator = PathIntegrator::new(3);
    let mut film = Film::new(WIDTH, HEIGHT);
    run_frames(&integrator, &scene, &intersector, &mut film, 2);

    for i in 0..WIDTH * HEIGHT {
        assert!(film.sum(i).is_black());
    }
    // One shadow batch per light, bounce, tile and frame.
    assert_eq!(counters.occlusion_batches.load(Ordering::SeqCst), 3 * 4 * 2);
}

#[test]
fn single_bounce_keeps_direct_light() {
    let scene = lit_triangle_scene();
    let counters = Arc::new(Counters::default());
    let intersector = FixedHit::new(&counters, false);
    let integrator = PathIntegrator::new(1);
    let mut film = Film::new(WIDTH, HEIGHT);
    run_frames(&integrator, &scene, &intersector, &mut film, 2);

    for i in 0..WIDTH * HEIGHT {
        let radiance = film.average(i, 2);
        assert!(radiance.is_finite());
        assert!(!radiance.is_black());
    }
    assert_eq!(counters.intersection_batches.load(Ordering::SeqCst), 4 * 2);
    assert_eq!(counters.occlusion_batches.load(Ordering::SeqCst), 4 * 2);
}

#[test]
fn point_light_illuminates_facing_surface() {
    let settings = RenderSettings { width: 8, height: 8, bounces: 2, tile_size: 4,
                                    ..RenderSettings::default() };
    let mut scene = Scene::new(camera(8, 8));
    let id = scene.add_material(Material::diffuse(RGBSpectrum::splat(0.5)));
    scene.add_mesh(Rectangle::new(Transform::default()).to_mesh(id));
    scene.add_light(Box::new(PointLight::new(Vector3f::new(0.0, 0.0, 2.0), RGBSpectrum::splat(1.0), 10.0)));

    let mut renderer = ProgressiveRenderer::setup(scene, &BvhDevice, &settings).unwrap();
    renderer.render(2);
    assert_eq!(renderer.frame(), 2);

    let center = 4 * 8 + 4;
    let radiance = renderer.film().average(center, 2);
    assert!(radiance.is_finite());
    assert!(!radiance.is_black());
    assert_eq!(renderer.data().len(), 8 * 8 * 4);
    assert!(renderer.data()[center * 4] > 0);
}

#[test]
fn setup_failures_are_reported() {
    let settings = RenderSettings { width: WIDTH, height: HEIGHT, ..RenderSettings::default() };

    let result = ProgressiveRenderer::setup(triangle_scene(Material::default()), &NoDevice, &settings);
    assert!(matches!(result, Err(RenderError::SceneBuild(_))));

    let empty = Scene::new(camera(WIDTH, HEIGHT));
    let result = ProgressiveRenderer::setup(empty, &BvhDevice, &settings);
    assert!(matches!(result, Err(RenderError::InvalidMaterial(_))));

    let mut bad = Material::default();
    bad.metalness = 2.0;
    let result = ProgressiveRenderer::setup(triangle_scene(bad), &BvhDevice, &settings);
    assert!(matches!(result, Err(RenderError::InvalidMaterial(_))));
}
