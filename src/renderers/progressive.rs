// Copyright @yucwang 2026

use indicatif::{ ProgressBar, ProgressStyle };

use crate::core::error::Result;
use crate::core::film::{ Film, Tile };
use crate::core::integrator::Integrator;
use crate::core::intersector::{ IntersectionDevice, Intersector };
use crate::core::scene::Scene;
use crate::integrators::path::PathIntegrator;
use crate::integrators::workspace::TileWorkspace;

use super::settings::RenderSettings;

/// Drives the estimator frame after frame over the whole image.
pub struct ProgressiveRenderer {
    scene: Scene,
    intersector: Box<dyn Intersector>,
    integrator: Box<dyn Integrator>,
    film: Film,
    workspace: TileWorkspace,
    tiles: Vec<Tile>,
    frame: u32,
}

impl ProgressiveRenderer {
    /// Validates the scene and builds the device scene. Every failure here
    /// is fatal; nothing is rendered.
    pub fn setup(scene: Scene, device: &dyn IntersectionDevice,
                 settings: &RenderSettings) -> Result<Self> {
        settings.validate()?;
        scene.validate()?;
        if settings.exceeds_sample_bound() {
            log::warn!("{} frames exceed the {} sample bound; later frames stop converging",
                       settings.frames, settings.max_samples);
        }

        let intersector = device.build_scene(scene.meshes())?;
        log::info!("Built scene on device {} ({} meshes, {} materials, {} lights)",
                   device.name(), scene.meshes().len(), scene.materials().len(),
                   scene.lights().len());

        let (cam_width, cam_height) = scene.camera().resolution();
        if (cam_width, cam_height) != (settings.width, settings.height) {
            log::warn!("Camera resolution {}x{} differs from film {}x{}",
                       cam_width, cam_height, settings.width, settings.height);
        }

        let integrator = PathIntegrator::with_max_samples(settings.bounces, settings.max_samples);
        let tiles = Tile::cover(settings.width, settings.height, settings.tile_size);
        let mut workspace = TileWorkspace::new();
        drop(workspace.acquire(settings.tile_size * settings.tile_size));

        Ok(Self {
            scene,
            intersector,
            integrator: Box::new(integrator),
            film: Film::new(settings.width, settings.height),
            workspace,
            tiles,
            frame: 0,
        })
    }

    pub fn with_integrator(mut self, integrator: Box<dyn Integrator>) -> Self {
        self.integrator = integrator;
        self
    }

    /// Adds one sample per pixel. `frame` counts from 1 and must match the
    /// number of frames accumulated so far.
    pub fn render_frame(&mut self, frame: u32) {
        let frame = frame.max(1);
        for tile in self.tiles.iter() {
            self.integrator.estimate(&self.scene, self.intersector.as_ref(), &mut self.film,
                                     &mut self.workspace, frame, tile);
        }
        self.frame = frame;
        log::debug!("Frame {} done ({} tiles)", frame, self.tiles.len());
    }

    /// Renders frames `1..=frames` from a cleared film.
    pub fn render(&mut self, frames: u32) {
        self.reset();

        let progress = ProgressBar::new(frames as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        for frame in 1..=frames {
            self.render_frame(frame);
            progress.inc(1);
        }
        progress.finish_and_clear();
        log::info!("Rendered {} frames at {}x{}", frames, self.film.width(), self.film.height());
    }

    pub fn reset(&mut self) {
        self.film.clear();
        self.frame = 0;
    }

    /// Row-major RGBA8 display buffer.
    pub fn data(&self) -> &[u8] {
        self.film.ldr_bytes()
    }

    pub fn film(&self) -> &Film {
        &self.film
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Number of frames accumulated so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }
}
