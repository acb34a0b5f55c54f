// Copyright @yucwang 2026

use crate::core::film::{ Film, Tile };
use crate::core::intersector::Intersector;
use crate::core::scene::Scene;
use crate::integrators::workspace::TileWorkspace;

/// Progressive radiance estimator working one tile at a time.
pub trait Integrator: Send + Sync {
    /// Adds one sample per pixel of `tile` into `film` and refreshes the
    /// tile's display pixels. `frame` starts at 1.
    fn estimate(&self, scene: &Scene, intersector: &dyn Intersector, film: &mut Film,
                workspace: &mut TileWorkspace, frame: u32, tile: &Tile);

    fn num_bounces(&self) -> usize;
}
