// Copyright @yucwang 2021

pub mod error;
pub mod film;
pub mod integrator;
pub mod intersector;
pub mod light;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod scene_loader;
pub mod sensor;
pub mod sequence;
pub mod texture;
pub mod tonemapper;
