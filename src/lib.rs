// Copyright @yucwang 2021

//! Progressive Monte Carlo path tracing estimator.

pub mod core;
pub mod emitters;
pub mod integrators;
pub mod intersectors;
pub mod io;
pub mod materials;
pub mod math;
pub mod renderers;
pub mod samplers;
pub mod sensors;
pub mod shapes;
pub mod textures;
pub mod tonemappers;
