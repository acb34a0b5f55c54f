// Copyright @yucwang 2026

pub mod aces;
pub mod reinhard;
