// Copyright @yucwang 2026

pub mod cranley_patterson;
pub mod halton;
pub mod hammersley;
