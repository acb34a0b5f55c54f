// Copyright @yucwang 2026

//! Error types shared across the renderer.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading or interpreting a scene description.
#[derive(Error, Debug)]
pub enum SceneLoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Unknown reference: {0}")]
    UnknownReference(String),

    #[error("Failed to load mesh {path}: {reason}")]
    Mesh { path: PathBuf, reason: String },

    #[error(transparent)]
    Texture(#[from] TextureError),
}

/// Texture construction and sampler configuration failures.
#[derive(Error, Debug)]
pub enum TextureError {
    /// The filter is declared but has no implementation.
    #[error("Unimplemented texture filter: {0}")]
    Unimplemented(&'static str),

    /// Mip-map filters have no meaning for magnification.
    #[error("Invalid magnification filter: {0}")]
    InvalidMagFilter(&'static str),

    #[error("Texture dimensions do not match data length ({expected} texels, got {actual})")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Failed to decode image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
}

/// Top level error returned by setup and output routines.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No intersection device available")]
    NoDevice,

    #[error("Scene build failed: {0}")]
    SceneBuild(String),

    #[error("Invalid material table: {0}")]
    InvalidMaterial(String),

    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("Image dimensions {width}x{height} exceed the output format limit")]
    ImageTooLarge { width: usize, height: usize },

    #[error("Unsupported output format: {0}")]
    UnsupportedOutput(PathBuf),

    #[error("Image encoding failed: {0}")]
    Encode(String),

    #[error(transparent)]
    Scene(#[from] SceneLoadError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for renderer operations.
pub type Result<T> = std::result::Result<T, RenderError>;
