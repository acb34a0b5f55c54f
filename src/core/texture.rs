// Copyright @yucwang 2026

use std::ops::{ Add, Mul };

use crate::core::error::TextureError;
use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;
use crate::math::spectrum::RGBSpectrum;

/// Value type that can be stored in a texture and blended by a sampler.
pub trait Texel: Copy + Default + Send + Sync
    + Add<Output = Self> + Mul<Float, Output = Self> {}

impl Texel for Float {}
impl Texel for RGBSpectrum {}

/// Policy mapping an arbitrary normalized coordinate into `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    Mirror,
    ClampToEdge,
}

impl WrapMode {
    pub fn wrap(self, value: Float) -> Float {
        match self {
            WrapMode::Repeat => value.rem_euclid(1.0),
            WrapMode::Mirror => {
                let v = value.rem_euclid(2.0);
                if v > 1.0 { 2.0 - v } else { v }
            }
            WrapMode::ClampToEdge => value.max(0.0).min(1.0),
        }
    }
}

fn check_len(expected: usize, actual: usize) -> Result<(), TextureError> {
    if expected == 0 || expected != actual {
        return Err(TextureError::SizeMismatch { expected, actual });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Texture1D<T> {
    data: Vec<T>,
}

impl<T: Texel> Texture1D<T> {
    pub fn new(data: Vec<T>) -> Result<Self, TextureError> {
        if data.is_empty() {
            return Err(TextureError::SizeMismatch { expected: 1, actual: 0 });
        }
        Ok(Self { data })
    }

    pub fn width(&self) -> usize {
        self.data.len()
    }

    pub fn texel(&self, x: usize) -> T {
        self.data[x]
    }
}

#[derive(Debug, Clone)]
pub struct Texture2D<T> {
    image: Bitmap<T>,
}

impl<T: Texel> Texture2D<T> {
    /// `data` is row-major with row 0 at `v = 0`.
    pub fn new(width: usize, height: usize, data: Vec<T>) -> Result<Self, TextureError> {
        let actual = data.len();
        check_len(width * height, actual)?;
        Bitmap::from_vec(width, height, data)
            .map(|image| Self { image })
            .ok_or(TextureError::SizeMismatch { expected: width * height, actual })
    }

    pub fn width(&self) -> usize {
        self.image.width()
    }

    pub fn height(&self) -> usize {
        self.image.height()
    }

    pub fn texel(&self, x: usize, y: usize) -> T {
        self.image[(x, y)]
    }
}

#[derive(Debug, Clone)]
pub struct Texture2DArray<T> {
    layers: Vec<Texture2D<T>>,
}

impl<T: Texel> Texture2DArray<T> {
    /// Every layer must share the first layer's dimensions.
    pub fn new(layers: Vec<Texture2D<T>>) -> Result<Self, TextureError> {
        let first = layers.first()
            .ok_or(TextureError::SizeMismatch { expected: 1, actual: 0 })?;
        let (w, h) = (first.width(), first.height());
        for layer in layers.iter() {
            if layer.width() != w || layer.height() != h {
                return Err(TextureError::SizeMismatch {
                    expected: w * h, actual: layer.width() * layer.height() });
            }
        }
        Ok(Self { layers })
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, index: usize) -> &Texture2D<T> {
        &self.layers[index]
    }
}

#[derive(Debug, Clone)]
pub struct Texture3D<T> {
    width: usize,
    height: usize,
    depth: usize,
    data: Vec<T>,
}

impl<T: Texel> Texture3D<T> {
    /// `data` is laid out slice by slice, each slice row-major.
    pub fn new(width: usize, height: usize, depth: usize, data: Vec<T>) -> Result<Self, TextureError> {
        check_len(width * height * depth, data.len())?;
        Ok(Self { width, height, depth, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn texel(&self, x: usize, y: usize, z: usize) -> T {
        self.data[x + self.width * (y + self.height * z)]
    }
}
