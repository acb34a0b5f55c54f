// Copyright @yucwang 2026

use crate::core::error::TextureError;
use crate::core::texture::{ Texel, Texture1D, Texture2D, Texture2DArray,
                            Texture3D, WrapMode };
use crate::math::constants::{ Float, Vector2f, Vector3f };

/// Texture filters a sampler can be configured with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
    Anisotropic,
}

impl Filter {
    fn name(self) -> &'static str {
        match self {
            Filter::Nearest => "nearest",
            Filter::Linear => "linear",
            Filter::NearestMipmapNearest => "nearest_mipmap_nearest",
            Filter::LinearMipmapNearest => "linear_mipmap_nearest",
            Filter::NearestMipmapLinear => "nearest_mipmap_linear",
            Filter::LinearMipmapLinear => "linear_mipmap_linear",
            Filter::Anisotropic => "anisotropic",
        }
    }

    fn is_mipmap(self) -> bool {
        !matches!(self, Filter::Nearest | Filter::Linear | Filter::Anisotropic)
    }

    fn interpolation(self) -> Result<Interpolation, TextureError> {
        match self {
            Filter::Nearest => Ok(Interpolation::Nearest),
            Filter::Linear => Ok(Interpolation::Bilinear),
            other => Err(TextureError::Unimplemented(other.name())),
        }
    }
}

/// Interpolation strategies with an implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    Nearest,
    Bilinear,
}

/// Texel indices and weights along one axis. Nearest puts all the weight on
/// the first tap.
fn taps(interp: Interpolation, wrap: WrapMode, coord: Float, size: usize) -> [(usize, Float); 2] {
    let last = size.saturating_sub(1);
    let scaled = wrap.wrap(coord) * size as Float;
    match interp {
        Interpolation::Nearest => {
            let x = (scaled.round().max(0.0) as usize).min(last);
            [(x, 1.0), (x, 0.0)]
        }
        Interpolation::Bilinear => {
            let floor = scaled.floor();
            let x0 = (floor.max(0.0) as usize).min(last);
            let x1 = (x0 + 1).min(last);
            let t = scaled - floor;
            [(x0, 1.0 - t), (x1, t)]
        }
    }
}

/// Filtered texture fetch configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sampler {
    min: Interpolation,
    mag: Interpolation,
    wrap: [WrapMode; 3],
}

impl Default for Sampler {
    fn default() -> Self {
        Self { min: Interpolation::Bilinear,
               mag: Interpolation::Bilinear,
               wrap: [WrapMode::Repeat; 3] }
    }
}

impl Sampler {
    /// Fails for declared filters without an implementation. A mip-map
    /// filter used for magnification is rejected as invalid.
    pub fn new(min_filter: Filter, mag_filter: Filter) -> Result<Self, TextureError> {
        if mag_filter.is_mipmap() {
            return Err(TextureError::InvalidMagFilter(mag_filter.name()));
        }
        Ok(Self { min: min_filter.interpolation()?,
                  mag: mag_filter.interpolation()?,
                  wrap: [WrapMode::Repeat; 3] })
    }

    pub fn with_wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = [wrap; 3];
        self
    }

    pub fn with_wrap_uvw(mut self, u: WrapMode, v: WrapMode, w: WrapMode) -> Self {
        self.wrap = [u, v, w];
        self
    }

    /// Minification above zero, magnification otherwise.
    pub fn select(&self, lod: Float) -> Interpolation {
        if lod > 0.0 { self.min } else { self.mag }
    }

    pub fn lod_from_derivatives(dx: Float, dy: Float) -> Float {
        let d = dx.abs().max(dy.abs());
        (d * d).log2() * 0.5
    }

    pub fn sample_1d<T: Texel>(&self, tex: &Texture1D<T>, u: Float, lod: Float) -> T {
        let tu = taps(self.select(lod), self.wrap[0], u, tex.width());
        tu.iter().fold(T::default(), |acc, &(x, w)| acc + tex.texel(x) * w)
    }

    pub fn sample_2d<T: Texel>(&self, tex: &Texture2D<T>, uv: &Vector2f, lod: Float) -> T {
        let interp = self.select(lod);
        let tu = taps(interp, self.wrap[0], uv.x, tex.width());
        let tv = taps(interp, self.wrap[1], uv.y, tex.height());

        let mut acc = T::default();
        for &(y, wy) in tv.iter() {
            for &(x, wx) in tu.iter() {
                acc = acc + tex.texel(x, y) * (wx * wy);
            }
        }
        acc
    }

    /// Derives the level of detail from screen space derivatives.
    pub fn sample_2d_grad<T: Texel>(&self, tex: &Texture2D<T>, uv: &Vector2f,
                                    dx: Float, dy: Float) -> T {
        self.sample_2d(tex, uv, Self::lod_from_derivatives(dx, dy))
    }

    /// The layer index is rounded and clamped, never blended.
    pub fn sample_2d_array<T: Texel>(&self, tex: &Texture2DArray<T>, uv: &Vector2f,
                                     layer: Float, lod: Float) -> T {
        let last = tex.layer_count() - 1;
        let index = (layer.round().max(0.0) as usize).min(last);
        self.sample_2d(tex.layer(index), uv, lod)
    }

    pub fn sample_3d<T: Texel>(&self, tex: &Texture3D<T>, uvw: &Vector3f, lod: Float) -> T {
        let interp = self.select(lod);
        let tu = taps(interp, self.wrap[0], uvw.x, tex.width());
        let tv = taps(interp, self.wrap[1], uvw.y, tex.height());
        let tw = taps(interp, self.wrap[2], uvw.z, tex.depth());

        let mut acc = T::default();
        for &(z, wz) in tw.iter() {
            for &(y, wy) in tv.iter() {
                for &(x, wx) in tu.iter() {
                    acc = acc + tex.texel(x, y, z) * (wx * wy * wz);
                }
            }
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::spectrum::RGBSpectrum;

    fn ramp_2d() -> Texture2D<Float> {
        Texture2D::new(4, 4, (0..16).map(|v| v as Float).collect()).unwrap()
    }

    #[test]
    fn test_unimplemented_filters_fail() {
        assert!(matches!(Sampler::new(Filter::LinearMipmapLinear, Filter::Linear),
                         Err(TextureError::Unimplemented(_))));
        assert!(matches!(Sampler::new(Filter::Anisotropic, Filter::Nearest),
                         Err(TextureError::Unimplemented(_))));
        assert!(matches!(Sampler::new(Filter::Linear, Filter::NearestMipmapNearest),
                         Err(TextureError::InvalidMagFilter(_))));
        assert!(Sampler::new(Filter::Nearest, Filter::Linear).is_ok());
    }

    #[test]
    fn test_lod_selects_filter() {
        let sampler = Sampler::new(Filter::Nearest, Filter::Linear).unwrap();
        assert_eq!(sampler.select(0.5), Interpolation::Nearest);
        assert_eq!(sampler.select(0.0), Interpolation::Bilinear);
        assert_eq!(sampler.select(-2.0), Interpolation::Bilinear);
        assert!((Sampler::lod_from_derivatives(4.0, 2.0) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_bilinear_matches_nearest_on_texel_corners() {
        let tex = ramp_2d();
        let linear = Sampler::new(Filter::Linear, Filter::Linear).unwrap()
            .with_wrap(WrapMode::ClampToEdge);
        let nearest = Sampler::new(Filter::Nearest, Filter::Nearest).unwrap()
            .with_wrap(WrapMode::ClampToEdge);
        for y in 0..4 {
            for x in 0..4 {
                let uv = Vector2f::new(x as Float / 4.0, y as Float / 4.0);
                let a = linear.sample_2d(&tex, &uv, 0.0);
                let b = nearest.sample_2d(&tex, &uv, 0.0);
                assert!((a - b).abs() < 1e-6, "texel ({}, {})", x, y);
                assert_eq!(b, (x + 4 * y) as Float);
            }
        }
    }

    #[test]
    fn test_bilinear_blends_neighbors() {
        let tex = Texture1D::new(vec![0.0 as Float, 10.0]).unwrap();
        let sampler = Sampler::default().with_wrap(WrapMode::ClampToEdge);
        assert!((sampler.sample_1d(&tex, 0.25, 0.0) - 5.0).abs() < 1e-5);
        // upper neighbor clamps at the last texel
        assert!((sampler.sample_1d(&tex, 0.99, 0.0) - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_repeat_wraps_around() {
        let tex = ramp_2d();
        let sampler = Sampler::new(Filter::Nearest, Filter::Nearest).unwrap();
        let inside = sampler.sample_2d(&tex, &Vector2f::new(0.25, 0.5), 0.0);
        let wrapped = sampler.sample_2d(&tex, &Vector2f::new(1.25, -0.5), 0.0);
        assert_eq!(inside, wrapped);
    }

    #[test]
    fn test_array_and_volume_fetches() {
        let layers = (0..3).map(|l| {
            Texture2D::new(1, 1, vec![RGBSpectrum::splat(l as Float)]).unwrap()
        }).collect();
        let array = Texture2DArray::new(layers).unwrap();
        let sampler = Sampler::default();
        let uv = Vector2f::new(0.5, 0.5);
        assert_eq!(sampler.sample_2d_array(&array, &uv, 1.4, 0.0), RGBSpectrum::splat(1.0));
        assert_eq!(sampler.sample_2d_array(&array, &uv, 7.0, 0.0), RGBSpectrum::splat(2.0));

        let volume = Texture3D::new(2, 2, 2, vec![1.0 as Float; 8]).unwrap();
        let v = sampler.sample_3d(&volume, &Vector3f::new(0.3, 0.6, 0.9), 0.0);
        assert!((v - 1.0).abs() < 1e-5);
    }
}
