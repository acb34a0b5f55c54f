// Copyright @yucwang 2026

use crate::math::constants::{ pow5, saturate, Float, Vector3f, PI };
use crate::math::spectrum::RGBSpectrum;

/// Mirrors the incident direction `i` about `n`.
pub fn reflect(i: &Vector3f, n: &Vector3f) -> Vector3f {
    i - 2.0 * i.dot(n) * n
}

/// Refracts the incident direction `i` through a surface whose normal `n`
/// faces against it. `eta` is the ratio of indices (outside over inside).
/// `None` on total internal reflection.
pub fn refract(i: &Vector3f, n: &Vector3f, eta: Float) -> Option<Vector3f> {
    let cos_i = n.dot(i);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    Some(eta * i - (eta * cos_i + k.sqrt()) * n)
}

pub fn fresnel_schlick(f0: &RGBSpectrum, cos_theta: Float) -> RGBSpectrum {
    let fc = pow5(1.0 - saturate(cos_theta));
    *f0 * (1.0 - fc) + RGBSpectrum::splat(fc)
}

/// GGX normal distribution, `m` is the squared roughness.
pub fn ggx_d(nh: Float, m: Float) -> Float {
    let m2 = m * m;
    let spec = (nh * m2 - nh) * nh + 1.0;
    m2 / (PI * spec * spec)
}

/// Height correlated Smith visibility, already divided by `4 nl nv`.
pub fn smith_joint_visibility(nl: Float, nv: Float, m: Float) -> Float {
    let gv = nl * (nv * (1.0 - m) + m);
    let gl = nv * (nl * (1.0 - m) + m);
    let denom = gv + gl;
    if denom <= 0.0 {
        return 0.0;
    }
    0.5 / denom
}

/// Disney diffuse retro-reflection with its energy compensation factor.
pub fn disney_diffuse(nl: Float, nv: Float, lh: Float, roughness: Float) -> Float {
    let fd90 = 0.5 + 2.0 * roughness * lh * lh;
    let fdv = 1.0 + (fd90 - 1.0) * pow5(1.0 - saturate(nv));
    let fdl = 1.0 + (fd90 - 1.0) * pow5(1.0 - saturate(nl));
    fdv * fdl * (1.0 - roughness / 3.0)
}
