// Copyright @yucwang 2026

//! Material response: lobe selection, direction sampling and the matching
//! path throughput weight.
//!
//! Directions follow the ray convention: `v` is the direction the incoming
//! ray travels (towards the surface) and `l` is the outgoing direction. The
//! normal may face either way, it is flipped towards the viewer first.

use crate::core::material::Material;
use crate::math::constants::{ saturate, Float, Vector2f, Vector3f, INV_PI,
                              ONE_MINUS_EPSILON };
use crate::math::frame::tangent_to_world;
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{ sample_cosine_hemisphere, sample_ggx_lobe };

use super::microfacet::{ disney_diffuse, fresnel_schlick, ggx_d, reflect,
                         refract, smith_joint_visibility };

/// Additive bias on `n.v` keeping grazing views away from zero denominators.
const NV_BIAS: Float = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lobe {
    Specular,
    Transmission,
    Diffuse,
}

/// Outcome of `sample`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BsdfSample {
    pub lobe: Lobe,
    pub direction: Vector3f,
    pub weight: RGBSpectrum,
}

/// Normal flipped to face against the incoming direction.
pub fn facing_normal(v: &Vector3f, n: &Vector3f) -> Vector3f {
    if n.dot(v) > 0.0 { -n } else { *n }
}

/// Picks the lobe driven by `xi.x`.
pub fn classify(material: &Material, xi: &Vector2f) -> Lobe {
    if xi.x <= material.specular_probability() {
        Lobe::Specular
    } else if material.ior > 1.0 {
        Lobe::Transmission
    } else {
        Lobe::Diffuse
    }
}

impl Lobe {
    /// Stretches `xi.x` back over `[0, 1)` within the interval that selected
    /// this lobe, so the direction sample does not reuse the selection.
    pub fn remap(&self, material: &Material, xi: &Vector2f) -> Vector2f {
        let p = material.specular_probability();
        let x = match self {
            Lobe::Specular => xi.x / p,
            _ if p < 1.0 => (xi.x - p) / (1.0 - p),
            _ => xi.x,
        };
        Vector2f::new(x.max(0.0).min(ONE_MINUS_EPSILON), xi.y)
    }

    /// Draws an outgoing direction. `xi` is the remapped sample.
    pub fn sample(&self, v: &Vector3f, n: &Vector3f, material: &Material, xi: &Vector2f) -> Vector3f {
        let nf = facing_normal(v, n);
        match self {
            Lobe::Specular => {
                let r = reflect(v, &nf).normalize();
                tangent_to_world(&sample_ggx_lobe(xi, material.roughness()), &r)
            }
            Lobe::Transmission => {
                let entering = n.dot(v) < 0.0;
                let eta = if entering { 1.0 / material.ior } else { material.ior };
                refract(v, &nf, eta)
                    .map(|t| t.normalize())
                    .unwrap_or_else(|| reflect(v, &nf).normalize())
            }
            Lobe::Diffuse => tangent_to_world(&sample_cosine_hemisphere(xi), &nf),
        }
    }

    /// Throughput weight (BSDF times cosine over pdf) for a direction drawn
    /// by `sample`. Degenerate configurations return black.
    pub fn weight(&self, v: &Vector3f, n: &Vector3f, l: &Vector3f, material: &Material) -> RGBSpectrum {
        let nf = facing_normal(v, n);
        let view = -v;
        let m = material.roughness() * material.roughness();
        match self {
            Lobe::Specular => {
                let nl = l.dot(&nf);
                if nl <= 0.0 {
                    return RGBSpectrum::default();
                }
                let nv = view.dot(&nf).abs() + NV_BIAS;
                let h = (l + view).normalize();
                let f = fresnel_schlick(&material.specular, view.dot(&h));
                f * (smith_joint_visibility(nl, nv, m) * nl * (4.0 * nl * nv))
            }
            Lobe::Transmission => {
                let nl = l.dot(&nf).abs();
                if nl <= 0.0 {
                    return RGBSpectrum::default();
                }
                let nv = view.dot(&nf).abs() + NV_BIAS;
                let fr = fresnel_schlick(&material.specular, nv);
                let ft = RGBSpectrum::splat(1.0) - fr;
                ft * (smith_joint_visibility(nl, nv, m) * nl * (4.0 * nl * nv))
            }
            Lobe::Diffuse => {
                let nl = l.dot(&nf);
                if nl <= 0.0 {
                    return RGBSpectrum::default();
                }
                let nv = view.dot(&nf).max(NV_BIAS);
                let h = (l + view).normalize();
                let lh = saturate(l.dot(&h));
                material.albedo * disney_diffuse(nl, nv, lh, material.roughness())
            }
        }
    }
}

/// Classifies, samples and weights in one step.
pub fn sample(v: &Vector3f, n: &Vector3f, material: &Material, xi: &Vector2f) -> BsdfSample {
    let lobe = classify(material, xi);
    let direction = lobe.sample(v, n, material, &lobe.remap(material, xi));
    let weight = lobe.weight(v, n, &direction, material);
    BsdfSample { lobe, direction, weight }
}

/// Expected BSDF times cosine towards an explicit light direction `l`, with
/// the lobes mixed by their selection probabilities.
pub fn direct_response(v: &Vector3f, n: &Vector3f, l: &Vector3f, material: &Material) -> RGBSpectrum {
    let nf = facing_normal(v, n);
    let nl = l.dot(&nf);
    if nl <= 0.0 {
        return RGBSpectrum::default();
    }

    let view = -v;
    let p_spec = material.specular_probability();
    let roughness = material.roughness();
    let m = roughness * roughness;
    let h = (l + view).normalize();
    let nv = view.dot(&nf).abs() + NV_BIAS;
    let nh = saturate(nf.dot(&h));

    let f = fresnel_schlick(&material.specular, view.dot(&h));
    let specular = f * (ggx_d(nh, m) * smith_joint_visibility(nl, nv, m) * nl * p_spec);

    if material.ior > 1.0 {
        return specular;
    }

    let lh = saturate(l.dot(&h));
    let fd = disney_diffuse(nl, view.dot(&nf).max(NV_BIAS), lh, roughness);
    specular + material.albedo * (INV_PI * fd * nl * (1.0 - p_spec))
}
