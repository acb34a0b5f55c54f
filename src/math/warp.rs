// Copyright @yucwang 2023

use super::constants::{ Float, Vector2f, Vector3f, INV_PI, PI };

/// Cosine weighted direction around +z, `u.x` drives the azimuth.
pub fn sample_cosine_hemisphere(u: &Vector2f) -> Vector3f {
    let phi = 2.0 * PI * u.x;
    let cos_theta = u.y.max(0.0).sqrt();
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let (sin_phi, cos_phi) = phi.sin_cos();

    Vector3f::new(cos_phi * sin_theta, sin_phi * sin_theta, cos_theta)
}

pub fn sample_cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta.max(0.0) * INV_PI
}

/// GGX lobe around +z. The second coordinate is warped by the GGX
/// distribution before the cosine mapping, so roughness 0 collapses onto +z.
pub fn sample_ggx_lobe(u: &Vector2f, roughness: Float) -> Vector3f {
    let m = roughness * roughness;
    let m2 = m * m;
    let warped = (1.0 - u.y) / (1.0 + (m2 - 1.0) * u.y);

    sample_cosine_hemisphere(&Vector2f::new(u.x, warped))
}

pub fn sample_uniform_sphere(u: &Vector2f) -> Vector3f {
    let phi = 2.0 * PI * u.x;
    let cos_theta = 1.0 - 2.0 * u.y;
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let (sin_phi, cos_phi) = phi.sin_cos();

    Vector3f::new(cos_phi * sin_theta, sin_phi * sin_theta, cos_theta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_hemisphere_is_upper_unit() {
        for i in 0..16 {
            for j in 0..16 {
                let u = Vector2f::new(i as Float / 16.0, j as Float / 16.0);
                let w = sample_cosine_hemisphere(&u);
                assert!((w.norm() - 1.0).abs() < 1e-5);
                assert!(w.z >= 0.0);
            }
        }
    }

    #[test]
    fn test_ggx_lobe_collapses_for_smooth_surfaces() {
        let w = sample_ggx_lobe(&Vector2f::new(0.3, 0.7), 1e-3);
        assert!((w.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_uniform_sphere_poles() {
        let top = sample_uniform_sphere(&Vector2f::new(0.0, 0.0));
        let bottom = sample_uniform_sphere(&Vector2f::new(0.0, 1.0));
        assert!((top.z - 1.0).abs() < 1e-6);
        assert!((bottom.z + 1.0).abs() < 1e-6);
        assert!((sample_cosine_hemisphere_pdf(1.0) - INV_PI).abs() < 1e-7);
    }
}
