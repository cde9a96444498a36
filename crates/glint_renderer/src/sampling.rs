//! Random sampling helpers shared by the BSDFs and light sampling.

use std::f32::consts::PI;

use glint_math::Vec3;
use rand::{Rng, RngCore};

/// Pdfs below this are treated as unusable samples.
pub const PDF_EPSILON: f32 = 1e-6;

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Cosine-weighted direction in the local +z hemisphere.
///
/// The matching pdf is `z / π`.
pub fn cosine_hemisphere(u1: f32, u2: f32) -> Vec3 {
    let r = u1.sqrt();
    let phi = 2.0 * PI * u2;
    Vec3::new(r * phi.cos(), r * phi.sin(), (1.0 - u1).max(0.0).sqrt())
}

/// Direction uniformly distributed over the cone around local +z whose
/// half-angle θmax has `1 - cos θmax = one_minus_cos_max`.
///
/// Cones are parametrized by `1 - cos θmax` so that narrow cones keep
/// their precision in `f32`.
pub fn uniform_cone(one_minus_cos_max: f32, u1: f32, u2: f32) -> Vec3 {
    // cos θ uniform in [cos θmax, 1], kept as 1 - cos θ
    let one_minus_cos = (1.0 - u1) * one_minus_cos_max;
    let cos_theta = 1.0 - one_minus_cos;
    let sin_theta = (one_minus_cos * (2.0 - one_minus_cos)).max(0.0).sqrt();
    let phi = 2.0 * PI * u2;
    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

/// Solid angle pdf of [`uniform_cone`].
#[inline]
pub fn uniform_cone_pdf(one_minus_cos_max: f32) -> f32 {
    1.0 / (2.0 * PI * one_minus_cos_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_cosine_hemisphere_is_unit_and_upper() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = cosine_hemisphere(gen_f32(&mut rng), gen_f32(&mut rng));
            assert!((v.length() - 1.0).abs() < 1e-4);
            assert!(v.z >= 0.0);
        }
    }

    #[test]
    fn test_cosine_hemisphere_mean_cos() {
        // E[cos θ] under a cosine-weighted pdf is 2/3
        let mut rng = StdRng::seed_from_u64(11);
        let n = 20_000;
        let sum: f32 = (0..n)
            .map(|_| cosine_hemisphere(gen_f32(&mut rng), gen_f32(&mut rng)).z)
            .sum();
        assert!((sum / n as f32 - 2.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn test_uniform_cone_stays_inside() {
        let mut rng = StdRng::seed_from_u64(3);
        let cos_max = 0.9;
        for _ in 0..1000 {
            let v = uniform_cone(1.0 - cos_max, gen_f32(&mut rng), gen_f32(&mut rng));
            assert!((v.length() - 1.0).abs() < 1e-4);
            assert!(v.z >= cos_max - 1e-6);
        }
    }

    #[test]
    fn test_uniform_cone_pdf_integrates_to_one() {
        // Solid angle of the cap is 2π(1 - cos θmax)
        let cos_max = 0.5f32;
        let solid_angle = 2.0 * PI * (1.0 - cos_max);
        assert!((uniform_cone_pdf(1.0 - cos_max) * solid_angle - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_narrow_cone_keeps_direction() {
        let v = uniform_cone(1e-9, 0.0, 0.25);
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert!(v.z > 0.0 && v.y > 0.0);
    }
}
