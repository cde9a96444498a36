//! Single-scattering Cook-Torrance microfacet reflection.

use glint_core::ShadowMasking;
use glint_math::Vec3;
use rand::RngCore;

use super::microfacet::{schlick_fresnel, Microfacet};
use super::BsdfSample;
use crate::sampling::gen_f32;
use crate::Color;

/// Cosines below this are treated as grazing and reflect nothing.
const GRAZING_EPSILON: f32 = 1e-4;

/// Single-scattering microfacet reflection, `D·G·F / (4·cos θi·cos θo)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CookTorrance {
    microfacet: Microfacet,
    shadow_masking: ShadowMasking,
    f0: Color,
}

impl CookTorrance {
    pub fn new(microfacet: Microfacet, shadow_masking: ShadowMasking, f0: Color) -> Self {
        Self {
            microfacet,
            shadow_masking,
            f0,
        }
    }

    pub fn f(&self, wi: Vec3, wo: Vec3) -> Color {
        if wi.z <= GRAZING_EPSILON || wo.z <= GRAZING_EPSILON {
            return Color::ZERO;
        }
        let wh = (wi + wo).normalize_or_zero();
        if wh.z <= 0.0 {
            return Color::ZERO;
        }

        let d = self.microfacet.d(wh);
        let g = self.masking(wi, wo, wh);
        let f = schlick_fresnel(self.f0, wo.dot(wh));

        f * (d * g / (4.0 * wi.z * wo.z))
    }

    /// Masking-shadowing G(i, o, h).
    pub fn masking(&self, wi: Vec3, wo: Vec3, wh: Vec3) -> f32 {
        match self.shadow_masking {
            ShadowMasking::Beckmann => {
                beckmann_g1(wi, self.microfacet.alpha) * beckmann_g1(wo, self.microfacet.alpha)
            }
            ShadowMasking::CookTorrance => {
                let o_dot_h = wo.dot(wh);
                if o_dot_h <= GRAZING_EPSILON {
                    return 0.0;
                }
                // NOTE: o·h equals i·h for a reflection half vector; the
                // shadowing term keeps the published o·h denominator.
                let masking = 2.0 * wh.z * wo.z / o_dot_h;
                let shadowing = 2.0 * wh.z * wi.z / o_dot_h;
                1.0f32.min(masking).min(shadowing)
            }
        }
    }

    pub fn sample(&self, wo: Vec3, rng: &mut dyn RngCore) -> Option<BsdfSample> {
        self.microfacet
            .sample_reflection(wo, gen_f32(rng), gen_f32(rng))
    }
}

/// Rational approximation of the Beckmann Smith G1, clamped to 1 where the
/// fit overshoots just below `a = 1.6`.
fn beckmann_g1(w: Vec3, alpha: f32) -> f32 {
    if w.z <= 0.0 {
        return 0.0;
    }
    let sin_theta = (1.0 - w.z * w.z).max(0.0).sqrt();
    if sin_theta == 0.0 {
        return 1.0;
    }

    let a = w.z / (alpha * sin_theta);
    if a >= 1.6 {
        return 1.0;
    }
    ((3.535 * a + 2.181 * a * a) / (1.0 + 2.276 * a + 2.577 * a * a)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::Distribution;
    use std::f32::consts::PI;

    fn spherical(theta: f32, phi: f32) -> Vec3 {
        Vec3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos())
    }

    fn white(distribution: Distribution, masking: ShadowMasking) -> CookTorrance {
        CookTorrance::new(Microfacet::new(distribution, 0.5), masking, Color::ONE)
    }

    /// Directional albedo ∫ f cos θi dωi by midpoint quadrature.
    fn albedo(bsdf: &CookTorrance, wo: Vec3) -> f32 {
        let n = 200;
        let d_theta = 0.5 * PI / n as f32;
        let d_phi = 2.0 * PI / n as f32;
        let mut sum = 0.0f32;
        for i in 0..n {
            let theta = (i as f32 + 0.5) * d_theta;
            for j in 0..n {
                let phi = (j as f32 + 0.5) * d_phi;
                let wi = spherical(theta, phi);
                sum += bsdf.f(wi, wo).x * wi.z * theta.sin() * d_theta * d_phi;
            }
        }
        sum
    }

    #[test]
    fn test_single_scatter_loses_energy() {
        for distribution in [Distribution::Beckmann, Distribution::Ggx] {
            for masking in [ShadowMasking::Beckmann, ShadowMasking::CookTorrance] {
                let a = albedo(&white(distribution, masking), spherical(0.4, 0.0));
                assert!(a > 0.7 && a <= 1.05, "{:?}/{:?}: {}", distribution, masking, a);
            }
        }
    }

    #[test]
    fn test_grazing_is_zero() {
        let ct = white(Distribution::Ggx, ShadowMasking::Beckmann);
        let grazing = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(ct.f(grazing, Vec3::Z), Color::ZERO);
        assert_eq!(ct.f(Vec3::Z, grazing), Color::ZERO);
        assert_eq!(ct.f(-Vec3::Z, Vec3::Z), Color::ZERO);
    }

    #[test]
    fn test_fresnel_tints_specular() {
        let f0 = Color::new(0.9, 0.5, 0.1);
        let ct = CookTorrance::new(
            Microfacet::new(Distribution::Beckmann, 0.3),
            ShadowMasking::Beckmann,
            f0,
        );
        // At normal incidence h = o, so F is exactly F0
        let f = ct.f(Vec3::Z, Vec3::Z);
        let ratio = f / f.x;
        assert!((ratio - f0 / f0.x).length() < 1e-5);
    }

    #[test]
    fn test_beckmann_g1_range() {
        for i in 0..=150 {
            let theta = i as f32 * 0.01;
            let g = beckmann_g1(spherical(theta, 0.0), 0.5);
            assert!((0.0..=1.0).contains(&g), "θ={} g={}", theta, g);
        }

        // The fit overshoots near a = 1.6, around θ = 0.9 at α = 0.5
        let ct = white(Distribution::Beckmann, ShadowMasking::Beckmann);
        let w = spherical(0.9, 0.0);
        let g = ct.masking(w, w, Vec3::Z);
        assert!(g <= 1.0, "G = {}", g);
        assert_eq!(beckmann_g1(Vec3::Z, 0.5), 1.0);
        assert_eq!(beckmann_g1(-Vec3::Z, 0.5), 0.0);
    }

    #[test]
    fn test_v_cavity_bounded() {
        let ct = white(Distribution::Beckmann, ShadowMasking::CookTorrance);
        let wi = spherical(1.2, 0.0);
        let wo = spherical(1.3, PI);
        let wh = (wi + wo).normalize();
        let g = ct.masking(wi, wo, wh);
        assert!((0.0..=1.0).contains(&g));
        assert_eq!(ct.masking(Vec3::Z, Vec3::Z, Vec3::Z), 1.0);
    }
}
