//! Multiple-scattering microfacet reflection.
//!
//! Evaluation runs one stochastic random walk on a uniform height field
//! (Heitz et al., "Multiple-Scattering Microfacet BSDFs with the Smith
//! Model", 2016). The walk enters along the incoming direction, bounces
//! between microfacets, and at every bounce adds the chance of leaving
//! toward the outgoing direction. Each call is an unbiased estimate of
//! `f · cos θo`.

use glint_core::SurfaceKind;
use glint_math::Vec3;
use log::trace;
use rand::RngCore;

use super::microfacet::{reflect, schlick_fresnel, Microfacet};
use super::BsdfSample;
use crate::sampling::gen_f32;
use crate::Color;

/// Hard bound on the number of bounces in one walk.
pub const MAX_SCATTERING_ORDER: usize = 64;

/// |cos θ| above this counts as exactly vertical.
const VERTICAL: f32 = 0.9999;

/// |cos θ| below this counts as exactly horizontal.
const HORIZONTAL: f32 = 1e-4;

const GRAZING_EPSILON: f32 = 1e-4;

/// Height CDF of the uniform height field on [-1, 1].
#[inline]
fn c1(h: f32) -> f32 {
    (0.5 * (h + 1.0)).clamp(0.0, 1.0)
}

#[inline]
fn inv_c1(u: f32) -> f32 {
    (2.0 * u - 1.0).clamp(-1.0, 1.0)
}

/// Smith microfacet reflection including every scattering order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmithMultiScatter {
    microfacet: Microfacet,
    surface: SurfaceKind,
    f0: Color,
    max_order: usize,
}

impl SmithMultiScatter {
    pub fn new(microfacet: Microfacet, surface: SurfaceKind, f0: Color) -> Self {
        Self {
            microfacet,
            surface,
            f0,
            max_order: MAX_SCATTERING_ORDER,
        }
    }

    /// Replace the bound on bounces per walk.
    pub fn with_max_order(mut self, max_order: usize) -> Self {
        self.max_order = max_order;
        self
    }

    /// Height-dependent masking: probability that a ray leaving height `h`
    /// along `w` escapes the microsurface.
    fn g1(&self, w: Vec3, h: f32) -> f32 {
        if w.z > VERTICAL {
            return 1.0;
        }
        if w.z <= 0.0 {
            return 0.0;
        }
        c1(h).powf(self.microfacet.lambda(w))
    }

    /// Height of the next intersection along `w` from height `h`, or
    /// infinity when the ray escapes.
    fn sample_height(&self, w: Vec3, h: f32, u: f32) -> f32 {
        if w.z > VERTICAL {
            return f32::INFINITY;
        }
        if w.z < -VERTICAL {
            return inv_c1(u * c1(h));
        }
        if w.z.abs() < HORIZONTAL {
            return h;
        }

        if u > 1.0 - self.g1(w, h) {
            return f32::INFINITY;
        }
        inv_c1(c1(h) / (1.0 - u).powf(1.0 / self.microfacet.lambda(w)))
    }

    /// Density of scattering from `wi` into `wo` at a single microfacet
    /// bounce, before Fresnel.
    fn phase(&self, wi: Vec3, wo: Vec3) -> f32 {
        let wh = (wi + wo).normalize_or_zero();
        if wh.z <= 0.0 {
            return 0.0;
        }
        let cos = wi.dot(wh);
        if cos <= 0.0 {
            return 0.0;
        }
        0.25 * self.microfacet.d_visible(wi, wh) / cos
    }

    /// One random walk estimate of `f(wi, wo) · cos θo`. Walks still on the
    /// surface after `max_order` bounces contribute nothing.
    pub fn estimate(&self, wi: Vec3, wo: Vec3, rng: &mut dyn RngCore) -> Color {
        let mut w = -wi;
        let mut h = 1.0f32;
        let mut energy = Color::ONE;
        let mut sum = Color::ZERO;

        for order in 0..self.max_order {
            h = self.sample_height(w, h, gen_f32(rng));
            if h == f32::INFINITY {
                return sum;
            }
            if h.is_nan() {
                return Color::ZERO;
            }

            // Next event toward the outgoing direction
            let back = -w;
            let wh = (back + wo).normalize_or_zero();
            let fresnel = schlick_fresnel(self.f0, back.dot(wh));
            let contribution = energy * fresnel * (self.phase(back, wo) * self.g1(wo, h));
            if contribution.is_finite() {
                sum += contribution;
            }

            // Bounce off a visible microfacet
            let wm = self.microfacet.sample_visible(back, gen_f32(rng), gen_f32(rng));
            let fresnel = schlick_fresnel(self.f0, back.dot(wm));
            match self.surface {
                SurfaceKind::Conductor => energy *= fresnel,
                SurfaceKind::Dielectric => {
                    let reflectance = fresnel.element_sum() / 3.0;
                    if gen_f32(rng) >= reflectance {
                        // Transmission is not traced
                        return sum;
                    }
                    energy *= fresnel / reflectance;
                }
            }

            w = reflect(back, wm);
            if !w.is_finite() {
                trace!("Random walk produced a non-finite direction at order {}", order);
                return Color::ZERO;
            }
        }

        trace!("Random walk hit the scattering cap");
        Color::ZERO
    }

    /// Stochastic BRDF value.
    pub fn f(&self, wi: Vec3, wo: Vec3, rng: &mut dyn RngCore) -> Color {
        if wi.z <= GRAZING_EPSILON || wo.z <= GRAZING_EPSILON {
            return Color::ZERO;
        }
        let value = self.estimate(wi, wo, rng) / wo.z;
        if value.is_finite() {
            value
        } else {
            Color::ZERO
        }
    }

    pub fn sample(&self, wo: Vec3, rng: &mut dyn RngCore) -> Option<BsdfSample> {
        self.microfacet
            .sample_reflection(wo, gen_f32(rng), gen_f32(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsdf::cook_torrance::CookTorrance;
    use glint_core::{Distribution, ShadowMasking};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f32::consts::PI;

    fn spherical(theta: f32, phi: f32) -> Vec3 {
        Vec3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos())
    }

    /// Directional albedo by uniform hemisphere sampling of `wo`.
    fn albedo(bsdf: &SmithMultiScatter, wi: Vec3, n: usize, rng: &mut StdRng) -> f32 {
        let mut sum = 0.0f32;
        for _ in 0..n {
            let z = gen_f32(rng);
            let phi = 2.0 * PI * gen_f32(rng);
            let r = (1.0 - z * z).sqrt();
            let wo = Vec3::new(r * phi.cos(), r * phi.sin(), z);
            sum += bsdf.estimate(wi, wo, rng).x * 2.0 * PI;
        }
        sum / n as f32
    }

    #[test]
    fn test_white_furnace_conserves_energy() {
        let mut rng = StdRng::seed_from_u64(17);
        for distribution in [Distribution::Beckmann, Distribution::Ggx] {
            let smith = SmithMultiScatter::new(
                Microfacet::new(distribution, 0.8),
                SurfaceKind::Conductor,
                Color::ONE,
            );
            let a = albedo(&smith, spherical(0.5, 0.0), 40_000, &mut rng);
            assert!((a - 1.0).abs() < 0.06, "{:?}: albedo {}", distribution, a);
        }
    }

    #[test]
    fn test_multiple_scattering_adds_energy() {
        let mut rng = StdRng::seed_from_u64(23);
        let microfacet = Microfacet::new(Distribution::Beckmann, 0.9);
        let smith = SmithMultiScatter::new(microfacet, SurfaceKind::Conductor, Color::ONE);
        let single = CookTorrance::new(microfacet, ShadowMasking::Beckmann, Color::ONE);

        let wi = spherical(1.0, 0.0);
        let n = 40_000;
        let mut single_sum = 0.0f32;
        for _ in 0..n {
            let z = gen_f32(&mut rng);
            let phi = 2.0 * PI * gen_f32(&mut rng);
            let r = (1.0 - z * z).sqrt();
            let wo = Vec3::new(r * phi.cos(), r * phi.sin(), z);
            single_sum += single.f(wi, wo).x * z * 2.0 * PI;
        }
        let single_albedo = single_sum / n as f32;
        let multi_albedo = albedo(&smith, wi, n, &mut rng);

        assert!(
            multi_albedo > single_albedo,
            "multi {} <= single {}",
            multi_albedo,
            single_albedo
        );
    }

    #[test]
    fn test_smooth_surface_terminates() {
        // Near-mirror roughness must not stall the walk
        let mut rng = StdRng::seed_from_u64(3);
        for distribution in [Distribution::Beckmann, Distribution::Ggx] {
            let smith = SmithMultiScatter::new(
                Microfacet::new(distribution, 1e-3),
                SurfaceKind::Conductor,
                Color::splat(0.9),
            );
            for _ in 0..100 {
                let v = smith.f(spherical(0.3, 0.0), spherical(0.3, PI), &mut rng);
                assert!(v.is_finite() && v.min_element() >= 0.0);
            }
        }
    }

    #[test]
    fn test_walk_reaching_cap_contributes_nothing() {
        let mut rng = StdRng::seed_from_u64(41);
        let smith = SmithMultiScatter::new(
            Microfacet::new(Distribution::Beckmann, 0.8),
            SurfaceKind::Conductor,
            Color::ONE,
        );
        let wi = spherical(0.5, 0.0);
        let wo = spherical(0.5, PI);

        // Every walk lands on the surface first, so one bounce never escapes
        let capped = smith.with_max_order(1);
        for _ in 0..1_000 {
            assert_eq!(capped.estimate(wi, wo, &mut rng), Color::ZERO);
        }
        assert_eq!(smith.with_max_order(0).estimate(wi, wo, &mut rng), Color::ZERO);

        let mut sum = Color::ZERO;
        for _ in 0..1_000 {
            sum += smith.estimate(wi, wo, &mut rng);
        }
        assert!(sum.x > 0.0);
    }

    #[test]
    fn test_dielectric_drops_transmitted_energy() {
        let mut rng = StdRng::seed_from_u64(29);
        let microfacet = Microfacet::new(Distribution::Beckmann, 0.5);
        let glass = SmithMultiScatter::new(microfacet, SurfaceKind::Dielectric, Color::splat(0.04));
        let metal = SmithMultiScatter::new(microfacet, SurfaceKind::Conductor, Color::ONE);

        let wi = spherical(0.4, 0.0);
        let glass_albedo = albedo(&glass, wi, 20_000, &mut rng);
        let metal_albedo = albedo(&metal, wi, 20_000, &mut rng);
        assert!(glass_albedo >= 0.0);
        assert!(glass_albedo < 0.5 * metal_albedo);
    }

    #[test]
    fn test_below_surface_is_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let smith = SmithMultiScatter::new(
            Microfacet::new(Distribution::Ggx, 0.5),
            SurfaceKind::Conductor,
            Color::ONE,
        );
        assert_eq!(smith.f(-Vec3::Z, Vec3::Z, &mut rng), Color::ZERO);
        assert_eq!(smith.f(Vec3::Z, -Vec3::Z, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_height_sampling() {
        let smith = SmithMultiScatter::new(
            Microfacet::new(Distribution::Beckmann, 0.5),
            SurfaceKind::Conductor,
            Color::ONE,
        );
        // Straight up always escapes, straight down always lands below
        assert_eq!(smith.sample_height(Vec3::Z, 0.0, 0.5), f32::INFINITY);
        let h = smith.sample_height(-Vec3::Z, 1.0, 0.5);
        assert!((-1.0..=1.0).contains(&h));
        // Horizontal rays stay at their height
        assert_eq!(smith.sample_height(Vec3::X, 0.25, 0.5), 0.25);
    }
}
