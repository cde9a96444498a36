//! Microfacet distributions on a uniform height field.
//!
//! All directions are in the local shading frame (normal = +z). Masking uses
//! the Smith Λ function of each slope distribution; visible normals are
//! sampled with the stretched slope method of Heitz & d'Eon,
//! "Importance Sampling Microfacet-Based BSDFs using the Distribution of
//! Visible Normals" (2014).

use std::f32::consts::PI;

use glint_core::Distribution;
use glint_math::special::{erf, erf_inv};
use glint_math::{Vec2, Vec3};

use super::BsdfSample;
use crate::sampling::PDF_EPSILON;

/// |cos θ| above this counts as exactly normal incidence.
const NORMAL_INCIDENCE: f32 = 0.9999;

/// Angles below this use the normal incidence slope sampler.
const SMALL_THETA: f32 = 1e-4;

const MAX_SLOPE_SEARCH_STEPS: usize = 64;

const INV_SQRT_PI: f32 = 0.564_189_6;

/// Isotropic microfacet distribution with roughness `alpha`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Microfacet {
    pub distribution: Distribution,
    pub alpha: f32,
}

impl Microfacet {
    pub fn new(distribution: Distribution, alpha: f32) -> Self {
        Self {
            distribution,
            alpha,
        }
    }

    /// Normal distribution function D(m).
    pub fn d(&self, wm: Vec3) -> f32 {
        if wm.z <= 0.0 {
            return 0.0;
        }
        let cos2 = wm.z * wm.z;
        let a2 = self.alpha * self.alpha;

        match self.distribution {
            Distribution::Beckmann => {
                let tan2 = (1.0 - cos2) / cos2;
                (-tan2 / a2).exp() / (PI * a2 * cos2 * cos2)
            }
            Distribution::Ggx => {
                let denom = (a2 - 1.0) * cos2 + 1.0;
                a2 / (PI * denom * denom)
            }
        }
    }

    /// `a = 1 / (α·tan θ)` for a direction strictly between the poles.
    fn inv_slope(&self, w: Vec3) -> f32 {
        let sin_theta = (1.0 - w.z * w.z).max(0.0).sqrt();
        w.z / (self.alpha * sin_theta)
    }

    /// Smith Λ(w).
    pub fn lambda(&self, w: Vec3) -> f32 {
        if w.z > NORMAL_INCIDENCE {
            return 0.0;
        }
        if w.z < -NORMAL_INCIDENCE {
            return -1.0;
        }

        let a = self.inv_slope(w);
        match self.distribution {
            Distribution::Beckmann => {
                0.5 * (erf(a) - 1.0) + (-a * a).exp() / (2.0 * a) * INV_SQRT_PI
            }
            Distribution::Ggx => 0.5 * (-1.0 + a.signum() * (1.0 + 1.0 / (a * a)).sqrt()),
        }
    }

    /// Projected area of the microsurface toward `w`, `(1 + Λ(w))·cos θ`.
    ///
    /// Written in closed form so it stays finite at grazing angles.
    pub fn projected_area(&self, w: Vec3) -> f32 {
        if w.z > NORMAL_INCIDENCE {
            return 1.0;
        }
        if w.z < -NORMAL_INCIDENCE {
            return 0.0;
        }

        let sin_theta = (1.0 - w.z * w.z).max(0.0).sqrt();
        match self.distribution {
            Distribution::Beckmann => {
                let a = self.inv_slope(w);
                0.5 * (self.alpha * sin_theta * (-a * a).exp() * INV_SQRT_PI
                    + w.z * (1.0 + erf(a)))
            }
            Distribution::Ggx => {
                let s = self.alpha * sin_theta;
                0.5 * (w.z + (w.z * w.z + s * s).sqrt())
            }
        }
    }

    /// Height-free Smith masking `1 / (1 + Λ(w))`, zero below the surface.
    pub fn g1(&self, w: Vec3) -> f32 {
        if w.z <= 0.0 {
            return 0.0;
        }
        1.0 / (1.0 + self.lambda(w))
    }

    /// Distribution of normals visible from `wi`:
    /// `max(0, wi·m)·D(m) / A(wi)`.
    pub fn d_visible(&self, wi: Vec3, wm: Vec3) -> f32 {
        if wm.z <= 0.0 {
            return 0.0;
        }
        let area = self.projected_area(wi);
        if area <= 0.0 {
            return 0.0;
        }
        wi.dot(wm).max(0.0) * self.d(wm) / area
    }

    /// Sample a microfacet normal visible from `wi`.
    pub fn sample_visible(&self, wi: Vec3, u1: f32, u2: f32) -> Vec3 {
        // Stretch to unit roughness
        let wi_11 = Vec3::new(self.alpha * wi.x, self.alpha * wi.y, wi.z).normalize();
        let theta = wi_11.z.clamp(-1.0, 1.0).acos();

        let slope_11 = match self.distribution {
            Distribution::Beckmann => beckmann_slope_11(theta, u1, u2),
            Distribution::Ggx => ggx_slope_11(theta, u1, u2),
        };

        // Rotate and unstretch
        let phi = wi_11.y.atan2(wi_11.x);
        let (sin_phi, cos_phi) = phi.sin_cos();
        let slope = Vec2::new(
            cos_phi * slope_11.x - sin_phi * slope_11.y,
            sin_phi * slope_11.x + cos_phi * slope_11.y,
        ) * self.alpha;

        if !slope.x.is_finite() || !slope.y.is_finite() {
            return if wi.z > 0.0 {
                Vec3::Z
            } else {
                Vec3::new(wi.x, wi.y, 0.0).normalize_or_zero()
            };
        }

        Vec3::new(-slope.x, -slope.y, 1.0).normalize()
    }

    /// Sample an incoming direction by mirroring `wo` about a visible normal.
    ///
    /// Returns `None` when the reflected direction falls below the surface.
    pub fn sample_reflection(&self, wo: Vec3, u1: f32, u2: f32) -> Option<BsdfSample> {
        if wo.z <= 0.0 {
            return None;
        }
        let wm = self.sample_visible(wo, u1, u2);
        let wi = reflect(wo, wm);
        if wi.z <= 0.0 {
            return None;
        }

        let pdf = self.d(wm) / (4.0 * self.projected_area(wo));
        (pdf.is_finite() && pdf >= PDF_EPSILON).then_some(BsdfSample { direction: wi, pdf })
    }

    /// Solid angle pdf of [`sample_reflection`](Self::sample_reflection),
    /// ignoring the below-surface rejection.
    pub fn reflection_pdf(&self, wo: Vec3, wi: Vec3) -> f32 {
        let wh = (wi + wo).normalize_or_zero();
        if wo.z <= 0.0 || wh.z <= 0.0 || wo.dot(wh) <= 0.0 {
            return 0.0;
        }
        self.d(wh) / (4.0 * self.projected_area(wo))
    }
}

/// Beckmann visible slope sampling at unit roughness.
///
/// The x slope inverts the visible slope CDF by a Newton search in erf
/// space, falling back to bisection whenever a step leaves the bracket.
fn beckmann_slope_11(theta: f32, u1: f32, u2: f32) -> Vec2 {
    if theta < SMALL_THETA {
        let r = (-(1.0 - u1).max(f32::MIN_POSITIVE).ln()).sqrt();
        let phi = 2.0 * PI * u2;
        return Vec2::new(r * phi.cos(), r * phi.sin());
    }

    let (sin_theta, cos_theta) = theta.sin_cos();
    let slope_i = cos_theta / sin_theta;

    let area = 0.5 * ((-slope_i * slope_i).exp() * INV_SQRT_PI * sin_theta
        + cos_theta * (1.0 + erf(slope_i)));
    if !(area >= 1e-4) {
        return Vec2::ZERO;
    }
    let c = 1.0 / area;

    let mut erf_min = -0.9999f32;
    let mut erf_max = erf_min.max(erf(slope_i));
    let mut erf_current = 0.5 * (erf_min + erf_max);

    for _ in 0..MAX_SLOPE_SEARCH_STEPS {
        if erf_max - erf_min <= 1e-5 {
            break;
        }
        if !(erf_current >= erf_min && erf_current <= erf_max) {
            erf_current = 0.5 * (erf_min + erf_max);
        }

        let slope = erf_inv(erf_current);
        let cdf = if slope >= slope_i {
            1.0
        } else {
            c * (0.5 * INV_SQRT_PI * sin_theta * (-slope * slope).exp()
                + cos_theta * (0.5 + 0.5 * erf(slope)))
        };
        let diff = cdf - u1;
        if diff.abs() < 1e-5 {
            break;
        }

        if diff > 0.0 {
            if erf_max == erf_current {
                break;
            }
            erf_max = erf_current;
        } else {
            if erf_min == erf_current {
                break;
            }
            erf_min = erf_current;
        }

        let derivative = 0.5 * c * cos_theta - 0.5 * c * sin_theta * slope;
        erf_current -= diff / derivative;
    }

    Vec2::new(
        erf_inv(erf_current.clamp(erf_min, erf_max)),
        erf_inv(2.0 * u2 - 1.0),
    )
}

/// GGX visible slope sampling at unit roughness, in closed form.
fn ggx_slope_11(theta: f32, u1: f32, u2: f32) -> Vec2 {
    if theta < SMALL_THETA {
        let r = (u1 / (1.0 - u1)).sqrt();
        let phi = 2.0 * PI * u2;
        return Vec2::new(r * phi.cos(), r * phi.sin());
    }

    let (sin_theta, cos_theta) = theta.sin_cos();
    let tan_theta = sin_theta / cos_theta;

    let area = 0.5 * (cos_theta + 1.0);
    if !(area >= 1e-4) {
        return Vec2::ZERO;
    }
    let c = 1.0 / area;

    // x slope
    let a = 2.0 * u1 / cos_theta / c - 1.0;
    let b = tan_theta;
    let tmp = 1.0 / (a * a - 1.0);
    let d = (b * b * tmp * tmp - (a * a - b * b) * tmp).max(0.0).sqrt();
    let slope_x_1 = b * tmp - d;
    let slope_x_2 = b * tmp + d;
    let slope_x = if a < 0.0 || slope_x_2 > 1.0 / tan_theta {
        slope_x_1
    } else {
        slope_x_2
    };

    // y slope, from a rational fit of the inverse conditional CDF
    let (s, u) = if u2 > 0.5 {
        (1.0, 2.0 * (u2 - 0.5))
    } else {
        (-1.0, 2.0 * (0.5 - u2))
    };
    let z = (u * (u * (u * 0.27385 - 0.73369) + 0.46341))
        / (u * (u * (u * 0.093073 + 0.30942) - 1.0) + 0.597999);
    let slope_y = s * z * (1.0 + slope_x * slope_x).sqrt();

    Vec2::new(slope_x, slope_y)
}

/// Schlick weight `(1 − cos θ)^5`.
#[inline]
pub fn schlick_weight(cos_theta: f32) -> f32 {
    let x = (1.0 - cos_theta).clamp(0.0, 1.0);
    let x2 = x * x;
    x2 * x2 * x
}

/// Schlick Fresnel approximation.
#[inline]
pub fn schlick_fresnel(f0: Vec3, cos_theta: f32) -> Vec3 {
    f0 + (Vec3::ONE - f0) * schlick_weight(cos_theta)
}

/// Mirror `w` about `m`.
#[inline]
pub fn reflect(w: Vec3, m: Vec3) -> Vec3 {
    -w + 2.0 * w.dot(m) * m
}
