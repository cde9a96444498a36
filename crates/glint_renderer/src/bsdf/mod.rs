//! Reflection models.
//!
//! A [`Bsdf`] is resolved once per scene material. Every operation works in
//! a local shading frame built from the surface normal; directions point
//! away from the surface.

mod cook_torrance;
mod lambert;
mod microfacet;
mod smith;

use glint_core::{Material, ReflectionModel, SurfaceKind};
use glint_math::{Frame, Vec3};
use log::warn;
use rand::RngCore;

use crate::Color;

pub use cook_torrance::CookTorrance;
pub use lambert::Lambert;
pub use microfacet::{schlick_fresnel, Microfacet};
pub use smith::{SmithMultiScatter, MAX_SCATTERING_ORDER};

/// Roughness is clamped to at least this before building a microfacet model.
pub const MIN_ROUGHNESS: f32 = 1e-3;

/// A sampled incoming direction and its solid angle pdf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BsdfSample {
    pub direction: Vec3,
    pub pdf: f32,
}

/// Evaluable reflection model of one material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bsdf {
    Lambert(Lambert),
    CookTorrance(CookTorrance),
    Smith(SmithMultiScatter),
}

impl Bsdf {
    pub fn from_material(material: &Material) -> Self {
        let alpha = material.roughness.clamp(MIN_ROUGHNESS, 1.0);
        let microfacet = Microfacet::new(material.distribution, alpha);

        match material.model {
            ReflectionModel::Lambert => Bsdf::Lambert(Lambert::new(material.diffuse)),
            ReflectionModel::CookTorrance => Bsdf::CookTorrance(CookTorrance::new(
                microfacet,
                material.shadow_masking,
                material.f0,
            )),
            ReflectionModel::Smith => {
                if material.surface == SurfaceKind::Dielectric {
                    warn!("Dielectric transmission is not supported; refracted energy is dropped");
                }
                Bsdf::Smith(SmithMultiScatter::new(
                    microfacet,
                    material.surface,
                    material.f0,
                ))
            }
        }
    }

    /// BRDF value for light arriving from `incoming` and leaving along
    /// `outgoing`. The Smith model is stochastic and draws from `rng`.
    pub fn eval(
        &self,
        normal: Vec3,
        incoming: Vec3,
        outgoing: Vec3,
        rng: &mut dyn RngCore,
    ) -> Color {
        let Some(frame) = Frame::from_normal(normal) else {
            return Color::ZERO;
        };
        let wi = frame.to_local(incoming).normalize_or_zero();
        let wo = frame.to_local(outgoing).normalize_or_zero();

        match self {
            Bsdf::Lambert(lambert) => lambert.f(),
            Bsdf::CookTorrance(ct) => ct.f(wi, wo),
            Bsdf::Smith(smith) => smith.f(wi, wo, rng),
        }
    }

    /// Sample an incoming direction for light leaving along `outgoing`.
    pub fn sample(
        &self,
        normal: Vec3,
        outgoing: Vec3,
        rng: &mut dyn RngCore,
    ) -> Option<BsdfSample> {
        let frame = Frame::from_normal(normal)?;
        let wo = frame.to_local(outgoing).normalize_or_zero();

        let local = match self {
            Bsdf::Lambert(lambert) => lambert.sample(rng),
            Bsdf::CookTorrance(ct) => ct.sample(wo, rng),
            Bsdf::Smith(smith) => smith.sample(wo, rng),
        }?;

        Some(BsdfSample {
            direction: frame.from_local(local.direction),
            pdf: local.pdf,
        })
    }
}
