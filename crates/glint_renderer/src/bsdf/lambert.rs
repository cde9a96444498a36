//! Lambertian diffuse reflection.

use std::f32::consts::FRAC_1_PI;

use rand::RngCore;

use super::BsdfSample;
use crate::sampling::{cosine_hemisphere, gen_f32, PDF_EPSILON};
use crate::Color;

/// Ideal diffuse reflection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lambert {
    diffuse: Color,
}

impl Lambert {
    pub fn new(diffuse: Color) -> Self {
        Self { diffuse }
    }

    /// `diffuse / π`, independent of direction.
    pub fn f(&self) -> Color {
        self.diffuse * FRAC_1_PI
    }

    /// Cosine-weighted sample in the local frame.
    pub fn sample(&self, rng: &mut dyn RngCore) -> Option<BsdfSample> {
        let direction = cosine_hemisphere(gen_f32(rng), gen_f32(rng));
        let pdf = direction.z * FRAC_1_PI;
        (pdf >= PDF_EPSILON).then_some(BsdfSample { direction, pdf })
    }
}
