//! Path tracing light transport.
//!
//! Direct light from the spheres in the scene is estimated once at the first
//! surface hit; indirect light follows BSDF samples and is terminated by
//! Russian roulette, so paths have no fixed depth limit.

use glint_math::{Interval, Ray};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};
use crate::renderer::RenderConfig;
use crate::sampling::{gen_f32, PDF_EPSILON};
use crate::world::World;
use crate::Color;

/// Estimates the radiance arriving along camera rays.
pub struct Integrator<'a> {
    world: &'a World,
    config: &'a RenderConfig,
}

impl<'a> Integrator<'a> {
    pub fn new(world: &'a World, config: &'a RenderConfig) -> Self {
        Self { world, config }
    }

    pub fn world(&self) -> &World {
        self.world
    }

    /// Radiance arriving at `ray.origin` from along `ray.direction`.
    ///
    /// `depth` counts bounces so far; camera rays start at zero.
    pub fn trace(&self, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
        let mut surface = HitRecord::default();
        let hit_surface =
            self.world
                .surfaces()
                .hit(ray, Interval::from_min(self.config.min_time), &mut surface);

        let mut light = HitRecord::default();
        let hit_light = self.world.lights().hit(
            ray,
            Interval::from_min(self.config.light_min_time),
            &mut light,
        );

        if hit_light && light.t < surface.t {
            return self.world.emission(light.material);
        }
        if !hit_surface {
            return Color::ZERO;
        }

        let Some(bsdf) = self.world.bsdf(surface.material) else {
            return Color::ZERO;
        };
        let normal = surface.shading_normal();
        let mut radiance = Color::ZERO;

        if depth == 0 && self.config.direct_lighting {
            radiance += self.direct_light(&surface, rng);
        }

        // Russian roulette
        let p_rr = self.config.roulette_cutoff;
        if gen_f32(rng) <= p_rr {
            return radiance;
        }

        let outgoing = -ray.direction().normalize_or_zero();
        let Some(sample) = bsdf.sample(normal, outgoing, rng) else {
            return radiance;
        };
        if !(sample.pdf > PDF_EPSILON) {
            return radiance;
        }

        let cos_theta = sample.direction.dot(normal).max(0.0);
        let f = bsdf.eval(normal, sample.direction, outgoing, rng);
        let incoming = self.trace(&Ray::new(surface.p, sample.direction), depth + 1, rng);

        radiance += f * incoming * cos_theta / (sample.pdf * (1.0 - p_rr));
        radiance
    }

    /// One cone sample toward every light, summed without occluded ones.
    fn direct_light(&self, surface: &HitRecord, rng: &mut dyn RngCore) -> Color {
        let mut radiance = Color::ZERO;

        for (light, emission) in self.world.lights_with_emission() {
            let Some(sample) = light.sample_direction(surface.p, rng) else {
                continue;
            };

            let shadow_ray = Ray::new(surface.p, sample.direction);
            let Some(bound) =
                light.hit_time(&shadow_ray, Interval::from_min(self.config.light_min_time))
            else {
                continue;
            };

            let blockers = Interval::new(self.config.min_time, bound);
            if !self.world.surfaces().occluded(&shadow_ray, blockers) {
                radiance += emission / sample.pdf;
            }
        }

        radiance
    }
}
