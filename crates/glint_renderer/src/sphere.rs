//! Sphere primitive for ray tracing.

use glint_core::MaterialId;
use glint_math::{Frame, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable, LightSample};
use crate::sampling::{gen_f32, uniform_cone, uniform_cone_pdf, PDF_EPSILON};

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: MaterialId,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: MaterialId) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Hittable for Sphere {
    // Only the smaller root is considered: a ray starting inside the
    // sphere does not hit it.
    fn hit_time(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let half_b = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }

        // Tangential hit when the discriminant is exactly zero
        let mut t = -half_b / a;
        if discriminant > 0.0 {
            t -= discriminant.sqrt() / a;
        }

        ray_t.surrounds(t).then_some(t)
    }

    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let Some(t) = self.hit_time(ray, ray_t) else {
            return false;
        };

        rec.t = t;
        rec.p = ray.at(t);
        let outward_normal = (rec.p - self.center).normalize();
        rec.set_face_normal(ray, outward_normal);
        rec.material = self.material;

        true
    }

    /// Uniformly samples the cone of directions subtended by the sphere.
    fn sample_direction(&self, from: Vec3, rng: &mut dyn RngCore) -> Option<LightSample> {
        let to_center = self.center - from;
        let dist2 = to_center.length_squared();
        let r2 = self.radius * self.radius;
        if dist2 <= r2 {
            return None;
        }

        // 1 - cos θmax, rewritten to avoid cancellation for distant lights
        let sin2_theta_max = r2 / dist2;
        let cos_theta_max = (1.0 - sin2_theta_max).sqrt();
        let one_minus_cos_max = sin2_theta_max / (1.0 + cos_theta_max);
        let pdf = uniform_cone_pdf(one_minus_cos_max);
        if !pdf.is_finite() || pdf < PDF_EPSILON {
            return None;
        }

        let frame = Frame::from_normal(to_center / dist2.sqrt())?;
        let local = uniform_cone(one_minus_cos_max, gen_f32(rng), gen_f32(rng));

        Some(LightSample {
            direction: frame.from_local(local),
            pdf,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_sphere() -> Sphere {
        Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, MaterialId(0))
    }

    #[test]
    fn test_sphere_hit_reports_smaller_root() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, Interval::from_min(0.01), &mut rec));
        assert!((rec.t - 4.0).abs() < 1e-5);
        assert!((rec.p - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-5);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
        assert!(rec.front_face);
    }

    #[test]
    fn test_sphere_far_root_never_reported() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        // The near root (4) is excluded; the far root (6) is not considered
        assert_eq!(sphere.hit_time(&ray, Interval::new(4.5, 100.0)), None);
        assert_eq!(sphere.hit_time(&ray, Interval::new(0.01, 4.0)), None);
    }

    #[test]
    fn test_sphere_from_inside_misses() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, MaterialId(0));
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(sphere.hit_time(&ray, Interval::from_min(0.01)), None);
    }

    #[test]
    fn test_sphere_miss_for_any_bounds() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        for (min, max) in [(0.0, f32::INFINITY), (-100.0, 100.0), (0.01, 1.0)] {
            assert_eq!(sphere.hit_time(&ray, Interval::new(min, max)), None);
        }
    }

    #[test]
    fn test_sphere_unnormalized_direction() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0));
        let t = sphere.hit_time(&ray, Interval::from_min(0.01)).unwrap();
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_tangent_hit() {
        let sphere = Sphere::new(Vec3::new(1.0, 0.0, -5.0), 1.0, MaterialId(0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let t = sphere.hit_time(&ray, Interval::from_min(0.01)).unwrap();
        assert!((t - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_cone_samples_hit_the_sphere() {
        let sphere = unit_sphere();
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..200 {
            let sample = sphere.sample_direction(Vec3::ZERO, &mut rng).unwrap();
            let cos_max = (24.0f32).sqrt() / 5.0;
            assert!((sample.pdf - uniform_cone_pdf(1.0 - cos_max)).abs() < 1e-3);

            let ray = Ray::new(Vec3::ZERO, sample.direction);
            assert!(sphere.hit_time(&ray, Interval::from_min(0.01)).is_some());
        }
    }

    #[test]
    fn test_distant_light_pdf_is_accurate() {
        let mut rng = StdRng::seed_from_u64(2);
        for distance in [1_000.0f32, 5_000.0] {
            let sphere = Sphere::new(Vec3::new(0.0, 0.0, -distance), 1.0, MaterialId(0));
            let sample = sphere.sample_direction(Vec3::ZERO, &mut rng).unwrap();

            let d = distance as f64;
            let one_minus_cos = 1.0 - (1.0 - 1.0 / (d * d)).sqrt();
            let exact = 1.0 / (2.0 * std::f64::consts::PI * one_minus_cos);
            let rel = (sample.pdf as f64 - exact).abs() / exact;
            assert!(rel < 1e-3, "d={} pdf={} exact={}", distance, sample.pdf, exact);
            assert!(sample.direction.z < 0.0);
        }
    }

    #[test]
    fn test_no_cone_sample_from_inside() {
        let sphere = unit_sphere();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sphere
            .sample_direction(Vec3::new(0.0, 0.0, -5.5), &mut rng)
            .is_none());
    }
}
