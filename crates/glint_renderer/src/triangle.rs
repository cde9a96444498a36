//! Triangle primitive for ray tracing.
//!
//! Intersection solves `origin + t·d = a + β(b − a) + γ(c − a)` with
//! Cramer's rule.

use glint_core::MaterialId;
use glint_math::{Interval, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable};

/// Determinants smaller than this are treated as singular.
const DET_EPSILON: f32 = 1e-8;

/// Barycentric solution of a ray/triangle system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barycentric {
    pub beta: f32,
    pub gamma: f32,
    pub t: f32,
}

/// A triangle primitive with a flat face normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Vertices in counterclockwise order
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length, zero when degenerate)
    normal: Vec3,
    material: MaterialId,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: MaterialId) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self {
            v0,
            v1,
            v2,
            normal,
            material,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Solve for the barycentric coordinates and ray time, rejecting early
    /// once β or γ falls outside the triangle.
    ///
    /// Returns `None` for points outside the triangle and for near-singular
    /// systems (rays parallel to the plane, degenerate triangles).
    pub fn solve(&self, ray: &Ray) -> Option<Barycentric> {
        let d = ray.direction();
        let edge_ba = self.v0 - self.v1;
        let edge_ca = self.v0 - self.v2;
        let a_minus_origin = self.v0 - ray.origin();

        let ca_cross_d = edge_ca.cross(d);
        let m = edge_ba.dot(ca_cross_d);
        if m.abs() < DET_EPSILON {
            return None;
        }

        let beta = a_minus_origin.dot(ca_cross_d) / m;
        if !(0.0..=1.0).contains(&beta) {
            return None;
        }

        let ba_cross_ao = edge_ba.cross(a_minus_origin);
        let gamma = d.dot(ba_cross_ao) / m;
        if gamma < 0.0 || gamma > 1.0 - beta {
            return None;
        }

        let t = -edge_ca.dot(ba_cross_ao) / m;
        Some(Barycentric { beta, gamma, t })
    }
}

impl Hittable for Triangle {
    fn hit_time(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        self.solve(ray)
            .map(|b| b.t)
            .filter(|t| ray_t.surrounds(*t))
    }

    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let Some(t) = self.hit_time(ray, ray_t) else {
            return false;
        };

        rec.t = t;
        rec.p = ray.at(t);
        rec.set_face_normal(ray, self.normal);
        rec.material = self.material;

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Triangle {
        Triangle::new(
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            MaterialId(0),
        )
    }

    #[test]
    fn test_face_normal_follows_winding() {
        assert!((floor().normal() - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_triangle_hit() {
        let tri = floor();
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, -1.0, 0.0));

        let mut rec = HitRecord::default();
        assert!(tri.hit(&ray, Interval::from_min(0.01), &mut rec));
        assert!((rec.t - 2.0).abs() < 1e-5);
        assert!(rec.p.length() < 1e-5);
        assert!(rec.front_face);
        assert_eq!(rec.shading_normal(), rec.normal);
    }

    #[test]
    fn test_triangle_back_face() {
        let tri = floor();
        let ray = Ray::new(Vec3::new(0.0, -2.0, 0.0), Vec3::new(0.0, 1.0, 0.0));

        let mut rec = HitRecord::default();
        assert!(tri.hit(&ray, Interval::from_min(0.01), &mut rec));
        assert!(!rec.front_face);
        assert!((rec.normal - Vec3::Y).length() < 1e-6);
        assert!((rec.shading_normal() + Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_barycentrics_in_range() {
        let tri = floor();
        for (x, z) in [(0.0, 0.0), (0.3, 0.5), (-0.4, 0.2), (0.0, -0.8), (0.9, 0.95)] {
            let ray = Ray::new(Vec3::new(x, 1.0, z), Vec3::new(0.0, -1.0, 0.0));
            let b = tri.solve(&ray).unwrap();
            let alpha = 1.0 - b.beta - b.gamma;
            for w in [b.beta, b.gamma, alpha] {
                assert!((-1e-6..=1.0 + 1e-6).contains(&w), "weight {} out of range", w);
            }
            assert!((b.beta + b.gamma + alpha - 1.0).abs() < 1e-6);

            // The weights reproduce the hit point
            let p = alpha * tri.v0 + b.beta * tri.v1 + b.gamma * tri.v2;
            assert!((p - ray.at(b.t)).length() < 1e-4);
        }
    }

    #[test]
    fn test_outside_point_misses() {
        let tri = floor();
        let ray = Ray::new(Vec3::new(2.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        assert!(tri.solve(&ray).is_none());
    }

    #[test]
    fn test_parallel_ray_misses_without_nan() {
        let tri = floor();
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!(tri.solve(&ray).is_none());
        assert_eq!(tri.hit_time(&ray, Interval::new(f32::NEG_INFINITY, f32::INFINITY)), None);
    }

    #[test]
    fn test_degenerate_triangle_misses() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0, MaterialId(0));
        assert_eq!(tri.normal(), Vec3::ZERO);
        let ray = Ray::new(Vec3::new(0.5, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        assert!(tri.solve(&ray).is_none());
    }

    #[test]
    fn test_hit_time_open_interval() {
        let tri = floor();
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(tri.hit_time(&ray, Interval::new(0.01, 2.0)), None);
        assert_eq!(tri.hit_time(&ray, Interval::new(2.0, 5.0)), None);
    }
}
