//! Hittable trait and HitRecord for ray-object intersection.

use glint_core::MaterialId;
use glint_math::{Interval, Ray, Vec3};
use rand::RngCore;

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Vec3,
    /// Geometric unit normal: outward for spheres, the face normal for triangles
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray arrived against the geometric normal
    pub front_face: bool,
    /// Material of the surface that was hit
    pub material: MaterialId,
}

impl Default for HitRecord {
    fn default() -> Self {
        Self {
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            t: f32::INFINITY,
            front_face: false,
            material: MaterialId(0),
        }
    }
}

impl HitRecord {
    /// Store the geometric normal and note which side the ray came from.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = outward_normal;
    }

    /// Geometric normal flipped to face the incoming ray.
    pub fn shading_normal(&self) -> Vec3 {
        if self.front_face {
            self.normal
        } else {
            -self.normal
        }
    }
}

/// A direction sampled toward a light, with its solid angle pdf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    pub direction: Vec3,
    pub pdf: f32,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Time of the nearest accepted hit strictly inside `ray_t`, if any.
    fn hit_time(&self, ray: &Ray, ray_t: Interval) -> Option<f32>;

    /// Test if a ray hits this object within the given interval.
    ///
    /// Returns true if hit, and fills in the hit record.
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool;

    /// Sample a direction from `from` toward this object, for next-event
    /// estimation. Shapes without a light sampling strategy return `None`.
    fn sample_direction(&self, _from: Vec3, _rng: &mut dyn RngCore) -> Option<LightSample> {
        None
    }
}

/// A list of hittable objects, scanned linearly.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Hittable> {
        self.objects.iter().map(|o| &**o)
    }

    /// Whether any object is hit strictly inside `ray_t`. Stops at the first
    /// hit found.
    pub fn occluded(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.objects
            .iter()
            .any(|object| object.hit_time(ray, ray_t).is_some())
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit_time(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let mut closest: Option<f32> = None;

        for object in &self.objects {
            let interval = ray_t.with_max(closest.unwrap_or(ray_t.max));
            if let Some(t) = object.hit_time(ray, interval) {
                closest = Some(t);
            }
        }

        closest
    }

    // Each test is bounded by the best time found so far, so only strictly
    // closer hits replace the candidate and earlier objects win ties.
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            let interval = ray_t.with_max(closest_so_far);
            if object.hit(ray, interval, rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }
}
