//! Glint renderer - CPU path tracing
//!
//! A Monte Carlo path tracer for the scenes described by `glint_core`:
//! spheres and triangles lit by emissive spheres, shaded with Lambert,
//! Cook-Torrance or multiple-scattering Smith microfacet BRDFs.

pub mod bsdf;
mod bucket;
mod camera;
mod hittable;
mod integrator;
mod renderer;
pub mod sampling;
mod sphere;
mod triangle;
mod world;

/// Linear RGB radiance.
pub type Color = glint_math::Vec3;

pub use bsdf::{Bsdf, BsdfSample};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList, LightSample};
pub use integrator::Integrator;
pub use renderer::{
    color_to_rgb, render, render_pixel, CancelToken, ImageBuffer, RenderConfig, RenderError,
};
pub use sphere::Sphere;
pub use triangle::{Barycentric, Triangle};
pub use world::World;

/// Re-export common math types from glint_math
pub use glint_math::{Interval, Ray, Vec3};
