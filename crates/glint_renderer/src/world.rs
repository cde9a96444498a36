//! Render-ready form of a [`Scene`].
//!
//! Shapes become boxed [`Hittable`]s split into opaque surfaces and lights,
//! and every material is resolved to a [`Bsdf`] up front. The world is
//! immutable once built and shared by reference across render threads.

use glint_core::{MaterialId, Scene, Shape, Surface};
use log::info;

use crate::bsdf::Bsdf;
use crate::hittable::{Hittable, HittableList};
use crate::sphere::Sphere;
use crate::triangle::Triangle;
use crate::Color;

pub struct World {
    surfaces: HittableList,
    lights: HittableList,
    /// Emitted radiance of each entry in `lights`, in the same order
    light_emission: Vec<Color>,
    bsdfs: Vec<Bsdf>,
    emission: Vec<Color>,
    camera: glint_core::Camera,
}

impl World {
    pub fn from_scene(scene: &Scene) -> Self {
        let bsdfs = scene.materials.iter().map(Bsdf::from_material).collect();
        let emission: Vec<Color> = scene.materials.iter().map(|m| m.emissive).collect();

        let mut surfaces = HittableList::new();
        for surface in &scene.surfaces {
            surfaces.add(build_shape(surface));
        }

        let mut lights = HittableList::new();
        let mut light_emission = Vec::with_capacity(scene.lights.len());
        for light in &scene.lights {
            lights.add(build_shape(light));
            light_emission.push(
                emission
                    .get(light.material.0)
                    .copied()
                    .unwrap_or(Color::ZERO),
            );
        }

        info!(
            "Built world '{}': {} surfaces, {} lights, {} materials",
            scene.name,
            surfaces.len(),
            lights.len(),
            scene.materials.len()
        );

        Self {
            surfaces,
            lights,
            light_emission,
            bsdfs,
            emission,
            camera: scene.camera,
        }
    }

    /// Non-emissive geometry.
    pub fn surfaces(&self) -> &HittableList {
        &self.surfaces
    }

    /// Emissive geometry.
    pub fn lights(&self) -> &HittableList {
        &self.lights
    }

    /// Each light paired with its emitted radiance.
    pub fn lights_with_emission(&self) -> impl Iterator<Item = (&dyn Hittable, Color)> {
        self.lights.iter().zip(self.light_emission.iter().copied())
    }

    pub fn bsdf(&self, material: MaterialId) -> Option<&Bsdf> {
        self.bsdfs.get(material.0)
    }

    /// Emitted radiance of a material; zero for unknown ids.
    pub fn emission(&self, material: MaterialId) -> Color {
        self.emission
            .get(material.0)
            .copied()
            .unwrap_or(Color::ZERO)
    }

    pub fn camera(&self) -> &glint_core::Camera {
        &self.camera
    }
}

fn build_shape(surface: &Surface) -> Box<dyn Hittable> {
    match surface.shape {
        Shape::Sphere { center, radius } => {
            Box::new(Sphere::new(center, radius, surface.material))
        }
        Shape::Triangle { vertices: [a, b, c] } => {
            Box::new(Triangle::new(a, b, c, surface.material))
        }
    }
}
