//! Scene description types.
//!
//! The scene owns every material in an arena; surfaces refer to them by
//! [`MaterialId`]. Whether a surface is a light is decided solely by its
//! material's emissive radiance.

use glint_math::Vec3;

use crate::material::{Material, MaterialId};

/// Geometry of a surface.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Sphere { center: Vec3, radius: f32 },
    /// Vertices in counterclockwise winding.
    Triangle { vertices: [Vec3; 3] },
}

/// A shape bound to a material.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    pub shape: Shape,
    pub material: MaterialId,
}

impl Surface {
    pub fn new(shape: Shape, material: MaterialId) -> Self {
        Self { shape, material }
    }
}

/// Pinhole camera as declared by a `camera` directive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Viewing direction, not necessarily unit length
    pub direction: Vec3,
    pub focal_length: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 0.0),
            direction: Vec3::new(0.0, -1.0, 0.0),
            focal_length: 1.0,
        }
    }
}

/// A complete scene: materials, opaque surfaces, lights and one camera.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Scene name (usually from filename)
    pub name: String,

    /// Material arena, indexed by [`MaterialId`]
    pub materials: Vec<Material>,

    /// Non-emissive surfaces
    pub surfaces: Vec<Surface>,

    /// Surfaces whose material is emissive
    pub lights: Vec<Surface>,

    pub camera: Camera,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a material to the scene and return its ID.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len());
        self.materials.push(material);
        id
    }

    /// Get a material by ID.
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    /// Add a surface, filing it under the lights if its material emits.
    ///
    /// Returns `true` when the surface became a light. Surfaces referencing an
    /// unknown material are treated as opaque.
    pub fn add_surface(&mut self, surface: Surface) -> bool {
        let emissive = self
            .material(surface.material)
            .is_some_and(Material::is_emissive);
        if emissive {
            self.lights.push(surface);
        } else {
            self.surfaces.push(surface);
        }
        emissive
    }

    /// Get material count.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Get the number of non-emissive surfaces.
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Get the number of light surfaces.
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }
}
