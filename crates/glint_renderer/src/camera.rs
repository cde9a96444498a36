//! Camera for ray generation.

use glint_math::{Ray, Vec3};

/// World-space units of image plane per pixel.
const WORLD_UNITS_PER_PIXEL: f32 = 0.01;

/// Pinhole camera for generating primary rays.
///
/// The image plane sits `focal_length` units along the view direction and
/// spans `width / 100 × height / 100` world units. Rays go through pixel
/// centers, with pixel row 0 at the bottom of the plane.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    position: Vec3,
    direction: Vec3,
    focal_length: f32,

    // Cached basis (set by new())
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    plane_width: f32,
    plane_height: f32,
}

impl Camera {
    /// Create a camera for a scene camera description and image size.
    pub fn new(camera: &glint_core::Camera, image_width: u32, image_height: u32) -> Self {
        let direction = camera.direction;
        let forward = direction.normalize_or_zero();

        // Fall back to the Y axis when looking straight along Z
        let mut right = direction.cross(Vec3::Z);
        if right.length_squared() == 0.0 {
            right = direction.cross(Vec3::Y);
        }
        let right = right.normalize_or_zero();
        let up = right.cross(direction).normalize_or_zero();

        Self {
            image_width,
            image_height,
            position: camera.position,
            direction,
            focal_length: camera.focal_length,
            forward,
            right,
            up,
            plane_width: image_width as f32 * WORLD_UNITS_PER_PIXEL,
            plane_height: image_height as f32 * WORLD_UNITS_PER_PIXEL,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Generate the ray through the center of pixel (x, y).
    pub fn get_ray(&self, x: u32, y: u32) -> Ray {
        let u = -self.plane_width / 2.0
            + self.plane_width * (x as f32 + 0.5) / self.image_width as f32;
        let v = -self.plane_height / 2.0
            + self.plane_height * (y as f32 + 0.5) / self.image_height as f32;

        let path = self.focal_length * self.forward + u * self.right + v * self.up;
        Ray::new(self.position, path)
    }
}
