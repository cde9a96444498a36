//! Image rendering and output.
//!
//! Splits the image into buckets, renders them in parallel with rayon and
//! writes the result as a 24-bit PNG.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};
use rand::RngCore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::camera::Camera;
use crate::integrator::Integrator;
use crate::world::World;
use crate::Color;

/// Errors produced while configuring, running or saving a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("render cancelled")]
    Cancelled,

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to parse render configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Render configuration.
///
/// Every field is optional when loading from JSON; missing fields take
/// their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Camera rays traced per pixel
    pub samples_per_pixel: u32,
    /// Probability of terminating a path at each surface hit
    pub roulette_cutoff: f32,
    /// Lower bound on surface hit times, to avoid self-intersection
    pub min_time: f32,
    /// Lower bound on light hit times
    pub light_min_time: f32,
    /// Whether to sample lights directly at the first hit
    pub direct_lighting: bool,
    pub seed: u64,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            samples_per_pixel: 32,
            roulette_cutoff: 0.2,
            min_time: 0.01,
            light_min_time: 0.01,
            direct_lighting: true,
            seed: 0,
            bucket_size: crate::bucket::DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    pub fn from_json_str(json: &str) -> Result<Self, RenderError> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        let invalid = |msg: String| -> Result<(), RenderError> {
            Err(RenderError::InvalidConfig(msg))
        };

        if self.width == 0 || self.height == 0 {
            return invalid(format!(
                "image size {}x{} is empty",
                self.width, self.height
            ));
        }
        if self.samples_per_pixel == 0 {
            return invalid("samples_per_pixel must be at least 1".to_string());
        }
        // A cutoff of 1 disables indirect light entirely
        if !(self.roulette_cutoff > 0.0 && self.roulette_cutoff <= 1.0) {
            return invalid(format!(
                "roulette_cutoff {} is outside (0, 1]",
                self.roulette_cutoff
            ));
        }
        if !(self.min_time >= 0.0 && self.min_time.is_finite()) {
            return invalid(format!("min_time {} must be finite and >= 0", self.min_time));
        }
        if !(self.light_min_time >= 0.0 && self.light_min_time.is_finite()) {
            return invalid(format!(
                "light_min_time {} must be finite and >= 0",
                self.light_min_time
            ));
        }
        if self.bucket_size == 0 {
            return invalid("bucket_size must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Cooperative cancellation flag shared between the caller and the
/// render workers.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Convert a radiance value to output bytes.
///
/// Channels are clamped to [0, 255] without scaling and written in reverse
/// order: z to red, y to green, x to blue.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let byte = |c: f32| c.clamp(0.0, 255.0) as u8;
    [byte(color.z), byte(color.y), byte(color.x)]
}

/// Mean radiance over `samples_per_pixel` traces of the pixel's ray.
pub fn render_pixel(
    camera: &Camera,
    integrator: &Integrator,
    x: u32,
    y: u32,
    samples_per_pixel: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let ray = camera.get_ray(x, y);
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples_per_pixel {
        pixel_color += integrator.trace(&ray, 0, rng);
    }

    pixel_color / samples_per_pixel as f32
}

/// Linear radiance per pixel, indexed with y = 0 at the bottom of the image.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let i = i as u32;
            self.set(
                bucket.x + i % bucket.width,
                bucket.y + i / bucket.width,
                *color,
            );
        }
    }

    /// RGB bytes in top-to-bottom row order.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 3) as usize);
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                bytes.extend_from_slice(&color_to_rgb(self.get(x, y)));
            }
        }
        bytes
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        image::save_buffer_with_format(
            path,
            &self.to_rgb8(),
            self.width,
            self.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )?;
        info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Render the world with the camera it was built with.
///
/// Buckets render in parallel; each draws from its own RNG seeded from
/// `config.seed` and its index, so the output does not depend on thread
/// scheduling.
pub fn render(
    world: &World,
    config: &RenderConfig,
    cancel: &CancelToken,
) -> Result<ImageBuffer, RenderError> {
    config.validate()?;

    let camera = Camera::new(world.camera(), config.width, config.height);
    let integrator = Integrator::new(world, config);
    let buckets = generate_buckets(config.width, config.height, config.bucket_size);

    info!(
        "Rendering {}x{} @ {} spp in {} buckets",
        config.width,
        config.height,
        config.samples_per_pixel,
        buckets.len()
    );
    let start = Instant::now();

    let results = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, &camera, &integrator, config, cancel)?;
            debug!("Bucket {} done", bucket.index);
            Ok(result)
        })
        .collect::<Result<Vec<_>, RenderError>>()?;

    let mut image = ImageBuffer::new(config.width, config.height);
    for result in &results {
        image.write_bucket(result);
    }

    info!("Rendered in {:.2?}", start.elapsed());
    Ok(image)
}
