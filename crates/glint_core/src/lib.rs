//! Glint Core - Scene description for the glint path tracer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Surface`, `Shape`, `Camera`
//! - **Materials**: renderer-agnostic `Material` descriptions referenced by `MaterialId`
//! - **Scene files**: line-oriented text format parsing and loading
//!
//! # Example
//!
//! ```ignore
//! use glint_core::format::{load_scene, ParseMode};
//!
//! let scene = load_scene("scene.txt", ParseMode::Strict)?;
//! println!("Loaded {} surfaces, {} lights",
//!     scene.surface_count(),
//!     scene.light_count());
//! ```

pub mod format;
pub mod material;
pub mod scene;

// Re-export commonly used types
pub use format::{load_scene, load_scene_from_string, LoadError, ParseError, ParseMode};
pub use material::{
    Distribution, Material, MaterialError, MaterialId, ReflectionModel, ShadowMasking,
    SurfaceKind,
};
pub use scene::{Camera, Scene, Shape, Surface};
