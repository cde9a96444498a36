//! Glint math - vector types and small geometric helpers shared by the
//! scene description and the renderer.

// Re-export glam for convenience
pub use glam::*;

mod frame;
mod interval;
mod ray;
pub mod special;

pub use frame::Frame;
pub use interval::Interval;
pub use ray::Ray;
