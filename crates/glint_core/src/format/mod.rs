//! Scene file format.
//!
//! A scene file is a plain text list of directives, one per line. See
//! [`parser`] for the grammar.
//!
//! # Example
//!
//! ```ignore
//! use glint_core::format::{load_scene, ParseMode};
//!
//! let scene = load_scene("scene.txt", ParseMode::BestEffort)?;
//! println!("Loaded {} surfaces, {} lights",
//!     scene.surface_count(),
//!     scene.light_count());
//! ```

pub mod parser;
mod loader;

pub use loader::*;
pub use parser::{parse_scene, ParseError, ParseMode, ParseResult, SceneParser};
