//! Loading scene files from disk.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use super::parser::{ParseError, ParseMode, SceneParser};
use crate::scene::Scene;

/// Errors that can occur while loading a scene file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load a scene file. The scene is named after the file stem.
pub fn load_scene<P: AsRef<Path>>(path: P, mode: ParseMode) -> LoadResult<Scene> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");

    let scene = load_scene_from_string(&content, name, mode)?;
    info!(
        "Loaded {}: {} materials, {} surfaces, {} lights",
        path.display(),
        scene.material_count(),
        scene.surface_count(),
        scene.light_count()
    );
    Ok(scene)
}

/// Parse a scene from a string with the given name.
pub fn load_scene_from_string(content: &str, name: &str, mode: ParseMode) -> LoadResult<Scene> {
    let mut parser = SceneParser::new(content).with_name(name).with_mode(mode);
    let scene = parser.parse()?;

    let skipped = parser.diagnostics().len();
    if skipped > 0 {
        info!("Skipped {} malformed line(s) in '{}'", skipped, name);
    }
    Ok(scene)
}
