//! Command-line driver: render a scene file to a PNG.
//!
//! Usage: `glint [SCENE] [OUTPUT] [CONFIG]`

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use glint_core::{load_scene, ParseMode};
use glint_renderer::{render, CancelToken, RenderConfig, World};

const DEFAULT_SCENE: &str = "scene.txt";
const DEFAULT_OUTPUT: &str = "image.png";

struct Args {
    scene: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let scene = args.next().map(PathBuf::from);
        let output = args.next().map(PathBuf::from);
        let config = args.next().map(PathBuf::from);
        if args.next().is_some() {
            anyhow::bail!("usage: glint [SCENE] [OUTPUT] [CONFIG]");
        }

        Ok(Self {
            scene: scene.unwrap_or_else(|| PathBuf::from(DEFAULT_SCENE)),
            output: output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            config,
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse()?;

    let config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("loading render config {}", path.display()))?,
        None => RenderConfig::default(),
    };

    let scene = load_scene(&args.scene, ParseMode::BestEffort)
        .with_context(|| format!("loading scene {}", args.scene.display()))?;
    if scene.light_count() == 0 {
        log::warn!("Scene has no lights; the image will be black");
    }

    let world = World::from_scene(&scene);
    let image = render(&world, &config, &CancelToken::new()).context("rendering")?;

    image
        .save_png(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    Ok(())
}
