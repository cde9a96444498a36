//! Line-oriented scene file parser.
//!
//! # Supported Syntax
//!
//! ```text
//! material <model> <distribution> <shadowmask> (e0,e1,e2) <roughness> (d0,d1,d2) (f0,f1,f2) [conductor|dielectric]
//! sphere   (x,y,z) <radius> mat<index>
//! light    (x,y,z) <radius> mat<index>
//! triangle (ax,ay,az) (bx,by,bz) (cx,cy,cz) mat<index>
//! camera   (x,y,z) (dx,dy,dz) <focal length>
//! // comment
//! ```
//!
//! Vector literals may carry a `vec3` prefix. Keywords are case-insensitive.
//! Tokens are separated by whitespace outside parentheses, so `( 1, 2, 3 )`
//! is a single token.

use glint_math::Vec3;
use log::{debug, warn};
use thiserror::Error;

use crate::material::{Material, MaterialId};
use crate::scene::{Camera, Scene, Shape, Surface};

/// A malformed scene line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct ParseError {
    /// 1-based line number
    pub line: usize,
    pub reason: String,
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// How the parser reacts to a bad line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Stop at the first bad line.
    #[default]
    Strict,
    /// Log and skip bad lines, keeping everything else.
    BestEffort,
}

/// Scene file parser.
pub struct SceneParser<'a> {
    content: &'a str,
    name: String,
    mode: ParseMode,
    diagnostics: Vec<ParseError>,
}

impl<'a> SceneParser<'a> {
    /// Create a new parser from file contents.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            name: "unnamed".to_string(),
            mode: ParseMode::Strict,
            diagnostics: Vec::new(),
        }
    }

    /// Set the name given to the parsed scene.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Lines skipped by the last [`parse`](Self::parse) in best-effort mode.
    pub fn diagnostics(&self) -> &[ParseError] {
        &self.diagnostics
    }

    /// Parse the content into a scene.
    pub fn parse(&mut self) -> ParseResult<Scene> {
        let mut scene = Scene::new(self.name.clone());
        self.diagnostics.clear();

        for (index, raw) in self.content.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }

            let result = tokenize(trimmed)
                .and_then(|tokens| parse_directive(&mut scene, &tokens))
                .map_err(|reason| ParseError { line, reason });

            if let Err(err) = result {
                match self.mode {
                    ParseMode::Strict => return Err(err),
                    ParseMode::BestEffort => {
                        warn!("Skipping scene {}", err);
                        self.diagnostics.push(err);
                    }
                }
            }
        }

        debug!(
            "Parsed scene '{}': {} materials, {} surfaces, {} lights",
            scene.name,
            scene.material_count(),
            scene.surface_count(),
            scene.light_count()
        );

        Ok(scene)
    }
}

/// Parse scene file contents in the given mode.
pub fn parse_scene(content: &str, mode: ParseMode) -> ParseResult<Scene> {
    SceneParser::new(content).with_mode(mode).parse()
}

/// Split a line on whitespace that is not inside parentheses.
fn tokenize(line: &str) -> Result<Vec<&str>, String> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;

    for (i, c) in line.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unbalanced `)`".to_string())?;
            }
            _ => {}
        }

        if c.is_whitespace() && depth == 0 {
            if let Some(s) = start.take() {
                tokens.push(&line[s..i]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }

    if depth != 0 {
        return Err("unbalanced `(`".to_string());
    }
    if let Some(s) = start {
        tokens.push(&line[s..]);
    }
    Ok(tokens)
}

fn parse_directive(scene: &mut Scene, tokens: &[&str]) -> Result<(), String> {
    let Some((&command, args)) = tokens.split_first() else {
        return Ok(());
    };

    match command.to_ascii_lowercase().as_str() {
        "material" => parse_material(scene, args),
        "sphere" => parse_sphere(scene, args, false),
        "light" => parse_sphere(scene, args, true),
        "triangle" => parse_triangle(scene, args),
        "camera" => parse_camera(scene, args),
        _ => Err(format!("unknown directive `{}`", command)),
    }
}

fn expect_args(directive: &str, args: &[&str], allowed: &[usize]) -> Result<(), String> {
    if allowed.contains(&args.len()) {
        return Ok(());
    }
    let expected = allowed
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" or ");
    Err(format!(
        "`{}` takes {} arguments, found {}",
        directive,
        expected,
        args.len()
    ))
}

fn parse_material(scene: &mut Scene, args: &[&str]) -> Result<(), String> {
    expect_args("material", args, &[7, 8])?;

    let mut material = Material {
        model: args[0].parse().map_err(|e| format!("{}", e))?,
        distribution: args[1].parse().map_err(|e| format!("{}", e))?,
        shadow_masking: args[2].parse().map_err(|e| format!("{}", e))?,
        emissive: parse_vec3(args[3])?,
        roughness: parse_f32(args[4])?,
        diffuse: parse_vec3(args[5])?,
        f0: parse_vec3(args[6])?,
        ..Default::default()
    };
    if let Some(surface) = args.get(7) {
        material.surface = surface.parse().map_err(|e| format!("{}", e))?;
    }
    material.validate().map_err(|e| format!("{}", e))?;

    let id = scene.add_material(material);
    debug!("Material mat{} declared", id.0);
    Ok(())
}

fn parse_sphere(scene: &mut Scene, args: &[&str], as_light: bool) -> Result<(), String> {
    let directive = if as_light { "light" } else { "sphere" };
    expect_args(directive, args, &[3])?;

    let center = parse_vec3(args[0])?;
    let radius = parse_f32(args[1])?;
    if radius <= 0.0 {
        return Err(format!("radius {} must be positive", radius));
    }
    let material = parse_material_ref(scene, args[2])?;

    let is_light = scene.add_surface(Surface::new(Shape::Sphere { center, radius }, material));
    if as_light && !is_light {
        warn!(
            "`light` at {} uses non-emissive mat{}; treating it as an opaque surface",
            center, material.0
        );
    }
    Ok(())
}

fn parse_triangle(scene: &mut Scene, args: &[&str]) -> Result<(), String> {
    expect_args("triangle", args, &[4])?;

    let vertices = [parse_vec3(args[0])?, parse_vec3(args[1])?, parse_vec3(args[2])?];
    let material = parse_material_ref(scene, args[3])?;

    let area2 = (vertices[1] - vertices[0])
        .cross(vertices[2] - vertices[0])
        .length();
    if area2 == 0.0 {
        warn!("Degenerate triangle {:?} will never be hit", vertices);
    }

    scene.add_surface(Surface::new(Shape::Triangle { vertices }, material));
    Ok(())
}

fn parse_camera(scene: &mut Scene, args: &[&str]) -> Result<(), String> {
    expect_args("camera", args, &[3])?;

    let position = parse_vec3(args[0])?;
    let direction = parse_vec3(args[1])?;
    let focal_length = parse_f32(args[2])?;
    if direction.length_squared() == 0.0 {
        return Err("camera direction must be non-zero".to_string());
    }

    scene.camera = Camera {
        position,
        direction,
        focal_length,
    };
    Ok(())
}

fn parse_material_ref(scene: &Scene, token: &str) -> Result<MaterialId, String> {
    let index = token
        .get(..3)
        .filter(|prefix| prefix.eq_ignore_ascii_case("mat"))
        .and_then(|_| token[3..].parse::<usize>().ok())
        .ok_or_else(|| format!("expected a material reference `mat<index>`, found `{}`", token))?;

    if index >= scene.material_count() {
        return Err(format!(
            "mat{} is not declared ({} materials so far)",
            index,
            scene.material_count()
        ));
    }
    Ok(MaterialId(index))
}

fn parse_f32(token: &str) -> Result<f32, String> {
    token
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("invalid number `{}`", token))
}

/// Parse `(x,y,z)` or `vec3(x,y,z)`.
fn parse_vec3(token: &str) -> Result<Vec3, String> {
    let body = match token.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("vec3") => &token[4..],
        _ => token,
    };
    let inner = body
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| format!("expected a vector `(x,y,z)`, found `{}`", token))?;

    let components = inner
        .split(',')
        .map(|c| parse_f32(c.trim()))
        .collect::<Result<Vec<_>, _>>()?;
    match components.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!(
            "vector `{}` has {} components, expected 3",
            token,
            components.len()
        )),
    }
}
