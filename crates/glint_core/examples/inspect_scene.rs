//! Example: Load and inspect a scene file.
//!
//! Run with: cargo run --example inspect_scene -- scenes/default.txt

use std::env;

use glint_core::format::{load_scene, ParseMode};
use glint_core::Shape;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_scene <path-to-scene-file>");
        println!("\nExample:");
        println!("  cargo run --example inspect_scene -- scenes/default.txt");
        return;
    }

    let path = &args[1];
    println!("Loading scene file: {}", path);

    match load_scene(path, ParseMode::BestEffort) {
        Ok(scene) => {
            println!("\n=== Scene: {} ===", scene.name);
            println!("Materials: {}", scene.material_count());
            println!("Surfaces: {}", scene.surface_count());
            println!("Lights: {}", scene.light_count());

            println!("\n--- Materials ---");
            for (i, mat) in scene.materials.iter().enumerate() {
                println!(
                    "  [mat{}] {} {} {} {} roughness {:.2}",
                    i, mat.model, mat.distribution, mat.shadow_masking, mat.surface, mat.roughness
                );
                if mat.is_emissive() {
                    println!("       Emissive: {}", mat.emissive);
                }
            }

            println!("\n--- Surfaces ---");
            let tagged = scene
                .surfaces
                .iter()
                .map(|s| ("surface", s))
                .chain(scene.lights.iter().map(|s| ("light", s)));
            for (kind, surface) in tagged {
                match &surface.shape {
                    Shape::Sphere { center, radius } => println!(
                        "  {} sphere at ({:.2}, {:.2}, {:.2}) r={:.2} mat{}",
                        kind, center.x, center.y, center.z, radius, surface.material.0
                    ),
                    Shape::Triangle { vertices } => println!(
                        "  {} triangle {:?} mat{}",
                        kind, vertices, surface.material.0
                    ),
                }
            }

            let camera = scene.camera;
            println!("\n--- Camera ---");
            println!("  Position: {}", camera.position);
            println!("  Direction: {}", camera.direction);
            println!("  Focal length: {:.2}", camera.focal_length);
        }
        Err(e) => {
            eprintln!("Error loading scene file: {}", e);
        }
    }
}
