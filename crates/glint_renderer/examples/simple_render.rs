//! Simple path tracer example.
//!
//! Builds a small scene in code, one sphere per reflection model on a
//! diffuse floor, and renders it to `simple_render.png`.

use glint_core::{
    Distribution, Material, ReflectionModel, Scene, ShadowMasking, Shape, Surface, SurfaceKind,
};
use glint_renderer::{render, CancelToken, RenderConfig, Vec3, World};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    println!("Glint Path Tracer - Simple Example");
    println!("==================================");

    let start = std::time::Instant::now();
    let scene = build_scene();
    let world = World::from_scene(&scene);
    println!("Scene built in {:?}", start.elapsed());

    let config = RenderConfig {
        width: 300,
        height: 300,
        samples_per_pixel: 16,
        ..Default::default()
    };

    println!(
        "Rendering {}x{} @ {} spp...",
        config.width, config.height, config.samples_per_pixel
    );

    let start = std::time::Instant::now();
    let image = render(&world, &config, &CancelToken::new())?;
    println!("Rendered in {:?}", start.elapsed());

    let filename = "simple_render.png";
    image.save_png(filename)?;
    println!("Saved to {}", filename);

    Ok(())
}

fn build_scene() -> Scene {
    let mut scene = Scene::new("simple");

    let floor = scene.add_material(Material::lambert(Vec3::splat(0.8)));
    let lamp = scene.add_material(Material::emitter(Vec3::splat(2000.0)));
    let clay = scene.add_material(Material::lambert(Vec3::new(0.2, 0.45, 0.8)));
    let brushed = scene.add_material(Material {
        model: ReflectionModel::CookTorrance,
        distribution: Distribution::Beckmann,
        shadow_masking: ShadowMasking::Beckmann,
        roughness: 0.3,
        f0: Vec3::new(0.95, 0.64, 0.54),
        ..Default::default()
    });
    let rough_gold = scene.add_material(Material {
        model: ReflectionModel::Smith,
        distribution: Distribution::Ggx,
        surface: SurfaceKind::Conductor,
        roughness: 0.8,
        f0: Vec3::new(0.56, 0.86, 1.0),
        ..Default::default()
    });

    // Floor at y = 0 made of two triangles
    let corners = [
        Vec3::new(-10.0, 0.0, -10.0),
        Vec3::new(10.0, 0.0, -10.0),
        Vec3::new(10.0, 0.0, 10.0),
        Vec3::new(-10.0, 0.0, 10.0),
    ];
    for vertices in [
        [corners[0], corners[2], corners[1]],
        [corners[0], corners[3], corners[2]],
    ] {
        scene.add_surface(Surface::new(Shape::Triangle { vertices }, floor));
    }

    for (x, material) in [(-1.0, clay), (0.0, brushed), (1.0, rough_gold)] {
        scene.add_surface(Surface::new(
            Shape::Sphere {
                center: Vec3::new(x, 0.4, 0.0),
                radius: 0.4,
            },
            material,
        ));
    }

    scene.add_surface(Surface::new(
        Shape::Sphere {
            center: Vec3::new(2.0, 3.0, 2.0),
            radius: 0.5,
        },
        lamp,
    ));

    println!(
        "Created {} surfaces and {} lights",
        scene.surface_count(),
        scene.light_count()
    );
    scene
}
