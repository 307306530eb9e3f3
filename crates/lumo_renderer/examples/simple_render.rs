//! Simple path tracer example.
//!
//! Renders a mirror sphere and a diffuse sphere on a checkered floor under
//! an emissive sky, then saves `simple_render.pfm` and `simple_render.png`.

use std::sync::Arc;

use lumo_core::{Color, BLACK};
use lumo_math::{Transformation, Vector};
use lumo_renderer::{
    render_buckets, Brdf, Material, PathTracer, PerspectiveCamera, Pigment, Plane, RenderConfig,
    Sphere, World,
};

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let (width, height) = (320, 240);
    let world = build_scene();

    let camera = PerspectiveCamera::new(1.0, width as f64 / height as f64)
        .with_transformation(Transformation::translation(Vector::new(-1.0, 0.0, 1.0)));
    let renderer = PathTracer::new(&world).with_num_of_rays(4).with_max_depth(4);
    let config = RenderConfig {
        samples_per_side: 2,
        ..RenderConfig::default()
    };

    let mut image = render_buckets(&camera, &renderer, width, height, &config);

    if let Err(e) = image.save_pfm("simple_render.pfm") {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    image.normalize_image(1.0, None);
    image.clamp_image();
    match image.write_ldr_image("simple_render.png", 1.0) {
        Ok(()) => println!("Saved simple_render.pfm and simple_render.png"),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn build_scene() -> World {
    let mut world = World::new();

    let sky = Material::new(Brdf::diffuse(Pigment::Uniform(BLACK)))
        .with_emitted_radiance(Pigment::Uniform(Color::new(1.0, 0.9, 0.5)));
    world.add_shape(Box::new(Sphere::new(
        Transformation::scaling(Vector::new(200.0, 200.0, 200.0))
            * Transformation::translation(Vector::new(0.0, 0.0, 0.4)),
        Arc::new(sky),
    )));

    let ground = Material::new(Brdf::diffuse(Pigment::checkered(
        Color::new(0.3, 0.5, 0.1),
        Color::new(0.1, 0.2, 0.5),
        10,
    )));
    world.add_shape(Box::new(Plane::new(Transformation::IDENTITY, Arc::new(ground))));

    let mirror = Material::new(Brdf::specular(Pigment::Uniform(Color::new(0.6, 0.2, 0.3))));
    world.add_shape(Box::new(Sphere::new(
        Transformation::translation(Vector::new(1.0, 2.5, 0.0)),
        Arc::new(mirror),
    )));

    let diffuse = Material::new(Brdf::diffuse(Pigment::Uniform(Color::new(0.3, 0.4, 0.8))));
    world.add_shape(Box::new(Sphere::new(
        Transformation::translation(Vector::new(2.0, -1.0, 0.5))
            * Transformation::scaling(Vector::new(0.5, 0.5, 0.5)),
        Arc::new(diffuse),
    )));

    world
}
