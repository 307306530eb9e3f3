//! The built-in demo scene.

use std::sync::Arc;

use lumo_core::{Color, BLACK};
use lumo_math::{Point, Transformation, Vector};
use lumo_renderer::{
    Brdf, Camera, Material, OrthogonalCamera, PerspectiveCamera, Pigment, Plane, PointLight,
    Sphere, World,
};

/// Eight small spheres on the corners of a cube, plus two markers that
/// break its symmetry (one below the centre, one on the +Y face).
///
/// With `environment`, a checkered floor, an emissive sky dome and a point
/// light are added so that the lit renderers have something to work with.
pub fn demo_world(environment: bool) -> World {
    let mut world = World::new();

    let sphere_material = Arc::new(Material::new(Brdf::diffuse(Pigment::Uniform(
        Color::new(0.3, 0.4, 0.8),
    ))));
    let marker_material = Arc::new(Material::new(Brdf::diffuse(Pigment::checkered(
        Color::new(0.8, 0.2, 0.2),
        Color::new(0.9, 0.9, 0.9),
        4,
    ))));

    let small_sphere = |x: f64, y: f64, z: f64| {
        Transformation::translation(Vector::new(x, y, z))
            * Transformation::scaling(Vector::new(0.1, 0.1, 0.1))
    };

    for x in [-0.5, 0.5] {
        for y in [-0.5, 0.5] {
            for z in [-0.5, 0.5] {
                world.add_shape(Box::new(Sphere::new(
                    small_sphere(x, y, z),
                    sphere_material.clone(),
                )));
            }
        }
    }

    world.add_shape(Box::new(Sphere::new(
        small_sphere(0.0, 0.0, -0.5),
        marker_material.clone(),
    )));
    world.add_shape(Box::new(Sphere::new(small_sphere(0.0, 0.5, 0.0), marker_material)));

    if environment {
        let floor = Material::new(Brdf::diffuse(Pigment::checkered(
            Color::new(0.3, 0.5, 0.1),
            Color::new(0.1, 0.2, 0.5),
            4,
        )));
        world.add_shape(Box::new(Plane::new(
            Transformation::translation(Vector::new(0.0, 0.0, -0.7)),
            Arc::new(floor),
        )));

        let sky = Material::new(Brdf::diffuse(Pigment::Uniform(BLACK)))
            .with_emitted_radiance(Pigment::Uniform(Color::new(1.0, 0.9, 0.5)));
        world.add_shape(Box::new(Sphere::new(
            Transformation::scaling(Vector::new(200.0, 200.0, 200.0))
                * Transformation::translation(Vector::new(0.0, 0.0, 0.4)),
            Arc::new(sky),
        )));

        world.add_light(PointLight::new(
            Point::new(-30.0, 30.0, 30.0),
            Color::new(1.0, 1.0, 1.0),
        ));
    }

    world
}

/// Camera one unit behind the origin, rotated by `angle_deg` around Z.
pub fn demo_camera(orthogonal: bool, angle_deg: f64, aspect_ratio: f64) -> Box<dyn Camera> {
    let transformation = Transformation::rotation_z(angle_deg)
        * Transformation::translation(Vector::new(-1.0, 0.0, 0.0));

    if orthogonal {
        Box::new(OrthogonalCamera::new(aspect_ratio).with_transformation(transformation))
    } else {
        Box::new(PerspectiveCamera::new(1.0, aspect_ratio).with_transformation(transformation))
    }
}
