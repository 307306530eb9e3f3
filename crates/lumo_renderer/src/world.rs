//! The scene container queried by the renderers.

use crate::{HitRecord, PointLight, Shape};
use lumo_math::{Point, Ray};

/// Shapes and point lights making up a scene.
///
/// Shapes are tested in insertion order; the closest hit always wins.
#[derive(Default)]
pub struct World {
    shapes: Vec<Box<dyn Shape>>,
    point_lights: Vec<PointLight>,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape to the world.
    pub fn add_shape(&mut self, shape: Box<dyn Shape>) {
        self.shapes.push(shape);
    }

    /// Add a point light to the world.
    pub fn add_light(&mut self, light: PointLight) {
        self.point_lights.push(light);
    }

    pub fn shapes(&self) -> &[Box<dyn Shape>] {
        &self.shapes
    }

    pub fn point_lights(&self) -> &[PointLight] {
        &self.point_lights
    }

    /// Get the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Check if the world has no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Closest intersection of `ray` with any shape, with a unit normal.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        for shape in &self.shapes {
            if let Some(hit) = shape.ray_intersection(ray) {
                if closest.map_or(true, |c| hit.t < c.t) {
                    closest = Some(hit);
                }
            }
        }

        closest.map(|mut hit| {
            hit.normal = hit.normal.normalized();
            hit
        })
    }

    /// Whether nothing lies strictly between `observer` and `point`.
    pub fn is_point_visible(&self, point: Point, observer: Point) -> bool {
        let direction = point - observer;
        let dir_norm = direction.norm();

        // tmax = 1 puts the far end of the ray exactly on `point`
        let ray = Ray::new(observer, direction).with_interval(1e-2 / dir_norm, 1.0);

        !self
            .shapes
            .iter()
            .any(|shape| shape.quick_ray_intersection(&ray))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Sphere};
    use lumo_math::{Transformation, Vector, VEC_X};
    use std::sync::Arc;

    fn two_spheres() -> World {
        let material = Arc::new(Material::default());
        let mut world = World::new();
        world.add_shape(Box::new(Sphere::new(
            Transformation::translation(VEC_X * 2.0),
            material.clone(),
        )));
        world.add_shape(Box::new(Sphere::new(
            Transformation::translation(VEC_X * 8.0),
            material,
        )));
        world
    }

    #[test]
    fn test_ray_intersection_keeps_closest() {
        let world = two_spheres();

        let hit = world
            .ray_intersection(&Ray::new(Point::new(0.0, 0.0, 0.0), VEC_X))
            .expect("ray should hit");
        assert!(hit.world_point.is_close(&Point::new(1.0, 0.0, 0.0)));

        let hit = world
            .ray_intersection(&Ray::new(Point::new(10.0, 0.0, 0.0), -VEC_X))
            .expect("ray should hit");
        assert!(hit.world_point.is_close(&Point::new(9.0, 0.0, 0.0)));

        assert!(world
            .ray_intersection(&Ray::new(Point::new(0.0, 5.0, 0.0), VEC_X))
            .is_none());
    }

    #[test]
    fn test_ray_intersection_normalizes_normal() {
        let mut world = World::new();
        world.add_shape(Box::new(Sphere::new(
            Transformation::scaling(Vector::new(3.0, 3.0, 3.0)),
            Arc::new(Material::default()),
        )));

        let hit = world
            .ray_intersection(&Ray::new(Point::new(10.0, 0.0, 0.0), -VEC_X))
            .expect("ray should hit");
        assert!((hit.normal.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_quick_ray_intersection() {
        let world = two_spheres();

        assert!(!world.is_point_visible(Point::new(10.0, 0.0, 0.0), Point::new(0.0, 0.0, 0.0)));
        assert!(!world.is_point_visible(Point::new(5.0, 0.0, 0.0), Point::new(0.0, 0.0, 0.0)));
        assert!(world.is_point_visible(Point::new(5.0, 0.0, 0.0), Point::new(4.0, 0.0, 0.0)));
        assert!(world.is_point_visible(Point::new(0.5, 0.0, 0.0), Point::new(0.0, 0.0, 0.0)));
        assert!(world.is_point_visible(Point::new(0.0, 10.0, 0.0), Point::new(0.0, 0.0, 0.0)));
        assert!(world.is_point_visible(Point::new(0.0, 0.0, 10.0), Point::new(0.0, 0.0, 0.0)));
    }
}
