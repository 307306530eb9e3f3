//! Sphere primitive for ray tracing.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::{HitRecord, Material, Shape};
use lumo_math::{Normal, Point, Ray, Transformation, Vec2d, Vector};

/// A unit sphere centred on the origin of its object space.
///
/// Radius and position come from the transformation.
#[derive(Debug, Clone, Default)]
pub struct Sphere {
    transformation: Transformation,
    material: Arc<Material>,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(transformation: Transformation, material: Arc<Material>) -> Self {
        Self {
            transformation,
            material,
        }
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Point) -> Vec2d {
        // u: longitude from +X, counter-clockwise around Z
        // v: colatitude from +Z
        let u = p.y.atan2(p.x) / (2.0 * PI);
        Vec2d::new(
            if u >= 0.0 { u } else { u + 1.0 },
            p.z.clamp(-1.0, 1.0).acos() / PI,
        )
    }

    /// Normal at `p`, flipped to face against `ray_dir`.
    fn get_sphere_normal(p: Point, ray_dir: Vector) -> Normal {
        let normal = Normal::new(p.x, p.y, p.z);
        if p.to_vector().dot(ray_dir) < 0.0 {
            normal
        } else {
            -normal
        }
    }

    /// First root of the object-space quadratic strictly inside the ray interval.
    fn first_hit_t(inv_ray: &Ray) -> Option<f64> {
        let origin_vec = inv_ray.origin.to_vector();
        let a = inv_ray.dir.squared_norm();
        let b = 2.0 * origin_vec.dot(inv_ray.dir);
        let c = origin_vec.squared_norm() - 1.0;

        // Tangent rays count as misses
        let delta = b * b - 4.0 * a * c;
        if delta <= 0.0 {
            return None;
        }

        let sqrt_delta = delta.sqrt();
        let tmin = (-b - sqrt_delta) / (2.0 * a);
        let tmax = (-b + sqrt_delta) / (2.0 * a);

        let interval = inv_ray.interval();
        if interval.surrounds(tmin) {
            Some(tmin)
        } else if interval.surrounds(tmax) {
            Some(tmax)
        } else {
            None
        }
    }
}

impl Shape for Sphere {
    fn ray_intersection(&self, ray: &Ray) -> Option<HitRecord<'_>> {
        let inv_ray = ray.transform(&self.transformation.inverse());
        let t = Self::first_hit_t(&inv_ray)?;

        let hit_point = inv_ray.at(t);
        Some(HitRecord {
            world_point: self.transformation * hit_point,
            normal: self.transformation * Self::get_sphere_normal(hit_point, inv_ray.dir),
            surface_point: Self::get_sphere_uv(hit_point),
            t,
            ray: *ray,
            material: &self.material,
        })
    }

    fn quick_ray_intersection(&self, ray: &Ray) -> bool {
        let inv_ray = ray.transform(&self.transformation.inverse());
        Self::first_hit_t(&inv_ray).is_some()
    }

    fn transformation(&self) -> &Transformation {
        &self.transformation
    }

    fn material(&self) -> &Material {
        &self.material
    }
}
