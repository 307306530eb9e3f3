//! Infinite plane primitive.

use std::sync::Arc;

use crate::{HitRecord, Material, Shape};
use lumo_math::{Normal, Ray, Transformation, Vec2d};

/// Rays closer than this to being parallel to the plane never hit it.
const PARALLEL_THRESHOLD: f64 = 1e-5;

/// The z = 0 plane of its object space, of infinite extent.
///
/// Surface coordinates tile the plane with unit squares.
#[derive(Debug, Clone, Default)]
pub struct Plane {
    transformation: Transformation,
    material: Arc<Material>,
}

impl Plane {
    /// Create a new plane.
    pub fn new(transformation: Transformation, material: Arc<Material>) -> Self {
        Self {
            transformation,
            material,
        }
    }

    fn hit_t(inv_ray: &Ray) -> Option<f64> {
        if inv_ray.dir.z.abs() < PARALLEL_THRESHOLD {
            return None;
        }

        let t = -inv_ray.origin.z / inv_ray.dir.z;
        inv_ray.interval().surrounds(t).then_some(t)
    }
}

impl Shape for Plane {
    fn ray_intersection(&self, ray: &Ray) -> Option<HitRecord<'_>> {
        let inv_ray = ray.transform(&self.transformation.inverse());
        let t = Self::hit_t(&inv_ray)?;

        let hit_point = inv_ray.at(t);
        let normal_z = if inv_ray.dir.z < 0.0 { 1.0 } else { -1.0 };

        Some(HitRecord {
            world_point: self.transformation * hit_point,
            normal: self.transformation * Normal::new(0.0, 0.0, normal_z),
            surface_point: Vec2d::new(
                hit_point.x - hit_point.x.floor(),
                hit_point.y - hit_point.y.floor(),
            ),
            t,
            ray: *ray,
            material: &self.material,
        })
    }

    fn quick_ray_intersection(&self, ray: &Ray) -> bool {
        let inv_ray = ray.transform(&self.transformation.inverse());
        Self::hit_t(&inv_ray).is_some()
    }

    fn transformation(&self) -> &Transformation {
        &self.transformation
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumo_math::{Point, Vector, VEC_X, VEC_Y, VEC_Z};

    #[test]
    fn test_hit() {
        let plane = Plane::default();

        let ray1 = Ray::new(Point::new(0.0, 0.0, 1.0), -VEC_Z);
        let intersection1 = plane.ray_intersection(&ray1).expect("ray1 should hit");
        let expected = HitRecord {
            world_point: Point::new(0.0, 0.0, 0.0),
            normal: Normal::new(0.0, 0.0, 1.0),
            surface_point: Vec2d::new(0.0, 0.0),
            t: 1.0,
            ray: ray1,
            material: plane.material(),
        };
        assert!(expected.is_close(&intersection1));

        for dir in [VEC_Z, VEC_X, VEC_Y] {
            let ray = Ray::new(Point::new(0.0, 0.0, 1.0), dir);
            assert!(plane.ray_intersection(&ray).is_none());
            assert!(!plane.quick_ray_intersection(&ray));
        }
    }

    #[test]
    fn test_transformation() {
        let plane = Plane::new(Transformation::rotation_y(90.0), Arc::new(Material::default()));

        let ray1 = Ray::new(Point::new(1.0, 0.0, 0.0), -VEC_X);
        let intersection1 = plane.ray_intersection(&ray1).expect("ray1 should hit");
        let expected = HitRecord {
            world_point: Point::new(0.0, 0.0, 0.0),
            normal: Normal::new(1.0, 0.0, 0.0),
            surface_point: Vec2d::new(0.0, 0.0),
            t: 1.0,
            ray: ray1,
            material: plane.material(),
        };
        assert!(expected.is_close(&intersection1));

        for dir in [VEC_Z, VEC_X, VEC_Y] {
            let ray = Ray::new(Point::new(0.0, 0.0, 1.0), dir);
            assert!(plane.ray_intersection(&ray).is_none());
        }
    }

    #[test]
    fn test_uv_coordinates() {
        let plane = Plane::default();

        let uv = |x: f64, y: f64| {
            plane
                .ray_intersection(&Ray::new(Point::new(x, y, 1.0), -VEC_Z))
                .expect("ray should hit")
                .surface_point
        };

        assert!(uv(0.0, 0.0).is_close(&Vec2d::new(0.0, 0.0)));
        assert!(uv(0.25, 0.75).is_close(&Vec2d::new(0.25, 0.75)));
        assert!(uv(4.25, 7.75).is_close(&Vec2d::new(0.25, 0.75)));
        assert!(uv(-0.75, -0.25).is_close(&Vec2d::new(0.25, 0.75)));
    }

    #[test]
    fn test_quick_intersection_respects_interval() {
        let plane = Plane::new(
            Transformation::translation(Vector::new(0.0, 0.0, -1.0)),
            Arc::new(Material::default()),
        );

        // The plane lies at t = 3 along this ray
        let ray = Ray::new(Point::new(0.0, 0.0, 2.0), -VEC_Z);
        for (tmin, tmax, hits) in [
            (0.0, 2.5, false),
            (0.0, 3.5, true),
            (3.5, 10.0, false),
            (2.5, f64::INFINITY, true),
        ] {
            let ray = ray.with_interval(tmin, tmax);
            assert_eq!(plane.quick_ray_intersection(&ray), hits);
            assert_eq!(plane.ray_intersection(&ray).is_some(), hits);
        }
    }

    #[test]
    fn test_normal_faces_the_ray() {
        let plane = Plane::default();

        let from_below = Ray::new(Point::new(0.0, 0.0, -1.0), VEC_Z);
        let hit = plane.ray_intersection(&from_below).expect("ray should hit");
        assert!(hit.normal.is_close(&Normal::new(0.0, 0.0, -1.0)));
    }
}
