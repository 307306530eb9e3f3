//! Shape trait and HitRecord for ray-object intersection.

use crate::Material;
use lumo_math::{Normal, Point, Ray, Transformation, Vec2d};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection, in world space
    pub world_point: Point,
    /// Surface normal, always opposing the incoming ray
    ///
    /// Not normalized by the shapes; [`World::ray_intersection`](crate::World::ray_intersection)
    /// normalizes the closest one.
    pub normal: Normal,
    /// Parametric (u, v) coordinates on the surface
    pub surface_point: Vec2d,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// The ray that produced this hit
    pub ray: Ray,
    /// Material of the shape that was hit
    pub material: &'a Material,
}

impl<'a> HitRecord<'a> {
    /// Compare geometry within tolerance; the material is not compared.
    pub fn is_close(&self, other: &HitRecord<'_>) -> bool {
        self.world_point.is_close(&other.world_point)
            && self.normal.is_close(&other.normal)
            && self.surface_point.is_close(&other.surface_point)
            && (self.t - other.t).abs() < 1e-5
            && self.ray.is_close(&other.ray)
    }
}

/// Trait for objects that can be hit by rays.
///
/// Every shape is defined in its own object space and carries the
/// object-to-world transformation.
pub trait Shape: Send + Sync {
    /// Find the closest intersection strictly inside `(ray.tmin, ray.tmax)`.
    fn ray_intersection(&self, ray: &Ray) -> Option<HitRecord<'_>>;

    /// Same test as [`Shape::ray_intersection`] without building the record.
    fn quick_ray_intersection(&self, ray: &Ray) -> bool;

    /// Object-to-world transformation.
    fn transformation(&self) -> &Transformation;

    fn material(&self) -> &Material;
}
