//! Cameras turning screen coordinates into primary rays.
//!
//! Screen coordinates `(u, v)` run from `(0, 0)` at the bottom-left corner
//! of the screen to `(1, 1)` at the top-right corner. In camera space the
//! observer looks along +X, with +Z pointing up; the screen spans
//! `[-aspect_ratio, aspect_ratio]` along Y and `[-1, 1]` along Z.

use lumo_math::{Point, Ray, Transformation, Vector, VEC_X};

/// An observer that fires rays through a screen.
pub trait Camera: Send + Sync {
    /// Fire the ray crossing the screen at `(u, v)`.
    fn fire_ray(&self, u: f64, v: f64) -> Ray;
}

/// A camera implementing an orthogonal projection.
#[derive(Debug, Clone, Copy)]
pub struct OrthogonalCamera {
    /// Width of the screen divided by its height
    pub aspect_ratio: f64,
    /// Camera-to-world transformation
    pub transformation: Transformation,
}

impl Default for OrthogonalCamera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl OrthogonalCamera {
    pub fn new(aspect_ratio: f64) -> Self {
        Self {
            aspect_ratio,
            transformation: Transformation::IDENTITY,
        }
    }

    pub fn with_transformation(mut self, transformation: Transformation) -> Self {
        self.transformation = transformation;
        self
    }
}

impl Camera for OrthogonalCamera {
    fn fire_ray(&self, u: f64, v: f64) -> Ray {
        let origin = Point::new(-1.0, (1.0 - 2.0 * u) * self.aspect_ratio, 2.0 * v - 1.0);
        Ray::new(origin, VEC_X).transform(&self.transformation)
    }
}

/// A camera implementing a perspective projection.
///
/// The eye sits at `(-screen_distance, 0, 0)` and the screen lies on the
/// `x = 0` plane.
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveCamera {
    /// Distance between the eye and the screen; sets the field of view
    pub screen_distance: f64,
    /// Width of the screen divided by its height
    pub aspect_ratio: f64,
    /// Camera-to-world transformation
    pub transformation: Transformation,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl PerspectiveCamera {
    pub fn new(screen_distance: f64, aspect_ratio: f64) -> Self {
        Self {
            screen_distance,
            aspect_ratio,
            transformation: Transformation::IDENTITY,
        }
    }

    pub fn with_transformation(mut self, transformation: Transformation) -> Self {
        self.transformation = transformation;
        self
    }

    /// Horizontal field of view in degrees.
    pub fn aperture_deg(&self) -> f64 {
        2.0 * (self.screen_distance / self.aspect_ratio).atan().to_degrees()
    }
}

impl Camera for PerspectiveCamera {
    fn fire_ray(&self, u: f64, v: f64) -> Ray {
        let origin = Point::new(-self.screen_distance, 0.0, 0.0);
        let dir = Vector::new(
            self.screen_distance,
            (1.0 - 2.0 * u) * self.aspect_ratio,
            2.0 * v - 1.0,
        );
        Ray::new(origin, dir).transform(&self.transformation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumo_math::{are_close, VEC_Y};

    fn corner_rays(camera: &dyn Camera) -> [Ray; 4] {
        [
            camera.fire_ray(0.0, 0.0),
            camera.fire_ray(1.0, 0.0),
            camera.fire_ray(0.0, 1.0),
            camera.fire_ray(1.0, 1.0),
        ]
    }

    fn assert_screen_corners(rays: &[Ray; 4]) {
        assert!(rays[0].at(1.0).is_close(&Point::new(0.0, 2.0, -1.0)));
        assert!(rays[1].at(1.0).is_close(&Point::new(0.0, -2.0, -1.0)));
        assert!(rays[2].at(1.0).is_close(&Point::new(0.0, 2.0, 1.0)));
        assert!(rays[3].at(1.0).is_close(&Point::new(0.0, -2.0, 1.0)));
    }

    #[test]
    fn test_orthogonal_camera() {
        let rays = corner_rays(&OrthogonalCamera::new(2.0));

        // Parallel rays have vanishing cross products
        for ray in &rays[1..] {
            assert!(are_close(0.0, rays[0].dir.cross(ray.dir).squared_norm()));
        }

        assert_screen_corners(&rays);
    }

    #[test]
    fn test_orthogonal_camera_transform() {
        let camera = OrthogonalCamera::default().with_transformation(
            Transformation::translation(-VEC_Y * 2.0) * Transformation::rotation_z(90.0),
        );

        let ray = camera.fire_ray(0.5, 0.5);
        assert!(ray.at(1.0).is_close(&Point::new(0.0, -2.0, 0.0)));
    }

    #[test]
    fn test_perspective_camera() {
        let rays = corner_rays(&PerspectiveCamera::new(1.0, 2.0));

        // All rays depart from the eye
        for ray in &rays[1..] {
            assert!(rays[0].origin.is_close(&ray.origin));
        }

        assert_screen_corners(&rays);
    }

    #[test]
    fn test_perspective_camera_transform() {
        let camera = PerspectiveCamera::default().with_transformation(
            Transformation::translation(-VEC_Y * 2.0) * Transformation::rotation_z(90.0),
        );

        let ray = camera.fire_ray(0.5, 0.5);
        assert!(ray.at(1.0).is_close(&Point::new(0.0, -2.0, 0.0)));
    }

    #[test]
    fn test_aperture() {
        let camera = PerspectiveCamera::new(1.0, 1.0);
        assert!((camera.aperture_deg() - 90.0).abs() < 1e-9);
    }
}
