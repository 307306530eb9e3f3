use crate::{Interval, Point, Transformation, Vector};

/// Default lower bound of the parametric interval, to avoid self-intersections.
pub const DEFAULT_TMIN: f64 = 1e-5;

/// A ray in 3D space.
///
/// Points along the ray are `origin + dir * t` for `t` strictly between
/// `tmin` and `tmax`. `depth` counts how many times the ray has bounced.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Point,
    pub dir: Vector,
    pub tmin: f64,
    pub tmax: f64,
    pub depth: u32,
}

impl Ray {
    /// Create a primary ray with the default interval `(1e-5, +inf)` and depth 0.
    pub fn new(origin: Point, dir: Vector) -> Self {
        Self {
            origin,
            dir,
            tmin: DEFAULT_TMIN,
            tmax: f64::INFINITY,
            depth: 0,
        }
    }

    /// Replace the valid parametric interval.
    pub fn with_interval(mut self, tmin: f64, tmax: f64) -> Self {
        self.tmin = tmin;
        self.tmax = tmax;
        self
    }

    /// Replace the bounce count.
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// The open interval `(tmin, tmax)` of accepted hit parameters.
    #[inline]
    pub fn interval(&self) -> Interval {
        Interval::new(self.tmin, self.tmax)
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + dir * t
    #[inline]
    pub fn at(&self, t: f64) -> Point {
        self.origin + self.dir * t
    }

    /// Map origin and direction through `transformation`, keeping the
    /// interval and depth.
    pub fn transform(&self, transformation: &Transformation) -> Ray {
        Ray {
            origin: *transformation * self.origin,
            dir: *transformation * self.dir,
            ..*self
        }
    }

    /// Compare origin and direction within `1e-5`.
    pub fn is_close(&self, other: &Ray) -> bool {
        self.origin.is_close_eps(&other.origin, 1e-5) && self.dir.is_close_eps(&other.dir, 1e-5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VEC_X;

    #[test]
    fn test_ray_creation() {
        let ray = Ray::new(Point::new(1.0, 2.0, 3.0), Vector::new(0.0, 1.0, 0.0));

        assert_eq!(ray.tmin, DEFAULT_TMIN);
        assert_eq!(ray.tmax, f64::INFINITY);
        assert_eq!(ray.depth, 0);
    }

    #[test]
    fn test_is_close() {
        let ray1 = Ray::new(Point::new(1.0, 2.0, 3.0), Vector::new(5.0, 4.0, -1.0));
        let ray2 = Ray::new(Point::new(1.0, 2.0, 3.0), Vector::new(5.0, 4.0, -1.0));
        let ray3 = Ray::new(Point::new(5.0, 1.0, 4.0), Vector::new(3.0, 9.0, 4.0));

        assert!(ray1.is_close(&ray2));
        assert!(!ray1.is_close(&ray3));
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Point::new(1.0, 2.0, 4.0), Vector::new(4.0, 2.0, 1.0));

        assert!(ray.at(0.0).is_close(&ray.origin));
        assert!(ray.at(1.0).is_close(&Point::new(5.0, 4.0, 5.0)));
        assert!(ray.at(2.0).is_close(&Point::new(9.0, 6.0, 6.0)));
    }

    #[test]
    fn test_transform() {
        let ray = Ray::new(Point::new(1.0, 2.0, 3.0), Vector::new(6.0, 5.0, 4.0))
            .with_interval(0.5, 10.0)
            .with_depth(3);
        let transformation = Transformation::translation(Vector::new(10.0, 11.0, 12.0))
            * Transformation::rotation_x(90.0);
        let transformed = ray.transform(&transformation);

        assert!(transformed.origin.is_close(&Point::new(11.0, 8.0, 14.0)));
        assert!(transformed.dir.is_close(&Vector::new(6.0, -4.0, 5.0)));
        assert_eq!(transformed.tmin, 0.5);
        assert_eq!(transformed.tmax, 10.0);
        assert_eq!(transformed.depth, 3);
    }

    #[test]
    fn test_ray_interval_is_open() {
        let ray = Ray::new(Point::default(), VEC_X).with_interval(0.0, 1.0);
        let interval = ray.interval();

        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(1.0));
        assert!(interval.surrounds(0.5));
    }

    #[test]
    fn test_ray_copy() {
        let ray1 = Ray::new(Point::default(), VEC_X);
        let ray2 = ray1; // Copy, not move

        assert_eq!(ray1.origin, ray2.origin);
        assert!(ray1.at(1.0).is_close(&ray2.at(1.0)));
    }
}
