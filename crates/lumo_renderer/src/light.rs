//! Point light sources.

use lumo_core::Color;
use lumo_math::Point;

/// An infinitesimal light source used by the point-light renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Point,
    pub color: Color,
    /// Apparent radius of the source. When positive, the contribution
    /// falls off as `(linear_radius / distance)^2`.
    pub linear_radius: f64,
}

impl PointLight {
    /// Create a light with no distance falloff.
    pub fn new(position: Point, color: Color) -> Self {
        Self {
            position,
            color,
            linear_radius: 0.0,
        }
    }

    pub fn with_linear_radius(mut self, linear_radius: f64) -> Self {
        self.linear_radius = linear_radius;
        self
    }

    /// Scale applied to the light's color at `distance` from it.
    pub fn distance_factor(&self, distance: f64) -> f64 {
        if self.linear_radius > 0.0 {
            let ratio = self.linear_radius / distance;
            ratio * ratio
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumo_core::WHITE;

    #[test]
    fn test_distance_factor() {
        let light = PointLight::new(Point::new(0.0, 0.0, 0.0), WHITE);
        assert_eq!(light.distance_factor(10.0), 1.0);

        let light = light.with_linear_radius(2.0);
        assert!((light.distance_factor(4.0) - 0.25).abs() < 1e-12);
    }
}
