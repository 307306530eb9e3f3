// Affine transformations with a precomputed inverse.
//
// Every constructor builds the forward matrix and its inverse together, so
// `inverse()` is a swap and never a 4x4 inversion.

use glam::{DMat4, DVec3, DVec4};
use std::fmt;
use std::ops::Mul;

use crate::geometry::{Normal, Point, Vector, EPSILON};

/// An affine transformation `m` together with its inverse `invm`.
///
/// Invariant: `m * invm` is the identity (within [`EPSILON`]). All the
/// constructors in this module uphold it; [`Transformation::from_rows`] trusts
/// its caller and [`Transformation::is_consistent`] checks it.
#[derive(Clone, Copy, PartialEq)]
pub struct Transformation {
    m: DMat4,
    invm: DMat4,
}

impl Default for Transformation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transformation {
    pub const IDENTITY: Transformation = Transformation {
        m: DMat4::IDENTITY,
        invm: DMat4::IDENTITY,
    };

    /// Build a transformation from a matrix and its inverse, both given row by row.
    pub fn from_rows(m: [[f64; 4]; 4], invm: [[f64; 4]; 4]) -> Self {
        Self {
            m: DMat4::from_cols_array_2d(&m).transpose(),
            invm: DMat4::from_cols_array_2d(&invm).transpose(),
        }
    }

    /// Rigid translation by `vec`.
    pub fn translation(vec: Vector) -> Self {
        let offset = DVec3::from(vec);
        Self {
            m: DMat4::from_translation(offset),
            invm: DMat4::from_translation(-offset),
        }
    }

    /// Scaling by `vec.x`, `vec.y`, `vec.z` along the three axes.
    ///
    /// A zero component yields an infinite inverse.
    pub fn scaling(vec: Vector) -> Self {
        let factors = DVec3::from(vec);
        Self {
            m: DMat4::from_scale(factors),
            invm: DMat4::from_scale(factors.recip()),
        }
    }

    /// Rotation around the X axis; positive angles follow the right-hand rule.
    pub fn rotation_x(angle_deg: f64) -> Self {
        let angle = angle_deg.to_radians();
        Self {
            m: DMat4::from_rotation_x(angle),
            invm: DMat4::from_rotation_x(-angle),
        }
    }

    /// Rotation around the Y axis; positive angles follow the right-hand rule.
    pub fn rotation_y(angle_deg: f64) -> Self {
        let angle = angle_deg.to_radians();
        Self {
            m: DMat4::from_rotation_y(angle),
            invm: DMat4::from_rotation_y(-angle),
        }
    }

    /// Rotation around the Z axis; positive angles follow the right-hand rule.
    pub fn rotation_z(angle_deg: f64) -> Self {
        let angle = angle_deg.to_radians();
        Self {
            m: DMat4::from_rotation_z(angle),
            invm: DMat4::from_rotation_z(-angle),
        }
    }

    /// The inverse transformation. O(1): swaps the two stored matrices.
    #[inline]
    pub fn inverse(&self) -> Self {
        Self {
            m: self.invm,
            invm: self.m,
        }
    }

    /// The forward matrix.
    pub fn matrix(&self) -> &DMat4 {
        &self.m
    }

    /// The inverse matrix.
    pub fn inverse_matrix(&self) -> &DMat4 {
        &self.invm
    }

    /// Check that `m * invm` is the identity. Meant for tests, not hot paths.
    pub fn is_consistent(&self) -> bool {
        (self.m * self.invm).abs_diff_eq(DMat4::IDENTITY, EPSILON)
    }

    /// Check that both matrices match those of `other`.
    pub fn is_close(&self, other: &Transformation) -> bool {
        self.m.abs_diff_eq(other.m, EPSILON) && self.invm.abs_diff_eq(other.invm, EPSILON)
    }
}

impl Mul for Transformation {
    type Output = Transformation;

    /// `(A * B)` applies `B` first. The inverse is `B⁻¹ · A⁻¹`.
    fn mul(self, rhs: Transformation) -> Transformation {
        Transformation {
            m: self.m * rhs.m,
            invm: rhs.invm * self.invm,
        }
    }
}

impl Mul<Vector> for Transformation {
    type Output = Vector;

    fn mul(self, rhs: Vector) -> Vector {
        self.m.transform_vector3(rhs.into()).into()
    }
}

impl Mul<Point> for Transformation {
    type Output = Point;

    fn mul(self, rhs: Point) -> Point {
        let p = self.m * DVec4::new(rhs.x, rhs.y, rhs.z, 1.0);
        let point = Point::new(p.x, p.y, p.z);

        // Only projective matrices have w != 1, and none are built here
        if p.w == 1.0 {
            point
        } else {
            point * (1.0 / p.w)
        }
    }
}

impl Mul<Normal> for Transformation {
    type Output = Normal;

    /// Normals use the transpose of the inverse matrix.
    fn mul(self, rhs: Normal) -> Normal {
        self.invm.transpose().transform_vector3(rhs.into()).into()
    }
}

impl fmt::Debug for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[")?;
        for row in 0..4 {
            let r = self.m.row(row);
            writeln!(f, "   [{:6.3e} {:6.3e} {:6.3e} {:6.3e}],", r.x, r.y, r.z, r.w)?;
        }
        write!(f, "]")
    }
}
