//! Vectors, points, normals and surface coordinates.
//!
//! The three 3D types share a layout but not a meaning: a [`Vector`] is a
//! free direction, a [`Point`] is a position, and a [`Normal`] is an
//! orientation that transforms with the inverse-transpose of a matrix.
//! Keeping them distinct lets [`Transformation`](crate::Transformation)
//! pick the right rule for each at compile time.

use glam::DVec3;
use std::ops::{Add, Div, Index, Mul, Neg, Sub};

/// Default tolerance for approximate comparisons.
pub const EPSILON: f64 = 1e-6;

/// Return true if `a` and `b` differ by less than [`EPSILON`].
#[inline]
pub fn are_close(a: f64, b: f64) -> bool {
    are_close_eps(a, b, EPSILON)
}

/// Return true if `a` and `b` differ by less than `epsilon`.
#[inline]
pub fn are_close_eps(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

macro_rules! xyz_type {
    ($name:ident) => {
        impl $name {
            /// Create a new value from its three components.
            #[inline]
            pub const fn new(x: f64, y: f64, z: f64) -> Self {
                Self { x, y, z }
            }

            /// Component-wise comparison with tolerance [`EPSILON`].
            pub fn is_close(&self, other: &Self) -> bool {
                self.is_close_eps(other, EPSILON)
            }

            /// Component-wise comparison with a custom tolerance.
            pub fn is_close_eps(&self, other: &Self, epsilon: f64) -> bool {
                are_close_eps(self.x, other.x, epsilon)
                    && are_close_eps(self.y, other.y, epsilon)
                    && are_close_eps(self.z, other.z, epsilon)
            }
        }

        impl From<DVec3> for $name {
            #[inline]
            fn from(v: DVec3) -> Self {
                Self::new(v.x, v.y, v.z)
            }
        }

        impl From<$name> for DVec3 {
            #[inline]
            fn from(v: $name) -> Self {
                DVec3::new(v.x, v.y, v.z)
            }
        }

        impl Index<usize> for $name {
            type Output = f64;

            fn index(&self, index: usize) -> &f64 {
                match index {
                    0 => &self.x,
                    1 => &self.y,
                    2 => &self.z,
                    _ => panic!(
                        "{} component index out of range: {}",
                        stringify!($name),
                        index
                    ),
                }
            }
        }
    };
}

/// A free direction in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A position in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A surface orientation.
///
/// Not necessarily of unit length: shapes return normals scaled by their
/// transformation, and the world normalizes only the closest hit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Normal {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

xyz_type!(Vector);
xyz_type!(Point);
xyz_type!(Normal);

pub const VEC_X: Vector = Vector::new(1.0, 0.0, 0.0);
pub const VEC_Y: Vector = Vector::new(0.0, 1.0, 0.0);
pub const VEC_Z: Vector = Vector::new(0.0, 0.0, 1.0);

pub const ORIGIN: Point = Point::new(0.0, 0.0, 0.0);

impl Vector {
    #[inline]
    pub fn dot(&self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(&self, other: Vector) -> Vector {
        Vector::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[inline]
    pub fn squared_norm(&self) -> f64 {
        self.dot(*self)
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.squared_norm().sqrt()
    }

    /// Return a copy of this vector with unit length.
    ///
    /// A zero vector yields NaN components.
    #[inline]
    pub fn normalized(&self) -> Vector {
        *self / self.norm()
    }

    pub fn to_normal(&self) -> Normal {
        Normal::new(self.x, self.y, self.z)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vector> for f64 {
    type Output = Vector;

    fn mul(self, rhs: Vector) -> Vector {
        rhs * self
    }
}

impl Div<f64> for Vector {
    type Output = Vector;

    fn div(self, rhs: f64) -> Vector {
        Vector::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Point {
    /// The vector going from the origin to this point.
    #[inline]
    pub fn to_vector(&self) -> Vector {
        Vector::new(self.x, self.y, self.z)
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, rhs: Vector) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub<Vector> for Point {
    type Output = Point;

    fn sub(self, rhs: Vector) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Point) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

// Used for the projective division in `Transformation * Point`.
impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Normal {
    #[inline]
    pub fn squared_norm(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.squared_norm().sqrt()
    }

    #[inline]
    pub fn normalized(&self) -> Normal {
        let norm = self.norm();
        Normal::new(self.x / norm, self.y / norm, self.z / norm)
    }

    #[inline]
    pub fn to_vector(&self) -> Vector {
        Vector::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn dot(&self, v: Vector) -> f64 {
        self.x * v.x + self.y * v.y + self.z * v.z
    }
}

impl Neg for Normal {
    type Output = Normal;

    fn neg(self) -> Normal {
        Normal::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Normal {
    type Output = Normal;

    fn mul(self, rhs: f64) -> Normal {
        Normal::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<Normal> for Vector {
    fn from(n: Normal) -> Self {
        n.to_vector()
    }
}

/// Cosine of the angle between a vector and a normal, both normalized first.
pub fn normalized_dot(v: Vector, n: Normal) -> f64 {
    v.normalized().dot(n.normalized().to_vector())
}

/// A point on a parametric surface, `(u, v)` in `[0, 1] x [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2d {
    pub u: f64,
    pub v: f64,
}

impl Vec2d {
    #[inline]
    pub const fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }

    pub fn is_close(&self, other: &Vec2d) -> bool {
        are_close(self.u, other.u) && are_close(self.v, other.v)
    }
}

/// Build an orthonormal basis `(e1, e2, e3)` whose third axis is `normal`.
///
/// `normal` must have unit length. Uses the branchless construction from
/// Duff et al., "Building an Orthonormal Basis, Revisited" (JCGT 2017).
pub fn create_onb_from_z(normal: Normal) -> (Vector, Vector, Vector) {
    let (x, y, z) = (normal.x, normal.y, normal.z);
    let sign = 1.0_f64.copysign(z);
    let a = -1.0 / (sign + z);
    let b = x * y * a;

    let e1 = Vector::new(1.0 + sign * x * x * a, sign * b, -sign * x);
    let e2 = Vector::new(b, sign + y * y * a, -y);

    (e1, e2, normal.to_vector())
}
