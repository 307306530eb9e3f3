//! Geometric primitives shared by every lumo crate.
//!
//! Double precision throughout: vectors, points and normals, affine
//! transformations with a cached inverse, rays, and the PCG generator that
//! drives all the stochastic parts of the renderer.

mod geometry;
mod interval;
mod pcg;
mod ray;
mod transform;

// Re-export glam for the matrix types exposed by `Transformation`
pub use glam;

pub use geometry::{
    are_close, are_close_eps, create_onb_from_z, normalized_dot, Normal, Point, Vec2d, Vector,
    EPSILON, ORIGIN, VEC_X, VEC_Y, VEC_Z,
};
pub use interval::Interval;
pub use pcg::Pcg;
pub use ray::{Ray, DEFAULT_TMIN};
pub use transform::Transformation;
