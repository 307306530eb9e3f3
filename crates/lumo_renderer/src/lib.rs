//! lumo renderer - CPU path tracing
//!
//! Shapes and materials, the scene container, cameras, and the four
//! rendering algorithms, plus sequential and parallel drivers that fire
//! rays through every pixel of an image.

mod bucket;
mod camera;
mod image_tracer;
mod light;
mod material;
mod plane;
mod renderer;
mod scene_builder;
mod shape;
mod sphere;
mod world;

pub use bucket::{
    generate_buckets, render_bucket, render_buckets, Bucket, BucketResult, RenderConfig,
    DEFAULT_BUCKET_SIZE,
};
pub use camera::{Camera, OrthogonalCamera, PerspectiveCamera};
pub use image_tracer::{ImageTracer, DEFAULT_CALLBACK_TIME_S};
pub use light::PointLight;
pub use material::{Brdf, Material, Pigment};
pub use plane::Plane;
pub use renderer::{FlatRenderer, OnOffRenderer, PathTracer, PointLightRenderer, Renderer};
pub use scene_builder::Scene;
pub use shape::{HitRecord, Shape};
pub use sphere::Sphere;
pub use world::World;
