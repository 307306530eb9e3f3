//! Lumo Core - Colors, HDR images and scene descriptions.
//!
//! This crate provides:
//!
//! - **Color**: linear RGB radiance with the usual arithmetic
//! - **HdrImage**: float image buffer, PFM codec, tone mapping and LDR export
//! - **Scene descriptions**: JSON scene files parsed with serde
//!
//! # Example
//!
//! ```ignore
//! use lumo_core::{HdrImage, SceneDescription};
//!
//! let scene = SceneDescription::from_file("scene.json")?;
//! println!("Loaded {} shapes, {} lights", scene.shapes.len(), scene.lights.len());
//!
//! let mut image = HdrImage::load("render.pfm")?;
//! image.normalize_image(0.2, None);
//! image.clamp_image();
//! image.write_ldr_image("render.png", 1.0)?;
//! ```

pub mod color;
pub mod hdr_image;
pub mod scene;

// Re-export commonly used types
pub use color::{Color, BLACK, WHITE};
pub use hdr_image::{Endianness, HdrImage, ImageError, ImageResult, PfmError, PfmResult};
pub use scene::{SceneDescription, SceneError, SceneResult};
