//! Serializable scene descriptions.
//!
//! A scene file is JSON: a camera, a table of named materials, the list of
//! shapes referencing them by name, point lights and a background color.
//! This module only parses and validates the description; turning it into
//! renderable objects is the renderer's job.
//!
//! ```json
//! {
//!   "camera": { "type": "perspective", "distance": 1.0,
//!               "transformation": [ { "translation": [-1.0, 0.0, 1.0] } ] },
//!   "materials": {
//!     "sky":    { "brdf": { "diffuse": { "pigment": { "uniform": [0, 0, 0] } } },
//!                 "emitted_radiance": { "uniform": [1.0, 0.9, 0.5] } },
//!     "ground": { "brdf": { "diffuse": { "pigment": { "checkered": {
//!                   "color1": [0.3, 0.5, 0.1], "color2": [0.1, 0.2, 0.5], "steps": 4 } } } } }
//!   },
//!   "shapes": [
//!     { "sphere": { "material": "sky", "transformation": [ { "scaling": [200, 200, 200] } ] } },
//!     { "plane":  { "material": "ground" } }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use lumo_math::{Point, Transformation, Vector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{Color, BLACK};
use crate::hdr_image::ImageError;

/// Errors that can occur while loading a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown material {0:?}")]
    UndefinedMaterial(String),

    #[error("Failed to load texture: {0}")]
    Texture(#[from] ImageError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// One step of a transformation chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformDescription {
    Identity,
    Translation([f64; 3]),
    Scaling([f64; 3]),
    /// Angle in degrees.
    RotationX(f64),
    /// Angle in degrees.
    RotationY(f64),
    /// Angle in degrees.
    RotationZ(f64),
}

impl TransformDescription {
    pub fn to_transformation(&self) -> Transformation {
        match *self {
            TransformDescription::Identity => Transformation::IDENTITY,
            TransformDescription::Translation([x, y, z]) => {
                Transformation::translation(Vector::new(x, y, z))
            }
            TransformDescription::Scaling([x, y, z]) => {
                Transformation::scaling(Vector::new(x, y, z))
            }
            TransformDescription::RotationX(angle) => Transformation::rotation_x(angle),
            TransformDescription::RotationY(angle) => Transformation::rotation_y(angle),
            TransformDescription::RotationZ(angle) => Transformation::rotation_z(angle),
        }
    }
}

/// Compose a chain left to right: the first step is the outermost.
pub fn compose_transformations(chain: &[TransformDescription]) -> Transformation {
    chain
        .iter()
        .fold(Transformation::IDENTITY, |acc, step| acc * step.to_transformation())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PigmentDescription {
    Uniform(Color),
    Checkered {
        color1: Color,
        color2: Color,
        #[serde(default = "default_checkered_steps")]
        steps: u32,
    },
    /// Path to a PFM file or any LDR image.
    Image(String),
}

impl Default for PigmentDescription {
    fn default() -> Self {
        PigmentDescription::Uniform(BLACK)
    }
}

fn default_checkered_steps() -> u32 {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrdfDescription {
    Diffuse {
        pigment: PigmentDescription,
        #[serde(default = "default_reflectance")]
        reflectance: f64,
    },
    Specular {
        pigment: PigmentDescription,
        /// Angular tolerance in radians.
        #[serde(default = "default_threshold_angle")]
        threshold_angle_rad: f64,
    },
}

fn default_reflectance() -> f64 {
    1.0
}

fn default_threshold_angle() -> f64 {
    std::f64::consts::PI / 1800.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialDescription {
    pub brdf: BrdfDescription,

    /// Defaults to black (no emission)
    #[serde(default)]
    pub emitted_radiance: PigmentDescription,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShapeParameters {
    /// Name of an entry in [`SceneDescription::materials`]
    pub material: String,

    /// Object-to-world chain, empty for the identity
    #[serde(default)]
    pub transformation: Vec<TransformDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeDescription {
    /// Unit sphere centred on the origin
    Sphere(ShapeParameters),
    /// The z = 0 plane
    Plane(ShapeParameters),
}

impl ShapeDescription {
    pub fn parameters(&self) -> &ShapeParameters {
        match self {
            ShapeDescription::Sphere(params) | ShapeDescription::Plane(params) => params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LightDescription {
    pub position: [f64; 3],
    pub color: Color,

    /// Zero disables the distance falloff
    #[serde(default)]
    pub linear_radius: f64,
}

impl LightDescription {
    pub fn position(&self) -> Point {
        let [x, y, z] = self.position;
        Point::new(x, y, z)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum CameraDescription {
    Orthogonal {
        /// Defaults to the aspect ratio of the output image
        #[serde(default)]
        aspect_ratio: Option<f64>,
        #[serde(default)]
        transformation: Vec<TransformDescription>,
    },
    Perspective {
        /// Defaults to the aspect ratio of the output image
        #[serde(default)]
        aspect_ratio: Option<f64>,
        #[serde(default = "default_screen_distance")]
        distance: f64,
        #[serde(default)]
        transformation: Vec<TransformDescription>,
    },
}

fn default_screen_distance() -> f64 {
    1.0
}

/// A complete scene as read from disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDescription {
    /// Absent cameras are replaced by a default perspective camera
    #[serde(default)]
    pub camera: Option<CameraDescription>,

    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDescription>,

    #[serde(default)]
    pub shapes: Vec<ShapeDescription>,

    #[serde(default)]
    pub lights: Vec<LightDescription>,

    /// Radiance of rays that escape the scene
    #[serde(default)]
    pub background: Color,
}

impl SceneDescription {
    /// Parse and validate a JSON scene.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let scene: SceneDescription = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Read, parse and validate a JSON scene file.
    pub fn from_file(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let scene = Self::from_json_str(&json)?;

        log::debug!(
            "Loaded scene {}: {} materials, {} shapes, {} lights",
            path.display(),
            scene.materials.len(),
            scene.shapes.len(),
            scene.lights.len()
        );

        Ok(scene)
    }

    /// Check cross references and parameter ranges.
    pub fn validate(&self) -> SceneResult<()> {
        for shape in &self.shapes {
            let name = &shape.parameters().material;
            if !self.materials.contains_key(name) {
                return Err(SceneError::UndefinedMaterial(name.clone()));
            }
        }

        for (name, material) in &self.materials {
            let brdf_pigment = match &material.brdf {
                BrdfDescription::Diffuse { pigment, .. } => pigment,
                BrdfDescription::Specular { pigment, .. } => pigment,
            };
            for pigment in [brdf_pigment, &material.emitted_radiance] {
                if let PigmentDescription::Checkered { steps: 0, .. } = pigment {
                    return Err(SceneError::InvalidParameter(format!(
                        "material {name:?}: checkered pigment needs at least one step"
                    )));
                }
            }
        }

        match &self.camera {
            Some(CameraDescription::Perspective { distance, .. }) if *distance <= 0.0 => {
                Err(SceneError::InvalidParameter(format!(
                    "camera distance must be positive, got {distance}"
                )))
            }
            Some(
                CameraDescription::Orthogonal {
                    aspect_ratio: Some(ratio),
                    ..
                }
                | CameraDescription::Perspective {
                    aspect_ratio: Some(ratio),
                    ..
                },
            ) if *ratio <= 0.0 => Err(SceneError::InvalidParameter(format!(
                "camera aspect ratio must be positive, got {ratio}"
            ))),
            _ => Ok(()),
        }
    }
}
