//! Turning a [`SceneDescription`] into something the renderers can use.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::{
    Brdf, Camera, Material, OrthogonalCamera, PerspectiveCamera, Pigment, Plane, PointLight,
    Sphere, World,
};
use lumo_core::scene::{
    compose_transformations, BrdfDescription, CameraDescription, MaterialDescription,
    PigmentDescription, ShapeDescription,
};
use lumo_core::{Color, HdrImage, SceneDescription, SceneError, SceneResult};

/// A world ready to render, with the camera looking at it.
pub struct Scene {
    pub world: World,
    pub camera: Box<dyn Camera>,
    /// Radiance of rays that hit nothing
    pub background: Color,
}

impl Scene {
    /// Build the scene for an image of the given aspect ratio.
    ///
    /// Relative texture paths are resolved against `asset_dir`. A camera
    /// without an explicit aspect ratio uses `aspect_ratio`; a scene
    /// without a camera gets a perspective camera at the origin.
    pub fn build(
        description: &SceneDescription,
        aspect_ratio: f64,
        asset_dir: &Path,
    ) -> SceneResult<Self> {
        description.validate()?;

        let mut materials: HashMap<&str, Arc<Material>> = HashMap::new();
        for (name, material) in &description.materials {
            materials.insert(name.as_str(), Arc::new(build_material(material, asset_dir)?));
        }

        let mut world = World::new();
        for shape in &description.shapes {
            let params = shape.parameters();
            let material = materials
                .get(params.material.as_str())
                .cloned()
                .ok_or_else(|| SceneError::UndefinedMaterial(params.material.clone()))?;
            let transformation = compose_transformations(&params.transformation);

            match shape {
                ShapeDescription::Sphere(_) => {
                    world.add_shape(Box::new(Sphere::new(transformation, material)))
                }
                ShapeDescription::Plane(_) => {
                    world.add_shape(Box::new(Plane::new(transformation, material)))
                }
            }
        }

        for light in &description.lights {
            world.add_light(
                PointLight::new(light.position(), light.color)
                    .with_linear_radius(light.linear_radius),
            );
        }

        let camera = build_camera(description.camera.as_ref(), aspect_ratio);

        log::debug!(
            "Built scene: {} materials, {} shapes, {} lights",
            materials.len(),
            world.len(),
            world.point_lights().len()
        );

        Ok(Self {
            world,
            camera,
            background: description.background,
        })
    }

    /// Load and build a scene file; textures are looked up next to it.
    pub fn from_file(path: impl AsRef<Path>, aspect_ratio: f64) -> SceneResult<Self> {
        let path = path.as_ref();
        let description = SceneDescription::from_file(path)?;
        let asset_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::build(&description, aspect_ratio, asset_dir)
    }
}

fn build_camera(description: Option<&CameraDescription>, default_aspect: f64) -> Box<dyn Camera> {
    match description {
        Some(CameraDescription::Orthogonal {
            aspect_ratio,
            transformation,
        }) => Box::new(
            OrthogonalCamera::new(aspect_ratio.unwrap_or(default_aspect))
                .with_transformation(compose_transformations(transformation)),
        ),
        Some(CameraDescription::Perspective {
            aspect_ratio,
            distance,
            transformation,
        }) => Box::new(
            PerspectiveCamera::new(*distance, aspect_ratio.unwrap_or(default_aspect))
                .with_transformation(compose_transformations(transformation)),
        ),
        None => {
            log::warn!("Scene has no camera, using a perspective camera at the origin");
            Box::new(PerspectiveCamera::new(1.0, default_aspect))
        }
    }
}

fn build_material(description: &MaterialDescription, asset_dir: &Path) -> SceneResult<Material> {
    let brdf = match &description.brdf {
        BrdfDescription::Diffuse {
            pigment,
            reflectance,
        } => Brdf::Diffuse {
            pigment: build_pigment(pigment, asset_dir)?,
            reflectance: *reflectance,
        },
        BrdfDescription::Specular {
            pigment,
            threshold_angle_rad,
        } => Brdf::Specular {
            pigment: build_pigment(pigment, asset_dir)?,
            threshold_angle_rad: *threshold_angle_rad,
        },
    };

    Ok(Material::new(brdf)
        .with_emitted_radiance(build_pigment(&description.emitted_radiance, asset_dir)?))
}

fn build_pigment(description: &PigmentDescription, asset_dir: &Path) -> SceneResult<Pigment> {
    Ok(match description {
        PigmentDescription::Uniform(color) => Pigment::Uniform(*color),
        PigmentDescription::Checkered {
            color1,
            color2,
            steps,
        } => Pigment::checkered(*color1, *color2, *steps),
        PigmentDescription::Image(file) => {
            let path = asset_dir.join(file);
            let image = HdrImage::load(&path)?;
            log::debug!(
                "Loaded texture {} ({}x{})",
                path.display(),
                image.width,
                image.height
            );
            Pigment::image(image)
        }
    })
}
