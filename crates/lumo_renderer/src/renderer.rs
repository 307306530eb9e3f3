//! Solvers of the rendering equation.
//!
//! Each renderer estimates the radiance travelling backwards along a ray:
//! - [`OnOffRenderer`]: a fixed color wherever something is hit
//! - [`FlatRenderer`]: surface pigment plus emission, no lighting
//! - [`PointLightRenderer`]: direct lighting from point lights with shadows
//! - [`PathTracer`]: Monte Carlo path tracing with Russian roulette

use crate::World;
use lumo_core::{Color, BLACK, WHITE};
use lumo_math::{normalized_dot, Pcg, Ray};

/// Estimates the radiance along a ray.
///
/// `pcg` supplies every random number the estimate needs; deterministic
/// renderers ignore it.
pub trait Renderer: Send + Sync {
    fn radiance(&self, ray: &Ray, pcg: &mut Pcg) -> Color;
}

/// Paints every hit with a fixed color. Useful for debugging.
pub struct OnOffRenderer<'a> {
    world: &'a World,
    pub background_color: Color,
    pub color: Color,
}

impl<'a> OnOffRenderer<'a> {
    pub fn new(world: &'a World) -> Self {
        Self {
            world,
            background_color: BLACK,
            color: WHITE,
        }
    }

    pub fn with_background_color(mut self, background_color: Color) -> Self {
        self.background_color = background_color;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Renderer for OnOffRenderer<'_> {
    fn radiance(&self, ray: &Ray, _pcg: &mut Pcg) -> Color {
        if self.world.ray_intersection(ray).is_some() {
            self.color
        } else {
            self.background_color
        }
    }
}

/// Returns the pigment and emission of the closest surface, ignoring light.
pub struct FlatRenderer<'a> {
    world: &'a World,
    pub background_color: Color,
}

impl<'a> FlatRenderer<'a> {
    pub fn new(world: &'a World) -> Self {
        Self {
            world,
            background_color: BLACK,
        }
    }

    pub fn with_background_color(mut self, background_color: Color) -> Self {
        self.background_color = background_color;
        self
    }
}

impl Renderer for FlatRenderer<'_> {
    fn radiance(&self, ray: &Ray, _pcg: &mut Pcg) -> Color {
        let Some(hit) = self.world.ray_intersection(ray) else {
            return self.background_color;
        };

        let uv = hit.surface_point;
        hit.material.brdf.pigment().get_color(uv) + hit.material.emitted_radiance.get_color(uv)
    }
}

/// Direct illumination from the world's point lights, plus an ambient term.
pub struct PointLightRenderer<'a> {
    world: &'a World,
    pub background_color: Color,
    pub ambient_color: Color,
}

impl<'a> PointLightRenderer<'a> {
    pub fn new(world: &'a World) -> Self {
        Self {
            world,
            background_color: BLACK,
            ambient_color: Color::new(0.1, 0.1, 0.1),
        }
    }

    pub fn with_background_color(mut self, background_color: Color) -> Self {
        self.background_color = background_color;
        self
    }

    pub fn with_ambient_color(mut self, ambient_color: Color) -> Self {
        self.ambient_color = ambient_color;
        self
    }
}

impl Renderer for PointLightRenderer<'_> {
    fn radiance(&self, ray: &Ray, _pcg: &mut Pcg) -> Color {
        let Some(hit) = self.world.ray_intersection(ray) else {
            return self.background_color;
        };

        let material = hit.material;
        let uv = hit.surface_point;
        let mut result = self.ambient_color + material.emitted_radiance.get_color(uv);

        for light in self.world.point_lights() {
            if !self.world.is_point_visible(light.position, hit.world_point) {
                continue;
            }

            let to_light = light.position - hit.world_point;
            let distance = to_light.norm();
            let in_dir = to_light / distance;
            let cos_theta = normalized_dot(in_dir, hit.normal).max(0.0);

            let brdf_color = material.brdf.eval(hit.normal, in_dir, -ray.dir, uv);
            result += brdf_color * light.color * (cos_theta * light.distance_factor(distance));
        }

        result
    }
}

/// Unbiased Monte Carlo solver of the rendering equation.
///
/// Paths deeper than `max_depth` contribute nothing. From depth
/// `russian_roulette_limit` on, a path ends with probability
/// `q = max(0.05, 1 - lum)`, where `lum` is the largest channel of the
/// surface pigment; surviving paths are weighted by `1 / (1 - q)`.
pub struct PathTracer<'a> {
    world: &'a World,
    pub background_color: Color,
    /// Rays scattered at every bounce
    pub num_of_rays: u32,
    pub max_depth: u32,
    pub russian_roulette_limit: u32,
}

impl<'a> PathTracer<'a> {
    pub fn new(world: &'a World) -> Self {
        Self {
            world,
            background_color: BLACK,
            num_of_rays: 10,
            max_depth: 10,
            russian_roulette_limit: 3,
        }
    }

    pub fn with_background_color(mut self, background_color: Color) -> Self {
        self.background_color = background_color;
        self
    }

    /// Set the number of rays scattered at each bounce. Must be positive.
    pub fn with_num_of_rays(mut self, num_of_rays: u32) -> Self {
        assert!(num_of_rays > 0, "num_of_rays must be positive");
        self.num_of_rays = num_of_rays;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_russian_roulette_limit(mut self, russian_roulette_limit: u32) -> Self {
        self.russian_roulette_limit = russian_roulette_limit;
        self
    }
}

impl Renderer for PathTracer<'_> {
    fn radiance(&self, ray: &Ray, pcg: &mut Pcg) -> Color {
        if ray.depth > self.max_depth {
            return BLACK;
        }

        let Some(hit) = self.world.ray_intersection(ray) else {
            return self.background_color;
        };

        let material = hit.material;
        let mut hit_color = material.brdf.pigment().get_color(hit.surface_point);
        let emitted_radiance = material.emitted_radiance.get_color(hit.surface_point);
        let hit_color_lum = hit_color.max_component();

        if ray.depth >= self.russian_roulette_limit {
            let q = (1.0 - hit_color_lum).max(0.05);
            if pcg.random_float() > q {
                hit_color = hit_color * (1.0 / (1.0 - q));
            } else {
                return emitted_radiance;
            }
        }

        let mut cum_radiance = BLACK;
        if hit_color_lum > 0.0 {
            for _ in 0..self.num_of_rays {
                let new_ray = material.brdf.scatter_ray(
                    pcg,
                    hit.ray.dir,
                    hit.world_point,
                    hit.normal,
                    ray.depth + 1,
                );
                cum_radiance += hit_color * self.radiance(&new_ray, pcg);
            }
        }

        emitted_radiance + cum_radiance * (1.0 / self.num_of_rays as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Brdf, ImageTracer, Material, OrthogonalCamera, Pigment, PointLight, Sphere};
    use lumo_core::HdrImage;
    use lumo_math::{Point, Transformation, Vector, VEC_X};
    use std::sync::Arc;

    fn small_sphere_world(color: Color) -> World {
        let mut world = World::new();
        world.add_shape(Box::new(Sphere::new(
            Transformation::translation(Vector::new(2.0, 0.0, 0.0))
                * Transformation::scaling(Vector::new(0.2, 0.2, 0.2)),
            Arc::new(Material::new(Brdf::diffuse(Pigment::Uniform(color)))),
        )));
        world
    }

    /// Render a 3x3 image and check that only the central pixel sees the sphere.
    fn assert_only_center_is(renderer: &dyn Renderer, expected: Color) {
        let mut tracer = ImageTracer::new(HdrImage::new(3, 3), Box::new(OrthogonalCamera::default()));
        tracer.fire_all_rays(|ray, pcg| renderer.radiance(&ray, pcg));

        let image = tracer.image();
        for row in 0..3 {
            for col in 0..3 {
                let want = if (col, row) == (1, 1) { expected } else { BLACK };
                assert!(
                    image.get_pixel(col, row).is_close(&want),
                    "pixel ({}, {})",
                    col,
                    row
                );
            }
        }
    }

    #[test]
    fn test_onoff_renderer() {
        let world = small_sphere_world(WHITE);
        assert_only_center_is(&OnOffRenderer::new(&world), WHITE);
    }

    #[test]
    fn test_flat_renderer() {
        let sphere_color = Color::new(1.0, 2.0, 3.0);
        let world = small_sphere_world(sphere_color);
        assert_only_center_is(&FlatRenderer::new(&world), sphere_color);
    }

    #[test]
    fn test_point_light_renderer() {
        let mut world = World::new();
        world.add_shape(Box::new(Sphere::new(
            Transformation::IDENTITY,
            Arc::new(Material::new(Brdf::Diffuse {
                pigment: Pigment::Uniform(WHITE),
                reflectance: 1.0,
            })),
        )));
        world.add_light(PointLight::new(Point::new(-10.0, 0.0, 0.0), WHITE));

        let renderer = PointLightRenderer::new(&world).with_ambient_color(BLACK);
        let mut pcg = Pcg::default();

        // Facing the light: cos = 1, Lambertian white gives 1/π
        let lit = renderer.radiance(&Ray::new(Point::new(-5.0, 0.0, 0.0), VEC_X), &mut pcg);
        let expected = 1.0 / std::f64::consts::PI;
        assert!(lit.is_close(&Color::new(expected, expected, expected)));

        // The far side of the sphere is in shadow
        let shadowed = renderer.radiance(&Ray::new(Point::new(5.0, 0.0, 0.0), -VEC_X), &mut pcg);
        assert!(shadowed.is_close(&BLACK));

        // Misses get the background
        let renderer = renderer.with_background_color(Color::new(0.0, 0.0, 1.0));
        let miss = renderer.radiance(&Ray::new(Point::new(-5.0, 5.0, 0.0), VEC_X), &mut pcg);
        assert!(miss.is_close(&Color::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_point_light_distance_factor() {
        let mut world = World::new();
        world.add_shape(Box::new(Sphere::new(
            Transformation::IDENTITY,
            Arc::new(Material::new(Brdf::diffuse(Pigment::Uniform(WHITE)))),
        )));
        // The light is 4 units from the lit point at (-1, 0, 0)
        world.add_light(PointLight::new(Point::new(-5.0, 0.0, 0.0), WHITE).with_linear_radius(2.0));

        let renderer = PointLightRenderer::new(&world).with_ambient_color(BLACK);
        let color = renderer.radiance(&Ray::new(Point::new(-3.0, 0.0, 0.0), VEC_X), &mut Pcg::default());

        let expected = 0.25 / std::f64::consts::PI;
        assert!(color.is_close(&Color::new(expected, expected, expected)));
    }

    fn furnace_world(emitted_radiance: f64, reflectance: f64) -> World {
        let material = Material::new(Brdf::diffuse(Pigment::Uniform(WHITE * reflectance)))
            .with_emitted_radiance(Pigment::Uniform(WHITE * emitted_radiance));

        let mut world = World::new();
        world.add_shape(Box::new(Sphere::new(Transformation::IDENTITY, Arc::new(material))));
        world
    }

    #[test]
    fn test_furnace() {
        let mut pcg = Pcg::default();

        for _ in 0..5 {
            let emitted_radiance = pcg.random_float();
            // Keep the reflectance away from 1 so the series converges quickly
            let reflectance = pcg.random_float() * 0.9;
            let world = furnace_world(emitted_radiance, reflectance);

            let path_tracer = PathTracer::new(&world)
                .with_num_of_rays(1)
                .with_max_depth(100)
                .with_russian_roulette_limit(101);

            let ray = Ray::new(Point::new(0.0, 0.0, 0.0), VEC_X);
            let color = path_tracer.radiance(&ray, &mut pcg);

            let expected = emitted_radiance / (1.0 - reflectance);
            for channel in [color.r, color.g, color.b] {
                assert!(
                    (channel - expected).abs() <= 1e-3 * expected,
                    "got {}, expected {}",
                    channel,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_russian_roulette_is_unbiased() {
        let world = furnace_world(1.0, 0.5);
        let path_tracer = PathTracer::new(&world)
            .with_num_of_rays(1)
            .with_max_depth(1000)
            .with_russian_roulette_limit(0);

        let mut pcg = Pcg::default();
        let samples = 10_000;
        let ray = Ray::new(Point::new(0.0, 0.0, 0.0), VEC_X);
        let mean = (0..samples)
            .map(|_| path_tracer.radiance(&ray, &mut pcg).r)
            .sum::<f64>()
            / samples as f64;

        assert!((mean - 2.0).abs() < 0.1, "mean radiance {}", mean);
    }

    #[test]
    fn test_path_tracer_depth_cutoff() {
        let world = furnace_world(1.0, 0.5);
        let path_tracer = PathTracer::new(&world).with_max_depth(0);

        let deep_ray = Ray::new(Point::new(0.0, 0.0, 0.0), VEC_X).with_depth(1);
        assert!(path_tracer
            .radiance(&deep_ray, &mut Pcg::default())
            .is_close(&BLACK));
    }

    #[test]
    fn test_path_tracer_background() {
        let world = World::new();
        let sky = Color::new(0.2, 0.4, 0.8);
        let path_tracer = PathTracer::new(&world).with_background_color(sky);

        let color = path_tracer.radiance(&Ray::new(Point::new(0.0, 0.0, 0.0), VEC_X), &mut Pcg::default());
        assert!(color.is_close(&sky));
    }
}
