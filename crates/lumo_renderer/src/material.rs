//! Pigments, BRDFs and materials.
//!
//! A [`Pigment`] maps surface coordinates to a color, a [`Brdf`] describes
//! how a surface scatters light, and a [`Material`] pairs a BRDF with an
//! emission pigment.

use std::f64::consts::PI;
use std::sync::Arc;

use lumo_core::{Color, HdrImage, BLACK, WHITE};
use lumo_math::{create_onb_from_z, Normal, Pcg, Point, Ray, Vec2d, Vector};

/// Lower bound of the interval of rays leaving a diffuse surface.
const DIFFUSE_RAY_TMIN: f64 = 1e-3;

/// Lower bound of the interval of rays leaving a mirror.
const SPECULAR_RAY_TMIN: f64 = 1e-5;

/// A function from surface coordinates `(u, v)` to a color.
#[derive(Debug, Clone)]
pub enum Pigment {
    /// The same color everywhere.
    Uniform(Color),

    /// A chessboard with `steps` squares per side of the unit (u, v) square.
    Checkered {
        color1: Color,
        color2: Color,
        steps: u32,
    },

    /// A texture, looked up with nearest-neighbour sampling.
    Image(Arc<HdrImage>),
}

impl Default for Pigment {
    fn default() -> Self {
        Pigment::Uniform(WHITE)
    }
}

impl Pigment {
    pub fn checkered(color1: Color, color2: Color, steps: u32) -> Self {
        Pigment::Checkered {
            color1,
            color2,
            steps,
        }
    }

    pub fn image(image: HdrImage) -> Self {
        Pigment::Image(Arc::new(image))
    }

    /// Color of the pigment at `uv`.
    pub fn get_color(&self, uv: Vec2d) -> Color {
        match self {
            Pigment::Uniform(color) => *color,

            Pigment::Checkered {
                color1,
                color2,
                steps,
            } => {
                let steps = *steps as f64;
                let int_u = (uv.u * steps).floor() as i64;
                let int_v = (uv.v * steps).floor() as i64;

                if int_u.rem_euclid(2) == int_v.rem_euclid(2) {
                    *color1
                } else {
                    *color2
                }
            }

            Pigment::Image(image) if image.pixels.is_empty() => BLACK,

            Pigment::Image(image) => {
                // No interpolation between neighbouring pixels
                let col = ((uv.u * image.width as f64) as usize).min(image.width - 1);
                let row = ((uv.v * image.height as f64) as usize).min(image.height - 1);
                image.get_pixel(col, row)
            }
        }
    }
}

/// A bidirectional reflectance distribution function.
#[derive(Debug, Clone)]
pub enum Brdf {
    /// Ideal Lambertian surface.
    Diffuse { pigment: Pigment, reflectance: f64 },

    /// Ideal mirror. `threshold_angle_rad` is the tolerance used by
    /// [`Brdf::eval`] to decide whether two directions are symmetric.
    Specular {
        pigment: Pigment,
        threshold_angle_rad: f64,
    },
}

impl Default for Brdf {
    fn default() -> Self {
        Brdf::diffuse(Pigment::default())
    }
}

impl Brdf {
    /// Diffuse BRDF with reflectance 1.
    pub fn diffuse(pigment: Pigment) -> Self {
        Brdf::Diffuse {
            pigment,
            reflectance: 1.0,
        }
    }

    /// Mirror BRDF with an angular tolerance of 0.1°.
    pub fn specular(pigment: Pigment) -> Self {
        Brdf::Specular {
            pigment,
            threshold_angle_rad: PI / 1800.0,
        }
    }

    pub fn pigment(&self) -> &Pigment {
        match self {
            Brdf::Diffuse { pigment, .. } | Brdf::Specular { pigment, .. } => pigment,
        }
    }

    /// Evaluate the BRDF for light arriving along `in_dir` and leaving along
    /// `out_dir`, both pointing away from the surface.
    pub fn eval(&self, normal: Normal, in_dir: Vector, out_dir: Vector, uv: Vec2d) -> Color {
        match self {
            Brdf::Diffuse {
                pigment,
                reflectance,
            } => pigment.get_color(uv) * (reflectance / PI),

            Brdf::Specular {
                pigment,
                threshold_angle_rad,
            } => {
                let normal = normal.normalized().to_vector();
                let theta_in = normal.dot(in_dir.normalized()).clamp(-1.0, 1.0).acos();
                let theta_out = normal.dot(out_dir.normalized()).clamp(-1.0, 1.0).acos();

                if (theta_in - theta_out).abs() < *threshold_angle_rad {
                    pigment.get_color(uv)
                } else {
                    BLACK
                }
            }
        }
    }

    /// Sample a new ray leaving `interaction_point`.
    ///
    /// `normal` must have unit length and lie on the side the incoming ray
    /// came from. The diffuse branch draws two numbers from `pcg`; the
    /// mirror is deterministic and leaves `pcg` untouched.
    pub fn scatter_ray(
        &self,
        pcg: &mut Pcg,
        incoming_dir: Vector,
        interaction_point: Point,
        normal: Normal,
        depth: u32,
    ) -> Ray {
        match self {
            Brdf::Diffuse { .. } => {
                // Cosine-weighted distribution around the normal
                let (e1, e2, e3) = create_onb_from_z(normal);
                let cos_theta_sq = pcg.random_float();
                let cos_theta = cos_theta_sq.sqrt();
                let sin_theta = (1.0 - cos_theta_sq).sqrt();
                let phi = 2.0 * PI * pcg.random_float();

                let dir = e1 * (phi.cos() * sin_theta)
                    + e2 * (phi.sin() * sin_theta)
                    + e3 * cos_theta;

                Ray::new(interaction_point, dir)
                    .with_interval(DIFFUSE_RAY_TMIN, f64::INFINITY)
                    .with_depth(depth)
            }

            Brdf::Specular { .. } => {
                let ray_dir = incoming_dir.normalized();
                let normal = normal.normalized().to_vector();
                let dot_prod = normal.dot(ray_dir);

                Ray::new(interaction_point, ray_dir - normal * (2.0 * dot_prod))
                    .with_interval(SPECULAR_RAY_TMIN, f64::INFINITY)
                    .with_depth(depth)
            }
        }
    }
}

/// A BRDF together with the radiance the surface emits.
#[derive(Debug, Clone)]
pub struct Material {
    pub brdf: Brdf,
    pub emitted_radiance: Pigment,
}

impl Default for Material {
    /// A perfectly black diffuse surface that emits nothing.
    fn default() -> Self {
        Self {
            brdf: Brdf::diffuse(Pigment::Uniform(BLACK)),
            emitted_radiance: Pigment::Uniform(BLACK),
        }
    }
}

impl Material {
    /// A non-emitting material.
    pub fn new(brdf: Brdf) -> Self {
        Self {
            brdf,
            emitted_radiance: Pigment::Uniform(BLACK),
        }
    }

    pub fn with_emitted_radiance(mut self, emitted_radiance: Pigment) -> Self {
        self.emitted_radiance = emitted_radiance;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumo_math::{VEC_X, VEC_Z};

    #[test]
    fn test_uniform_pigment() {
        let color = Color::new(1.0, 2.0, 3.0);
        let pigment = Pigment::Uniform(color);

        assert!(pigment.get_color(Vec2d::new(0.0, 0.0)).is_close(&color));
        assert!(pigment.get_color(Vec2d::new(1.0, 0.0)).is_close(&color));
        assert!(pigment.get_color(Vec2d::new(0.0, 1.0)).is_close(&color));
        assert!(pigment.get_color(Vec2d::new(1.0, 1.0)).is_close(&color));
    }

    #[test]
    fn test_image_pigment() {
        let mut image = HdrImage::new(2, 2);
        image.set_pixel(0, 0, Color::new(1.0, 2.0, 3.0));
        image.set_pixel(1, 0, Color::new(2.0, 3.0, 1.0));
        image.set_pixel(0, 1, Color::new(2.0, 1.0, 3.0));
        image.set_pixel(1, 1, Color::new(3.0, 2.0, 1.0));

        let pigment = Pigment::image(image);
        assert!(pigment.get_color(Vec2d::new(0.0, 0.0)).is_close(&Color::new(1.0, 2.0, 3.0)));
        assert!(pigment.get_color(Vec2d::new(1.0, 0.0)).is_close(&Color::new(2.0, 3.0, 1.0)));
        assert!(pigment.get_color(Vec2d::new(0.0, 1.0)).is_close(&Color::new(2.0, 1.0, 3.0)));
        assert!(pigment.get_color(Vec2d::new(1.0, 1.0)).is_close(&Color::new(3.0, 2.0, 1.0)));
    }

    #[test]
    fn test_empty_image_pigment_is_black() {
        let pigment = Pigment::image(HdrImage::new(0, 0));
        assert!(pigment.get_color(Vec2d::new(0.5, 0.5)).is_close(&BLACK));
    }

    #[test]
    fn test_checkered_pigment() {
        let color1 = Color::new(1.0, 2.0, 3.0);
        let color2 = Color::new(10.0, 20.0, 30.0);

        let pigment = Pigment::checkered(color1, color2, 2);

        // With 2 steps the pattern is
        //
        //   (0, 0) +------+------+ (1, 0)
        //          | col1 | col2 |
        // (0, 0.5) +------+------+ (1, 0.5)
        //          | col2 | col1 |
        //   (0, 1) +------+------+ (1, 1)
        assert!(pigment.get_color(Vec2d::new(0.25, 0.25)).is_close(&color1));
        assert!(pigment.get_color(Vec2d::new(0.75, 0.25)).is_close(&color2));
        assert!(pigment.get_color(Vec2d::new(0.25, 0.75)).is_close(&color2));
        assert!(pigment.get_color(Vec2d::new(0.75, 0.75)).is_close(&color1));
    }

    #[test]
    fn test_checkered_pigment_negative_coordinates() {
        let pigment = Pigment::checkered(WHITE, BLACK, 1);
        assert!(pigment.get_color(Vec2d::new(-0.5, -0.5)).is_close(&WHITE));
        assert!(pigment.get_color(Vec2d::new(-0.5, 0.5)).is_close(&BLACK));
    }

    #[test]
    fn test_diffuse_eval() {
        let brdf = Brdf::Diffuse {
            pigment: Pigment::Uniform(Color::new(0.5, 1.0, 0.25)),
            reflectance: 0.8,
        };
        let color = brdf.eval(Normal::new(0.0, 0.0, 1.0), VEC_Z, VEC_X, Vec2d::default());
        assert!(color.is_close(&(Color::new(0.5, 1.0, 0.25) * (0.8 / PI))));
    }

    #[test]
    fn test_specular_eval() {
        let brdf = Brdf::specular(Pigment::Uniform(WHITE));
        let normal = Normal::new(0.0, 0.0, 1.0);
        let uv = Vec2d::default();

        let in_dir = Vector::new(1.0, 0.0, 1.0);
        let mirrored = Vector::new(-1.0, 0.0, 1.0);
        let off = Vector::new(-1.0, 0.0, 2.0);

        assert!(brdf.eval(normal, in_dir, mirrored, uv).is_close(&WHITE));
        assert!(brdf.eval(normal, in_dir, off, uv).is_close(&BLACK));
    }

    #[test]
    fn test_diffuse_scatter_stays_in_hemisphere() {
        let brdf = Brdf::diffuse(Pigment::Uniform(WHITE));
        let mut pcg = Pcg::default();
        let normal = Normal::new(1.0, 2.0, -0.5).normalized();
        let point = Point::new(1.0, 2.0, 3.0);

        for _ in 0..1000 {
            let ray = brdf.scatter_ray(&mut pcg, VEC_X, point, normal, 4);

            assert!(normal.dot(ray.dir) >= -1e-12);
            assert!((ray.dir.norm() - 1.0).abs() < 1e-9);
            assert_eq!(ray.origin, point);
            assert_eq!(ray.tmin, DIFFUSE_RAY_TMIN);
            assert_eq!(ray.tmax, f64::INFINITY);
            assert_eq!(ray.depth, 4);
        }
    }

    #[test]
    fn test_diffuse_scatter_is_cosine_weighted() {
        // For a cosine-weighted lobe E[cos θ] = 2/3
        let brdf = Brdf::diffuse(Pigment::Uniform(WHITE));
        let mut pcg = Pcg::default();
        let normal = Normal::new(0.0, 0.0, 1.0);

        let n = 20_000;
        let mean_cos: f64 = (0..n)
            .map(|_| brdf.scatter_ray(&mut pcg, VEC_X, Point::default(), normal, 1).dir.z)
            .sum::<f64>()
            / n as f64;

        assert!((mean_cos - 2.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn test_specular_scatter() {
        let brdf = Brdf::specular(Pigment::Uniform(WHITE));
        let mut pcg = Pcg::default();
        let before = pcg.clone();

        let ray = brdf.scatter_ray(
            &mut pcg,
            Vector::new(1.0, 0.0, -1.0),
            Point::new(0.0, 0.0, 0.0),
            Normal::new(0.0, 0.0, 1.0),
            2,
        );

        let expected = Vector::new(1.0, 0.0, 1.0).normalized();
        assert!(ray.dir.is_close(&expected));
        assert_eq!(ray.tmin, SPECULAR_RAY_TMIN);
        assert_eq!(ray.depth, 2);
        assert_eq!(pcg, before);
    }

    #[test]
    fn test_default_material_is_black() {
        let material = Material::default();
        let uv = Vec2d::new(0.3, 0.7);

        assert!(material.brdf.pigment().get_color(uv).is_close(&BLACK));
        assert!(material.emitted_radiance.get_color(uv).is_close(&BLACK));
    }

    #[test]
    fn test_material_builder() {
        let material = Material::new(Brdf::diffuse(Pigment::Uniform(WHITE)))
            .with_emitted_radiance(Pigment::Uniform(Color::new(1.0, 0.9, 0.5)));

        assert!(material
            .emitted_radiance
            .get_color(Vec2d::default())
            .is_close(&Color::new(1.0, 0.9, 0.5)));
    }
}
