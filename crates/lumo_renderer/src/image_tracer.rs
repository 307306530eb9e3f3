//! Sequential per-pixel ray firing.

use std::time::Instant;

use crate::Camera;
use lumo_core::{Color, HdrImage, BLACK};
use lumo_math::{Pcg, Ray};

/// Default minimum time between two progress callbacks.
pub const DEFAULT_CALLBACK_TIME_S: f64 = 2.0;

/// Fires rays through every pixel of an image and stores the colors they return.
///
/// Pixel `(0, 0)` is the top-left corner of the image, while the camera's
/// screen coordinate `v = 1` is its top edge, so `v` is flipped here.
///
/// The tracer owns a single [`Pcg`]. It draws the stratified jitter from it
/// and lends it to the radiance function, so for every sample the jitter
/// draws come first and the renderer continues on the same stream.
pub struct ImageTracer {
    image: HdrImage,
    camera: Box<dyn Camera>,
    /// Side of the stratified sampling grid; 0 fires one ray through the centre
    samples_per_side: u32,
    pcg: Pcg,
    callback_time_s: f64,
}

impl ImageTracer {
    pub fn new(image: HdrImage, camera: Box<dyn Camera>) -> Self {
        Self {
            image,
            camera,
            samples_per_side: 0,
            pcg: Pcg::default(),
            callback_time_s: DEFAULT_CALLBACK_TIME_S,
        }
    }

    /// Enable stratified sampling with an `n x n` grid per pixel.
    pub fn with_samples_per_side(mut self, samples_per_side: u32) -> Self {
        self.samples_per_side = samples_per_side;
        self
    }

    /// Replace the random stream shared by the jitter and the renderer.
    pub fn with_pcg(mut self, pcg: Pcg) -> Self {
        self.pcg = pcg;
        self
    }

    pub fn with_callback_time(mut self, callback_time_s: f64) -> Self {
        self.callback_time_s = callback_time_s;
        self
    }

    pub fn image(&self) -> &HdrImage {
        &self.image
    }

    pub fn into_image(self) -> HdrImage {
        self.image
    }

    /// Fire one ray through pixel `(col, row)`.
    ///
    /// `(u_pixel, v_pixel)` locate the crossing point inside the pixel, with
    /// `(0.5, 0.5)` being its centre. Values outside `[0, 1]` are accepted and
    /// land in neighbouring pixels.
    pub fn fire_ray(&self, col: usize, row: usize, u_pixel: f64, v_pixel: f64) -> Ray {
        pixel_ray(
            self.camera.as_ref(),
            self.image.width,
            self.image.height,
            (col, row),
            u_pixel,
            v_pixel,
        )
    }

    /// Fill every pixel with the color `func` returns for its rays.
    pub fn fire_all_rays<F>(&mut self, func: F)
    where
        F: FnMut(Ray, &mut Pcg) -> Color,
    {
        self.fire_all_rays_with_callback(func, |_, _| {});
    }

    /// Like [`ImageTracer::fire_all_rays`], calling `callback(col, row)` once
    /// at the start and then whenever more than `callback_time_s` seconds
    /// have passed since the previous call.
    pub fn fire_all_rays_with_callback<F, C>(&mut self, mut func: F, mut callback: C)
    where
        F: FnMut(Ray, &mut Pcg) -> Color,
        C: FnMut(usize, usize),
    {
        let start = Instant::now();
        let mut last_call = start;
        log::info!(
            "Tracing {}x{} image ({} samples per pixel)",
            self.image.width,
            self.image.height,
            self.samples_per_side.max(1).pow(2)
        );
        callback(0, 0);

        for row in 0..self.image.height {
            for col in 0..self.image.width {
                let color = if self.samples_per_side > 0 {
                    self.stratified_color(col, row, &mut func)
                } else {
                    let ray = self.fire_ray(col, row, 0.5, 0.5);
                    func(ray, &mut self.pcg)
                };
                self.image.set_pixel(col, row, color);

                if last_call.elapsed().as_secs_f64() > self.callback_time_s {
                    callback(col, row);
                    last_call = Instant::now();
                }
            }
        }

        log::info!("Tracing finished in {:.2?}", start.elapsed());
    }

    fn stratified_color<F>(&mut self, col: usize, row: usize, func: &mut F) -> Color
    where
        F: FnMut(Ray, &mut Pcg) -> Color,
    {
        let n = self.samples_per_side;
        let mut cum_color = BLACK;

        for inter_pixel_row in 0..n {
            for inter_pixel_col in 0..n {
                let u_pixel = (inter_pixel_col as f64 + self.pcg.random_float()) / n as f64;
                let v_pixel = (inter_pixel_row as f64 + self.pcg.random_float()) / n as f64;
                let ray = self.fire_ray(col, row, u_pixel, v_pixel);
                cum_color += func(ray, &mut self.pcg);
            }
        }

        cum_color * (1.0 / (n * n) as f64)
    }
}

/// Ray through pixel `(col, row)` of a `width x height` image.
pub(crate) fn pixel_ray(
    camera: &dyn Camera,
    width: usize,
    height: usize,
    (col, row): (usize, usize),
    u_pixel: f64,
    v_pixel: f64,
) -> Ray {
    let u = (col as f64 + u_pixel) / width as f64;
    let v = 1.0 - (row as f64 + v_pixel) / height as f64;
    camera.fire_ray(u, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OrthogonalCamera, PerspectiveCamera};
    use lumo_math::Point;

    fn tracer() -> ImageTracer {
        ImageTracer::new(HdrImage::new(4, 2), Box::new(PerspectiveCamera::new(1.0, 2.0)))
    }

    #[test]
    fn test_orientation() {
        let tracer = tracer();

        let top_left_ray = tracer.fire_ray(0, 0, 0.0, 0.0);
        assert!(Point::new(0.0, 2.0, 1.0).is_close(&top_left_ray.at(1.0)));

        let bottom_right_ray = tracer.fire_ray(3, 1, 1.0, 1.0);
        assert!(Point::new(0.0, -2.0, -1.0).is_close(&bottom_right_ray.at(1.0)));
    }

    #[test]
    fn test_uv_sub_mapping() {
        let tracer = tracer();

        // Deliberately aim outside pixel (0, 0), into pixel (2, 1)
        let ray1 = tracer.fire_ray(0, 0, 2.5, 1.5);
        let ray2 = tracer.fire_ray(2, 1, 0.5, 0.5);
        assert!(ray1.is_close(&ray2));
    }

    #[test]
    fn test_image_coverage() {
        let mut tracer = tracer();
        tracer.fire_all_rays(|_, _| Color::new(1.0, 2.0, 3.0));

        let image = tracer.into_image();
        for row in 0..image.height {
            for col in 0..image.width {
                assert_eq!(image.get_pixel(col, row), Color::new(1.0, 2.0, 3.0));
            }
        }
    }

    #[test]
    fn test_antialiasing() {
        let mut tracer = ImageTracer::new(HdrImage::new(1, 1), Box::new(OrthogonalCamera::new(1.0)))
            .with_samples_per_side(10);

        let mut num_of_rays = 0;
        tracer.fire_all_rays(|ray, _| {
            let point = ray.at(1.0);

            // Every ray crosses the screen inside [-1, 1] x [-1, 1]
            assert!(point.x.abs() < 1e-9);
            assert!((-1.0..=1.0).contains(&point.y));
            assert!((-1.0..=1.0).contains(&point.z));

            num_of_rays += 1;
            BLACK
        });

        assert_eq!(num_of_rays, 100);
    }

    #[test]
    fn test_stratified_average() {
        let mut tracer = ImageTracer::new(HdrImage::new(2, 2), Box::new(OrthogonalCamera::new(1.0)))
            .with_samples_per_side(3);

        let mut count = 0.0;
        tracer.fire_all_rays(|_, _| {
            count += 1.0;
            Color::new(count, 0.0, 0.0)
        });

        // Pixel (0, 0) sees samples 1..=9, averaging to 5
        assert!(tracer.image().get_pixel(0, 0).is_close(&Color::new(5.0, 0.0, 0.0)));
        assert!(tracer.image().get_pixel(1, 1).is_close(&Color::new(32.0, 0.0, 0.0)));
    }

    #[test]
    fn test_callback_called_at_start() {
        let mut tracer = tracer().with_callback_time(f64::INFINITY);

        let mut calls = Vec::new();
        tracer.fire_all_rays_with_callback(|_, _| BLACK, |col, row| calls.push((col, row)));

        assert_eq!(calls, vec![(0, 0)]);
    }

    #[test]
    fn test_callback_repeats_after_interval() {
        let mut tracer = tracer().with_callback_time(0.0);

        let mut calls = Vec::new();
        tracer.fire_all_rays_with_callback(
            |_, _| {
                std::thread::sleep(std::time::Duration::from_millis(1));
                BLACK
            },
            |col, row| calls.push((col, row)),
        );

        // The start call, then one after every pixel, in scanline order
        let mut expected = vec![(0, 0)];
        for row in 0..2 {
            for col in 0..4 {
                expected.push((col, row));
            }
        }
        assert_eq!(calls, expected);
    }

    #[test]
    fn test_jitter_and_renderer_share_one_stream() {
        let mut tracer = ImageTracer::new(HdrImage::new(1, 1), Box::new(OrthogonalCamera::new(1.0)))
            .with_samples_per_side(2)
            .with_pcg(Pcg::new(42, 54));

        let mut samples = Vec::new();
        tracer.fire_all_rays(|ray, pcg| {
            samples.push((ray, pcg.random_float()));
            BLACK
        });

        // Per sample: u jitter, v jitter, then the renderer's draw
        let mut reference = Pcg::new(42, 54);
        let mut expected = Vec::new();
        for inter_pixel_row in 0..2 {
            for inter_pixel_col in 0..2 {
                let u_pixel = (inter_pixel_col as f64 + reference.random_float()) / 2.0;
                let v_pixel = (inter_pixel_row as f64 + reference.random_float()) / 2.0;
                let ray = tracer.fire_ray(0, 0, u_pixel, v_pixel);
                expected.push((ray, reference.random_float()));
            }
        }

        assert_eq!(samples.len(), expected.len());
        for ((ray, draw), (expected_ray, expected_draw)) in samples.iter().zip(&expected) {
            assert!(ray.is_close(expected_ray));
            assert_eq!(draw, expected_draw);
        }
    }
}
