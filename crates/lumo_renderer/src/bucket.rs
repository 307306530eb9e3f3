//! Bucket-based parallel rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! on the rayon thread pool. Every pixel draws from its own PCG stream,
//! seeded from the pixel index, so the output does not depend on how the
//! buckets are scheduled.

use std::time::Instant;

use rayon::prelude::*;

use crate::image_tracer::pixel_ray;
use crate::{Camera, Renderer};
use lumo_core::{Color, HdrImage, BLACK};
use lumo_math::Pcg;

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: usize = 64;

/// Settings for [`render_buckets`].
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Side of the stratified sampling grid; 0 fires one ray through the centre
    pub samples_per_side: u32,
    /// Initial state of every per-pixel PCG stream
    pub seed: u64,
    pub bucket_size: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_side: 0,
            seed: 42,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: usize,
    /// Y coordinate of bucket's top-left corner
    pub y: usize,
    pub width: usize,
    pub height: usize,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: usize, y: usize, width: usize, height: usize, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

/// Generate buckets for an image, sorted in spiral order from the centre.
pub fn generate_buckets(width: usize, height: usize, bucket_size: usize) -> Vec<Bucket> {
    assert!(bucket_size > 0, "bucket size must be positive");

    let mut buckets = Vec::new();
    for y in (0..height).step_by(bucket_size) {
        for x in (0..width).step_by(bucket_size) {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
        }
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance of their centre from the image centre.
fn sort_spiral(buckets: &mut [Bucket], width: usize, height: usize) {
    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f64 + b.width as f64 / 2.0;
        let by = b.y as f64 + b.height as f64 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    // Stable sort keeps row-major order among equidistant buckets
    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Render a single bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &dyn Camera,
    renderer: &dyn Renderer,
    (width, height): (usize, usize),
    config: &RenderConfig,
) -> BucketResult {
    let mut pixels = Vec::with_capacity(bucket.pixel_count());

    for row in bucket.y..bucket.y + bucket.height {
        for col in bucket.x..bucket.x + bucket.width {
            let mut pcg = Pcg::new(config.seed, (row * width + col) as u64);
            let n = config.samples_per_side;

            let color = if n == 0 {
                let ray = pixel_ray(camera, width, height, (col, row), 0.5, 0.5);
                renderer.radiance(&ray, &mut pcg)
            } else {
                let mut cum_color = BLACK;
                for inter_pixel_row in 0..n {
                    for inter_pixel_col in 0..n {
                        let u_pixel = (inter_pixel_col as f64 + pcg.random_float()) / n as f64;
                        let v_pixel = (inter_pixel_row as f64 + pcg.random_float()) / n as f64;
                        let ray = pixel_ray(camera, width, height, (col, row), u_pixel, v_pixel);
                        cum_color += renderer.radiance(&ray, &mut pcg);
                    }
                }
                cum_color * (1.0 / (n * n) as f64)
            };

            pixels.push(color);
        }
    }

    BucketResult {
        bucket: *bucket,
        pixels,
    }
}

/// Render a `width x height` image in parallel.
pub fn render_buckets(
    camera: &dyn Camera,
    renderer: &dyn Renderer,
    width: usize,
    height: usize,
    config: &RenderConfig,
) -> HdrImage {
    let start = Instant::now();
    let buckets = generate_buckets(width, height, config.bucket_size);
    log::info!(
        "Rendering {}x{} image in {} buckets on {} threads",
        width,
        height,
        buckets.len(),
        rayon::current_num_threads()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, camera, renderer, (width, height), config);
            log::debug!("Bucket {} done", bucket.index);
            result
        })
        .collect();

    let mut image = HdrImage::new(width, height);
    for result in results {
        let bucket = result.bucket;
        for (i, color) in result.pixels.into_iter().enumerate() {
            image.set_pixel(bucket.x + i % bucket.width, bucket.y + i / bucket.width, color);
        }
    }

    log::info!("Rendering finished in {:.2?}", start.elapsed());
    image
}
