//! `lumo`: render the demo scene or a JSON scene file, or convert PFM to PNG.

mod demo;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use lumo_core::{Color, HdrImage};
use lumo_math::Pcg;
use lumo_renderer::{
    render_buckets, Camera, FlatRenderer, ImageTracer, OnOffRenderer, PathTracer,
    PointLightRenderer, RenderConfig, Renderer, Scene, World, DEFAULT_BUCKET_SIZE,
};

#[derive(Parser)]
#[command(name = "lumo", version, about = "A small physically-based renderer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the built-in demo scene
    Demo(DemoArgs),
    /// Render a scene described in a JSON file
    Render(RenderArgs),
    /// Tone-map a PFM image into an LDR image
    Pfm2png(Pfm2PngArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Onoff,
    Flat,
    Pointlight,
    Pathtracing,
}

#[derive(Args)]
struct RenderOptions {
    /// Width of the image to render
    #[arg(long, default_value_t = 640)]
    width: usize,

    /// Height of the image to render
    #[arg(long, default_value_t = 480)]
    height: usize,

    #[arg(long, value_enum, default_value_t = Algorithm::Pathtracing)]
    algorithm: Algorithm,

    /// Rays scattered at each bounce by the path tracer
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    num_of_rays: u32,

    /// Maximum depth of the paths traced by the path tracer
    #[arg(long, default_value_t = 3)]
    max_depth: u32,

    /// Depth from which the path tracer starts Russian roulette
    #[arg(long, default_value_t = 3)]
    russian_roulette_limit: u32,

    /// Rays per pixel; must be a perfect square (0 fires one central ray)
    #[arg(long, default_value_t = 0)]
    samples_per_pixel: u32,

    /// Initial state of the random number generator
    #[arg(long, default_value_t = 42)]
    init_state: u64,

    /// Sequence of the random number generator
    #[arg(long, default_value_t = 54)]
    init_seq: u64,

    /// Render buckets on all cores instead of tracing pixels in order
    #[arg(long)]
    parallel: bool,

    /// Multiplicative factor used to normalize the PNG output
    #[arg(long, default_value_t = 1.0)]
    factor: f64,

    /// Gamma correction applied to the PNG output
    #[arg(long, default_value_t = 1.0)]
    gamma: f64,

    /// Name of the PFM file to create
    #[arg(long, default_value = "output.pfm")]
    pfm_output: PathBuf,

    /// Name of the LDR file to create; the extension selects the format
    #[arg(long, default_value = "output.png")]
    png_output: PathBuf,
}

#[derive(Args)]
struct DemoArgs {
    /// Rotation of the camera around the Z axis, in degrees
    #[arg(long, default_value_t = 0.0)]
    angle_deg: f64,

    /// Use an orthogonal camera instead of a perspective camera
    #[arg(long)]
    orthogonal: bool,

    #[command(flatten)]
    options: RenderOptions,
}

#[derive(Args)]
struct RenderArgs {
    /// JSON scene description
    scene: PathBuf,

    #[command(flatten)]
    options: RenderOptions,
}

#[derive(Args)]
struct Pfm2PngArgs {
    /// Multiplicative factor
    #[arg(long, default_value_t = 0.2)]
    factor: f64,

    /// Value to be used for gamma correction
    #[arg(long, default_value_t = 1.0)]
    gamma: f64,

    input_pfm_file_name: PathBuf,

    output_png_file_name: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo(args) => run_demo(&args),
        Commands::Render(args) => run_render(&args),
        Commands::Pfm2png(args) => run_pfm2png(&args),
    }
}

fn run_demo(args: &DemoArgs) -> Result<()> {
    let options = &args.options;
    let aspect_ratio = options.width as f64 / options.height as f64;

    // The on/off renderer would paint the sky and floor white
    let world = demo::demo_world(options.algorithm != Algorithm::Onoff);
    let camera = demo::demo_camera(args.orthogonal, args.angle_deg, aspect_ratio);

    let image = render(&world, camera, Color::default(), options)?;
    save_outputs(image, options)
}

fn run_render(args: &RenderArgs) -> Result<()> {
    let options = &args.options;
    let aspect_ratio = options.width as f64 / options.height as f64;

    let scene = Scene::from_file(&args.scene, aspect_ratio)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;

    let image = render(&scene.world, scene.camera, scene.background, options)?;
    save_outputs(image, options)
}

fn run_pfm2png(args: &Pfm2PngArgs) -> Result<()> {
    let mut image = HdrImage::load(&args.input_pfm_file_name)
        .with_context(|| format!("Failed to read {}", args.input_pfm_file_name.display()))?;
    log::info!(
        "File {} has been read from disk",
        args.input_pfm_file_name.display()
    );

    image.normalize_image(args.factor, None);
    image.clamp_image();

    write_ldr(&image, &args.output_png_file_name, args.gamma)
}

/// Convert a per-pixel sample count into the side of the stratification grid.
fn samples_per_side(samples_per_pixel: u32) -> Result<u32> {
    let side = (samples_per_pixel as f64).sqrt().round() as u32;
    if side.checked_mul(side) != Some(samples_per_pixel) {
        bail!(
            "--samples-per-pixel must be a perfect square, got {}",
            samples_per_pixel
        );
    }
    Ok(side)
}

fn make_renderer<'a>(
    world: &'a World,
    background: Color,
    options: &RenderOptions,
) -> Box<dyn Renderer + 'a> {
    match options.algorithm {
        Algorithm::Onoff => Box::new(OnOffRenderer::new(world).with_background_color(background)),
        Algorithm::Flat => Box::new(FlatRenderer::new(world).with_background_color(background)),
        Algorithm::Pointlight => {
            Box::new(PointLightRenderer::new(world).with_background_color(background))
        }
        Algorithm::Pathtracing => Box::new(
            PathTracer::new(world)
                .with_background_color(background)
                .with_num_of_rays(options.num_of_rays)
                .with_max_depth(options.max_depth)
                .with_russian_roulette_limit(options.russian_roulette_limit),
        ),
    }
}

fn render(
    world: &World,
    camera: Box<dyn Camera>,
    background: Color,
    options: &RenderOptions,
) -> Result<HdrImage> {
    if options.width == 0 || options.height == 0 {
        bail!("Image size must be positive, got {}x{}", options.width, options.height);
    }

    let samples_per_side = samples_per_side(options.samples_per_pixel)?;
    let renderer = make_renderer(world, background, options);
    log::info!(
        "Rendering {} shapes with the {:?} algorithm",
        world.len(),
        options.algorithm
    );

    if options.parallel {
        let config = RenderConfig {
            samples_per_side,
            seed: options.init_state,
            bucket_size: DEFAULT_BUCKET_SIZE,
        };
        return Ok(render_buckets(
            camera.as_ref(),
            renderer.as_ref(),
            options.width,
            options.height,
            &config,
        ));
    }

    let total_pixels = options.width * options.height;
    let mut tracer = ImageTracer::new(HdrImage::new(options.width, options.height), camera)
        .with_samples_per_side(samples_per_side)
        .with_pcg(Pcg::new(options.init_state, options.init_seq));

    tracer.fire_all_rays_with_callback(
        |ray, pcg| renderer.radiance(&ray, pcg),
        |col, row| {
            let done = row * options.width + col;
            log::info!("Rendering {:.1}%", 100.0 * done as f64 / total_pixels as f64);
        },
    );

    Ok(tracer.into_image())
}

fn save_outputs(mut image: HdrImage, options: &RenderOptions) -> Result<()> {
    image
        .save_pfm(&options.pfm_output)
        .with_context(|| format!("Failed to write {}", options.pfm_output.display()))?;
    log::info!("HDR image written to {}", options.pfm_output.display());

    image.normalize_image(options.factor, None);
    image.clamp_image();

    write_ldr(&image, &options.png_output, options.gamma)
}

fn write_ldr(image: &HdrImage, path: &Path, gamma: f64) -> Result<()> {
    image
        .write_ldr_image(path, gamma)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("LDR image written to {}", path.display());
    Ok(())
}
