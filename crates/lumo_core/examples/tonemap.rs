//! Example: Inspect and tone-map a PFM file.
//!
//! Run with: cargo run --example tonemap -- render.pfm render.png

use std::env;

use lumo_core::HdrImage;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        println!("Usage: tonemap <input.pfm> <output.png> [factor] [gamma]");
        println!("\nExamples:");
        println!("  cargo run --example tonemap -- render.pfm render.png");
        println!("  cargo run --example tonemap -- render.pfm render.png 0.5 2.2");
        return;
    }

    let factor = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(0.2);
    let gamma = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(1.0);

    let mut image = match HdrImage::load(&args[1]) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n=== {} ===", args[1]);
    println!("Size: {}x{}", image.width, image.height);
    println!("Average luminosity: {:.4}", image.average_luminosity(1e-10));

    image.normalize_image(factor, None);
    image.clamp_image();

    match image.write_ldr_image(&args[2], gamma) {
        Ok(()) => println!("Wrote {} (factor {}, gamma {})", args[2], factor, gamma),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
