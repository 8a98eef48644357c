use clap::Parser;
use image::ImageReader;
use log::{info, warn};
use std::path::PathBuf;

use quadcorners::{FrameBounds, HoughParams, PreprocessOptions, build_standard_pipeline};

#[derive(Parser)]
#[command(name = "quadcorners")]
#[command(about = "Find the corners of a quadrilateral in an image and mask everything outside it")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Where to write the masked image
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Minimum accumulator votes to accept a line
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u32).range(1..=1000))]
    threshold: u32,

    /// Minimum segment length in pixels
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(0..=1000))]
    min_line_length: u32,

    /// Maximum gap in pixels bridged within one segment
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(0..=100))]
    max_line_gap: u32,

    /// Accepted corner area as WIDTHxHEIGHT (defaults to the image size)
    #[arg(long, value_name = "WxH")]
    bounds: Option<FrameBounds>,

    /// Gaussian blur sigma before edge detection (0 disables)
    #[arg(long, default_value_t = 1.5)]
    blur: f32,

    /// Canny low threshold
    #[arg(long, default_value_t = 50.0)]
    canny_low: f32,

    /// Canny high threshold
    #[arg(long, default_value_t = 100.0)]
    canny_high: f32,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    info!("Loading image: {:?}", args.image_path);
    let img = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    info!("Image loaded: {}x{}", img.width(), img.height());

    let hough = HoughParams::new(args.threshold, args.min_line_length, args.max_line_gap)?;
    let preprocess = PreprocessOptions {
        blur_sigma: args.blur,
        canny_low: args.canny_low,
        canny_high: args.canny_high,
    };
    let pipeline = build_standard_pipeline(preprocess, hough, args.bounds, args.verbose);

    let frame = pipeline.run(img)?;

    println!("\n=== Corner Detection Results ===");
    println!("Lines detected: {}", frame.lines().map_or(0, |l| l.len()));

    let Some(corners) = frame.corners() else {
        println!("No quadrilateral found (need exactly 4 corners).");
        if args.output.is_some() {
            warn!("No masked image produced");
        }
        return Ok(());
    };

    println!("\nCorners (by distance from origin):");
    for (i, p) in corners.points().iter().enumerate() {
        println!("  {}: ({:.1}, {:.1})", i + 1, p.x, p.y);
    }

    match (args.output, frame.masked_image()) {
        (Some(path), Some(masked)) => {
            masked
                .save(&path)
                .map_err(|e| anyhow::anyhow!("Failed to save masked image: {}", e))?;
            println!("\nMasked image written to {}", path.display());
        }
        (Some(_), None) => warn!("No masked image produced"),
        (None, _) => {}
    }

    Ok(())
}
