//! `imagecloud`: lay out weighted images as a cloud collage.
//!
//! ```text
//! imagecloud generate -i images.csv --cloud-size 800,400 --seed 7
//! imagecloud layout -i output/images.layout.csv --maximize-empty-space
//! ```

mod commands;

use clap::{Args, Parser, Subcommand};
use image::ImageFormat;
use imagecloud_core::{ColorMode, ResizePolicy, Size};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "imagecloud",
    version,
    about = "Lay out weighted images as a non-overlapping cloud collage"
)]
struct Cli {
    /// Log debug detail (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new layout from a weighted image list
    Generate(GenerateArgs),
    /// Reload a saved layout, optionally expand it, and render it again
    Layout(LayoutArgs),
}

#[derive(Args, Debug, Clone)]
struct OutputArgs {
    /// Directory for the rendered image and the saved layout
    #[arg(long, default_value = "output")]
    output_directory: PathBuf,

    /// Rendered image format (png, jpeg, bmp, gif, webp)
    #[arg(long, default_value = "png", value_parser = parse_format)]
    output_image_format: ImageFormat,
}

#[derive(Args, Debug, Clone)]
struct GenerateArgs {
    /// CSV with "image_filepath","weight" columns
    #[arg(short, long)]
    input: PathBuf,

    #[command(flatten)]
    output: OutputArgs,

    /// Canvas size as WIDTH,HEIGHT
    #[arg(long, default_value = "400,200", value_parser = parse_size)]
    cloud_size: Size,

    /// Image whose white pixels are kept empty; its size becomes the canvas size
    #[arg(long)]
    mask: Option<PathBuf>,

    #[arg(long, default_value = "4,4", value_parser = parse_size)]
    min_image_size: Size,

    /// Largest size any image may be given. Estimated when absent
    #[arg(long, value_parser = parse_size)]
    max_image_size: Option<Size>,

    /// Pixels per grow or shrink step
    #[arg(long, default_value_t = 1)]
    step_size: i32,

    /// no_resize, maintain_aspect_ratio or maintain_percentage_change
    #[arg(long, default_value = "maintain_aspect_ratio", value_parser = parse_policy)]
    resize_type: ResizePolicy,

    /// Empty pixels kept around each image
    #[arg(long, default_value_t = 1)]
    margin: u32,

    /// Probability that an image is first tried unrotated
    #[arg(long, default_value_t = 0.9)]
    prefer_horizontal: f64,

    #[arg(long, default_value_t = 200)]
    max_images: usize,

    /// Grow the canvas by this many pixels while images are dropped
    #[arg(long, default_value_t = 0)]
    cloud_expansion_step: u32,

    #[arg(long, default_value_t = 64)]
    max_expansion_rounds: u32,

    /// Grow each placed image into the empty space around it
    #[arg(long)]
    maximize_empty_space: bool,

    /// Stop placing once one image cannot be placed
    #[arg(long)]
    abort_on_drop: bool,

    /// Worker threads for the free-space search
    #[arg(long, default_value_t = 1)]
    parallelism: usize,

    /// Seed for reproducible layouts
    #[arg(long)]
    seed: Option<u64>,

    /// Hex (#RRGGBB, #RRGGBBAA) or a color name. Transparent when absent
    #[arg(long)]
    background_color: Option<String>,

    /// L, RGB or RGBA
    #[arg(long, default_value = "RGBA", value_parser = parse_mode)]
    mode: ColorMode,

    /// Render scale
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Also write a JSON summary of the layout
    #[arg(long)]
    json_summary: bool,
}

#[derive(Args, Debug, Clone)]
struct LayoutArgs {
    /// Layout CSV written by `imagecloud generate`
    #[arg(short, long)]
    input: PathBuf,

    #[command(flatten)]
    output: OutputArgs,

    /// Render scale. Defaults to the scale recorded in the layout
    #[arg(long)]
    scale: Option<f64>,

    /// Grow each placed image into the empty space around it
    #[arg(long)]
    maximize_empty_space: bool,
}

fn parse_size(value: &str) -> Result<Size, String> {
    value.parse::<Size>().map_err(|e| e.to_string())
}

fn parse_policy(value: &str) -> Result<ResizePolicy, String> {
    value.parse::<ResizePolicy>().map_err(|e| e.to_string())
}

fn parse_mode(value: &str) -> Result<ColorMode, String> {
    value.parse::<ColorMode>().map_err(|e| e.to_string())
}

fn parse_format(value: &str) -> Result<ImageFormat, String> {
    imagecloud_io::parse_image_format(value).map_err(|e| e.to_string())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_logging(cli.verbose);

    let result = match &cli.command {
        Command::Generate(args) => commands::generate(args),
        Command::Layout(args) => commands::layout(args),
    };
    match result {
        Ok(outputs) => {
            log::info!("Wrote {}", outputs.rendered.display());
            log::info!("Wrote {}", outputs.saved.layout_csv.display());
            if let Some(summary) = &outputs.summary {
                log::info!("Wrote {}", summary.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
