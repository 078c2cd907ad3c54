//! Subcommand implementations.

use crate::{GenerateArgs, LayoutArgs, OutputArgs};
use anyhow::{Context, Result};
use image::ImageFormat;
use imagecloud_core::{CanvasSpec, LayoutConfig, OnDropPolicy};
use imagecloud_io::store::format_extension;
use imagecloud_io::{
    load_layout, load_mask, load_weighted_images, render_layout, save_image, save_layout,
    ImageStore, LayoutSummary, SavedLayout,
};
use imagecloud_layout::{expand, CloudGenerator, Layout};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

/// Files produced by a subcommand.
#[derive(Debug)]
pub struct Outputs {
    pub rendered: PathBuf,
    pub saved: SavedLayout,
    pub summary: Option<PathBuf>,
}

fn config_from(args: &GenerateArgs) -> LayoutConfig {
    let mut config = LayoutConfig::new()
        .with_max_images(args.max_images)
        .with_min_image_size(args.min_image_size)
        .with_step(args.step_size)
        .with_resize_policy(args.resize_type)
        .with_margin(args.margin)
        .with_prefer_horizontal(args.prefer_horizontal)
        .with_scale(args.scale)
        .with_cloud_expansion(args.cloud_expansion_step)
        .with_max_expansion_rounds(args.max_expansion_rounds)
        .with_maximize_empty_space(args.maximize_empty_space)
        .with_parallelism(args.parallelism);
    if let Some(max) = args.max_image_size {
        config = config.with_max_image_size(max);
    }
    if args.abort_on_drop {
        config = config.with_on_drop(OnDropPolicy::AbortRemaining);
    }
    config
}

fn canvas_from(args: &GenerateArgs) -> Result<CanvasSpec> {
    let mut canvas = match &args.mask {
        Some(path) => CanvasSpec::masked(
            load_mask(path).with_context(|| format!("loading mask {}", path.display()))?,
        ),
        None => CanvasSpec::new(args.cloud_size),
    };
    if let Some(stem) = args.input.file_stem() {
        canvas = canvas.with_name(stem.to_string_lossy());
    }
    canvas = canvas.with_mode(args.mode);
    if let Some(color) = &args.background_color {
        imagecloud_io::parse_color(color)?;
        canvas = canvas.with_background(color.clone());
    }
    Ok(canvas)
}

fn write_outputs(
    layout: &Layout,
    store: &mut ImageStore,
    scale: f64,
    output: &OutputArgs,
) -> Result<(PathBuf, SavedLayout)> {
    let directory = &output.output_directory;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("creating {}", directory.display()))?;

    let rendered = render_layout(layout, &mut *store, scale).context("rendering layout")?;
    let image_path = image_path(directory, &layout.canvas.name, output.output_image_format);
    let rendered = save_image(&rendered, &image_path, output.output_image_format)
        .with_context(|| format!("saving {}", image_path.display()))?;
    let saved = save_layout(layout, &*store, directory).context("saving layout")?;
    Ok((rendered, saved))
}

fn image_path(directory: &Path, name: &str, format: ImageFormat) -> PathBuf {
    directory.join(format!("{name}.{}", format_extension(format)))
}

/// `imagecloud generate`
pub fn generate(args: &GenerateArgs) -> Result<Outputs> {
    let config = config_from(args);
    let canvas = canvas_from(args)?;

    let mut store = ImageStore::new();
    let images = load_weighted_images(&args.input, &mut store)
        .with_context(|| format!("loading weighted images from {}", args.input.display()))?;
    let requested = images.len();

    let generator = CloudGenerator::new(config)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let layout = generator.generate(images, canvas, &mut rng)?;

    if !layout.grid_matches_items() {
        warn!("Reservation grid differs from the one rebuilt from the placed items");
    }
    info!(
        "Placed {}/{} images on a {} canvas ({} dropped)",
        layout.items.len(),
        requested,
        layout.canvas.size,
        layout.dropped.len()
    );

    let (rendered, saved) = write_outputs(&layout, &mut store, layout.config.scale, &args.output)?;
    let summary = if args.json_summary {
        let path = imagecloud_io::unused_filepath(
            &args
                .output
                .output_directory
                .join(format!("{}.summary.json", layout.canvas.name)),
        );
        LayoutSummary::from_layout(&layout)
            .write(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        Some(path)
    } else {
        None
    };

    Ok(Outputs {
        rendered,
        saved,
        summary,
    })
}

/// `imagecloud layout`
pub fn layout(args: &LayoutArgs) -> Result<Outputs> {
    let mut store = ImageStore::new();
    let loaded = load_layout(&args.input, &mut store)
        .with_context(|| format!("loading layout {}", args.input.display()))?;
    if !loaded.grid_round_trips() {
        warn!(
            "Reservation map recorded in {} differs from the one rebuilt from its items",
            args.input.display()
        );
    }

    let mut layout = loaded.layout;
    if args.maximize_empty_space {
        let report = expand(&mut layout);
        info!(
            "Grew {} reservations by {} cells",
            report.expanded, report.gained_area
        );
    }
    let scale = args.scale.unwrap_or(layout.config.scale);
    let (rendered, saved) = write_outputs(&layout, &mut store, scale, &args.output)?;

    Ok(Outputs {
        rendered,
        saved,
        summary: None,
    })
}
