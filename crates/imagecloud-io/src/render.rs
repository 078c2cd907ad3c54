//! Collage rendering.

use crate::error::{IoError, Result};
use crate::paths::unused_filepath;
use crate::store::ImageCollaborator;
use image::imageops;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imagecloud_core::{ColorMode, ConfigError, Orientation};
use imagecloud_layout::Layout;
use std::path::{Path, PathBuf};
use std::time::Instant;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Parse a background color.
///
/// Accepts `#RGB`, `#RRGGBB`, `#RRGGBBAA` and a few names.
pub fn parse_color(value: &str) -> Result<Rgba<u8>> {
    let value = value.trim();
    let named = match value.to_ascii_lowercase().as_str() {
        "transparent" => Some(TRANSPARENT),
        "black" => Some(Rgba([0, 0, 0, 255])),
        "white" => Some(Rgba([255, 255, 255, 255])),
        "red" => Some(Rgba([255, 0, 0, 255])),
        "green" => Some(Rgba([0, 128, 0, 255])),
        "blue" => Some(Rgba([0, 0, 255, 255])),
        "yellow" => Some(Rgba([255, 255, 0, 255])),
        "gray" | "grey" => Some(Rgba([128, 128, 128, 255])),
        _ => None,
    };
    if let Some(color) = named {
        return Ok(color);
    }

    let invalid = || IoError::invalid(format!("unrecognized color '{value}'"));
    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    match hex.len() {
        3 => {
            let short = |i: usize| {
                u8::from_str_radix(&hex[i..i + 1], 16)
                    .map(|v| v * 17)
                    .map_err(|_| invalid())
            };
            Ok(Rgba([short(0)?, short(1)?, short(2)?, 255]))
        }
        6 => Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, 255])),
        8 => Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, channel(6)?])),
        _ => Err(invalid()),
    }
}

/// Paint every placed item onto a canvas scaled by `scale`.
///
/// Each item's source image is rotated if needed, then resized to its
/// placement box. Both steps go through `images` and leave new handles
/// behind in it.
pub fn render_layout(
    layout: &Layout,
    images: &mut dyn ImageCollaborator,
    scale: f64,
) -> Result<DynamicImage> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ConfigError::InvalidScale(scale).into());
    }
    let size = layout.canvas.size.scale(scale);
    if size.is_empty() {
        return Err(ConfigError::EmptyCanvas(size).into());
    }
    let start = Instant::now();
    let background = match &layout.canvas.background {
        Some(color) => parse_color(color)?,
        None => TRANSPARENT,
    };
    let mut canvas = RgbaImage::from_pixel(size.width, size.height, background);

    for item in &layout.items {
        let target = item.placement.scale(scale);
        if target.is_empty() {
            continue;
        }
        let oriented = match item.orientation {
            Orientation::Upright => item.image.handle,
            Orientation::Rotate90 => images.rotate90(item.image.handle)?,
        };
        let resized = images.resize(oriented, target.size())?;
        let tile = images.rgba(resized)?;
        imageops::overlay(&mut canvas, &tile, target.left as i64, target.upper as i64);
    }

    log::info!(
        "Rendered {} items on {} canvas ({:?})",
        layout.items.len(),
        size,
        start.elapsed()
    );
    Ok(convert_mode(DynamicImage::ImageRgba8(canvas), layout.canvas.mode))
}

/// Convert a rendered image to the canvas color mode.
pub fn convert_mode(image: DynamicImage, mode: ColorMode) -> DynamicImage {
    match mode {
        ColorMode::L => DynamicImage::ImageLuma8(image.to_luma8()),
        ColorMode::Rgb => DynamicImage::ImageRgb8(image.to_rgb8()),
        ColorMode::Rgba => DynamicImage::ImageRgba8(image.to_rgba8()),
    }
}

/// Save `image` at `path`, or beside it if the name is taken.
///
/// Returns the path actually written.
pub fn save_image(image: &DynamicImage, path: &Path, format: ImageFormat) -> Result<PathBuf> {
    let path = unused_filepath(path);
    match (format, image) {
        (ImageFormat::Jpeg, DynamicImage::ImageRgba8(_) | DynamicImage::ImageLumaA8(_)) => {
            DynamicImage::ImageRgb8(image.to_rgb8()).save_with_format(&path, format)?
        }
        _ => image.save_with_format(&path, format)?,
    }
    log::info!("Saved {}", path.display());
    Ok(path)
}
