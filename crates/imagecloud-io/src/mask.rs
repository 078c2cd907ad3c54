//! Canvas masks.
//!
//! In a mask image every pure white pixel is masked out. The canvas takes the
//! mask image's dimensions.

use crate::csv::{format_matrix, parse_matrix};
use crate::error::{IoError, Result};
use image::DynamicImage;
use imagecloud_core::{CanvasMask, Size};
use std::path::Path;

/// Build a mask from an image. Pure white pixels are blocked.
pub fn mask_from_image(image: &DynamicImage) -> CanvasMask {
    let rgb = image.to_rgb8();
    let size = Size::new(rgb.width(), rgb.height());
    CanvasMask::from_fn(size, |x, y| rgb.get_pixel(x, y).0 == [255, 255, 255])
}

/// Decode the mask image at `path`.
pub fn load_mask(path: &Path) -> Result<CanvasMask> {
    if !path.exists() {
        return Err(IoError::MissingFile(path.to_path_buf()));
    }
    let mask = mask_from_image(&image::open(path)?);
    log::info!(
        "Loaded mask {} ({}, {} cells blocked)",
        path.display(),
        mask.size(),
        mask.blocked_count()
    );
    Ok(mask)
}

/// Mask as a headerless CSV of `0`/`1` cells, `1` where blocked.
pub fn format_mask_csv(mask: &CanvasMask) -> String {
    let width = mask.size().width.max(1) as usize;
    let cells: Vec<u8> = mask.cells().iter().map(|&blocked| u8::from(blocked)).collect();
    format_matrix(cells.chunks(width))
}

pub fn write_mask_csv(mask: &CanvasMask, path: &Path) -> Result<()> {
    std::fs::write(path, format_mask_csv(mask))?;
    Ok(())
}

/// Parse a mask written by [`format_mask_csv`].
pub fn parse_mask_csv(text: &str) -> Result<CanvasMask> {
    let rows = parse_matrix::<u8>(text)?;
    let height = rows.len() as u32;
    let width = rows.first().map_or(0, |row| row.len() as u32);
    let mut blocked = Vec::with_capacity((width * height) as usize);
    for (index, row) in rows.iter().enumerate() {
        for &cell in row {
            match cell {
                0 => blocked.push(false),
                1 => blocked.push(true),
                other => {
                    return Err(IoError::parse(format!("mask cell must be 0 or 1, got {other}"), index + 1))
                }
            }
        }
    }
    CanvasMask::from_cells(Size::new(width, height), blocked)
        .ok_or_else(|| IoError::invalid("mask cell count does not match its size"))
}

pub fn read_mask_csv(path: &Path) -> Result<CanvasMask> {
    if !path.exists() {
        return Err(IoError::MissingFile(path.to_path_buf()));
    }
    parse_mask_csv(&std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    fn left_half_white() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(4, 2, |x, _| {
            if x < 2 {
                Rgb([255, 255, 255])
            } else {
                Rgb([255, 255, 254])
            }
        }))
    }

    #[test]
    fn test_white_pixels_are_blocked() {
        let mask = mask_from_image(&left_half_white());
        assert_eq!(mask.size(), Size::new(4, 2));
        assert!(mask.is_blocked(0, 0));
        assert!(mask.is_blocked(1, 1));
        assert!(!mask.is_blocked(2, 0));
        assert_eq!(mask.blocked_count(), 4);
    }

    #[test]
    fn test_load_mask_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        left_half_white().save_with_format(&path, ImageFormat::Png).unwrap();
        assert_eq!(load_mask(&path).unwrap(), mask_from_image(&left_half_white()));
        assert!(matches!(
            load_mask(&dir.path().join("absent.png")),
            Err(IoError::MissingFile(_))
        ));
    }

    #[test]
    fn test_mask_csv_round_trip() {
        let mask = mask_from_image(&left_half_white());
        let text = format_mask_csv(&mask);
        assert_eq!(text, "1,1,0,0\n1,1,0,0\n");
        assert_eq!(parse_mask_csv(&text).unwrap(), mask);
        assert!(parse_mask_csv("0,2\n").is_err());
    }
}
