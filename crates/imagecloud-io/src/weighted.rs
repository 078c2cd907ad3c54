//! Weighted image lists.
//!
//! A weighted image list is a CSV file with the header
//! `"image_filepath","weight"` and one image per row. Relative paths are
//! resolved against the list's own directory.

use crate::csv::CsvTable;
use crate::error::{IoError, Result};
use crate::paths::resolve_recorded_path;
use crate::store::ImageCollaborator;
use imagecloud_core::WeightedImage;
use std::path::Path;
use std::time::Instant;

pub const IMAGE_FILEPATH: &str = "image_filepath";
pub const WEIGHT: &str = "weight";

/// A row of a weighted image list before its image is decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedEntry {
    pub path: String,
    pub weight: f64,
}

/// Parse the rows of a weighted image list.
pub fn parse_weighted_entries(text: &str) -> Result<Vec<WeightedEntry>> {
    let table = CsvTable::parse(text)?;
    table.require_columns(&[IMAGE_FILEPATH, WEIGHT])?;

    (0..table.rows.len())
        .map(|row| {
            let path: String = table.require_field(row, IMAGE_FILEPATH)?;
            let weight: f64 = table.require_field(row, WEIGHT)?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(IoError::parse(
                    format!("weight must be a non-negative number, got {weight}"),
                    row + 2,
                ));
            }
            Ok(WeightedEntry { path, weight })
        })
        .collect()
}

/// Load every image named in the list at `path`.
pub fn load_weighted_images(
    path: &Path,
    images: &mut dyn ImageCollaborator,
) -> Result<Vec<WeightedImage>> {
    if !path.exists() {
        return Err(IoError::MissingFile(path.to_path_buf()));
    }
    let start = Instant::now();
    let entries = parse_weighted_entries(&std::fs::read_to_string(path)?)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    let mut loaded = Vec::with_capacity(entries.len());
    for entry in entries {
        let image_path = resolve_recorded_path(&entry.path, base_dir);
        let image = images.load(&image_path)?;
        log::debug!("loaded {} ({})", image.name, image.size);
        loaded.push(WeightedImage::new(entry.weight, image.size, image.name, image.handle));
    }
    log::info!(
        "Loaded {} weighted images from {} ({:?})",
        loaded.len(),
        path.display(),
        start.elapsed()
    );
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ImageStore;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use imagecloud_core::Size;

    fn write_list(path: &Path, rows: &[(&str, f64)]) {
        let mut text = String::from("\"image_filepath\",\"weight\"\n");
        for (image, weight) in rows {
            text.push_str(&format!("\"{image}\",\"{weight}\"\n"));
        }
        std::fs::write(path, text).unwrap();
    }

    #[test]
    fn test_parse_entries() {
        let entries =
            parse_weighted_entries("\"image_filepath\",\"weight\"\n\"a.png\",\"2\"\nb.png,0.5\n").unwrap();
        assert_eq!(
            entries,
            vec![
                WeightedEntry { path: "a.png".into(), weight: 2.0 },
                WeightedEntry { path: "b.png".into(), weight: 0.5 },
            ]
        );
    }

    #[test]
    fn test_parse_entries_errors() {
        assert!(matches!(
            parse_weighted_entries("path,weight\na.png,1\n"),
            Err(IoError::MissingColumn(_))
        ));
        assert!(matches!(
            parse_weighted_entries("image_filepath,weight\na.png,-1\n"),
            Err(IoError::ParseError { line: 2, .. })
        ));
        assert!(matches!(
            parse_weighted_entries("image_filepath,weight\na.png,heavy\n"),
            Err(IoError::ParseError { line: 2, .. })
        ));
    }

    #[test]
    fn test_load_resolves_relative_to_list() {
        let dir = tempfile::tempdir().unwrap();
        DynamicImage::ImageRgb8(RgbImage::new(8, 3))
            .save_with_format(dir.path().join("wide.png"), ImageFormat::Png)
            .unwrap();
        let list = dir.path().join("images.csv");
        write_list(&list, &[("wide.png", 3.0)]);

        let mut store = ImageStore::new();
        let images = load_weighted_images(&list, &mut store).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].weight, 3.0);
        assert_eq!(images[0].size, Size::new(8, 3));
        assert_eq!(store.size(images[0].handle), Some(Size::new(8, 3)));
    }

    #[test]
    fn test_load_missing_image() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("images.csv");
        write_list(&list, &[("nope.png", 1.0)]);
        let mut store = ImageStore::new();
        assert!(matches!(
            load_weighted_images(&list, &mut store),
            Err(IoError::MissingFile(_))
        ));
    }
}
