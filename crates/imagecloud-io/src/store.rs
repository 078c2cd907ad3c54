//! Image collaborator backed by the `image` crate.
//!
//! The placement engine only sees [`ImageId`] handles and sizes. This module
//! owns the pixels behind those handles.

use crate::error::{IoError, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, RgbaImage};
use imagecloud_core::{ImageId, Size};
use std::path::Path;

/// An image loaded by a collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pub handle: ImageId,
    pub size: Size,
    pub name: String,
}

/// Operations the layout pipeline needs from an image library.
pub trait ImageCollaborator {
    /// Decode the image at `path`.
    fn load(&mut self, path: &Path) -> Result<LoadedImage>;

    /// A new image resized to exactly `size`.
    fn resize(&mut self, handle: ImageId, size: Size) -> Result<ImageId>;

    /// A new image turned a quarter clockwise.
    fn rotate90(&mut self, handle: ImageId) -> Result<ImageId>;

    /// Encode the image at `path` in `format`.
    fn save(&self, handle: ImageId, path: &Path, format: ImageFormat) -> Result<()>;

    /// Intrinsic size of a loaded image.
    fn size(&self, handle: ImageId) -> Option<Size>;

    /// The image's pixels as 8-bit RGBA.
    fn rgba(&self, handle: ImageId) -> Result<RgbaImage>;
}

/// In-memory image collaborator.
#[derive(Debug, Default)]
pub struct ImageStore {
    images: Vec<DynamicImage>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a decoded image.
    pub fn insert(&mut self, image: DynamicImage) -> ImageId {
        self.push(image)
    }

    pub fn get(&self, handle: ImageId) -> Result<&DynamicImage> {
        self.images
            .get(handle.0 as usize)
            .ok_or(IoError::UnknownImage(handle.0))
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn push(&mut self, image: DynamicImage) -> ImageId {
        let handle = ImageId(self.images.len() as u64);
        self.images.push(image);
        handle
    }
}

impl ImageCollaborator for ImageStore {
    fn load(&mut self, path: &Path) -> Result<LoadedImage> {
        if !path.exists() {
            return Err(IoError::MissingFile(path.to_path_buf()));
        }
        let image = image::open(path)?;
        let (width, height) = image.dimensions();
        let handle = self.push(image);
        Ok(LoadedImage {
            handle,
            size: Size::new(width, height),
            name: path.to_string_lossy().into_owned(),
        })
    }

    fn resize(&mut self, handle: ImageId, size: Size) -> Result<ImageId> {
        let resized = self
            .get(handle)?
            .resize_exact(size.width.max(1), size.height.max(1), FilterType::Lanczos3);
        Ok(self.push(resized))
    }

    fn rotate90(&mut self, handle: ImageId) -> Result<ImageId> {
        let rotated = self.get(handle)?.rotate90();
        Ok(self.push(rotated))
    }

    fn save(&self, handle: ImageId, path: &Path, format: ImageFormat) -> Result<()> {
        let image = self.get(handle)?;
        match format {
            // JPEG has no alpha channel.
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()).save_with_format(path, format)?,
            _ => image.save_with_format(path, format)?,
        }
        Ok(())
    }

    fn size(&self, handle: ImageId) -> Option<Size> {
        let (width, height) = self.images.get(handle.0 as usize)?.dimensions();
        Some(Size::new(width, height))
    }

    fn rgba(&self, handle: ImageId) -> Result<RgbaImage> {
        Ok(self.get(handle)?.to_rgba8())
    }
}

/// Look up an output format by extension or name, e.g. `png` or `jpg`.
pub fn parse_image_format(name: &str) -> Result<ImageFormat> {
    let trimmed = name.trim().trim_start_matches('.');
    ImageFormat::from_extension(trimmed)
        .ok_or_else(|| IoError::UnsupportedFormat(name.to_string()))
}

/// Primary file extension for a format.
pub fn format_extension(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("img")
}
