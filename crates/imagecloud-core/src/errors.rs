//! Error types for the image cloud engine.

use crate::geometry::Size;
use thiserror::Error;

/// Top-level error type for the image cloud engine.
#[derive(Debug, Error)]
pub enum CloudError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Invalid run arguments, detected before any placement work begins.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid size '{value}': expected 'width,height'")]
    InvalidSize { value: String },

    #[error("Step size must be at least 1, got {0}")]
    InvalidStep(i32),

    #[error("Minimum image size must be at least 1x1, got {0}")]
    InvalidMinSize(Size),

    #[error("Maximum image size {max} is smaller than the minimum {min}")]
    MaxBelowMin { max: Size, min: Size },

    #[error("prefer_horizontal must be within 0.0..=1.0, got {0}")]
    InvalidPreferHorizontal(f64),

    #[error("Scale must be a positive number, got {0}")]
    InvalidScale(f64),

    #[error("Max images must be at least 1")]
    InvalidMaxImages,

    #[error("Worker count must be at least 1")]
    InvalidWorkerCount,

    #[error("Canvas size must be non-empty, got {0}")]
    EmptyCanvas(Size),

    #[error("Unknown resize policy: {0}")]
    UnknownResizePolicy(String),

    #[error("Unknown orientation: {0}")]
    UnknownOrientation(String),

    #[error("Unknown color mode: {0}")]
    UnknownColorMode(String),
}

/// Fatal structural errors raised while generating a layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("No images to place")]
    NoImages,

    #[error("Canvas expansion cannot be combined with a mask")]
    ExpansionWithMask,

    #[error("Mask is {mask} but the canvas is {canvas}")]
    MaskSizeMismatch { mask: Size, canvas: Size },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, CloudError>;
