//! Error types for imagecloud-io.

use imagecloud_core::{CloudError, ConfigError};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for imagecloud-io operations.
pub type Result<T> = std::result::Result<T, IoError>;

/// Errors that can occur while reading or writing image cloud files.
#[derive(Debug, Error)]
pub enum IoError {
    /// A referenced file does not exist.
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// Parse error when reading a table.
    #[error("parse error at line {line}: {message}")]
    ParseError {
        /// Error message.
        message: String,
        /// One-based line number.
        line: usize,
    },

    /// A required column is absent from a table.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// Invalid data in the file.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Unknown image handle.
    #[error("unknown image handle: {0}")]
    UnknownImage(u64),

    /// Unsupported image format.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Engine error.
    #[error(transparent)]
    Cloud(#[from] CloudError),
}

impl IoError {
    /// Create a parse error at a line.
    pub fn parse(message: impl Into<String>, line: usize) -> Self {
        Self::ParseError {
            message: message.into(),
            line,
        }
    }

    /// Create an invalid data error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }
}

impl From<ConfigError> for IoError {
    fn from(error: ConfigError) -> Self {
        Self::Cloud(error.into())
    }
}
