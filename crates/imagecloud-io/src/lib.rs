//! File formats and pixel work for image clouds.
//!
//! Supports:
//! - Image loading, resizing, rotation and saving through [`ImageCollaborator`]
//! - Weighted image lists (`"image_filepath","weight"` CSV)
//! - Canvas masks from images, where white is masked out
//! - Layout persistence with a separate reservation map
//! - Collage rendering
//! - JSON layout summaries

pub mod csv;
pub mod error;
pub mod layout_file;
pub mod mask;
pub mod paths;
pub mod render;
pub mod store;
pub mod summary;
pub mod weighted;

pub use error::{IoError, Result};
pub use layout_file::{load_layout, save_layout, LoadedLayout, SavedLayout};
pub use mask::{load_mask, mask_from_image};
pub use paths::unused_filepath;
pub use render::{parse_color, render_layout, save_image};
pub use store::{parse_image_format, ImageCollaborator, ImageStore, LoadedImage};
pub use summary::LayoutSummary;
pub use weighted::{load_weighted_images, WeightedEntry};
