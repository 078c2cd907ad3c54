//! Core types for the image cloud placement engine.
//!
//! This crate provides the foundational types shared by the other imagecloud crates:
//! - Geometry value types (positions, sizes, bounds)
//! - Resize policies and orientations
//! - Weighted image descriptors
//! - Run configuration and canvas specification
//! - Error types

pub mod canvas;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod image;
pub mod resize;

pub use canvas::*;
pub use config::*;
pub use errors::*;
pub use geometry::*;
pub use image::*;
pub use resize::*;
