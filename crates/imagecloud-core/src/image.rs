//! Weighted image descriptors.
//!
//! The engine never sees pixels. An image is known by its intrinsic size,
//! a display name, and an opaque [`ImageId`] handle owned by whoever loaded it.

use crate::geometry::Size;

/// Opaque handle to an image held by an image collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageId(pub u64);

/// An image to be placed, with its relative importance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedImage {
    /// Non-negative weight. Zero-weight images are never placed.
    pub weight: f64,
    /// Intrinsic size, or the fitted size for a derived copy.
    pub size: Size,
    /// Display name, usually the source file path.
    pub name: String,
    /// Handle for the image collaborator.
    pub handle: ImageId,
}

impl WeightedImage {
    /// Create a weighted image. Negative or NaN weights are clamped to zero.
    pub fn new(weight: f64, size: Size, name: impl Into<String>, handle: ImageId) -> Self {
        let weight = if weight.is_finite() && weight > 0.0 {
            weight
        } else {
            0.0
        };
        Self {
            weight,
            size,
            name: name.into(),
            handle,
        }
    }

    /// A copy of this image with a different size and the same weight.
    pub fn with_size(&self, size: Size) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }

    pub fn is_placeable(&self) -> bool {
        self.weight > 0.0
    }
}

/// Stable sort by weight, heaviest first.
pub fn sort_by_weight(images: &mut [WeightedImage]) {
    images.sort_by(|a, b| b.weight.total_cmp(&a.weight));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_clamped() {
        let image = WeightedImage::new(-3.0, Size::new(1, 1), "a", ImageId(0));
        assert_eq!(image.weight, 0.0);
        assert!(!image.is_placeable());

        let image = WeightedImage::new(f64::NAN, Size::new(1, 1), "b", ImageId(1));
        assert_eq!(image.weight, 0.0);
    }

    #[test]
    fn test_sort_by_weight_is_stable() {
        let mut images = vec![
            WeightedImage::new(1.0, Size::new(1, 1), "low", ImageId(0)),
            WeightedImage::new(5.0, Size::new(1, 1), "high", ImageId(1)),
            WeightedImage::new(1.0, Size::new(1, 1), "low-2", ImageId(2)),
        ];
        sort_by_weight(&mut images);
        let names: Vec<_> = images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["high", "low", "low-2"]);
    }

    #[test]
    fn test_with_size_keeps_weight() {
        let image = WeightedImage::new(2.5, Size::new(10, 10), "a", ImageId(7));
        let fitted = image.with_size(Size::new(3, 4));
        assert_eq!(fitted.weight, 2.5);
        assert_eq!(fitted.handle, ImageId(7));
        assert_eq!(fitted.size, Size::new(3, 4));
    }
}
