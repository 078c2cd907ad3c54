//! Weight-proportional sizing.
//!
//! Each image is stepped toward a target area of `weight / total_weight *
//! canvas_area`, growing or shrinking under the run's resize policy.

use imagecloud_core::{ResizePolicy, Size, WeightedImage};

/// Outcome of fitting a single image.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedImage {
    /// Copy of the source image carrying the fitted size
    pub image: WeightedImage,
    /// Area the image was steered toward, margin included
    pub target_area: u64,
    /// Number of resize steps taken
    pub steps: usize,
}

/// Resize every image toward its share of `canvas_area`.
///
/// Sizes are fitted with `margin` added and the margin is removed from the
/// result. Zero-weight images, or any image when the total weight is zero,
/// keep their size.
pub fn fit_proportionally(
    images: &[WeightedImage],
    canvas_area: u64,
    policy: ResizePolicy,
    step: i32,
    margin: u32,
) -> Vec<FittedImage> {
    let total_weight: f64 = images.iter().map(|image| image.weight).sum();

    images
        .iter()
        .map(|image| {
            if total_weight <= 0.0 || !image.is_placeable() {
                return FittedImage {
                    image: image.clone(),
                    target_area: 0,
                    steps: 0,
                };
            }
            let target_area = (image.weight / total_weight * canvas_area as f64).round() as u64;
            let (size, steps) = fit_to_area(image.size.add_margin(margin), target_area, policy, step);
            FittedImage {
                image: image.with_size(size.remove_margin(margin)),
                target_area,
                steps,
            }
        })
        .collect()
}

/// Step `size` toward `target_area` until neither direction gets closer.
///
/// Every step strictly reduces the distance to the target, so the loop ends
/// after at most that many steps. Returns the final size and the number of
/// steps taken.
pub fn fit_to_area(size: Size, target_area: u64, policy: ResizePolicy, step: i32) -> (Size, usize) {
    let distance = |s: &Size| s.area().abs_diff(target_area);

    let mut current = size;
    let mut current_distance = distance(&current);
    let mut steps = 0;

    loop {
        let grown = current.adjust(step, policy);
        let shrunk = current.adjust(-step, policy);
        let grown_distance = distance(&grown);
        let shrunk_distance = distance(&shrunk);

        let (next, next_distance) = if grown_distance <= shrunk_distance {
            (grown, grown_distance)
        } else {
            (shrunk, shrunk_distance)
        };

        if next == current || next_distance >= current_distance {
            break;
        }
        current = next;
        current_distance = next_distance;
        steps += 1;
    }

    (current, steps)
}
