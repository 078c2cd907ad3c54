//! Run configuration for layout generation.

use crate::errors::ConfigError;
use crate::geometry::Size;
use crate::resize::ResizePolicy;

/// What to do with the remaining items after one fails to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OnDropPolicy {
    /// Drop only the failed item and keep placing the rest.
    #[default]
    ContinueRemaining,
    /// Drop the failed item and every lighter item after it.
    AbortRemaining,
}

/// Configuration for a single placement run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutConfig {
    /// Maximum number of images placed, heaviest first
    pub max_images: usize,
    /// Smallest size an image may be shrunk to before it is dropped
    pub min_image_size: Size,
    /// Per-image size cap. `None` estimates one from the two heaviest images.
    pub max_image_size: Option<Size>,
    /// Step used when growing or shrinking sizes
    pub step: i32,
    /// Rule for adjusting sizes by a step
    pub resize_policy: ResizePolicy,
    /// Space reserved around every image
    pub margin: u32,
    /// Probability an image is first tried upright. Rotation is only tried below 1.0.
    pub prefer_horizontal: f64,
    /// Render scale applied by the rendering step
    pub scale: f64,
    /// Canvas growth step when items fail to place. Zero disables growth.
    pub cloud_expansion_step: u32,
    /// Upper bound on canvas growth rounds
    pub max_expansion_rounds: u32,
    /// Run the box expansion pass after placement
    pub maximize_empty_space: bool,
    /// Behavior when an item cannot be placed
    pub on_drop: OnDropPolicy,
    /// Worker threads for free-box search. One selects the sequential search.
    pub parallelism: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_images: 200,
            min_image_size: Size::new(4, 4),
            max_image_size: None,
            step: 1,
            resize_policy: ResizePolicy::MaintainAspectRatio,
            margin: 1,
            prefer_horizontal: 0.9,
            scale: 1.0,
            cloud_expansion_step: 0,
            max_expansion_rounds: 64,
            maximize_empty_space: false,
            on_drop: OnDropPolicy::ContinueRemaining,
            parallelism: 1,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_images(mut self, max_images: usize) -> Self {
        self.max_images = max_images;
        self
    }

    pub fn with_min_image_size(mut self, size: Size) -> Self {
        self.min_image_size = size;
        self
    }

    pub fn with_max_image_size(mut self, size: Size) -> Self {
        self.max_image_size = Some(size);
        self
    }

    pub fn with_step(mut self, step: i32) -> Self {
        self.step = step;
        self
    }

    pub fn with_resize_policy(mut self, policy: ResizePolicy) -> Self {
        self.resize_policy = policy;
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_prefer_horizontal(mut self, prefer_horizontal: f64) -> Self {
        self.prefer_horizontal = prefer_horizontal;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Enable canvas growth by `step` when items fail to place.
    pub fn with_cloud_expansion(mut self, step: u32) -> Self {
        self.cloud_expansion_step = step;
        self
    }

    pub fn with_max_expansion_rounds(mut self, rounds: u32) -> Self {
        self.max_expansion_rounds = rounds;
        self
    }

    pub fn with_maximize_empty_space(mut self, enabled: bool) -> Self {
        self.maximize_empty_space = enabled;
        self
    }

    pub fn with_on_drop(mut self, policy: OnDropPolicy) -> Self {
        self.on_drop = policy;
        self
    }

    pub fn with_parallelism(mut self, workers: usize) -> Self {
        self.parallelism = workers;
        self
    }

    /// True when the rotated orientation may be tried.
    pub fn allows_rotation(&self) -> bool {
        self.prefer_horizontal < 1.0
    }

    /// Check every field, failing on the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_images == 0 {
            return Err(ConfigError::InvalidMaxImages);
        }
        if self.step < 1 {
            return Err(ConfigError::InvalidStep(self.step));
        }
        if self.min_image_size.is_empty() {
            return Err(ConfigError::InvalidMinSize(self.min_image_size));
        }
        if let Some(max) = self.max_image_size {
            if max.is_smaller_than(&self.min_image_size) {
                return Err(ConfigError::MaxBelowMin {
                    max,
                    min: self.min_image_size,
                });
            }
        }
        if !(0.0..=1.0).contains(&self.prefer_horizontal) {
            return Err(ConfigError::InvalidPreferHorizontal(self.prefer_horizontal));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::InvalidScale(self.scale));
        }
        if self.parallelism == 0 {
            return Err(ConfigError::InvalidWorkerCount);
        }
        Ok(())
    }
}
