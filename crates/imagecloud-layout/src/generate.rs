//! Placement orchestration.
//!
//! Items are placed one at a time, heaviest first. Each item's search sees
//! the grid produced by every earlier reservation, so placement itself is
//! sequential. Only the free-box scan inside a single search may fan out.

use crate::cloud::{Layout, LayoutItem};
use crate::expand::expand;
use crate::fit::fit_proportionally;
use crate::grid::ReservationGrid;
use crate::sampler::{sample, SampleRequest};
use crate::search::{search_for, FreeBoxSearch};
use imagecloud_core::{
    sort_by_weight, Bounds, CanvasSpec, CloudError, ConfigError, LayoutConfig, LayoutError,
    OnDropPolicy, Orientation, Size, WeightedImage,
};
use log::{debug, info, warn};
use rand::{Rng, RngCore};
use std::time::Instant;

/// Generates layouts with a fixed configuration and search strategy.
pub struct CloudGenerator {
    config: LayoutConfig,
    search: Box<dyn FreeBoxSearch>,
}

/// Items placed on one grid, and those that could not be.
struct Placement {
    grid: ReservationGrid,
    items: Vec<LayoutItem>,
    dropped: Vec<WeightedImage>,
}

impl CloudGenerator {
    /// Validate `config` and pick the search strategy for its worker count.
    pub fn new(config: LayoutConfig) -> Result<Self, CloudError> {
        config.validate()?;
        let search = search_for(config.parallelism)?;
        Ok(Self { config, search })
    }

    /// Use a caller-supplied search strategy.
    pub fn with_search(
        config: LayoutConfig,
        search: Box<dyn FreeBoxSearch>,
    ) -> Result<Self, CloudError> {
        config.validate()?;
        Ok(Self { config, search })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn search(&self) -> &dyn FreeBoxSearch {
        self.search.as_ref()
    }

    /// Lay out `images` on `canvas`.
    ///
    /// Always produces a layout once the inputs are valid. Items that cannot
    /// be placed at any size of at least the minimum are listed in
    /// [`Layout::dropped`].
    pub fn generate(
        &self,
        mut images: Vec<WeightedImage>,
        canvas: CanvasSpec,
        rng: &mut dyn RngCore,
    ) -> Result<Layout, CloudError> {
        if images.is_empty() {
            return Err(LayoutError::NoImages.into());
        }
        if let Some(mask) = &canvas.mask {
            if self.config.cloud_expansion_step > 0 {
                return Err(LayoutError::ExpansionWithMask.into());
            }
            if mask.size() != canvas.size {
                return Err(LayoutError::MaskSizeMismatch {
                    mask: mask.size(),
                    canvas: canvas.size,
                }
                .into());
            }
        }
        if canvas.size.is_empty() {
            return Err(ConfigError::EmptyCanvas(canvas.size).into());
        }

        sort_by_weight(&mut images);
        images.truncate(self.config.max_images);

        let start = Instant::now();
        let mut canvas = canvas;
        let mut rounds = 0;
        let placement = loop {
            let placement = self.place_all(&images, &canvas, rng);
            let unplaced = placement
                .dropped
                .iter()
                .filter(|image| image.is_placeable())
                .count();
            if unplaced == 0 || self.config.cloud_expansion_step == 0 {
                break placement;
            }
            if rounds >= self.config.max_expansion_rounds {
                warn!(
                    "Stopped growing canvas after {rounds} rounds with {unplaced} items unplaced"
                );
                break placement;
            }
            let grown = canvas.size.adjust(
                self.config.cloud_expansion_step as i32,
                self.config.resize_policy,
            );
            rounds += 1;
            info!(
                "Growing canvas {} -> {grown} to fit {unplaced} unplaced items (round {rounds})",
                canvas.size
            );
            canvas.size = grown;
        };

        let placed = placement.items.len();
        info!(
            "Placed {placed}/{} images on {} using {} search ({:?})",
            images.len(),
            canvas.size,
            self.search.name(),
            start.elapsed()
        );

        let mut layout = Layout {
            canvas,
            items: placement.items,
            grid: placement.grid,
            config: self.config.clone(),
            dropped: placement.dropped,
            expansion_rounds: rounds,
        };
        if self.config.maximize_empty_space {
            expand(&mut layout);
        }
        Ok(layout)
    }

    /// One full placement pass on a fresh grid.
    fn place_all(
        &self,
        images: &[WeightedImage],
        canvas: &CanvasSpec,
        rng: &mut dyn RngCore,
    ) -> Placement {
        let config = &self.config;
        let start = Instant::now();
        let free_area = canvas.size.area()
            - canvas.mask.as_ref().map_or(0, |mask| mask.blocked_count() as u64);
        let fitted: Vec<WeightedImage> = fit_proportionally(
            images,
            free_area,
            config.resize_policy,
            config.step,
            config.margin,
        )
        .into_iter()
        .map(|fitted| {
            debug!(
                "Fitted {} to {} in {} steps (target area {})",
                fitted.image.name, fitted.image.size, fitted.steps, fitted.target_area
            );
            fitted.image
        })
        .collect();
        info!(
            "Fitted {} images to {} ({:?})",
            fitted.len(),
            canvas.size,
            start.elapsed()
        );

        let cap = match config.max_image_size {
            Some(cap) => cap,
            None => self.estimate_max_size(&fitted, canvas, rng),
        };
        debug!("Using max image size {cap}");
        self.place_sequence(&fitted, canvas, cap, rng)
    }

    /// Estimate a typical image size from a trial placement of the two
    /// heaviest images, as the per-dimension harmonic mean of their sizes.
    fn estimate_max_size(
        &self,
        fitted: &[WeightedImage],
        canvas: &CanvasSpec,
        rng: &mut dyn RngCore,
    ) -> Size {
        let leading: Vec<WeightedImage> = fitted
            .iter()
            .filter(|image| image.is_placeable())
            .take(2)
            .cloned()
            .collect();
        if leading.len() < 2 {
            return canvas.size;
        }

        let trial = self.place_sequence(&leading, canvas, canvas.size, rng);
        match trial.items.as_slice() {
            [a, b] => {
                let harmonic = |a: u32, b: u32| {
                    if a + b == 0 {
                        0
                    } else {
                        (2.0 * a as f64 * b as f64 / (a + b) as f64).round() as u32
                    }
                };
                let (a, b) = (a.image.size, b.image.size);
                let min = self.config.min_image_size;
                Size::new(
                    harmonic(a.width, b.width).max(min.width),
                    harmonic(a.height, b.height).max(min.height),
                )
            }
            _ => {
                warn!(
                    "Trial placement fit {} of 2 images, using canvas size {} as the cap",
                    trial.items.len(),
                    canvas.size
                );
                canvas.size
            }
        }
    }

    /// Place `images` in order on a fresh grid, each capped to `cap`.
    fn place_sequence(
        &self,
        images: &[WeightedImage],
        canvas: &CanvasSpec,
        cap: Size,
        rng: &mut dyn RngCore,
    ) -> Placement {
        let config = &self.config;
        let mut grid = ReservationGrid::for_canvas(canvas);
        let mut items = Vec::new();
        let mut dropped = Vec::new();
        let mut aborted = false;

        for image in images {
            if aborted || !image.is_placeable() {
                dropped.push(image.clone());
                continue;
            }

            let start = Instant::now();
            let start_orientation = if config.allows_rotation() && !rng.gen_bool(config.prefer_horizontal)
            {
                Orientation::Rotate90
            } else {
                Orientation::Upright
            };
            let request = SampleRequest {
                target: image.size.fit_within(&cap),
                min_size: config.min_image_size,
                margin: config.margin,
                policy: config.resize_policy,
                step: config.step,
                start: start_orientation,
                allow_rotation: config.allows_rotation(),
            };
            let result = sample(&grid, self.search.as_ref(), &request, rng);

            match result.opening {
                Some(opening) => {
                    let id = grid.next_id();
                    grid.reserve(id, image.name.clone(), opening);
                    debug!(
                        "Reserved {opening} as {id} for {} after {} attempts ({:?})",
                        image.name,
                        result.attempts,
                        start.elapsed()
                    );
                    let placement = Bounds::new(
                        opening.position().adjust((config.margin / 2) as i32),
                        result.orientation.orient(result.new_size),
                    );
                    items.push(LayoutItem {
                        image: image.with_size(result.new_size),
                        placement,
                        orientation: result.orientation,
                        reservation: opening,
                        reservation_id: id,
                        attempts: result.attempts,
                    });
                }
                None => {
                    warn!(
                        "Dropped {}: no opening at {} or larger after {} attempts",
                        image.name, result.new_size, result.attempts
                    );
                    dropped.push(image.clone());
                    if config.on_drop == OnDropPolicy::AbortRemaining {
                        aborted = true;
                    }
                }
            }
        }

        Placement {
            grid,
            items,
            dropped,
        }
    }
}

impl std::fmt::Debug for CloudGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudGenerator")
            .field("config", &self.config)
            .field("search", &self.search.name())
            .finish()
    }
}
