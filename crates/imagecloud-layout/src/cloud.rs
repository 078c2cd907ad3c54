//! Generated layouts.

use crate::grid::{ReservationGrid, ReservationId};
use imagecloud_core::{Bounds, CanvasSpec, LayoutConfig, Orientation, WeightedImage};

/// A placed image.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutItem {
    /// Source image carrying its fitted size
    pub image: WeightedImage,
    /// Visible box, the reservation with its margin removed
    pub placement: Bounds,
    pub orientation: Orientation,
    /// Reserved box, margin included
    pub reservation: Bounds,
    pub reservation_id: ReservationId,
    /// Sampler attempts spent placing this item
    pub attempts: usize,
}

/// The result of a placement run.
#[derive(Debug, Clone)]
pub struct Layout {
    pub canvas: CanvasSpec,
    /// Placed items in placement order
    pub items: Vec<LayoutItem>,
    pub grid: ReservationGrid,
    pub config: LayoutConfig,
    /// Images that could not be placed, in the order they were dropped
    pub dropped: Vec<WeightedImage>,
    /// Canvas growth rounds performed
    pub expansion_rounds: u32,
}

impl Layout {
    /// An empty layout on `canvas`.
    pub fn new(canvas: CanvasSpec, config: LayoutConfig) -> Self {
        let grid = ReservationGrid::for_canvas(&canvas);
        Self {
            canvas,
            items: Vec::new(),
            grid,
            config,
            dropped: Vec::new(),
            expansion_rounds: 0,
        }
    }

    /// Canvas-sized box.
    pub fn canvas_bounds(&self) -> Bounds {
        Bounds::from_size(self.canvas.size)
    }

    /// Rebuild the occupancy grid from the items' reservations, in id order.
    pub fn reconstruct_grid(&self) -> ReservationGrid {
        let mut grid = ReservationGrid::for_canvas(&self.canvas);
        let mut items: Vec<&LayoutItem> = self.items.iter().collect();
        items.sort_by_key(|item| item.reservation_id);
        for item in items {
            grid.reserve(item.reservation_id, item.image.name.clone(), item.reservation);
        }
        grid
    }

    /// True if the stored grid matches one rebuilt from the items.
    pub fn grid_matches_items(&self) -> bool {
        self.reconstruct_grid() == self.grid
    }

    /// Total reserved area across all items.
    pub fn reserved_area(&self) -> u64 {
        self.items.iter().map(|item| item.reservation.area()).sum()
    }

    pub fn item(&self, id: ReservationId) -> Option<&LayoutItem> {
        self.items.iter().find(|item| item.reservation_id == id)
    }
}
