//! Box expansion into free space after placement.
//!
//! Items are revisited last-placed first. Every ordering of the four
//! directions is tried, pushing the reservation one cell at a time in each
//! direction while the swept strip is free. The largest resulting box wins.

use crate::cloud::Layout;
use crate::grid::ReservationGrid;
use imagecloud_core::Bounds;
use log::{debug, info};
use std::time::Instant;

/// A side of a box that can be pushed outward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    /// The one-cell strip just outside `bounds` on this side.
    fn strip(&self, bounds: &Bounds) -> Bounds {
        match self {
            Direction::Up => {
                Bounds::from_edges(bounds.left, bounds.upper - 1, bounds.right, bounds.upper)
            }
            Direction::Left => {
                Bounds::from_edges(bounds.left - 1, bounds.upper, bounds.left, bounds.lower)
            }
            Direction::Down => {
                Bounds::from_edges(bounds.left, bounds.lower, bounds.right, bounds.lower + 1)
            }
            Direction::Right => {
                Bounds::from_edges(bounds.right, bounds.upper, bounds.right + 1, bounds.lower)
            }
        }
    }

    /// `bounds` grown by one cell on this side.
    fn grow(&self, bounds: &Bounds) -> Bounds {
        let mut grown = *bounds;
        match self {
            Direction::Up => grown.upper -= 1,
            Direction::Left => grown.left -= 1,
            Direction::Down => grown.lower += 1,
            Direction::Right => grown.right += 1,
        }
        grown
    }
}

/// All 24 orderings of the four directions.
pub fn direction_orderings() -> Vec<[Direction; 4]> {
    let mut orderings = Vec::with_capacity(24);
    for a in Direction::ALL {
        for b in Direction::ALL {
            for c in Direction::ALL {
                for d in Direction::ALL {
                    let ordering = [a, b, c, d];
                    let distinct = (0..4).all(|i| (i + 1..4).all(|j| ordering[i] != ordering[j]));
                    if distinct {
                        orderings.push(ordering);
                    }
                }
            }
        }
    }
    orderings
}

/// Push `bounds` in `direction` while the next strip is free.
pub fn extend_in_direction(grid: &ReservationGrid, bounds: Bounds, direction: Direction) -> Bounds {
    let mut current = bounds;
    while grid.is_free(&direction.strip(&current)) {
        current = direction.grow(&current);
    }
    current
}

/// The largest box reachable from `reservation` over all direction orderings.
///
/// Ties keep the candidate from the earliest ordering.
pub fn maximize_reservation(grid: &ReservationGrid, reservation: Bounds) -> Bounds {
    let mut best = reservation;
    for ordering in direction_orderings() {
        let mut candidate = reservation;
        for direction in ordering {
            candidate = extend_in_direction(grid, candidate, direction);
        }
        if candidate.area() > best.area() {
            best = candidate;
        }
    }
    best
}

/// Summary of an expansion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpansionReport {
    /// Items whose reservation grew
    pub expanded: usize,
    /// Cells gained across all items
    pub gained_area: u64,
}

/// Grow every item's reservation into neighboring free cells.
///
/// Reservations keep their ids. Placement boxes are recomputed from the new
/// reservations with the configured margin removed, and each image takes the
/// size of its new placement.
pub fn expand(layout: &mut Layout) -> ExpansionReport {
    let start = Instant::now();
    let margin = layout.config.margin;
    let mut report = ExpansionReport::default();

    for item in layout.items.iter_mut().rev() {
        let expanded = maximize_reservation(&layout.grid, item.reservation);
        if expanded == item.reservation {
            continue;
        }
        debug!(
            "Expanded {} from {} to {}",
            item.image.name, item.reservation, expanded
        );
        layout.grid.extend_reservation(item.reservation_id, expanded);
        report.expanded += 1;
        report.gained_area += expanded.area() - item.reservation.area();
        item.reservation = expanded;
        item.placement = expanded.image_box(margin);
        item.image.size = item.orientation.orient(item.placement.size());
    }

    info!(
        "Expanded {}/{} reservations by {} cells ({:?})",
        report.expanded,
        layout.items.len(),
        report.gained_area,
        start.elapsed()
    );
    report
}
