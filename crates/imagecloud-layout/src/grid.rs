//! Occupancy grid of reservation ids.
//!
//! Every cell holds either [`ReservationId::UNRESERVED`] or the id of exactly one
//! live reservation. A summed-area table over occupied cells answers
//! [`ReservationGrid::is_free`] in constant time regardless of the box size.
//! Masked cells count as occupied but never carry an id.

use imagecloud_core::{Bounds, CanvasMask, CanvasSpec, Position, Size};
use rand::{Rng, RngCore};
use std::fmt;
use std::ops::Range;

/// Identifier of a committed reservation. Zero means unoccupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ReservationId(pub u32);

impl ReservationId {
    pub const UNRESERVED: ReservationId = ReservationId(0);

    pub fn is_reserved(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A committed, non-overlapping box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: ReservationId,
    pub name: String,
    pub bounds: Bounds,
}

/// A width x height array of reservation ids.
#[derive(Debug, Clone)]
pub struct ReservationGrid {
    size: Size,
    /// Row-major reservation ids
    cells: Vec<u32>,
    mask: Option<CanvasMask>,
    /// `(width + 1) * (height + 1)` prefix counts of occupied cells
    integral: Vec<u64>,
    reservations: Vec<Reservation>,
    last_id: u32,
}

impl ReservationGrid {
    /// Create an empty grid.
    pub fn new(size: Size) -> Self {
        let area = size.area() as usize;
        let integral_len = (size.width as usize + 1) * (size.height as usize + 1);
        Self {
            size,
            cells: vec![0; area],
            mask: None,
            integral: vec![0; integral_len],
            reservations: Vec::new(),
            last_id: 0,
        }
    }

    /// Create an empty grid whose masked cells are permanently occupied.
    pub fn with_mask(mask: CanvasMask) -> Self {
        let mut grid = Self::new(mask.size());
        grid.mask = Some(mask);
        grid.rebuild_integral_from(0);
        grid
    }

    /// Create an empty grid for a canvas, honoring its mask.
    pub fn for_canvas(canvas: &CanvasSpec) -> Self {
        match &canvas.mask {
            Some(mask) => Self::with_mask(mask.clone()),
            None => Self::new(canvas.size),
        }
    }

    /// Rebuild a grid from persisted row-major ids.
    ///
    /// Reservation bounds are recovered as the bounding box of each id's cells.
    /// Returns `None` if the cell count does not match the size.
    pub fn from_cells(size: Size, cells: Vec<u32>, mask: Option<CanvasMask>) -> Option<Self> {
        if cells.len() as u64 != size.area() {
            return None;
        }
        if mask.as_ref().is_some_and(|m| m.size() != size) {
            return None;
        }
        let mut grid = Self::new(size);
        grid.cells = cells;
        grid.mask = mask;
        grid.rebuild_integral_from(0);

        let mut extents: std::collections::BTreeMap<u32, Bounds> = Default::default();
        for y in 0..size.height {
            for x in 0..size.width {
                let id = grid.cells[grid.index(x, y)];
                if id == 0 {
                    continue;
                }
                let (x, y) = (x as i32, y as i32);
                extents
                    .entry(id)
                    .and_modify(|b| {
                        b.left = b.left.min(x);
                        b.upper = b.upper.min(y);
                        b.right = b.right.max(x + 1);
                        b.lower = b.lower.max(y + 1);
                    })
                    .or_insert_with(|| Bounds::from_edges(x, y, x + 1, y + 1));
            }
        }
        for (id, bounds) in extents {
            grid.last_id = grid.last_id.max(id);
            grid.reservations.push(Reservation {
                id: ReservationId(id),
                name: String::new(),
                bounds,
            });
        }
        Some(grid)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// The whole grid as a box.
    pub fn bounds(&self) -> Bounds {
        Bounds::from_size(self.size)
    }

    pub fn mask(&self) -> Option<&CanvasMask> {
        self.mask.as_ref()
    }

    /// Row-major reservation ids.
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Reservation ids one row at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.chunks(self.size.width.max(1) as usize)
    }

    pub fn cell(&self, x: u32, y: u32) -> ReservationId {
        ReservationId(self.cells[self.index(x, y)])
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    pub fn reservation(&self, id: ReservationId) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id == id)
    }

    /// The next unused sequential id.
    pub fn next_id(&self) -> ReservationId {
        ReservationId(self.last_id + 1)
    }

    /// Number of occupied cells (reserved or masked) inside `bounds`.
    ///
    /// `bounds` must lie within the grid.
    pub fn occupied_in(&self, bounds: &Bounds) -> u64 {
        let stride = self.size.width as usize + 1;
        let at = |x: i32, y: i32| self.integral[y as usize * stride + x as usize];
        at(bounds.right, bounds.lower) + at(bounds.left, bounds.upper)
            - at(bounds.left, bounds.lower)
            - at(bounds.right, bounds.upper)
    }

    /// True if `bounds` is inside the grid and none of its cells are occupied.
    pub fn is_free(&self, bounds: &Bounds) -> bool {
        self.bounds().contains(bounds) && !bounds.is_empty() && self.occupied_in(bounds) == 0
    }

    /// Commit `bounds` under `id`.
    ///
    /// Cells already owned by `id` may be reserved again, which is how an
    /// existing reservation grows.
    ///
    /// # Panics
    ///
    /// Panics if `id` is zero, if `bounds` is not contained in the grid, or if
    /// any cell is masked or owned by another reservation.
    pub fn reserve(&mut self, id: ReservationId, name: impl Into<String>, bounds: Bounds) {
        assert!(id.is_reserved(), "reservation id 0 is reserved for free cells");
        assert!(
            self.bounds().contains(&bounds),
            "reservation {bounds} is outside the grid {}",
            self.size
        );
        for y in bounds.upper..bounds.lower {
            for x in bounds.left..bounds.right {
                let (x, y) = (x as u32, y as u32);
                let owner = self.cells[self.index(x, y)];
                assert!(
                    owner == 0 || owner == id.0,
                    "reservation {id} at ({x}, {y}) overlaps reservation {owner}"
                );
                assert!(!self.is_masked(x, y), "reservation {id} covers masked cell ({x}, {y})");
            }
        }

        let width = self.size.width as usize;
        for y in bounds.upper..bounds.lower {
            let row = y as usize * width;
            self.cells[row + bounds.left as usize..row + bounds.right as usize].fill(id.0);
        }
        self.rebuild_integral_from(bounds.upper as u32);

        let name = name.into();
        match self.reservations.iter_mut().find(|r| r.id == id) {
            Some(existing) => {
                existing.bounds = bounds;
                if !name.is_empty() {
                    existing.name = name;
                }
            }
            None => self.reservations.push(Reservation { id, name, bounds }),
        }
        self.last_id = self.last_id.max(id.0);
    }

    /// Grow an existing reservation to `bounds`.
    ///
    /// # Panics
    ///
    /// Panics if `id` has no reservation, if `bounds` does not contain the
    /// current reservation, or under the same conditions as [`Self::reserve`].
    pub fn extend_reservation(&mut self, id: ReservationId, bounds: Bounds) {
        let current = match self.reservation(id) {
            Some(existing) => existing.bounds,
            None => panic!("no reservation {id} to extend"),
        };
        assert!(
            bounds.contains(&current),
            "extension {bounds} does not contain reservation {id} at {current}"
        );
        self.reserve(id, String::new(), bounds);
    }

    /// Rows on which a box of `size` could start.
    pub fn candidate_rows(&self, size: Size) -> Range<i32> {
        if size.is_empty() || !size.fits_in(&self.size) {
            return 0..0;
        }
        0..(self.size.height - size.height + 1) as i32
    }

    /// Count free top-left positions for `size` starting on `rows`.
    pub fn count_free_positions(&self, size: Size, rows: Range<i32>) -> u64 {
        let columns = self.candidate_columns(size);
        let mut count = 0;
        for upper in rows {
            for left in columns.clone() {
                if self.is_free(&Bounds::new(Position::new(left, upper), size)) {
                    count += 1;
                }
            }
        }
        count
    }

    /// The `n`th free top-left position for `size` on `rows`, in row-major order.
    pub fn nth_free_position(&self, size: Size, rows: Range<i32>, n: u64) -> Option<Position> {
        let columns = self.candidate_columns(size);
        let mut remaining = n;
        for upper in rows {
            for left in columns.clone() {
                let position = Position::new(left, upper);
                if self.is_free(&Bounds::new(position, size)) {
                    if remaining == 0 {
                        return Some(position);
                    }
                    remaining -= 1;
                }
            }
        }
        None
    }

    /// Pick a free box of `size` uniformly at random among all free positions.
    pub fn find_free_box(&self, size: Size, rng: &mut dyn RngCore) -> Option<Bounds> {
        let rows = self.candidate_rows(size);
        let total = self.count_free_positions(size, rows.clone());
        if total == 0 {
            return None;
        }
        let n = rng.gen_range(0..total);
        self.nth_free_position(size, rows, n)
            .map(|position| Bounds::new(position, size))
    }

    fn candidate_columns(&self, size: Size) -> Range<i32> {
        if size.is_empty() || !size.fits_in(&self.size) {
            return 0..0;
        }
        0..(self.size.width - size.width + 1) as i32
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size.width as usize + x as usize
    }

    fn is_masked(&self, x: u32, y: u32) -> bool {
        self.mask.as_ref().is_some_and(|m| m.is_blocked(x, y))
    }

    fn is_occupied(&self, x: u32, y: u32) -> bool {
        self.cells[self.index(x, y)] != 0 || self.is_masked(x, y)
    }

    /// Recompute prefix rows below `upper`, the first row a change touched.
    fn rebuild_integral_from(&mut self, upper: u32) {
        let stride = self.size.width as usize + 1;
        for y in upper..self.size.height {
            let mut row_sum = 0u64;
            for x in 0..self.size.width {
                if self.is_occupied(x, y) {
                    row_sum += 1;
                }
                let above = self.integral[y as usize * stride + x as usize + 1];
                self.integral[(y as usize + 1) * stride + x as usize + 1] = above + row_sum;
            }
        }
    }
}

impl PartialEq for ReservationGrid {
    /// Grids are equal when they have the same shape, ids, and mask.
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.cells == other.cells && self.mask == other.mask
    }
}
