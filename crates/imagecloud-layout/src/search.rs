//! Free-box search strategies.
//!
//! Both strategies choose uniformly among every free top-left position and
//! draw exactly one random index per query, so for the same random state
//! they return the same box.

use crate::grid::ReservationGrid;
use imagecloud_core::{Bounds, LayoutError, Size};
use rand::{Rng, RngCore};
use rayon::prelude::*;
use std::ops::Range;

/// Strategy for finding an unreserved box of a given size.
pub trait FreeBoxSearch: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Number of threads scanning the grid.
    fn worker_count(&self) -> usize;

    /// Find a free box of `size`, chosen uniformly among all candidates.
    fn find_free_box(
        &self,
        grid: &ReservationGrid,
        size: Size,
        rng: &mut dyn RngCore,
    ) -> Option<Bounds>;
}

/// Single-threaded scan of every candidate position.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialSearch;

impl FreeBoxSearch for SequentialSearch {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn worker_count(&self) -> usize {
        1
    }

    fn find_free_box(
        &self,
        grid: &ReservationGrid,
        size: Size,
        rng: &mut dyn RngCore,
    ) -> Option<Bounds> {
        grid.find_free_box(size, rng)
    }
}

/// Scan row bands concurrently on a dedicated worker pool.
///
/// Each band counts its free positions in parallel. One index is drawn over
/// the combined count and resolved to a band by prefix sums, so the choice is
/// uniform over the union of every band's hits. The pool joins all bands
/// before returning, and only the caller writes to the grid afterwards.
pub struct ParallelSearch {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl ParallelSearch {
    /// Create a search backed by `workers` threads.
    pub fn new(workers: usize) -> Result<Self, LayoutError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("imagecloud-search-{index}"))
            .build()
            .map_err(|e| LayoutError::ThreadPool(e.to_string()))?;
        Ok(Self { pool, workers })
    }

    fn bands(&self, rows: Range<i32>) -> Vec<Range<i32>> {
        let total = (rows.end - rows.start).max(0) as usize;
        if total == 0 {
            return Vec::new();
        }
        let band_count = (self.workers * 4).min(total);
        let per_band = total.div_ceil(band_count);
        (0..band_count)
            .map(|i| {
                let start = rows.start + (i * per_band) as i32;
                let end = (start + per_band as i32).min(rows.end);
                start..end
            })
            .filter(|band| !band.is_empty())
            .collect()
    }
}

impl std::fmt::Debug for ParallelSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelSearch")
            .field("workers", &self.workers)
            .finish()
    }
}

impl FreeBoxSearch for ParallelSearch {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn worker_count(&self) -> usize {
        self.workers
    }

    fn find_free_box(
        &self,
        grid: &ReservationGrid,
        size: Size,
        rng: &mut dyn RngCore,
    ) -> Option<Bounds> {
        let bands = self.bands(grid.candidate_rows(size));
        let counts: Vec<u64> = self.pool.install(|| {
            bands
                .par_iter()
                .map(|band| grid.count_free_positions(size, band.clone()))
                .collect()
        });

        let total: u64 = counts.iter().sum();
        if total == 0 {
            return None;
        }
        let mut n = rng.gen_range(0..total);
        for (band, count) in bands.into_iter().zip(counts) {
            if n < count {
                return grid
                    .nth_free_position(size, band, n)
                    .map(|position| Bounds::new(position, size));
            }
            n -= count;
        }
        None
    }
}

/// Build the search strategy for a worker count.
pub fn search_for(workers: usize) -> Result<Box<dyn FreeBoxSearch>, LayoutError> {
    if workers <= 1 {
        Ok(Box::new(SequentialSearch))
    } else {
        Ok(Box::new(ParallelSearch::new(workers)?))
    }
}
