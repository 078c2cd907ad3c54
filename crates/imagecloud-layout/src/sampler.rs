//! Free-box sampling with orientation flips and shrink-on-failure.

use crate::grid::ReservationGrid;
use crate::search::FreeBoxSearch;
use imagecloud_core::{Bounds, Orientation, ResizePolicy, Size};
use rand::RngCore;

/// Parameters for one sampling run.
#[derive(Debug, Clone, Copy)]
pub struct SampleRequest {
    /// Upright size to try first, without margin
    pub target: Size,
    pub min_size: Size,
    pub margin: u32,
    pub policy: ResizePolicy,
    pub step: i32,
    /// Orientation of the first attempt at every size
    pub start: Orientation,
    /// Whether the other orientation may be tried
    pub allow_rotation: bool,
}

/// Result of a sampling run.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleResult {
    /// Last upright size tried, without margin
    pub new_size: Size,
    /// Free box found, margin included
    pub opening: Option<Bounds>,
    pub orientation: Orientation,
    /// Number of sizes and orientations tried
    pub attempts: usize,
}

impl SampleResult {
    pub fn found(&self) -> bool {
        self.opening.is_some()
    }
}

/// Search `grid` for a box that fits the request, shrinking the image by
/// `step` each time neither orientation fits.
///
/// Fails once the size drops below `min_size` or stops shrinking. The grid
/// is not modified.
pub fn sample(
    grid: &ReservationGrid,
    search: &dyn FreeBoxSearch,
    request: &SampleRequest,
    rng: &mut dyn RngCore,
) -> SampleResult {
    let mut size = request.target;
    let mut orientation = request.start;
    let mut rotated = false;
    let mut attempts = 0;

    loop {
        attempts += 1;
        if size.is_empty() || size.is_smaller_than(&request.min_size) {
            return SampleResult {
                new_size: size,
                opening: None,
                orientation,
                attempts,
            };
        }

        let wanted = orientation.orient(size).add_margin(request.margin);
        if let Some(opening) = search.find_free_box(grid, wanted, rng) {
            return SampleResult {
                new_size: size,
                opening: Some(opening),
                orientation,
                attempts,
            };
        }

        if request.allow_rotation && !rotated && size.width != size.height {
            orientation = orientation.flipped();
            rotated = true;
            continue;
        }

        orientation = request.start;
        rotated = false;
        let shrunk = size.adjust(-request.step, request.policy);
        if shrunk == size {
            return SampleResult {
                new_size: size,
                opening: None,
                orientation,
                attempts,
            };
        }
        size = shrunk;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ReservationId;
    use crate::search::SequentialSearch;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn request(target: Size, min_size: Size) -> SampleRequest {
        SampleRequest {
            target,
            min_size,
            margin: 0,
            policy: ResizePolicy::NoResize,
            step: 1,
            start: Orientation::Upright,
            allow_rotation: true,
        }
    }

    #[test]
    fn test_found_immediately() {
        let grid = ReservationGrid::new(Size::new(20, 20));
        let mut rng = StdRng::seed_from_u64(1);
        let result = sample(
            &grid,
            &SequentialSearch,
            &request(Size::new(5, 5), Size::new(1, 1)),
            &mut rng,
        );
        assert!(result.found());
        assert_eq!(result.attempts, 1);
        assert_eq!(result.new_size, Size::new(5, 5));
        assert_eq!(result.orientation, Orientation::Upright);
    }

    #[test]
    fn test_rotates_before_shrinking() {
        // Only a 2-wide, 8-tall column is free.
        let mut grid = ReservationGrid::new(Size::new(10, 8));
        grid.reserve(ReservationId(1), "wall", Bounds::from_edges(0, 0, 8, 8));
        let mut rng = StdRng::seed_from_u64(2);

        let result = sample(
            &grid,
            &SequentialSearch,
            &request(Size::new(6, 2), Size::new(1, 1)),
            &mut rng,
        );
        assert!(result.found());
        assert_eq!(result.orientation, Orientation::Rotate90);
        assert_eq!(result.new_size, Size::new(6, 2));
        assert_eq!(result.opening.unwrap().size(), Size::new(2, 6));
        assert_eq!(result.attempts, 2);
    }

    #[test]
    fn test_shrinks_until_fit() {
        let grid = ReservationGrid::new(Size::new(4, 4));
        let mut rng = StdRng::seed_from_u64(3);
        let result = sample(
            &grid,
            &SequentialSearch,
            &request(Size::new(6, 6), Size::new(2, 2)),
            &mut rng,
        );
        assert!(result.found());
        assert_eq!(result.new_size, Size::new(4, 4));
        // 6x6 and 5x5 fail (squares are never rotated), 4x4 fits.
        assert_eq!(result.attempts, 3);
    }

    #[test]
    fn test_target_below_min_fails_once() {
        let grid = ReservationGrid::new(Size::new(50, 50));
        let mut rng = StdRng::seed_from_u64(4);
        let result = sample(
            &grid,
            &SequentialSearch,
            &request(Size::new(3, 10), Size::new(4, 4)),
            &mut rng,
        );
        assert!(!result.found());
        assert_eq!(result.attempts, 1);
    }

    #[test]
    fn test_exhaustion_reports_last_size() {
        let mut grid = ReservationGrid::new(Size::new(6, 6));
        grid.reserve(ReservationId(1), "full", Bounds::from_edges(0, 0, 6, 6));
        let mut rng = StdRng::seed_from_u64(5);
        let result = sample(
            &grid,
            &SequentialSearch,
            &request(Size::new(4, 3), Size::new(2, 2)),
            &mut rng,
        );
        assert!(!result.found());
        // 4x3 and 3x2 are each tried in both orientations, then 2x1 is too small.
        assert_eq!(result.attempts, 5);
        assert_eq!(result.new_size, Size::new(2, 1));
    }

    #[test]
    fn test_margin_widens_request() {
        let grid = ReservationGrid::new(Size::new(6, 6));
        let mut rng = StdRng::seed_from_u64(6);
        let mut req = request(Size::new(5, 5), Size::new(1, 1));
        req.margin = 2;
        let result = sample(&grid, &SequentialSearch, &req, &mut rng);
        assert_eq!(result.new_size, Size::new(4, 4));
        assert_eq!(result.opening.unwrap().size(), Size::new(6, 6));
    }
}
