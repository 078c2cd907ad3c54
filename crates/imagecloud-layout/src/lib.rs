//! Spatial placement engine for image clouds.
//!
//! Supports:
//! - Occupancy grid with constant-time free-box queries
//! - Weight-proportional image sizing
//! - Stochastic free-box sampling with rotation and shrink-on-failure
//! - Sequential and parallel free-box search strategies
//! - Canvas growth until every item fits
//! - Post-placement box expansion into empty space

pub mod cloud;
pub mod expand;
pub mod fit;
pub mod generate;
pub mod grid;
pub mod sampler;
pub mod search;

pub use cloud::{Layout, LayoutItem};
pub use expand::{expand, maximize_reservation, Direction, ExpansionReport};
pub use fit::{fit_proportionally, fit_to_area, FittedImage};
pub use generate::CloudGenerator;
pub use grid::{Reservation, ReservationGrid, ReservationId};
pub use sampler::{sample, SampleRequest, SampleResult};
pub use search::{search_for, FreeBoxSearch, ParallelSearch, SequentialSearch};
