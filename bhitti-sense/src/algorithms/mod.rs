//! Candidate search: grid sampling, inlier scoring and wall selection.
//!
//! One update cycle feeds every grid sample through the selector, which keeps
//! the vertical candidate with the most inliers.

mod grid_sampler;
mod inliers;
mod selector;

pub use grid_sampler::{GridSample, GridSampler};
pub use inliers::count_inliers;
pub use selector::{Selection, SelectionStats, VerticalPlane, WallCandidate, WallSelector};
