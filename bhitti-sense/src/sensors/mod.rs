//! Sensor-side collaborators of the tracking engine.
//!
//! - [`PointCloudCache`]: single-slot, most-recent-wins handoff between the
//!   sensor callback and the update cycle
//! - [`PoseEstimator`]: timestamped poses / transforms between named frames
//! - [`PlaneFitter`]: local plane fit around one image ray, with
//!   [`LocalPlaneFitter`] as the built-in implementation

mod cache;
mod fitter;
mod local_fit;
mod pose;

pub use cache::PointCloudCache;
pub use fitter::{FitRequest, PlaneFitter};
pub use local_fit::{FitterConfig, LocalPlaneFitter};
pub use pose::PoseEstimator;
