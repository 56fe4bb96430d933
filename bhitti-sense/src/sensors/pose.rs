//! Pose estimator interface.

use crate::core::types::{CoordinateFrame, PoseSample, TransformSample};

/// Source of timestamped poses between named frames.
///
/// A `(base, target)` query answers "where is `target`, expressed in
/// `base`"; the matching transform maps `target` coordinates into `base`
/// coordinates. Either answer may come back with `valid == false`.
pub trait PoseEstimator: Send + Sync {
    /// Pose of `target` in `base` at `timestamp`.
    fn query_pose(
        &self,
        timestamp: f64,
        base: CoordinateFrame,
        target: CoordinateFrame,
    ) -> PoseSample;

    /// Homogeneous transform for the same frame pair.
    fn query_transform(
        &self,
        timestamp: f64,
        base: CoordinateFrame,
        target: CoordinateFrame,
    ) -> TransformSample {
        self.query_pose(timestamp, base, target).to_transform()
    }
}
