//! Depth point-cloud snapshots.

use nalgebra::Point3;

use super::CoordinateFrame;

/// One depth capture.
///
/// Points are packed `[x, y, z, c]` quadruplets in the sensor frame; `c` is
/// whatever the depth stack puts there (confidence) and is never read here.
/// A snapshot is immutable once built: the cache swaps whole snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloudSnapshot {
    points: Vec<[f32; 4]>,
    /// Capture time in seconds on the pose estimator's clock.
    pub timestamp: f64,
    /// Frame the points are expressed in.
    pub frame: CoordinateFrame,
}

impl PointCloudSnapshot {
    /// Create a snapshot from quadruplets.
    pub fn new(points: Vec<[f32; 4]>, timestamp: f64, frame: CoordinateFrame) -> Self {
        Self {
            points,
            timestamp,
            frame,
        }
    }

    /// Create a snapshot from a flat buffer of `x, y, z, c` floats.
    ///
    /// A trailing partial quadruplet is dropped.
    pub fn from_packed(values: &[f32], timestamp: f64, frame: CoordinateFrame) -> Self {
        let points = values
            .chunks_exact(4)
            .map(|q| [q[0], q[1], q[2], q[3]])
            .collect();
        Self::new(points, timestamp, frame)
    }

    /// The "no cloud yet" value.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0.0, CoordinateFrame::CameraDepth)
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Is the cloud empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Raw quadruplets.
    #[inline]
    pub fn points(&self) -> &[[f32; 4]] {
        &self.points
    }

    /// Point positions (the padding component dropped).
    pub fn positions(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.points
            .iter()
            .map(|p| Point3::new(p[0] as f64, p[1] as f64, p[2] as f64))
    }
}

impl Default for PointCloudSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
