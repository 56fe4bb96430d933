//! Grid plane sampler.
//!
//! Casts a fixed grid of image rays against the current cloud and asks the
//! plane-fit primitive for a local plane at each one. Samples are produced
//! lazily in canonical order (`u` outer, `v` inner); a failed sample is
//! reported as an `Err` and the iteration carries on.

use crate::core::types::{CoordinateFrame, DisplayRotation, PlaneModel, PointCloudSnapshot};
use crate::error::FitError;
use crate::sensors::{FitRequest, PlaneFitter, PoseEstimator};

/// Outcome of one grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSample {
    /// Position in canonical scan order.
    pub index: usize,
    /// Horizontal image coordinate.
    pub u: f64,
    /// Vertical image coordinate.
    pub v: f64,
    /// Sensor-frame plane, or why there is none.
    pub result: Result<PlaneModel, FitError>,
}

/// Fixed `U × V` sampling grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSampler {
    grid_u: Vec<f64>,
    grid_v: Vec<f64>,
}

impl GridSampler {
    /// Create a sampler over the cartesian product of `grid_u` and `grid_v`.
    pub fn new(grid_u: Vec<f64>, grid_v: Vec<f64>) -> Self {
        Self { grid_u, grid_v }
    }

    /// Number of samples per cycle.
    pub fn len(&self) -> usize {
        self.grid_u.len() * self.grid_v.len()
    }

    /// True if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grid coordinates in canonical order.
    pub fn coordinates(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.grid_u
            .iter()
            .flat_map(move |&u| self.grid_v.iter().map(move |&v| (u, v)))
    }

    /// Fit every grid cell against `cloud`, lazily.
    ///
    /// Each sample queries the depth → color camera pose at the cloud
    /// timestamp on its own, so a pose dropout fails that sample only.
    pub fn samples<'a>(
        &'a self,
        cloud: &'a PointCloudSnapshot,
        estimator: &'a dyn PoseEstimator,
        fitter: &'a dyn PlaneFitter,
        rotation: DisplayRotation,
    ) -> impl Iterator<Item = GridSample> + 'a {
        self.coordinates()
            .enumerate()
            .map(move |(index, (u, v))| GridSample {
                index,
                u,
                v,
                result: fit_one(cloud, estimator, fitter, rotation, u, v),
            })
    }
}

fn fit_one(
    cloud: &PointCloudSnapshot,
    estimator: &dyn PoseEstimator,
    fitter: &dyn PlaneFitter,
    rotation: DisplayRotation,
    u: f64,
    v: f64,
) -> Result<PlaneModel, FitError> {
    if cloud.is_empty() {
        return Err(FitError::EmptyCloud);
    }

    let camera = estimator
        .query_pose(
            cloud.timestamp,
            CoordinateFrame::CameraDepth,
            CoordinateFrame::CameraColor,
        )
        .require(CoordinateFrame::CameraDepth, CoordinateFrame::CameraColor)?;

    let request = FitRequest::new(u, v, rotation, camera.translation, camera.rotation);
    fitter.fit_near(cloud, &request)
}
