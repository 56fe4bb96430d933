//! Wall selection.
//!
//! Per cycle, every successfully fitted sample is transformed into the world
//! frame, rejected if it is not close to vertical, and scored by inlier count
//! against the sensor-frame cloud. The first candidate with the strictly
//! largest count wins, so ties resolve to canonical scan order.

use log::debug;
use nalgebra::Matrix4;

use super::grid_sampler::GridSample;
use super::inliers::count_inliers;
use crate::core::math::plane_to_world;
use crate::core::types::{PlaneModel, PointCloudSnapshot};
use crate::error::FitError;

/// A world-frame plane that passed the verticality test.
///
/// Only [`VerticalPlane::check`] constructs one, so a tracked wall built from
/// it is vertical by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalPlane(PlaneModel);

impl VerticalPlane {
    /// Accept `plane` if `|c| < threshold` (world Z is up).
    ///
    /// A zero normal is not a plane and never passes, whatever its offset.
    pub fn check(plane: PlaneModel, threshold: f64) -> Option<Self> {
        let is_plane = plane.is_finite() && plane.normal().norm() > f64::EPSILON;
        (is_plane && plane.c().abs() < threshold).then_some(Self(plane))
    }

    /// The underlying world-frame plane.
    pub fn plane(&self) -> &PlaneModel {
        &self.0
    }
}

/// Winning candidate of one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallCandidate {
    /// Plane as returned by the fit primitive (depth frame).
    pub sensor_plane: PlaneModel,
    /// Same plane in the world frame.
    pub world_plane: VerticalPlane,
    /// Support in the sensor cloud.
    pub inliers: usize,
    /// Grid index in canonical order.
    pub index: usize,
    pub u: f64,
    pub v: f64,
}

/// Counters for one selection pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionStats {
    /// Grid samples evaluated
    pub samples: usize,
    /// Samples the fit primitive answered
    pub fitted: usize,
    /// Fitted samples passing the verticality test
    pub vertical: usize,
    /// Samples that failed (any [`FitError`])
    pub failures: usize,
    /// First permission failure message seen, if any
    pub permission_denied: Option<String>,
}

/// Result of one selection pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub best: Option<WallCandidate>,
    pub stats: SelectionStats,
}

/// Verticality + support ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSelector {
    verticality_threshold: f64,
    inlier_epsilon: f64,
    min_inliers: usize,
}

impl WallSelector {
    pub fn new(verticality_threshold: f64, inlier_epsilon: f64, min_inliers: usize) -> Self {
        Self {
            verticality_threshold,
            inlier_epsilon,
            min_inliers,
        }
    }

    /// True if a world-frame plane counts as a wall.
    pub fn is_vertical(&self, world_plane: &PlaneModel) -> bool {
        VerticalPlane::check(*world_plane, self.verticality_threshold).is_some()
    }

    /// Pick the best wall among `samples`.
    ///
    /// `depth_t_world` maps world coordinates into the depth frame; its
    /// transpose carries sensor-frame plane coefficients into the world.
    pub fn select(
        &self,
        samples: impl IntoIterator<Item = GridSample>,
        cloud: &PointCloudSnapshot,
        depth_t_world: &Matrix4<f64>,
    ) -> Selection {
        let mut selection = Selection::default();
        let mut most_inliers = 0usize;

        for sample in samples {
            selection.stats.samples += 1;

            let sensor_plane = match sample.result {
                Ok(plane) => plane,
                Err(err) => {
                    debug!(
                        "sample {} ({}, {}) failed: {}",
                        sample.index, sample.u, sample.v, err
                    );
                    selection.stats.failures += 1;
                    if let FitError::PermissionDenied(msg) = err
                        && selection.stats.permission_denied.is_none()
                    {
                        selection.stats.permission_denied = Some(msg);
                    }
                    continue;
                }
            };
            selection.stats.fitted += 1;

            let Some(world) = plane_to_world(&sensor_plane, depth_t_world) else {
                debug!(
                    "sample {}: depth->world transform not invertible",
                    sample.index
                );
                selection.stats.failures += 1;
                continue;
            };

            let Some(world_plane) = VerticalPlane::check(world, self.verticality_threshold) else {
                continue;
            };
            selection.stats.vertical += 1;

            let inliers = count_inliers(cloud.points(), &sensor_plane, self.inlier_epsilon);
            if inliers > most_inliers && inliers >= self.min_inliers {
                most_inliers = inliers;
                selection.best = Some(WallCandidate {
                    sensor_plane,
                    world_plane,
                    inliers,
                    index: sample.index,
                    u: sample.u,
                    v: sample.v,
                });
            }
        }

        selection
    }
}
