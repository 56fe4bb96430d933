//! One update cycle of wall sensing.
//!
//! [`WallSensingEngine::run_cycle`] is the single entry point for both the
//! threaded service and synchronous callers. Per cycle:
//!
//! 1. Query the device pose in the world frame (abort on failure)
//! 2. Query the depth ← world transform
//! 3. Sample the grid, score, transform and select a candidate
//! 4. Hand the candidate to the tracker
//! 5. Publish the distance to the tracked wall
//!
//! Nothing in a cycle panics or returns an error; failures degrade to "no
//! candidate" or "no measurement".

use log::{debug, warn};
use nalgebra::{Matrix4, Vector3};

use super::config::TrackerConfig;
use super::publisher::{DistancePublisher, DistanceSink, ServiceNotice, WallMeasurement};
use super::tracker::{TrackDecision, WallTracker};
use crate::algorithms::{GridSampler, Selection, SelectionStats, WallCandidate, WallSelector};
use crate::core::math::orientation_from;
use crate::core::types::{CoordinateFrame, DisplayRotation, PlaneModel, PointCloudSnapshot};
use crate::error::{Error, Result};
use crate::sensors::{PlaneFitter, PoseEstimator};

/// How a cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A distance was published.
    Measured,
    /// "No measurement": no wall has been tracked yet, or the cloud was empty.
    NoMeasurement,
    /// The device pose was unavailable; the cycle was aborted.
    PoseUnavailable,
}

/// Everything one cycle observed and decided.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// Cloud timestamp (seconds)
    pub timestamp: f64,
    pub outcome: CycleOutcome,
    /// Tracker decision, if a candidate was selected
    pub decision: Option<TrackDecision>,
    /// Selected candidate, if any
    pub candidate: Option<WallCandidate>,
    /// What was published
    pub measurement: WallMeasurement,
    /// Placement matrix of the candidate in the depth frame
    /// (Z along the normal, up hint +Y)
    pub depth_t_plane: Option<Matrix4<f64>>,
    /// Selection counters
    pub stats: SelectionStats,
}

/// Surface detection and tracking engine.
#[derive(Debug, Clone)]
pub struct WallSensingEngine {
    config: TrackerConfig,
    sampler: GridSampler,
    selector: WallSelector,
    tracker: WallTracker,
    publisher: DistancePublisher,
    rotation: DisplayRotation,
    permission_notified: bool,
}

impl WallSensingEngine {
    /// Create an engine; fails if the configuration is out of range.
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate().map_err(Error::InvalidParameter)?;
        Ok(Self {
            sampler: config.sampler(),
            selector: config.selector(),
            tracker: WallTracker::new(&config),
            publisher: DistancePublisher::new(),
            rotation: DisplayRotation::default(),
            permission_notified: false,
            config,
        })
    }

    /// Builder-style display rotation.
    pub fn with_rotation(mut self, rotation: DisplayRotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn set_display_rotation(&mut self, rotation: DisplayRotation) {
        self.rotation = rotation;
    }

    pub fn display_rotation(&self) -> DisplayRotation {
        self.rotation
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Current tracked wall (world frame).
    pub fn tracked_wall(&self) -> Option<&PlaneModel> {
        self.tracker.tracked()
    }

    pub fn tracker(&self) -> &WallTracker {
        &self.tracker
    }

    /// Forget the tracked wall; the next candidate is adopted.
    pub fn reset(&mut self) {
        self.tracker.reset();
    }

    /// Measurements published so far.
    pub fn published(&self) -> u64 {
        self.publisher.published()
    }

    /// Run one full cycle against `cloud` and publish to `sink`.
    pub fn run_cycle(
        &mut self,
        cloud: &PointCloudSnapshot,
        estimator: &dyn PoseEstimator,
        fitter: &dyn PlaneFitter,
        sink: &mut dyn DistanceSink,
    ) -> CycleReport {
        let timestamp = cloud.timestamp;

        if cloud.is_empty() {
            debug!("Empty point cloud, skipping {} samples", self.sampler.len());
            let stats = SelectionStats {
                samples: self.sampler.len(),
                failures: self.sampler.len(),
                ..SelectionStats::default()
            };
            return self.abort(sink, timestamp, CycleOutcome::NoMeasurement, stats);
        }

        let odometry = estimator
            .query_pose(
                timestamp,
                CoordinateFrame::StartOfService,
                CoordinateFrame::Device,
            )
            .require(CoordinateFrame::StartOfService, CoordinateFrame::Device);
        let device = match odometry {
            Ok(pose) => pose.position(),
            Err(err) => {
                warn!("Cycle aborted: {}", err);
                return self.abort(
                    sink,
                    timestamp,
                    CycleOutcome::PoseUnavailable,
                    SelectionStats::default(),
                );
            }
        };

        let depth_t_world = estimator
            .query_transform(
                timestamp,
                CoordinateFrame::CameraDepth,
                CoordinateFrame::StartOfService,
            )
            .require(
                CoordinateFrame::CameraDepth,
                CoordinateFrame::StartOfService,
            );

        let selection = match depth_t_world {
            Ok(transform) => self.selector.select(
                self.sampler.samples(cloud, estimator, fitter, self.rotation),
                cloud,
                &transform.matrix,
            ),
            Err(err) => {
                debug!("No depth->world transform, holding wall: {}", err);
                Selection {
                    best: None,
                    stats: SelectionStats {
                        samples: self.sampler.len(),
                        failures: self.sampler.len(),
                        ..SelectionStats::default()
                    },
                }
            }
        };

        self.notify_permission(sink, &selection.stats);

        let candidate = selection.best;
        let decision = candidate.map(|c| self.tracker.observe(c.world_plane, &device));
        let depth_t_plane = candidate.and_then(|c| placement(&c.sensor_plane));

        debug!(
            "Cycle t={:.3}: {}/{} fitted, {} vertical, decision {:?}",
            timestamp,
            selection.stats.fitted,
            selection.stats.samples,
            selection.stats.vertical,
            decision
        );

        let measurement =
            self.publisher
                .publish(sink, timestamp, self.tracker.tracked(), Some(&device));
        let outcome = if measurement.has_wall() {
            CycleOutcome::Measured
        } else {
            CycleOutcome::NoMeasurement
        };

        CycleReport {
            timestamp,
            outcome,
            decision,
            candidate,
            measurement,
            depth_t_plane,
            stats: selection.stats,
        }
    }

    fn abort(
        &mut self,
        sink: &mut dyn DistanceSink,
        timestamp: f64,
        outcome: CycleOutcome,
        stats: SelectionStats,
    ) -> CycleReport {
        let measurement = self.publisher.publish(sink, timestamp, None, None);
        CycleReport {
            timestamp,
            outcome,
            decision: None,
            candidate: None,
            measurement,
            depth_t_plane: None,
            stats,
        }
    }

    fn notify_permission(&mut self, sink: &mut dyn DistanceSink, stats: &SelectionStats) {
        if self.permission_notified {
            return;
        }
        if let Some(msg) = &stats.permission_denied {
            warn!("Sensor permission denied: {}", msg);
            self.permission_notified = true;
            sink.notify(ServiceNotice::PermissionDenied(msg.clone()));
        }
    }
}

/// Placement of a proxy on the candidate, in the depth frame.
fn placement(sensor_plane: &PlaneModel) -> Option<Matrix4<f64>> {
    let up = Vector3::y();
    orientation_from(&sensor_plane.intersection, &sensor_plane.normal(), &up)
}
