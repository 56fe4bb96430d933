//! Thread-safe tracking status.
//!
//! The tracking thread is the only writer; any host thread may read.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::types::PlaneModel;
use crate::engine::{CycleOutcome, CycleReport, TrackDecision, WallMeasurement};

/// Snapshot of the tracking session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingStatus {
    /// Whether the tracking thread is running.
    pub running: bool,
    /// Tracked wall after the last cycle (world frame).
    pub tracked_wall: Option<PlaneModel>,
    /// Last published measurement.
    pub last_measurement: Option<WallMeasurement>,
    /// Outcome of the last cycle.
    pub last_outcome: Option<CycleOutcome>,
    /// Cycles run.
    pub cycles: u64,
    /// Cycles that published a distance.
    pub measured_cycles: u64,
    /// Cycles aborted for lack of a device pose.
    pub pose_failures: u64,
    /// Cycles in which no candidate passed selection.
    pub cycles_without_candidate: u64,
    /// Times a nearer wall replaced the tracked one.
    pub wall_replacements: u64,
    /// Permission failure reported by the sensing stack, if any.
    pub permission_denied: Option<String>,
}

impl TrackingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one cycle into the status.
    pub fn record(&mut self, report: &CycleReport, tracked_wall: Option<&PlaneModel>) {
        self.cycles += 1;
        self.tracked_wall = tracked_wall.copied();
        self.last_measurement = Some(report.measurement);
        self.last_outcome = Some(report.outcome);

        match report.outcome {
            CycleOutcome::Measured => self.measured_cycles += 1,
            CycleOutcome::PoseUnavailable => self.pose_failures += 1,
            CycleOutcome::NoMeasurement => {}
        }
        if report.candidate.is_none() && report.outcome != CycleOutcome::PoseUnavailable {
            self.cycles_without_candidate += 1;
        }
        if matches!(report.decision, Some(TrackDecision::Replaced { .. })) {
            self.wall_replacements += 1;
        }
        if self.permission_denied.is_none() {
            self.permission_denied = report.stats.permission_denied.clone();
        }
    }

    /// Last published distance, if any.
    pub fn distance(&self) -> Option<f64> {
        self.last_measurement.and_then(|m| m.distance)
    }
}

/// Handle type for shared status (Arc<RwLock<TrackingStatus>>).
pub type SharedStatusHandle = Arc<RwLock<TrackingStatus>>;

/// Create a new shared status wrapped in Arc<RwLock>.
pub fn create_shared_status() -> SharedStatusHandle {
    Arc::new(RwLock::new(TrackingStatus::new()))
}
