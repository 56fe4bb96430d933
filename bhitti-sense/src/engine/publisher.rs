//! Distance publishing.
//!
//! Once per cycle the engine emits a [`WallMeasurement`] to a
//! [`DistanceSink`]: the perpendicular distance from the device to the
//! tracked wall, or "no measurement" when there is no wall (or no device
//! pose). Out-of-band notices (permission failures) go through the same sink.

use crossbeam_channel::Sender;
use log::{debug, warn};
use nalgebra::Point3;

use crate::core::types::PlaneModel;

/// Perpendicular distance `|a·x + b·y + c·z + d| / ‖(a, b, c)‖`.
///
/// Invariant under scaling all four coefficients by a nonzero constant.
/// A zero normal yields `f64::INFINITY`.
pub fn plane_distance(plane: &PlaneModel, point: &Point3<f64>) -> f64 {
    let norm = plane.normal().norm();
    if norm == 0.0 {
        return f64::INFINITY;
    }
    plane.evaluate(point).abs() / norm
}

/// One per-cycle output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallMeasurement {
    /// Cloud timestamp the measurement belongs to (seconds)
    pub timestamp: f64,
    /// Distance to the tracked wall (meters), `None` for "no measurement"
    pub distance: Option<f64>,
    /// Tracked wall the distance was measured against (world frame)
    pub wall: Option<PlaneModel>,
}

impl WallMeasurement {
    /// "No measurement" for a cycle.
    pub fn none(timestamp: f64) -> Self {
        Self {
            timestamp,
            distance: None,
            wall: None,
        }
    }

    pub fn has_wall(&self) -> bool {
        self.distance.is_some()
    }
}

/// Notices for the host application, sent at most once per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceNotice {
    /// The sensing stack refused access
    PermissionDenied(String),
}

/// Everything a sink can receive, for channel-based consumers.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Measurement(WallMeasurement),
    Notice(ServiceNotice),
}

/// Consumer of engine output.
pub trait DistanceSink: Send {
    /// Receive one per-cycle measurement.
    fn publish(&mut self, measurement: WallMeasurement);

    /// Receive a one-shot notice.
    fn notify(&mut self, notice: ServiceNotice) {
        warn!("Unhandled notice: {:?}", notice);
    }
}

impl DistanceSink for Sender<SinkEvent> {
    fn publish(&mut self, measurement: WallMeasurement) {
        if self.send(SinkEvent::Measurement(measurement)).is_err() {
            debug!("Measurement receiver dropped");
        }
    }

    fn notify(&mut self, notice: ServiceNotice) {
        if self.send(SinkEvent::Notice(notice)).is_err() {
            debug!("Notice receiver dropped");
        }
    }
}

/// Collects everything; used by tests and synchronous callers.
impl DistanceSink for Vec<SinkEvent> {
    fn publish(&mut self, measurement: WallMeasurement) {
        self.push(SinkEvent::Measurement(measurement));
    }

    fn notify(&mut self, notice: ServiceNotice) {
        self.push(SinkEvent::Notice(notice));
    }
}

/// Turns the tracked wall into measurements.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistancePublisher {
    published: u64,
}

impl DistancePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measurement for the tracked wall and device position, without emitting.
    pub fn measure(
        timestamp: f64,
        wall: Option<&PlaneModel>,
        device: Option<&Point3<f64>>,
    ) -> WallMeasurement {
        match (wall, device) {
            (Some(wall), Some(device)) => WallMeasurement {
                timestamp,
                distance: Some(plane_distance(wall, device)),
                wall: Some(*wall),
            },
            _ => WallMeasurement::none(timestamp),
        }
    }

    /// Measure and emit to `sink`.
    pub fn publish(
        &mut self,
        sink: &mut dyn DistanceSink,
        timestamp: f64,
        wall: Option<&PlaneModel>,
        device: Option<&Point3<f64>>,
    ) -> WallMeasurement {
        let measurement = Self::measure(timestamp, wall, device);
        self.published += 1;
        sink.publish(measurement);
        measurement
    }

    /// Measurements emitted so far.
    pub fn published(&self) -> u64 {
        self.published
    }
}
