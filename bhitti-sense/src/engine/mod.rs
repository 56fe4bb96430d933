//! Tracking engine layer.
//!
//! - [`WallTracker`]: cross-cycle wall identity with hysteresis
//! - [`DistancePublisher`]: device-to-wall distance and sink output
//! - [`WallSensingEngine`]: one full update cycle over the lower layers

mod config;
mod publisher;
mod tracker;
mod wall_engine;

pub use config::{OffsetCheck, TrackerConfig};
pub use publisher::{
    DistancePublisher, DistanceSink, ServiceNotice, SinkEvent, WallMeasurement, plane_distance,
};
pub use tracker::{TrackDecision, TrackerState, WallTracker, planes_match};
pub use wall_engine::{CycleOutcome, CycleReport, WallSensingEngine};
