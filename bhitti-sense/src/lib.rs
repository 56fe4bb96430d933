//! BhittiSense - wall detection and tracking for depth-sensing devices
//!
//! Finds the dominant vertical surface in front of a depth camera and keeps
//! reporting the device's perpendicular distance to it, one measurement per
//! delivered point cloud.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 service/ + state/                   │  ← Threads, teardown
//! │        (sensor feed, tracking thread, status)       │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    engine/                          │  ← One update cycle
//! │        (wall tracker, distance publisher)           │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                  algorithms/                        │  ← Candidate search
//! │      (grid sampler, inlier scoring, selector)       │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   sensors/                          │  ← Collaborators
//! │  (point-cloud cache, pose estimator, plane fitter)  │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │          (types, frame transforms)                  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! `sim/` provides a simulated depth device (room of planes + trajectory) that
//! stands in for real hardware in the daemon, the benchmarks and the tests.
//!
//! # Cycle
//!
//! ```text
//! cache ─► grid sampler ─► inlier scorer ─► frame transform ─► selector
//!                                                                 │
//!                         sink ◄── distance publisher ◄── tracker ┘
//! ```
//!
//! # Frames
//!
//! The world frame is the odometry frame (`StartOfService`), Z up. Depth
//! points are in the depth camera frame (X right, Y down, Z forward). A
//! transform queried for `(base, target)` maps `target` coordinates into
//! `base` coordinates.

// ============================================================================
// Layer 1: Core foundation
// ============================================================================
pub mod core;
pub mod error;

// ============================================================================
// Layer 2: Sensor collaborators
// ============================================================================
pub mod sensors;

// ============================================================================
// Layer 3: Candidate search
// ============================================================================
pub mod algorithms;

// ============================================================================
// Layer 4: Tracking engine
// ============================================================================
pub mod engine;

// ============================================================================
// Layer 5: Service, shared state and configuration
// ============================================================================
pub mod config;
pub mod service;
pub mod state;

// ============================================================================
// Simulation
// ============================================================================
pub mod sim;

// ============================================================================
// Convenience re-exports
// ============================================================================

pub use core::math::{orientation_from, plane_to_world, transform_plane_coefficients};
pub use core::types::{
    CoordinateFrame, DisplayRotation, PlaneModel, PointCloudSnapshot, PoseSample,
    TransformSample,
};
pub use error::{Error, FitError, Result};

pub use sensors::{
    FitRequest, FitterConfig, LocalPlaneFitter, PlaneFitter, PointCloudCache, PoseEstimator,
};

pub use algorithms::{
    GridSample, GridSampler, Selection, SelectionStats, VerticalPlane, WallCandidate,
    WallSelector, count_inliers,
};

pub use engine::{
    CycleOutcome, CycleReport, DistancePublisher, DistanceSink, OffsetCheck, ServiceNotice,
    SinkEvent, TrackDecision, TrackerConfig, TrackerState, WallMeasurement, WallSensingEngine,
    WallTracker, plane_distance, planes_match,
};

pub use config::{BhittiConfig, ConfigLoadError, ServiceSection};
pub use service::{PointCloudFeed, ServiceCommand, ServiceOptions, WallSensingService};
pub use state::{SharedStatusHandle, TrackingStatus, create_shared_status};

pub use sim::{SimulatedDevice, SimulationConfig};
