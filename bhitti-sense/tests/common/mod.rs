//! Scripted collaborators for integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use bhitti_sense::{
    CoordinateFrame, FitError, FitRequest, PlaneFitter, PlaneModel, PointCloudSnapshot,
    PoseEstimator, PoseSample,
};
use nalgebra::{Isometry3, Point3, Vector3};
use parking_lot::Mutex;

/// Pose estimator with a fixed world ← depth pose and device position.
#[derive(Debug, Clone)]
pub struct ScriptedEstimator {
    /// Depth camera pose in the world
    pub world_t_depth: Isometry3<f64>,
    /// Device position in the world
    pub device: Point3<f64>,
    pub odometry_valid: bool,
    pub depth_valid: bool,
    pub color_valid: bool,
}

impl ScriptedEstimator {
    /// Depth frame = world frame, device at the origin.
    pub fn identity() -> Self {
        Self {
            world_t_depth: Isometry3::identity(),
            device: Point3::origin(),
            odometry_valid: true,
            depth_valid: true,
            color_valid: true,
        }
    }

    pub fn at(device: Point3<f64>) -> Self {
        Self {
            device,
            ..Self::identity()
        }
    }
}

impl PoseEstimator for ScriptedEstimator {
    fn query_pose(
        &self,
        timestamp: f64,
        base: CoordinateFrame,
        target: CoordinateFrame,
    ) -> PoseSample {
        match (base, target) {
            (CoordinateFrame::StartOfService, CoordinateFrame::Device) if self.odometry_valid => {
                PoseSample::from_isometry(timestamp, &Isometry3::translation(
                    self.device.x,
                    self.device.y,
                    self.device.z,
                ))
            }
            (CoordinateFrame::CameraDepth, CoordinateFrame::StartOfService) if self.depth_valid => {
                PoseSample::from_isometry(timestamp, &self.world_t_depth.inverse())
            }
            (CoordinateFrame::CameraDepth, CoordinateFrame::CameraColor) if self.color_valid => {
                PoseSample::from_isometry(timestamp, &Isometry3::identity())
            }
            _ => PoseSample::invalid(timestamp),
        }
    }
}

/// Fitter that answers every ray with the same scripted result.
#[derive(Debug)]
pub struct ScriptedFitter {
    result: Result<PlaneModel, FitError>,
    calls: AtomicUsize,
}

impl ScriptedFitter {
    pub fn plane(plane: PlaneModel) -> Self {
        Self {
            result: Ok(plane),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: FitError) -> Self {
        Self {
            result: Err(err),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl PlaneFitter for ScriptedFitter {
    fn fit_near(&self, _: &PointCloudSnapshot, _: &FitRequest) -> Result<PlaneModel, FitError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.result.clone()
    }
}

/// Fitter whose answer can be changed while the service owns it.
#[derive(Debug, Clone)]
pub struct SwitchableFitter {
    plane: Arc<Mutex<PlaneModel>>,
}

impl SwitchableFitter {
    pub fn new(plane: PlaneModel) -> Self {
        Self {
            plane: Arc::new(Mutex::new(plane)),
        }
    }

    pub fn set(&self, plane: PlaneModel) {
        *self.plane.lock() = plane;
    }
}

impl PlaneFitter for SwitchableFitter {
    fn fit_near(&self, _: &PointCloudSnapshot, _: &FitRequest) -> Result<PlaneModel, FitError> {
        Ok(*self.plane.lock())
    }
}

/// Fitter that raises `started` on every call, then stalls for `delay`.
#[derive(Debug)]
pub struct SlowFitter {
    plane: PlaneModel,
    delay: Duration,
    started: Arc<AtomicBool>,
}

impl SlowFitter {
    pub fn new(plane: PlaneModel, delay: Duration, started: Arc<AtomicBool>) -> Self {
        Self {
            plane,
            delay,
            started,
        }
    }
}

impl PlaneFitter for SlowFitter {
    fn fit_near(&self, _: &PointCloudSnapshot, _: &FitRequest) -> Result<PlaneModel, FitError> {
        self.started.store(true, Ordering::SeqCst);
        thread::sleep(self.delay);
        Ok(self.plane)
    }
}

/// Plane with its intersection set to the foot of the perpendicular from the origin.
pub fn plane(a: f64, b: f64, c: f64, d: f64) -> PlaneModel {
    let n = Vector3::new(a, b, c);
    let foot = Point3::from(n * (-d / n.norm_squared()));
    PlaneModel::new(a, b, c, d, foot)
}

/// `count` depth-frame points lying on `plane`, spread over a patch.
pub fn points_on_plane(plane: &PlaneModel, count: usize, timestamp: f64) -> PointCloudSnapshot {
    let n = plane.normal();
    // Two directions spanning the plane.
    let helper = if n.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
    let e1 = n.cross(&helper).normalize();
    let e2 = n.cross(&e1).normalize();
    let foot = n * (-plane.d() / n.norm_squared());

    let points = (0..count)
        .map(|i| {
            let s = (i % 8) as f64 * 0.1 - 0.35;
            let t = (i / 8) as f64 * 0.1 - 0.2;
            let p = foot + e1 * s + e2 * t;
            [p.x as f32, p.y as f32, p.z as f32, 1.0]
        })
        .collect();
    PointCloudSnapshot::new(points, timestamp, CoordinateFrame::CameraDepth)
}
