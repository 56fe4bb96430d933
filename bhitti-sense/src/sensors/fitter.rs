//! Plane-fit primitive interface.

use nalgebra::{UnitQuaternion, Vector3};

use crate::core::types::{DisplayRotation, PlaneModel, PointCloudSnapshot};
use crate::error::FitError;

/// Everything the fit primitive needs besides the cloud itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRequest {
    /// Ray origin hint in the depth frame.
    pub ray_origin_hint: Vector3<f64>,
    /// Ray orientation hint.
    pub ray_orientation_hint: UnitQuaternion<f64>,
    /// Horizontal image-normalized coordinate in [0, 1].
    pub u: f64,
    /// Vertical image-normalized coordinate in [0, 1].
    pub v: f64,
    /// Display rotation applied to `(u, v)` before casting the ray.
    pub rotation: DisplayRotation,
    /// Color camera origin in the depth frame.
    pub camera_translation: Vector3<f64>,
    /// Color camera orientation in the depth frame.
    pub camera_rotation: UnitQuaternion<f64>,
}

impl FitRequest {
    /// Request for one grid coordinate, with zero/identity ray hints.
    pub fn new(
        u: f64,
        v: f64,
        rotation: DisplayRotation,
        camera_translation: Vector3<f64>,
        camera_rotation: UnitQuaternion<f64>,
    ) -> Self {
        Self {
            ray_origin_hint: Vector3::zeros(),
            ray_orientation_hint: UnitQuaternion::identity(),
            u,
            v,
            rotation,
            camera_translation,
            camera_rotation,
        }
    }
}

/// Fits a local plane where an image ray meets the point cloud.
///
/// The returned plane is in the cloud's frame and its `intersection` is the
/// point where the ray meets it.
pub trait PlaneFitter: Send {
    fn fit_near(
        &self,
        cloud: &PointCloudSnapshot,
        request: &FitRequest,
    ) -> Result<PlaneModel, FitError>;
}
