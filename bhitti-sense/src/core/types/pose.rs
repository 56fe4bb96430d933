//! Pose and transform samples returned by the pose estimator.
//!
//! Both carry a validity flag instead of being `Option`s: the estimator always
//! answers, and an invalid answer is an expected, per-query outcome.

use nalgebra::{Isometry3, Matrix4, Point3, Translation3, UnitQuaternion, Vector3};

use super::CoordinateFrame;
use crate::error::FitError;

/// Pose of a target frame expressed in a base frame at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    /// Query timestamp (seconds)
    pub timestamp: f64,
    /// Whether the estimator could produce this pose
    pub valid: bool,
    /// Target origin in base coordinates
    pub translation: Vector3<f64>,
    /// Target orientation in base coordinates
    pub rotation: UnitQuaternion<f64>,
}

impl PoseSample {
    /// A valid pose.
    pub fn new(timestamp: f64, translation: Vector3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self {
            timestamp,
            valid: true,
            translation,
            rotation,
        }
    }

    /// A valid pose from an isometry.
    pub fn from_isometry(timestamp: f64, iso: &Isometry3<f64>) -> Self {
        Self::new(timestamp, iso.translation.vector, iso.rotation)
    }

    /// An invalid pose (tracking lost, no data yet, ...).
    pub fn invalid(timestamp: f64) -> Self {
        Self {
            timestamp,
            valid: false,
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// The pose as an isometry mapping target coordinates into base coordinates.
    pub fn isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::from(self.translation), self.rotation)
    }

    /// Target origin as a point in the base frame.
    pub fn position(&self) -> Point3<f64> {
        Point3::from(self.translation)
    }

    /// Homogeneous form of the same pose.
    pub fn to_transform(&self) -> TransformSample {
        TransformSample {
            timestamp: self.timestamp,
            valid: self.valid,
            matrix: self.isometry().to_homogeneous(),
        }
    }

    /// Turn an invalid sample into a [`FitError::PoseUnavailable`].
    pub fn require(
        self,
        base: CoordinateFrame,
        target: CoordinateFrame,
    ) -> Result<Self, FitError> {
        if self.valid {
            Ok(self)
        } else {
            Err(FitError::PoseUnavailable {
                base,
                target,
                timestamp: self.timestamp,
            })
        }
    }
}

/// 4×4 homogeneous transform between two frames at one instant.
///
/// For a `(base, target)` query the matrix maps target coordinates into base
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSample {
    /// Query timestamp (seconds)
    pub timestamp: f64,
    /// Whether the estimator could produce this transform
    pub valid: bool,
    /// Homogeneous transform
    pub matrix: Matrix4<f64>,
}

impl TransformSample {
    /// A valid transform.
    pub fn new(timestamp: f64, matrix: Matrix4<f64>) -> Self {
        Self {
            timestamp,
            valid: true,
            matrix,
        }
    }

    /// An invalid transform.
    pub fn invalid(timestamp: f64) -> Self {
        Self {
            timestamp,
            valid: false,
            matrix: Matrix4::identity(),
        }
    }

    /// Turn an invalid sample into a [`FitError::PoseUnavailable`].
    pub fn require(
        self,
        base: CoordinateFrame,
        target: CoordinateFrame,
    ) -> Result<Self, FitError> {
        if self.valid {
            Ok(self)
        } else {
            Err(FitError::PoseUnavailable {
                base,
                target,
                timestamp: self.timestamp,
            })
        }
    }
}
