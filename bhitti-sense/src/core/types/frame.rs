//! Reference frame identifiers and display rotation.

use serde::{Deserialize, Serialize};

/// Named reference frames known to the pose estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateFrame {
    /// Odometry origin: where tracking started. Z up. This is the world frame.
    StartOfService,
    /// Drift-corrected map frame.
    AreaDescription,
    /// Device body.
    Device,
    /// Depth camera: X right, Y down, Z forward.
    CameraDepth,
    /// Color camera, same axis convention as the depth camera.
    CameraColor,
}

impl std::fmt::Display for CoordinateFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CoordinateFrame::StartOfService => "start_of_service",
            CoordinateFrame::AreaDescription => "area_description",
            CoordinateFrame::Device => "device",
            CoordinateFrame::CameraDepth => "camera_depth",
            CoordinateFrame::CameraColor => "camera_color",
        };
        f.write_str(name)
    }
}

/// Rotation of the display relative to the camera's natural orientation.
///
/// Grid coordinates are given in display space; the plane fit needs them in
/// camera image space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum DisplayRotation {
    #[default]
    Rotation0,
    Rotation90,
    Rotation180,
    Rotation270,
}

impl DisplayRotation {
    /// Map a display-normalized coordinate into camera-normalized coordinates.
    ///
    /// The image center is a fixed point of every rotation.
    pub fn rotate_uv(self, u: f64, v: f64) -> (f64, f64) {
        match self {
            DisplayRotation::Rotation0 => (u, v),
            DisplayRotation::Rotation90 => (v, 1.0 - u),
            DisplayRotation::Rotation180 => (1.0 - u, 1.0 - v),
            DisplayRotation::Rotation270 => (1.0 - v, u),
        }
    }

    /// Rotation in degrees.
    pub fn degrees(self) -> u16 {
        match self {
            DisplayRotation::Rotation0 => 0,
            DisplayRotation::Rotation90 => 90,
            DisplayRotation::Rotation180 => 180,
            DisplayRotation::Rotation270 => 270,
        }
    }
}

impl TryFrom<u16> for DisplayRotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(DisplayRotation::Rotation0),
            90 => Ok(DisplayRotation::Rotation90),
            180 => Ok(DisplayRotation::Rotation180),
            270 => Ok(DisplayRotation::Rotation270),
            other => Err(format!(
                "display rotation must be 0, 90, 180 or 270 (got {})",
                other
            )),
        }
    }
}

impl From<DisplayRotation> for u16 {
    fn from(rotation: DisplayRotation) -> Self {
        rotation.degrees()
    }
}
