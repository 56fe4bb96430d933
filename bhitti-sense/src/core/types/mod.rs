//! Fundamental data types.

mod frame;
mod plane;
mod point_cloud;
mod pose;

pub use frame::{CoordinateFrame, DisplayRotation};
pub use plane::PlaneModel;
pub use point_cloud::PointCloudSnapshot;
pub use pose::{PoseSample, TransformSample};
