//! Error types for BhittiSense

use crate::config::ConfigLoadError;
use crate::core::types::CoordinateFrame;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-level errors.
///
/// Nothing inside an update cycle produces one of these; cycle-level failures
/// degrade to "no measurement" instead (see [`FitError`]).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigLoadError),

    /// A worker thread could not be started
    #[error("Failed to spawn {name} thread: {source}")]
    ThreadSpawn {
        /// Thread name
        name: &'static str,
        /// Underlying spawn error
        source: std::io::Error,
    },

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The service was already torn down
    #[error("Service disconnected")]
    Disconnected,
}

/// Why a single grid sample produced no plane.
///
/// Every variant is recoverable: the sample is skipped and the remaining grid
/// cells are still evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    /// The cache held no points
    #[error("point cloud is empty")]
    EmptyCloud,

    /// The pose estimator had no valid pose for the requested frame pair
    #[error("no valid pose of {target} in {base} at t={timestamp:.6}")]
    PoseUnavailable {
        /// Base frame of the query
        base: CoordinateFrame,
        /// Target frame of the query
        target: CoordinateFrame,
        /// Query timestamp (seconds)
        timestamp: f64,
    },

    /// The ray met no usable depth near it
    #[error("no surface found near the ray")]
    NoSurface,

    /// The fit or transform was numerically degenerate
    #[error("degenerate plane: {0}")]
    Degenerate(&'static str),

    /// The sensing stack refused access
    #[error("sensor permission denied: {0}")]
    PermissionDenied(String),
}
