//! Inlier scoring.

use crate::core::types::PlaneModel;

/// Count points with `|a·x + b·y + c·z + d| < epsilon`.
///
/// The residual is the raw plane equation, not a metric distance, so
/// `epsilon` is in the scale of the fitted coefficients. O(N) per call.
pub fn count_inliers(points: &[[f32; 4]], plane: &PlaneModel, epsilon: f64) -> usize {
    let (a, b, c, d) = (plane.a(), plane.b(), plane.c(), plane.d());
    points
        .iter()
        .filter(|p| {
            let residual = a * p[0] as f64 + b * p[1] as f64 + c * p[2] as f64 + d;
            residual.abs() < epsilon
        })
        .count()
}
