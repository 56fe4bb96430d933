//! Local plane fit around an image ray.
//!
//! The built-in [`PlaneFitter`]:
//!
//! 1. Rotate `(u, v)` from display to camera space and cast the ray through
//!    a pinhole model of the color camera, expressed in the depth frame
//! 2. Collect cloud points within `search_radius` of the ray, in front of
//!    the camera, and keep the nearest layer (`depth_window` deep)
//! 3. Fit a plane to them by total least squares: the normal is the
//!    eigenvector of the smallest covariance eigenvalue
//! 4. Orient the normal toward the camera and intersect the ray with the plane
//!
//! The returned normal is unit length, but consumers must not rely on that.

use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};
use serde::{Deserialize, Serialize};

use super::fitter::{FitRequest, PlaneFitter};
use crate::core::types::{PlaneModel, PointCloudSnapshot};
use crate::error::FitError;

fn default_fx() -> f64 {
    0.866
}

fn default_fy() -> f64 {
    1.207
}

fn default_center() -> f64 {
    0.5
}

fn default_search_radius() -> f64 {
    0.15
}

fn default_depth_window() -> f64 {
    0.25
}

fn default_min_points() -> usize {
    8
}

/// Configuration for [`LocalPlaneFitter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitterConfig {
    /// Focal length in image widths (`u = cx + fx · x/z`).
    /// Default: 0.866 (60° horizontal field of view)
    #[serde(default = "default_fx")]
    pub fx: f64,

    /// Focal length in image heights (`v = cy + fy · y/z`).
    /// Default: 1.207 (45° vertical field of view)
    #[serde(default = "default_fy")]
    pub fy: f64,

    /// Principal point, normalized.
    #[serde(default = "default_center")]
    pub cx: f64,

    /// Principal point, normalized.
    #[serde(default = "default_center")]
    pub cy: f64,

    /// Maximum perpendicular distance of a support point from the ray (meters).
    #[serde(default = "default_search_radius")]
    pub search_radius: f64,

    /// Depth of the support layer behind the nearest point on the ray (meters).
    ///
    /// Keeps background surfaces seen past an edge out of the fit.
    #[serde(default = "default_depth_window")]
    pub depth_window: f64,

    /// Minimum support points for a fit.
    #[serde(default = "default_min_points")]
    pub min_points: usize,
}

impl Default for FitterConfig {
    fn default() -> Self {
        Self {
            fx: default_fx(),
            fy: default_fy(),
            cx: default_center(),
            cy: default_center(),
            search_radius: default_search_radius(),
            depth_window: default_depth_window(),
            min_points: default_min_points(),
        }
    }
}

impl FitterConfig {
    /// Check that the configuration can produce fits at all.
    pub fn validate(&self) -> Result<(), String> {
        if [self.fx, self.fy].iter().any(|f| !f.is_finite() || *f <= 0.0) {
            return Err(format!(
                "focal lengths must be positive (fx={}, fy={})",
                self.fx, self.fy
            ));
        }
        if [self.search_radius, self.depth_window]
            .iter()
            .any(|v| !v.is_finite() || *v <= 0.0)
        {
            return Err("search_radius and depth_window must be positive".to_string());
        }
        if self.min_points < 3 {
            return Err(format!("min_points must be at least 3 (got {})", self.min_points));
        }
        Ok(())
    }
}

/// Total-least-squares plane fit around an image ray.
#[derive(Debug, Clone, Default)]
pub struct LocalPlaneFitter {
    config: FitterConfig,
}

impl LocalPlaneFitter {
    /// Create a new fitter.
    pub fn new(config: FitterConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &FitterConfig {
        &self.config
    }

    /// Ray origin and unit direction in the depth frame.
    fn cast_ray(&self, request: &FitRequest) -> (Point3<f64>, Vector3<f64>) {
        let (u, v) = request.rotation.rotate_uv(request.u, request.v);
        let camera_dir = Vector3::new(
            (u - self.config.cx) / self.config.fx,
            (v - self.config.cy) / self.config.fy,
            1.0,
        );
        let origin = Point3::from(request.camera_translation);
        let direction = (request.camera_rotation * camera_dir).normalize();
        (origin, direction)
    }

    /// Points supporting the ray: near it, in front, nearest layer only.
    fn support_points(
        &self,
        cloud: &PointCloudSnapshot,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
    ) -> Vec<Point3<f64>> {
        let radius_sq = self.config.search_radius * self.config.search_radius;

        let near_ray: Vec<(f64, Point3<f64>)> = cloud
            .positions()
            .filter_map(|p| {
                let w = p - origin;
                let along = w.dot(direction);
                if along <= 0.0 {
                    return None;
                }
                let perp_sq = (w - direction * along).norm_squared();
                (perp_sq < radius_sq).then_some((along, p))
            })
            .collect();

        let Some(nearest) = near_ray.iter().map(|(along, _)| *along).reduce(f64::min) else {
            return Vec::new();
        };
        let cutoff = nearest + self.config.depth_window;

        near_ray
            .into_iter()
            .filter(|(along, _)| *along <= cutoff)
            .map(|(_, p)| p)
            .collect()
    }
}

/// Fit `n·p + d = 0` with unit `n` to at least three points.
///
/// Fails when the points are (nearly) collinear: then the two smallest
/// covariance eigenvalues are both ~0 and the normal is undetermined.
pub(crate) fn fit_plane_tls(points: &[Point3<f64>]) -> Result<(Vector3<f64>, f64), FitError> {
    if points.len() < 3 {
        return Err(FitError::NoSurface);
    }

    let n = points.len() as f64;
    let centroid = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords)
        / n;

    let mut cov = Matrix3::zeros();
    for p in points {
        let d = p.coords - centroid;
        cov += d * d.transpose();
    }
    cov /= n;

    let eig = SymmetricEigen::new(cov);
    let mut order = [0usize, 1, 2];
    order.sort_by(|&i, &j| eig.eigenvalues[i].total_cmp(&eig.eigenvalues[j]));

    let largest = eig.eigenvalues[order[2]];
    let middle = eig.eigenvalues[order[1]];
    if largest <= f64::EPSILON || middle <= largest * 1e-6 {
        return Err(FitError::Degenerate("support points are collinear"));
    }

    let normal = eig.eigenvectors.column(order[0]).into_owned().normalize();
    let d = -normal.dot(&centroid);
    Ok((normal, d))
}

impl PlaneFitter for LocalPlaneFitter {
    fn fit_near(
        &self,
        cloud: &PointCloudSnapshot,
        request: &FitRequest,
    ) -> Result<PlaneModel, FitError> {
        if cloud.is_empty() {
            return Err(FitError::EmptyCloud);
        }

        let (origin, direction) = self.cast_ray(request);
        let support = self.support_points(cloud, &origin, &direction);
        if support.len() < self.config.min_points {
            return Err(FitError::NoSurface);
        }

        let (mut normal, mut d) = fit_plane_tls(&support)?;

        // Face the camera.
        if normal.dot(&origin.coords) + d < 0.0 {
            normal = -normal;
            d = -d;
        }

        let denom = normal.dot(&direction);
        if denom.abs() < 1e-6 {
            return Err(FitError::NoSurface);
        }
        let t = -(normal.dot(&origin.coords) + d) / denom;
        if t <= 0.0 {
            return Err(FitError::NoSurface);
        }

        let intersection = origin + direction * t;
        Ok(PlaneModel::new(normal.x, normal.y, normal.z, d, intersection))
    }
}
