//! Frame transforms for plane equations and placement matrices.
//!
//! A plane is a covector: if a transform `M` maps world points into the depth
//! frame (`p_depth = M · p_world`), then for any depth-frame plane `π`
//!
//! ```text
//! π · p_depth = π · (M · p_world) = (Mᵀ · π) · p_world
//! ```
//!
//! so the world-frame plane is `Mᵀ · π`. The matrix is the one the pose
//! estimator returns for the `(CameraDepth, StartOfService)` pair, and it is
//! used transposed, never inverted.

use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::core::types::PlaneModel;

/// Apply the covector rule: `Mᵀ · (a, b, c, d)`.
#[inline]
pub fn transform_plane_coefficients(
    coefficients: &Vector4<f64>,
    matrix: &Matrix4<f64>,
) -> Vector4<f64> {
    matrix.transpose() * coefficients
}

/// Move a depth-frame plane into the world frame.
///
/// `depth_t_world` maps world coordinates into depth coordinates. The
/// coefficients move by its transpose; the intersection point moves by its
/// inverse. Returns `None` when the matrix is singular.
pub fn plane_to_world(plane: &PlaneModel, depth_t_world: &Matrix4<f64>) -> Option<PlaneModel> {
    let world_t_depth = depth_t_world.try_inverse()?;
    let coefficients = transform_plane_coefficients(&plane.coefficients, depth_t_world);
    let intersection = world_t_depth.transform_point(&plane.intersection);
    Some(PlaneModel::from_coefficients(coefficients, intersection))
}

/// Build a placement matrix from a point, a plane normal and an up hint.
///
/// Right-handed basis: Z along the normalized normal, X = normalize(up × Z),
/// Y = Z × X; translation is the point. Returns `None` if the normal is zero
/// or parallel to `up`.
pub fn orientation_from(
    point: &Point3<f64>,
    normal: &Vector3<f64>,
    up: &Vector3<f64>,
) -> Option<Matrix4<f64>> {
    let z_axis = normal.try_normalize(f64::EPSILON)?;
    let x_axis = up.cross(&z_axis).try_normalize(f64::EPSILON)?;
    let y_axis = z_axis.cross(&x_axis);

    let mut m = Matrix4::identity();
    m.fixed_view_mut::<3, 1>(0, 0).copy_from(&x_axis);
    m.fixed_view_mut::<3, 1>(0, 1).copy_from(&y_axis);
    m.fixed_view_mut::<3, 1>(0, 2).copy_from(&z_axis);
    m.fixed_view_mut::<3, 1>(0, 3).copy_from(&point.coords);
    Some(m)
}
