//! Plane models.

use nalgebra::{Point3, Vector3, Vector4};

/// Implicit plane `a·x + b·y + c·z + d = 0`, plus the point where the
/// fitting ray met it.
///
/// The normal `(a, b, c)` is not required to be unit length. Everything that
/// consumes it (frame transform, distance, matching) uses the coefficients
/// as stored; nothing re-normalizes behind the caller's back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneModel {
    /// Coefficients `(a, b, c, d)`.
    pub coefficients: Vector4<f64>,
    /// Placement origin in the same frame as the coefficients.
    pub intersection: Point3<f64>,
}

impl PlaneModel {
    /// Create from individual coefficients.
    pub fn new(a: f64, b: f64, c: f64, d: f64, intersection: Point3<f64>) -> Self {
        Self {
            coefficients: Vector4::new(a, b, c, d),
            intersection,
        }
    }

    /// Create from a coefficient vector.
    pub fn from_coefficients(coefficients: Vector4<f64>, intersection: Point3<f64>) -> Self {
        Self {
            coefficients,
            intersection,
        }
    }

    #[inline]
    pub fn a(&self) -> f64 {
        self.coefficients.x
    }

    #[inline]
    pub fn b(&self) -> f64 {
        self.coefficients.y
    }

    #[inline]
    pub fn c(&self) -> f64 {
        self.coefficients.z
    }

    #[inline]
    pub fn d(&self) -> f64 {
        self.coefficients.w
    }

    /// The (possibly non-unit) normal `(a, b, c)`.
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.coefficients.xyz()
    }

    /// Algebraic value `a·x + b·y + c·z + d` at a point.
    #[inline]
    pub fn evaluate(&self, p: &Point3<f64>) -> f64 {
        self.normal().dot(&p.coords) + self.d()
    }

    /// Same plane with every coefficient multiplied by `k`.
    pub fn scaled(&self, k: f64) -> Self {
        Self {
            coefficients: self.coefficients * k,
            intersection: self.intersection,
        }
    }

    /// All four coefficients are finite.
    pub fn is_finite(&self) -> bool {
        self.coefficients.iter().all(|v| v.is_finite())
    }
}
