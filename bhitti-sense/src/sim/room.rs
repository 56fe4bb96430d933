//! Box-shaped room for ray casting.
//!
//! The room is the axis-aligned box `[-w/2, w/2] × [-d/2, d/2] × [0, h]` in
//! the world frame: four vertical walls, a floor at `z = 0` and a ceiling.
//! Rays always start inside, so a cast is the box exit distance.

use nalgebra::{Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Room {
    min: Point3<f64>,
    max: Point3<f64>,
}

impl Room {
    /// Room of `width` (x) by `depth` (y) with the given ceiling height.
    pub fn new(width: f64, depth: f64, height: f64) -> Self {
        Self {
            min: Point3::new(-width / 2.0, -depth / 2.0, 0.0),
            max: Point3::new(width / 2.0, depth / 2.0, height),
        }
    }

    /// True if `p` lies strictly inside the room.
    pub fn contains(&self, p: &Point3<f64>) -> bool {
        (0..3).all(|k| p[k] > self.min[k] && p[k] < self.max[k])
    }

    /// Clamp a point to stay at least `margin` away from every surface.
    pub fn clamp(&self, p: &Point3<f64>, margin: f64) -> Point3<f64> {
        Point3::from(Vector3::from_fn(|k, _| {
            p[k].clamp(self.min[k] + margin, self.max[k] - margin)
        }))
    }

    /// Ray parameter `t` where `origin + t · direction` leaves the room.
    ///
    /// `None` for a zero direction or an origin outside the room.
    pub fn ray_cast(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Option<f64> {
        if !self.contains(origin) {
            return None;
        }
        let mut exit = f64::INFINITY;
        for k in 0..3 {
            let t = if direction[k] > 0.0 {
                (self.max[k] - origin[k]) / direction[k]
            } else if direction[k] < 0.0 {
                (self.min[k] - origin[k]) / direction[k]
            } else {
                continue;
            };
            exit = exit.min(t);
        }
        exit.is_finite().then_some(exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_casts() {
        let room = Room::new(6.0, 4.0, 2.5);
        let origin = Point3::new(0.0, 0.0, 1.0);

        assert_relative_eq!(room.ray_cast(&origin, &Vector3::x()).unwrap(), 3.0);
        assert_relative_eq!(room.ray_cast(&origin, &-Vector3::y()).unwrap(), 2.0);
        assert_relative_eq!(room.ray_cast(&origin, &-Vector3::z()).unwrap(), 1.0);
        assert_relative_eq!(room.ray_cast(&origin, &Vector3::z()).unwrap(), 1.5);
    }

    #[test]
    fn test_diagonal_hits_nearest_surface() {
        let room = Room::new(6.0, 4.0, 2.5);
        let origin = Point3::new(0.0, 0.0, 1.0);
        // Equal x/y components: the y wall (2 m) comes before the x wall (3 m).
        let t = room.ray_cast(&origin, &Vector3::new(1.0, 1.0, 0.0)).unwrap();
        assert_relative_eq!(t, 2.0);
    }

    #[test]
    fn test_degenerate_casts() {
        let room = Room::new(6.0, 4.0, 2.5);
        assert!(room.ray_cast(&Point3::new(0.0, 0.0, 1.0), &Vector3::zeros()).is_none());
        assert!(room.ray_cast(&Point3::new(5.0, 0.0, 1.0), &Vector3::x()).is_none());
    }

    #[test]
    fn test_clamp() {
        let room = Room::new(6.0, 4.0, 2.5);
        let p = room.clamp(&Point3::new(10.0, -10.0, 1.0), 0.2);
        assert_relative_eq!(p, Point3::new(2.8, -1.8, 1.0));
    }
}
