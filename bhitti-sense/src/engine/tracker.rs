//! Wall identity tracker.
//!
//! ```text
//!            candidate
//!  NoWall ─────────────► HasWall ──┐ candidate:
//!                           ▲      │  match          → keep
//!                           └──────┘  no match, nearer → replace
//!                                     no match, farther → keep
//! ```
//!
//! A cycle without a candidate never reaches the tracker.

use log::{debug, info};
use nalgebra::Point3;

use super::config::{OffsetCheck, TrackerConfig};
use super::publisher::plane_distance;
use crate::algorithms::VerticalPlane;
use crate::core::types::PlaneModel;

/// Whether `candidate` is the same wall as `tracked`.
///
/// `a`, `b` and `c` must each be within `abc_threshold`. The offset check
/// compares either `c` again (observed behavior) or `d` against
/// `d_threshold`, depending on `offset_check`.
pub fn planes_match(
    tracked: &PlaneModel,
    candidate: &PlaneModel,
    abc_threshold: f64,
    d_threshold: f64,
    offset_check: OffsetCheck,
) -> bool {
    let close = |x: f64, y: f64, threshold: f64| (x - y).abs() < threshold;

    let offset_ok = match offset_check {
        OffsetCheck::CoefficientC => close(tracked.c(), candidate.c(), d_threshold),
        OffsetCheck::OffsetD => close(tracked.d(), candidate.d(), d_threshold),
    };

    close(tracked.a(), candidate.a(), abc_threshold)
        && close(tracked.b(), candidate.b(), abc_threshold)
        && close(tracked.c(), candidate.c(), abc_threshold)
        && offset_ok
}

/// Tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    NoWall,
    HasWall,
}

/// What the tracker did with a candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackDecision {
    /// First wall of the session.
    Adopted,
    /// Same wall as the tracked one; tracked wall kept as is.
    Matched,
    /// Different, strictly nearer wall; it replaced the tracked one.
    Replaced {
        previous_distance: f64,
        new_distance: f64,
    },
    /// Different wall, not nearer; tracked wall kept.
    KeptNearer {
        tracked_distance: f64,
        candidate_distance: f64,
    },
}

impl TrackDecision {
    /// True if the tracked wall changed.
    pub fn changed_wall(&self) -> bool {
        matches!(self, TrackDecision::Adopted | TrackDecision::Replaced { .. })
    }
}

/// Holds the tracked wall across cycles.
#[derive(Debug, Clone)]
pub struct WallTracker {
    abc_threshold: f64,
    d_threshold: f64,
    offset_check: OffsetCheck,
    tracked: Option<VerticalPlane>,
}

impl WallTracker {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            abc_threshold: config.abc_match_threshold,
            d_threshold: config.d_match_threshold,
            offset_check: config.offset_check,
            tracked: None,
        }
    }

    /// Feed the selected candidate of one cycle.
    ///
    /// `device` is the device position in the world frame at the cycle's
    /// timestamp; it is only used to break non-matching pairs by distance.
    pub fn observe(&mut self, candidate: VerticalPlane, device: &Point3<f64>) -> TrackDecision {
        let Some(tracked) = self.tracked else {
            info!("New wall: {:?}", candidate.plane().coefficients.as_slice());
            self.tracked = Some(candidate);
            return TrackDecision::Adopted;
        };

        if planes_match(
            tracked.plane(),
            candidate.plane(),
            self.abc_threshold,
            self.d_threshold,
            self.offset_check,
        ) {
            debug!("Matching wall");
            return TrackDecision::Matched;
        }

        let tracked_distance = plane_distance(tracked.plane(), device);
        let candidate_distance = plane_distance(candidate.plane(), device);

        if candidate_distance < tracked_distance {
            info!(
                "New wall: {:.3} m replaces {:.3} m",
                candidate_distance, tracked_distance
            );
            self.tracked = Some(candidate);
            TrackDecision::Replaced {
                previous_distance: tracked_distance,
                new_distance: candidate_distance,
            }
        } else {
            debug!(
                "Ignoring farther wall at {:.3} m (tracking {:.3} m)",
                candidate_distance, tracked_distance
            );
            TrackDecision::KeptNearer {
                tracked_distance,
                candidate_distance,
            }
        }
    }

    /// The tracked wall, if any (world frame).
    pub fn tracked(&self) -> Option<&PlaneModel> {
        self.tracked.as_ref().map(VerticalPlane::plane)
    }

    pub fn state(&self) -> TrackerState {
        if self.tracked.is_some() {
            TrackerState::HasWall
        } else {
            TrackerState::NoWall
        }
    }

    /// Forget the tracked wall (new session).
    pub fn reset(&mut self) {
        self.tracked = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical(a: f64, b: f64, c: f64, d: f64) -> VerticalPlane {
        VerticalPlane::check(PlaneModel::new(a, b, c, d, Point3::origin()), 0.05).unwrap()
    }

    #[test]
    fn test_match_is_reflexive() {
        let planes = [
            PlaneModel::new(0.99, 0.0, 0.01, -2.0, Point3::origin()),
            PlaneModel::new(-3.0, 7.5, 100.0, 1e6, Point3::origin()),
            PlaneModel::new(0.0, 0.0, 0.0, 0.0, Point3::origin()),
        ];
        for plane in &planes {
            for check in [OffsetCheck::CoefficientC, OffsetCheck::OffsetD] {
                assert!(planes_match(plane, plane, 0.75, 0.2, check));
            }
        }
    }

    #[test]
    fn test_offset_check_modes_differ() {
        // Same orientation, 1 m apart.
        let tracked = PlaneModel::new(1.0, 0.0, 0.0, -2.0, Point3::origin());
        let candidate = PlaneModel::new(1.0, 0.0, 0.0, -3.0, Point3::origin());

        assert!(planes_match(&tracked, &candidate, 0.75, 0.2, OffsetCheck::CoefficientC));
        assert!(!planes_match(&tracked, &candidate, 0.75, 0.2, OffsetCheck::OffsetD));
    }

    #[test]
    fn test_coefficient_c_checked_against_both_thresholds() {
        let tracked = PlaneModel::new(1.0, 0.0, 0.0, -2.0, Point3::origin());
        // Within abc (0.75) but not within d (0.2).
        let candidate = PlaneModel::new(1.0, 0.0, 0.3, -2.0, Point3::origin());
        assert!(!planes_match(&tracked, &candidate, 0.75, 0.2, OffsetCheck::CoefficientC));
        assert!(planes_match(&tracked, &candidate, 0.75, 0.2, OffsetCheck::OffsetD));
    }

    #[test]
    fn test_state_machine() {
        let mut tracker = WallTracker::new(&TrackerConfig::service());
        let origin = Point3::origin();
        assert_eq!(tracker.state(), TrackerState::NoWall);
        assert!(tracker.tracked().is_none());

        let first = vertical(1.0, 0.0, 0.0, -2.0);
        assert_eq!(tracker.observe(first, &origin), TrackDecision::Adopted);
        assert_eq!(tracker.state(), TrackerState::HasWall);

        // Small wobble: same wall, no jitter.
        let wobble = vertical(0.98, 0.02, 0.012, -2.05);
        assert_eq!(tracker.observe(wobble, &origin), TrackDecision::Matched);
        assert_eq!(tracker.tracked(), Some(first.plane()));

        // Side wall, farther.
        let far = vertical(0.0, 1.0, 0.0, -5.0);
        assert!(matches!(
            tracker.observe(far, &origin),
            TrackDecision::KeptNearer { .. }
        ));
        assert_eq!(tracker.tracked(), Some(first.plane()));

        // Side wall, nearer.
        let near = vertical(0.0, -1.0, 0.0, -1.0);
        let decision = tracker.observe(near, &origin);
        assert!(decision.changed_wall());
        match decision {
            TrackDecision::Replaced {
                previous_distance,
                new_distance,
            } => {
                assert!((previous_distance - 2.0).abs() < 1e-12);
                assert!((new_distance - 1.0).abs() < 1e-12);
            }
            other => panic!("unexpected decision {:?}", other),
        }
        assert_eq!(tracker.tracked(), Some(near.plane()));

        tracker.reset();
        assert_eq!(tracker.state(), TrackerState::NoWall);
    }

    #[test]
    fn test_equal_distance_keeps_tracked() {
        let mut tracker = WallTracker::new(&TrackerConfig::service());
        let origin = Point3::origin();
        let front = vertical(1.0, 0.0, 0.0, -2.0);
        let side = vertical(0.0, 1.0, 0.0, -2.0);

        tracker.observe(front, &origin);
        assert!(matches!(
            tracker.observe(side, &origin),
            TrackDecision::KeptNearer { .. }
        ));
        assert_eq!(tracker.tracked(), Some(front.plane()));
    }
}
