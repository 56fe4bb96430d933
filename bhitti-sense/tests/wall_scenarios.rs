//! Cycle-by-cycle tracking scenarios with scripted sensors.

mod common;

use approx::assert_relative_eq;
use bhitti_sense::{
    CycleOutcome, FitError, PointCloudSnapshot, ServiceNotice, SinkEvent, TrackDecision,
    TrackerConfig, TrackerState, WallSensingEngine, plane_to_world,
};
use common::{ScriptedEstimator, ScriptedFitter, plane, points_on_plane};
use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector4};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn engine() -> WallSensingEngine {
    WallSensingEngine::new(TrackerConfig::service()).unwrap()
}

#[test]
fn test_four_cycle_sequence() {
    let mut engine = engine();
    let estimator = ScriptedEstimator::identity();
    let mut sink: Vec<SinkEvent> = Vec::new();

    // Cycle 1: first vertical candidate is adopted.
    let c1 = plane(0.99, 0.0, 0.01, -2.0);
    let report = engine.run_cycle(
        &points_on_plane(&c1, 40, 1.0),
        &estimator,
        &ScriptedFitter::plane(c1),
        &mut sink,
    );
    assert_eq!(report.decision, Some(TrackDecision::Adopted));
    assert_eq!(report.candidate.unwrap().inliers, 40);
    assert_eq!(report.outcome, CycleOutcome::Measured);
    let distance = report.measurement.distance.unwrap();
    assert_relative_eq!(distance, 2.0 / (0.99f64.powi(2) + 0.01f64.powi(2)).sqrt());
    assert!((distance - 2.02).abs() < 0.001);
    let tracked_after_1 = *engine.tracked_wall().unwrap();

    // Cycle 2: a close wobble of the same wall; no jitter.
    let c2 = plane(0.98, 0.02, 0.012, -2.05);
    let report = engine.run_cycle(
        &points_on_plane(&c2, 40, 2.0),
        &estimator,
        &ScriptedFitter::plane(c2),
        &mut sink,
    );
    assert_eq!(report.decision, Some(TrackDecision::Matched));
    assert_eq!(engine.tracked_wall(), Some(&tracked_after_1));
    assert_eq!(report.measurement.distance, Some(distance));

    // Cycle 3: a different wall, farther away; ignored.
    let c3 = plane(0.0, 1.0, 0.0, -5.0);
    let report = engine.run_cycle(
        &points_on_plane(&c3, 40, 3.0),
        &estimator,
        &ScriptedFitter::plane(c3),
        &mut sink,
    );
    assert!(matches!(report.decision, Some(TrackDecision::KeptNearer { .. })));
    assert_eq!(engine.tracked_wall(), Some(&tracked_after_1));

    // Cycle 4: a different wall, strictly closer; replaces the tracked one.
    let c4 = plane(0.0, -1.0, 0.0, -1.0);
    let report = engine.run_cycle(
        &points_on_plane(&c4, 40, 4.0),
        &estimator,
        &ScriptedFitter::plane(c4),
        &mut sink,
    );
    assert!(matches!(report.decision, Some(TrackDecision::Replaced { .. })));
    assert_eq!(engine.tracked_wall().unwrap().coefficients, c4.coefficients);
    assert_relative_eq!(report.measurement.distance.unwrap(), 1.0);

    // Cycle 5: empty cloud; no measurement, wall held.
    let fitter = ScriptedFitter::plane(c1);
    let report = engine.run_cycle(&PointCloudSnapshot::empty(), &estimator, &fitter, &mut sink);
    assert_eq!(report.outcome, CycleOutcome::NoMeasurement);
    assert_eq!(report.measurement.distance, None);
    assert_eq!(fitter.calls(), 0);
    assert_eq!(engine.tracked_wall().unwrap().coefficients, c4.coefficients);

    // One measurement per cycle reached the sink.
    assert_eq!(sink.len(), 5);
    assert_eq!(engine.tracker().state(), TrackerState::HasWall);
}

#[test]
fn test_floor_is_never_tracked() {
    let mut engine = engine();
    let floor = plane(0.0, 0.0, 1.0, 1.4);
    let report = engine.run_cycle(
        &points_on_plane(&floor, 200, 1.0),
        &ScriptedEstimator::identity(),
        &ScriptedFitter::plane(floor),
        &mut Vec::new(),
    );

    assert!(report.candidate.is_none());
    assert_eq!(report.stats.fitted, 49);
    assert_eq!(report.stats.vertical, 0);
    assert_eq!(report.outcome, CycleOutcome::NoMeasurement);
    assert!(engine.tracked_wall().is_none());
}

#[test]
fn test_all_samples_failing_is_not_an_error() {
    let mut engine = engine();
    let mut sink = Vec::new();
    let c1 = plane(1.0, 0.0, 0.0, -2.0);
    engine.run_cycle(
        &points_on_plane(&c1, 40, 1.0),
        &ScriptedEstimator::identity(),
        &ScriptedFitter::plane(c1),
        &mut sink,
    );

    let report = engine.run_cycle(
        &points_on_plane(&c1, 40, 2.0),
        &ScriptedEstimator::identity(),
        &ScriptedFitter::failing(FitError::NoSurface),
        &mut sink,
    );
    assert!(report.candidate.is_none());
    assert_eq!(report.stats.failures, 49);
    // Wall held; distance still reported against it.
    assert_eq!(report.outcome, CycleOutcome::Measured);
    assert_eq!(report.measurement.distance, Some(2.0));
}

#[test]
fn test_color_pose_loss_fails_every_sample() {
    let mut engine = engine();
    let c1 = plane(1.0, 0.0, 0.0, -2.0);
    let estimator = ScriptedEstimator {
        color_valid: false,
        ..ScriptedEstimator::identity()
    };
    let fitter = ScriptedFitter::plane(c1);
    let report = engine.run_cycle(
        &points_on_plane(&c1, 40, 1.0),
        &estimator,
        &fitter,
        &mut Vec::new(),
    );

    assert_eq!(fitter.calls(), 0);
    assert_eq!(report.stats.failures, 49);
    assert_eq!(report.outcome, CycleOutcome::NoMeasurement);
}

#[test]
fn test_odometry_loss_aborts_cycle() {
    let mut engine = engine();
    let c1 = plane(1.0, 0.0, 0.0, -2.0);
    let estimator = ScriptedEstimator {
        odometry_valid: false,
        ..ScriptedEstimator::identity()
    };
    let fitter = ScriptedFitter::plane(c1);
    let report = engine.run_cycle(
        &points_on_plane(&c1, 40, 1.0),
        &estimator,
        &fitter,
        &mut Vec::new(),
    );

    assert_eq!(report.outcome, CycleOutcome::PoseUnavailable);
    assert_eq!(fitter.calls(), 0);
    assert!(engine.tracked_wall().is_none());
}

#[test]
fn test_distance_follows_device() {
    let mut engine = engine();
    let c1 = plane(1.0, 0.0, 0.0, -2.0);
    let cloud = points_on_plane(&c1, 40, 1.0);
    let fitter = ScriptedFitter::plane(c1);

    for (x, expected) in [(0.0, 2.0), (0.5, 1.5), (1.5, 0.5)] {
        let estimator = ScriptedEstimator::at(Point3::new(x, 0.3, 1.4));
        let report = engine.run_cycle(&cloud, &estimator, &fitter, &mut Vec::new());
        assert_relative_eq!(
            report.measurement.distance.unwrap(),
            expected,
            epsilon = 1e-12
        );
    }
}

#[test]
fn test_world_transform_applied_before_verticality() {
    // Depth camera looking along world +x: depth Z → world X, depth Y → world -Z.
    let rotation = UnitQuaternion::from_basis_unchecked(&[
        -nalgebra::Vector3::y(),
        -nalgebra::Vector3::z(),
        nalgebra::Vector3::x(),
    ]);
    let world_t_depth = Isometry3::from_parts(Translation3::new(0.0, 0.0, 1.4), rotation);
    let estimator = ScriptedEstimator {
        world_t_depth,
        ..ScriptedEstimator::identity()
    };

    // 3 m ahead in the depth frame: the plane z = 3.
    let sensor_wall = plane(0.0, 0.0, -1.0, 3.0);
    let mut engine = engine();
    let report = engine.run_cycle(
        &points_on_plane(&sensor_wall, 40, 1.0),
        &estimator,
        &ScriptedFitter::plane(sensor_wall),
        &mut Vec::new(),
    );

    let tracked = engine.tracked_wall().unwrap();
    assert_relative_eq!(tracked.a(), -1.0, epsilon = 1e-12);
    assert_relative_eq!(tracked.c(), 0.0, epsilon = 1e-12);
    assert_relative_eq!(report.measurement.distance.unwrap(), 3.0, epsilon = 1e-12);

    // 1.4 m below the camera (depth Y is down): a floor once in world coordinates.
    let sensor_floor = plane(0.0, -1.0, 0.0, 1.4);
    let report = engine.run_cycle(
        &points_on_plane(&sensor_floor, 40, 2.0),
        &estimator,
        &ScriptedFitter::plane(sensor_floor),
        &mut Vec::new(),
    );
    assert!(report.candidate.is_none());
}

#[test]
fn test_permission_failure_notified_once() {
    let mut engine = engine();
    let c1 = plane(1.0, 0.0, 0.0, -2.0);
    let fitter = ScriptedFitter::failing(FitError::PermissionDenied("depth".into()));
    let mut sink = Vec::new();

    for t in 0..4 {
        engine.run_cycle(
            &points_on_plane(&c1, 40, t as f64),
            &ScriptedEstimator::identity(),
            &fitter,
            &mut sink,
        );
    }

    let notices: Vec<_> = sink
        .iter()
        .filter_map(|e| match e {
            SinkEvent::Notice(n) => Some(n.clone()),
            SinkEvent::Measurement(_) => None,
        })
        .collect();
    assert_eq!(
        notices,
        vec![ServiceNotice::PermissionDenied("depth".into())]
    );
}

#[test]
fn test_world_round_trip_over_random_transforms() {
    let mut rng = SmallRng::seed_from_u64(7);
    for _ in 0..100 {
        let iso = Isometry3::from_parts(
            Translation3::new(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
            ),
            UnitQuaternion::from_euler_angles(
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-1.5..1.5),
                rng.gen_range(-3.0..3.0),
            ),
        );
        let m = iso.to_homogeneous();
        let m_inv = iso.inverse().to_homogeneous();
        let p = plane(
            rng.gen_range(0.2..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-4.0..4.0),
        );

        let there = plane_to_world(&p, &m).unwrap();
        let back = plane_to_world(&there, &m_inv).unwrap();
        assert_relative_eq!(back.coefficients, p.coefficients, epsilon = 1e-9);
        assert_relative_eq!(back.intersection, p.intersection, epsilon = 1e-9);

        // The transformed intersection still lies on the transformed plane.
        let on_plane = there.coefficients.dot(&Vector4::new(
            there.intersection.x,
            there.intersection.y,
            there.intersection.z,
            1.0,
        ));
        assert!(on_plane.abs() < 1e-9);
    }
}
