//! Engagement-level tests for the interceptor, planner and tracker working together.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use precision_core::config::{InterceptorConfig, MissionConstraints, PlannerPolicy};
use precision_core::constants::*;
use precision_core::enums::*;
use precision_core::gravity::calculate_gravity;
use precision_core::types::{OrbitalState, TargetState, Vector3D};

use crate::error::PlanError;
use crate::interceptor::PrecisionInterceptor;
use crate::planner::{classify_environment, MissionPlanner};
use crate::solver::{InterceptProblem, InterceptSolution, InterceptSolver};
use crate::tracker::TargetTracker;

fn interceptor_with(law: GuidanceLaw, max_g: f64) -> PrecisionInterceptor {
    PrecisionInterceptor::new(InterceptorConfig {
        guidance_law: law,
        max_g,
        ..Default::default()
    })
}

fn stationary(position: Vector3D, t: f64) -> TargetState {
    TargetState::new(position, Vector3D::ZERO, Vector3D::ZERO, t)
}

/// Feed `count` observations one second apart along a constant-velocity track.
fn feed_track(tracker: &TargetTracker, start: Vector3D, velocity: Vector3D, count: usize) -> f64 {
    let mut t = 0.0;
    for i in 0..count {
        t = i as f64;
        tracker.update_target(TargetState::new(
            start + velocity.scale(t),
            velocity,
            Vector3D::ZERO,
            t,
        ));
    }
    t
}

// ---- Guidance scenarios ----

#[test]
fn test_head_on_pronav() {
    let pi = interceptor_with(GuidanceLaw::ProNav, 30.0);
    let target = Vector3D::new(1000.0, 0.0, 0.0);
    for i in 0..500 {
        pi.update_target_observation(stationary(target, i as f64 * 0.1));
    }

    let mut last_tgo = f64::MAX;
    for step in 0..5 {
        let t = step as f64;
        let position = Vector3D::new(100.0 * t, 0.0, 0.0);
        pi.update_payload_state(OrbitalState {
            position,
            velocity: Vector3D::new(100.0, 0.0, 0.0),
            mass: 1_000.0,
            time: t,
        });
        let cmd = pi.compute_guidance(t);
        let tgo = cmd.time_to_go.as_secs_f64();
        assert!(
            (tgo - (10.0 - t)).abs() < 0.01,
            "step {step}: tgo {tgo:.3}, expected {:.1}",
            10.0 - t
        );
        assert!(tgo < last_tgo);
        assert!(cmd.predicted_miss < 1e-6, "predicted miss {:.3e}", cmd.predicted_miss);
        // No LOS rate, so the command is pure gravity compensation. Near the
        // body center that saturates the limit.
        let gravity = calculate_gravity(position, GravityModel::PointMass, CentralBody::Earth);
        assert!(cmd.accel_command.magnitude() <= 30.0 * G0 + 1e-9);
        assert_eq!(cmd.accel_command.y, 0.0);
        assert_eq!(cmd.accel_command.z, 0.0);
        if gravity.magnitude() > 0.0 {
            assert!(cmd.accel_command.x > 0.0 && gravity.x < 0.0);
        }
        assert_eq!(cmd.confidence, 1.0);
        last_tgo = tgo;
    }

    let m = pi.metrics();
    assert_eq!(m.guidance_updates, 5);
    assert!((m.final_closing_speed - 100.0).abs() < 1e-6);
    assert!(m.miss_distance < 1e-6);
}

#[test]
fn test_not_closing_sentinel() {
    let pi = interceptor_with(GuidanceLaw::AugmentedProNav, 30.0);
    pi.update_target_observation(stationary(Vector3D::new(1000.0, 0.0, 0.0), 0.0));
    pi.update_payload_state(OrbitalState::new(
        Vector3D::ZERO,
        Vector3D::new(-200.0, 0.0, 0.0),
        1_000.0,
    ));
    let cmd = pi.compute_guidance(0.0);
    assert_eq!(cmd.time_to_go, Duration::from_secs(999));
    assert_eq!(pi.metrics().time_to_intercept, Duration::from_secs(999));
    assert!(pi.metrics().final_closing_speed < 0.0);
}

#[test]
fn test_g_limit_all_laws() {
    let max_g = 5.0;
    for law in GuidanceLaw::ALL {
        let pi = interceptor_with(law, max_g);
        // Fast crossing target at short range: every law saturates.
        for i in 0..50 {
            let t = i as f64 * 0.1;
            pi.update_target_observation(TargetState::new(
                Vector3D::new(200.0, -500.0 + 300.0 * t, 50.0),
                Vector3D::new(0.0, 300.0, 0.0),
                Vector3D::new(0.0, 0.0, 40.0),
                t,
            ));
        }
        pi.update_payload_state(OrbitalState::new(
            Vector3D::ZERO,
            Vector3D::new(400.0, 0.0, 0.0),
            1_000.0,
        ));
        let cmd = pi.compute_guidance(5.0);
        // Gravity is zero at the body center, so the command is the steering term.
        let limit = max_g * G0 + 1e-9;
        assert!(
            cmd.accel_command.magnitude() <= limit,
            "{law}: |a| = {:.3} exceeds {limit:.3}",
            cmd.accel_command.magnitude()
        );
        assert!(pi.metrics().max_g_experienced <= max_g + 1e-9);
        assert!((0.0..=1.0).contains(&cmd.thrust_level));
    }
}

#[test]
fn test_g_limit_includes_gravity_compensation() {
    let max_g = 1.0;
    let payload_pos = Vector3D::new(R_EARTH + 1_000.0, 0.0, 0.0);
    for law in GuidanceLaw::ALL {
        let pi = interceptor_with(law, max_g);
        // Crossing target: steering saturates, then gravity compensation adds ~1 g on top.
        for i in 0..50 {
            let t = i as f64 * 0.1;
            pi.update_target_observation(TargetState::new(
                Vector3D::new(R_EARTH + 1_000.0, 2_000.0, -300.0 + 300.0 * t),
                Vector3D::new(0.0, 0.0, 300.0),
                Vector3D::ZERO,
                t,
            ));
        }
        pi.update_payload_state(OrbitalState {
            position: payload_pos,
            velocity: Vector3D::new(0.0, 300.0, 0.0),
            mass: 1_000.0,
            time: 4.9,
        });
        let cmd = pi.compute_guidance(4.9);
        let limit = max_g * G0 + 1e-9;
        assert!(
            cmd.accel_command.magnitude() <= limit,
            "{law}: |a| = {:.3} exceeds {limit:.3}",
            cmd.accel_command.magnitude()
        );
        assert!(cmd.accel_command.magnitude() > 0.0);
    }
}

#[test]
fn test_gravity_compensation_in_flight() {
    let pi = interceptor_with(GuidanceLaw::AugmentedProNav, 10.0);
    let payload_pos = Vector3D::new(R_EARTH + 5_000.0, 0.0, 0.0);
    let target = Vector3D::new(R_EARTH + 5_000.0, 8_000.0, 0.0);
    let last = feed_track(pi.tracker(), target, Vector3D::ZERO, 300);
    pi.update_payload_state(OrbitalState {
        position: payload_pos,
        velocity: Vector3D::new(0.0, 400.0, 0.0),
        mass: 1_000.0,
        time: last,
    });

    let cmd = pi.compute_guidance(last);
    let gravity = calculate_gravity(payload_pos, GravityModel::PointMass, CentralBody::Earth);
    let steering = cmd.accel_command + gravity;
    assert!(steering.magnitude() <= 10.0 * G0 + 1e-6);
    // Thrust points up against gravity.
    assert!(cmd.accel_command.x > 9.0, "accel {:?}", cmd.accel_command);
    assert!((cmd.thrust_vector.magnitude() - 1.0).abs() < 1e-9);
    // 1000 kg · ~9.8 m/s² / 50 kN
    assert!(cmd.thrust_level > 0.15 && cmd.thrust_level < 0.25);
}

#[test]
fn test_metrics_accumulate() {
    let pi = interceptor_with(GuidanceLaw::ProNav, 30.0);
    pi.update_target_observation(TargetState::new(
        Vector3D::new(3000.0, 0.0, 0.0),
        Vector3D::new(0.0, 100.0, 0.0),
        Vector3D::ZERO,
        0.0,
    ));
    pi.update_payload_state(OrbitalState::new(
        Vector3D::ZERO,
        Vector3D::new(300.0, 0.0, 0.0),
        1_000.0,
    ));

    let first = pi.compute_guidance(0.0);
    let second = pi.compute_guidance(0.5);
    assert_eq!(first.accel_command, second.accel_command);

    let a = first.accel_command.magnitude();
    assert!(a > 0.0);
    let m = pi.metrics();
    assert_eq!(m.guidance_updates, 2);
    // First call charges one update period (10 ms), the second the 0.5 s gap.
    assert!((m.delta_v_used - a * 0.51).abs() < 1e-9);
    assert!((m.max_g_experienced - a / G0).abs() < 1e-12);

    // A repeated timestamp falls back to the update period.
    pi.compute_guidance(0.5);
    assert!((pi.metrics().delta_v_used - a * 0.52).abs() < 1e-9);
}

#[test]
fn test_maneuvers_mirrored_in_metrics() {
    let pi = interceptor_with(GuidanceLaw::Optimal, 30.0);
    let accels = [0.0, 6.0, 7.0, 20.0];
    for (i, ax) in accels.iter().enumerate() {
        pi.update_target_observation(TargetState::new(
            Vector3D::new(5000.0, 0.0, 0.0),
            Vector3D::ZERO,
            Vector3D::new(*ax, 0.0, 0.0),
            i as f64,
        ));
    }
    pi.compute_guidance(4.0);
    assert_eq!(pi.metrics().maneuvers_detected, 2);
    // 0.3, 0.2, 0.5
    assert!((pi.maneuver_probability() - 0.5).abs() < 1e-12);
}

#[test]
fn test_predicted_target_uses_look_ahead() {
    let pi = PrecisionInterceptor::new(InterceptorConfig {
        look_ahead: Duration::from_secs(4),
        ..Default::default()
    });
    pi.update_target_observation(TargetState::new(
        Vector3D::ZERO,
        Vector3D::new(10.0, 0.0, 0.0),
        Vector3D::ZERO,
        2.0,
    ));
    let predicted = pi.predicted_target_state();
    let current = pi.target_state();
    assert_eq!(predicted.timestamp, 6.0);
    assert!((predicted.confidence - 0.6).abs() < 1e-12);
    assert!((predicted.position.x - (current.position.x + 4.0 * current.velocity.x)).abs() < 1e-9);
}

#[test]
fn test_guidance_deterministic() {
    let run = || {
        let pi = interceptor_with(GuidanceLaw::TrueProNav, 20.0);
        let mut out = Vec::new();
        for i in 0..40 {
            let t = i as f64 * 0.05;
            pi.update_target_observation(TargetState::new(
                Vector3D::new(4000.0 - 50.0 * t, 300.0 + 80.0 * t, -20.0),
                Vector3D::new(-50.0, 80.0, 0.0),
                Vector3D::new(0.0, if i > 20 { 15.0 } else { 0.0 }, 0.0),
                t,
            ));
            pi.update_payload_state(OrbitalState {
                position: Vector3D::new(300.0 * t, 0.0, 0.0),
                velocity: Vector3D::new(300.0, 0.0, 0.0),
                mass: 900.0,
                time: t,
            });
            out.push(serde_json::to_string(&pi.compute_guidance(t)).unwrap());
        }
        out.push(serde_json::to_string(&pi.metrics()).unwrap());
        out
    };
    assert_eq!(run(), run());
}

#[test]
fn test_concurrent_feeds_and_guidance() {
    let pi = Arc::new(interceptor_with(GuidanceLaw::AugmentedProNav, 30.0));

    let observer = {
        let pi = Arc::clone(&pi);
        thread::spawn(move || {
            for i in 0..500 {
                let t = i as f64 * 0.01;
                pi.update_target_observation(TargetState::new(
                    Vector3D::new(5000.0, 100.0 * t, 0.0),
                    Vector3D::new(0.0, 100.0, 0.0),
                    Vector3D::ZERO,
                    t,
                ));
            }
        })
    };
    let telemetry = {
        let pi = Arc::clone(&pi);
        thread::spawn(move || {
            for i in 0..500 {
                let t = i as f64 * 0.01;
                pi.update_payload_state(OrbitalState {
                    position: Vector3D::new(400.0 * t, 0.0, 0.0),
                    velocity: Vector3D::new(400.0, 0.0, 0.0),
                    mass: 1_000.0,
                    time: t,
                });
            }
        })
    };

    for i in 0..500 {
        let cmd = pi.compute_guidance(i as f64 * 0.01);
        assert!(cmd.accel_command.is_finite());
        assert!(cmd.predicted_miss.is_finite());
        assert!((0.0..=1.0).contains(&cmd.confidence));
    }
    observer.join().unwrap();
    telemetry.join().unwrap();

    assert_eq!(pi.metrics().guidance_updates, 500);
    assert_eq!(pi.tracker().history_len(), TRACKER_HISTORY_LEN);
}

// ---- Mission planning ----

fn ground_launch(time: f64) -> OrbitalState {
    OrbitalState {
        position: Vector3D::new(R_EARTH, 0.0, 0.0),
        velocity: Vector3D::ZERO,
        mass: 1_000.0,
        time,
    }
}

#[test]
fn test_environment_classification() {
    let at = |alt: f64| classify_environment(Vector3D::new(0.0, R_EARTH + alt, 0.0));
    assert_eq!(at(50_000.0), EnvironmentType::HighAtmosphere);
    assert_eq!(at(500_000.0), EnvironmentType::Leo);
    assert_eq!(at(-1.0), EnvironmentType::Ground);
}

#[test]
fn test_plan_stationary_target() {
    let tracker = TargetTracker::new("site-7", TargetType::Stationary);
    let last = feed_track(
        &tracker,
        Vector3D::new(R_EARTH + 10_000.0, 100_000.0, 0.0),
        Vector3D::ZERO,
        300,
    );

    let planner = MissionPlanner::new();
    let mission = planner
        .plan_intercept(
            &ground_launch(last),
            &tracker,
            PayloadType::Hypersonic,
            MissionConstraints::default(),
        )
        .unwrap();

    assert_eq!(mission.status, MissionStatus::Ready);
    assert_eq!(mission.environment, EnvironmentType::LowAtmosphere);
    assert_eq!(mission.target_type, TargetType::Stationary);
    assert!(mission.id.starts_with("hypersonic-299-"), "id {}", mission.id);
    assert!(mission.delta_v_budget <= DEFAULT_MAX_DELTA_V);
    assert!(mission.feasibility > 0.0);

    let wp = &mission.waypoints;
    assert_eq!(wp.len(), 4);
    let purposes: Vec<_> = wp.iter().map(|w| w.purpose).collect();
    assert_eq!(
        purposes,
        [
            WaypointPurpose::Launch,
            WaypointPurpose::Burn,
            WaypointPurpose::Coast,
            WaypointPurpose::Terminal
        ]
    );

    let flight = mission.flight_time.as_secs_f64();
    assert_eq!(wp[0].time, last);
    assert_eq!(wp[0].delta_v, 0.0);
    assert!((wp[1].time - (last + 10.0)).abs() < 1e-9);
    assert!((wp[1].delta_v - 0.8 * mission.delta_v_budget).abs() < 1e-9);
    assert!((wp[2].time - (last + flight / 2.0)).abs() < 1e-9);
    assert_eq!(wp[2].delta_v, 0.0);
    assert!((wp[3].time - mission.intercept_time).abs() < 1e-9);
    assert!((wp[3].delta_v - 0.2 * mission.delta_v_budget).abs() < 1e-9);
    assert_eq!(wp[3].position, mission.intercept_point);
    assert!((mission.total_delta_v() - mission.delta_v_budget).abs() < 1e-9);
    assert!(wp.windows(2).all(|w| w[1].time >= w[0].time));
}

#[test]
fn test_plan_moving_target_within_constraints() {
    let tracker = TargetTracker::new("jet", TargetType::Airborne);
    let last = feed_track(
        &tracker,
        Vector3D::new(R_EARTH + 10_000.0, 50_000.0, 0.0),
        Vector3D::new(0.0, 250.0, 0.0),
        200,
    );
    let constraints = MissionConstraints {
        max_delta_v: 3_000.0,
        max_flight_time: Duration::from_secs(60),
        ..Default::default()
    };
    let mission = MissionPlanner::new()
        .plan_intercept(&ground_launch(last), &tracker, PayloadType::Cruise, constraints)
        .unwrap();
    assert!(mission.delta_v_budget <= 3_000.0);
    assert!(mission.flight_time <= Duration::from_secs(60));
    assert_eq!(mission.constraints.max_delta_v, 3_000.0);
}

#[test]
fn test_plan_out_of_budget() {
    let tracker = TargetTracker::new("far", TargetType::Stationary);
    feed_track(
        &tracker,
        Vector3D::new(R_EARTH, 5_000_000.0, 0.0),
        Vector3D::ZERO,
        300,
    );
    let constraints = MissionConstraints {
        max_delta_v: 100.0,
        max_flight_time: Duration::from_secs(60),
        ..Default::default()
    };
    let err = MissionPlanner::new()
        .plan_intercept(&ground_launch(0.0), &tracker, PayloadType::Drone, constraints)
        .unwrap_err();
    assert!(matches!(err, PlanError::NoSolutionFound { .. }), "{err}");
}

#[test]
fn test_plan_invalid_inputs() {
    let tracker = TargetTracker::new("t", TargetType::Stationary);
    feed_track(&tracker, Vector3D::new(R_EARTH, 10_000.0, 0.0), Vector3D::ZERO, 10);
    let planner = MissionPlanner::new();

    let negative = MissionConstraints {
        max_delta_v: -1.0,
        ..Default::default()
    };
    let err = planner
        .plan_intercept(&ground_launch(0.0), &tracker, PayloadType::Cruise, negative)
        .unwrap_err();
    assert!(matches!(err, PlanError::InvalidInput(_)));

    let mut bad_launch = ground_launch(0.0);
    bad_launch.velocity.y = f64::NAN;
    let err = planner
        .plan_intercept(&bad_launch, &tracker, PayloadType::Cruise, MissionConstraints::default())
        .unwrap_err();
    assert!(matches!(err, PlanError::InvalidInput(_)));
}

#[test]
fn test_mission_transitions() {
    let tracker = TargetTracker::new("t", TargetType::Stationary);
    let last = feed_track(
        &tracker,
        Vector3D::new(R_EARTH + 10_000.0, 100_000.0, 0.0),
        Vector3D::ZERO,
        300,
    );
    let mut mission = MissionPlanner::new()
        .plan_intercept(
            &ground_launch(last),
            &tracker,
            PayloadType::Hypersonic,
            MissionConstraints::default(),
        )
        .unwrap();

    assert_eq!(
        mission.transition(MissionStatus::Planning),
        Err(PlanError::InvalidTransition {
            from: MissionStatus::Ready,
            to: MissionStatus::Planning
        })
    );
    mission.transition(MissionStatus::Executing).unwrap();
    mission.transition(MissionStatus::Completed).unwrap();
    assert!(mission.transition(MissionStatus::Aborted).is_err());
    assert_eq!(mission.status, MissionStatus::Completed);
}

#[test]
fn test_mission_ids_unique() {
    let tracker = TargetTracker::new("t", TargetType::Stationary);
    let last = feed_track(
        &tracker,
        Vector3D::new(R_EARTH + 10_000.0, 100_000.0, 0.0),
        Vector3D::ZERO,
        300,
    );
    let planner = MissionPlanner::new();
    let plan = || {
        planner
            .plan_intercept(
                &ground_launch(last),
                &tracker,
                PayloadType::Cruise,
                MissionConstraints::default(),
            )
            .unwrap()
    };
    assert_ne!(plan().id, plan().id);
}

struct FixedSolver(InterceptSolution);

impl InterceptSolver for FixedSolver {
    fn solve(&self, _problem: &InterceptProblem) -> Result<InterceptSolution, PlanError> {
        Ok(self.0)
    }
}

#[test]
fn test_custom_policy_and_solver() {
    let tracker = TargetTracker::new("t", TargetType::Orbital);
    tracker.update_target(stationary(Vector3D::new(R_EARTH + 600e3, 0.0, 0.0), 0.0));

    let solution = InterceptSolution {
        flight_time: Duration::from_secs(100),
        launch_velocity: Vector3D::new(0.0, 1000.0, 0.0),
        impact_velocity: Vector3D::new(0.0, 1000.0, 0.0),
        intercept_point: Vector3D::new(R_EARTH + 500e3, 100_000.0, 0.0),
        delta_v: 1000.0,
        feasibility: 0.5,
        closing_velocity: 1000.0,
        impact_angle: 1.0,
    };
    let planner = MissionPlanner::with_policy(PlannerPolicy {
        burn_offset: Duration::from_secs(20),
        burn_fraction: 0.6,
        ..Default::default()
    })
    .with_solver(FixedSolver(solution));

    let launch = OrbitalState::new(Vector3D::new(R_EARTH + 500e3, 0.0, 0.0), Vector3D::ZERO, 500.0);
    let mission = planner
        .plan_intercept(&launch, &tracker, PayloadType::OrbitalKv, MissionConstraints::default())
        .unwrap();

    assert_eq!(mission.environment, EnvironmentType::Leo);
    let wp = &mission.waypoints;
    assert_eq!(wp[1].time, 20.0);
    assert!((wp[1].delta_v - 600.0).abs() < 1e-9);
    assert!((wp[3].delta_v - 400.0).abs() < 1e-9);
    assert_eq!(wp[2].position, Vector3D::new(R_EARTH + 500e3, 50_000.0, 0.0));
    assert_eq!(mission.intercept_time, 100.0);
}
