//! Mission planning: environment classification, intercept solving and
//! waypoint expansion.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use precision_core::config::{secs, MissionConstraints, PlannerPolicy};
use precision_core::constants::*;
use precision_core::enums::*;
use precision_core::types::{OrbitalState, Vector3D};

use crate::error::PlanError;
use crate::solver::{InterceptProblem, InterceptSolution, InterceptSolver, MovingTargetSolver};
use crate::tracker::TargetTracker;

static MISSION_SEQ: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionWaypoint {
    pub position: Vector3D,
    pub velocity: Vector3D,
    /// Mission clock (seconds).
    pub time: f64,
    pub purpose: WaypointPurpose,
    pub delta_v: f64,
}

/// A planned intercept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterceptMission {
    pub id: String,
    pub payload_type: PayloadType,
    pub target_type: TargetType,
    pub environment: EnvironmentType,
    pub launch_pos: Vector3D,
    pub launch_time: f64,
    pub waypoints: Vec<MissionWaypoint>,
    pub intercept_point: Vector3D,
    /// Mission clock at intercept (seconds).
    pub intercept_time: f64,
    #[serde(with = "secs")]
    pub flight_time: Duration,
    pub delta_v_budget: f64,
    pub feasibility: f64,
    pub constraints: MissionConstraints,
    pub status: MissionStatus,
}

impl InterceptMission {
    /// Move to `next`, rejecting backward or skipped transitions.
    pub fn transition(&mut self, next: MissionStatus) -> Result<(), PlanError> {
        if !self.status.can_transition_to(next) {
            return Err(PlanError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        log::info!("mission {}: {:?} -> {next:?}", self.id, self.status);
        self.status = next;
        Ok(())
    }

    pub fn total_delta_v(&self) -> f64 {
        self.waypoints.iter().map(|w| w.delta_v).sum()
    }
}

/// Operating environment for a position, by altitude above mean Earth radius.
pub fn classify_environment(position: Vector3D) -> EnvironmentType {
    let altitude = position.magnitude() - R_EARTH;
    if altitude < 0.0 {
        EnvironmentType::Ground
    } else if altitude < LOW_ATMOSPHERE_CEILING {
        EnvironmentType::LowAtmosphere
    } else if altitude < KARMAN_LINE {
        EnvironmentType::HighAtmosphere
    } else if altitude < LEO_CEILING {
        EnvironmentType::Leo
    } else if altitude < GEO_ALTITUDE {
        EnvironmentType::Meo
    } else if altitude < GEO_ALTITUDE + GEO_BAND_WIDTH {
        EnvironmentType::Geo
    } else if altitude < CISLUNAR_CEILING {
        EnvironmentType::Cislunar
    } else {
        EnvironmentType::DeepSpace
    }
}

pub struct MissionPlanner {
    policy: PlannerPolicy,
    solver: Box<dyn InterceptSolver>,
}

impl Default for MissionPlanner {
    fn default() -> Self {
        Self::with_policy(PlannerPolicy::default())
    }
}

impl MissionPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Planner with custom policy; the default solver uses the policy's settings.
    pub fn with_policy(policy: PlannerPolicy) -> Self {
        let solver = Box::new(MovingTargetSolver::new(policy.solver.clone()));
        Self { policy, solver }
    }

    pub fn with_solver(mut self, solver: impl InterceptSolver + 'static) -> Self {
        self.solver = Box::new(solver);
        self
    }

    pub fn policy(&self) -> &PlannerPolicy {
        &self.policy
    }

    /// Plan an intercept of the tracker's current target estimate.
    pub fn plan_intercept(
        &self,
        launch_state: &OrbitalState,
        tracker: &TargetTracker,
        payload_type: PayloadType,
        constraints: MissionConstraints,
    ) -> Result<InterceptMission, PlanError> {
        if !launch_state.position.is_finite() || !launch_state.velocity.is_finite() {
            return Err(PlanError::InvalidInput("launch state is not finite".into()));
        }
        if !launch_state.time.is_finite() {
            return Err(PlanError::InvalidInput("launch time is not finite".into()));
        }
        let target = tracker.current_state();
        if !target.has_finite_kinematics() {
            return Err(PlanError::InvalidInput(format!(
                "target {} estimate is not finite",
                tracker.target_id()
            )));
        }
        if !(constraints.max_delta_v >= 0.0) {
            return Err(PlanError::InvalidInput(format!(
                "max_delta_v must be non-negative, got {}",
                constraints.max_delta_v
            )));
        }

        let max_delta_v = if constraints.max_delta_v == 0.0 {
            self.policy.default_max_delta_v
        } else {
            constraints.max_delta_v
        };
        let max_flight_time = if constraints.max_flight_time.is_zero() {
            self.policy.default_max_flight_time
        } else {
            constraints.max_flight_time
        };

        let environment = classify_environment(launch_state.position);
        let problem = InterceptProblem {
            launch_position: launch_state.position,
            launch_velocity: launch_state.velocity,
            target,
            max_delta_v,
            max_flight_time,
            atmospheric: environment.is_atmospheric(),
        };
        let solution = self.solver.solve(&problem)?;

        let launch_time = launch_state.time;
        let seq = MISSION_SEQ.fetch_add(1, Ordering::Relaxed);
        let id = format!("{payload_type}-{launch_time:.0}-{seq}");
        let waypoints = self.generate_waypoints(launch_state, &solution);

        let mut mission = InterceptMission {
            id,
            payload_type,
            target_type: tracker.target_type(),
            environment,
            launch_pos: launch_state.position,
            launch_time,
            waypoints,
            intercept_point: solution.intercept_point,
            intercept_time: launch_time + solution.flight_time.as_secs_f64(),
            flight_time: solution.flight_time,
            delta_v_budget: solution.delta_v,
            feasibility: solution.feasibility,
            constraints,
            status: MissionStatus::Planning,
        };
        mission.transition(MissionStatus::Ready)?;
        Ok(mission)
    }

    /// Launch, main burn, mid-course coast and terminal waypoints.
    ///
    /// The burn waypoint never lands after the coast waypoint on short flights.
    pub fn generate_waypoints(
        &self,
        launch_state: &OrbitalState,
        solution: &InterceptSolution,
    ) -> Vec<MissionWaypoint> {
        let t0 = launch_state.time;
        let flight = solution.flight_time.as_secs_f64();
        let burn_at = self.policy.burn_offset.as_secs_f64().min(flight / 2.0);
        let coast_at = flight / 2.0;
        let fraction = self.policy.burn_fraction.clamp(0.0, 1.0);
        let along = |t: f64| launch_state.position + solution.launch_velocity.scale(t);

        vec![
            MissionWaypoint {
                position: launch_state.position,
                velocity: launch_state.velocity,
                time: t0,
                purpose: WaypointPurpose::Launch,
                delta_v: 0.0,
            },
            MissionWaypoint {
                position: along(burn_at),
                velocity: solution.launch_velocity,
                time: t0 + burn_at,
                purpose: WaypointPurpose::Burn,
                delta_v: solution.delta_v * fraction,
            },
            MissionWaypoint {
                position: along(coast_at),
                velocity: solution.launch_velocity,
                time: t0 + coast_at,
                purpose: WaypointPurpose::Coast,
                delta_v: 0.0,
            },
            MissionWaypoint {
                position: solution.intercept_point,
                velocity: solution.impact_velocity,
                time: t0 + flight,
                purpose: WaypointPurpose::Terminal,
                delta_v: solution.delta_v * (1.0 - fraction),
            },
        ]
    }
}
