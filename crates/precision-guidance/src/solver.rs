//! Intercept-geometry solvers used by the mission planner.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use precision_core::config::{secs, SolverSettings};
use precision_core::constants::*;
use precision_core::types::{TargetState, Vector3D};

use crate::error::PlanError;

/// Inputs of one intercept solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterceptProblem {
    pub launch_position: Vector3D,
    pub launch_velocity: Vector3D,
    /// Target estimate; its acceleration is held constant over the flight.
    pub target: TargetState,
    /// Delta-V budget (m/s).
    pub max_delta_v: f64,
    pub max_flight_time: Duration,
    /// Apply the gravity-drop correction (launch below the Kármán line).
    pub atmospheric: bool,
}

/// A feasible intercept trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterceptSolution {
    #[serde(with = "secs")]
    pub flight_time: Duration,
    pub launch_velocity: Vector3D,
    pub impact_velocity: Vector3D,
    pub intercept_point: Vector3D,
    pub delta_v: f64,
    /// 0.0 - 1.0, higher is better.
    pub feasibility: f64,
    pub closing_velocity: f64,
    /// Angle between the impact velocity and the local vertical (radians).
    pub impact_angle: f64,
}

/// Finds an intercept trajectory for a planning problem.
pub trait InterceptSolver: Send + Sync {
    fn solve(&self, problem: &InterceptProblem) -> Result<InterceptSolution, PlanError>;
}

/// Straight-line transfer solver: scans flight times, scores each
/// candidate, then refines the best one with a golden-section search.
#[derive(Debug, Clone, Default)]
pub struct MovingTargetSolver {
    pub settings: SolverSettings,
}

impl MovingTargetSolver {
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }

    /// Candidate for flight time `t` (seconds), or `None` when infeasible.
    pub fn evaluate(&self, problem: &InterceptProblem, t: f64) -> Option<InterceptSolution> {
        if !(t > 0.0 && t.is_finite()) {
            return None;
        }
        let target = &problem.target;
        let intercept_point = target.extrapolate(t).position;
        let to_target = intercept_point - problem.launch_position;
        if to_target.magnitude() / t > SOLVER_MAX_TRANSFER_SPEED {
            return None;
        }

        let up = problem.launch_position.normalize();
        let required = if problem.atmospheric {
            (to_target + up.scale(0.5 * G0 * t * t)).scale(1.0 / t)
        } else {
            to_target.scale(1.0 / t)
        };
        let impact_velocity = if problem.atmospheric {
            required - up.scale(G0 * t)
        } else {
            required
        };

        let delta_v = (required - problem.launch_velocity).magnitude();
        if !(delta_v <= problem.max_delta_v) {
            return None;
        }

        let target_velocity = target.velocity + target.acceleration.scale(t);
        let closing_velocity = (impact_velocity - target_velocity).magnitude();

        let vertical = intercept_point.normalize();
        let cos_angle = impact_velocity.normalize().dot(vertical).abs().min(1.0);

        let feasibility = (1.0 - delta_v / problem.max_delta_v)
            * (SOLVER_PREFERRED_FLIGHT_TIME / t).min(1.0)
            * (closing_velocity / SOLVER_REFERENCE_CLOSING_SPEED).min(1.0);
        if !feasibility.is_finite() {
            return None;
        }

        Some(InterceptSolution {
            flight_time: Duration::from_secs_f64(t),
            launch_velocity: required,
            impact_velocity,
            intercept_point,
            delta_v,
            feasibility,
            closing_velocity,
            impact_angle: cos_angle.acos(),
        })
    }
}

/// Evaluation budget shared by the scan and the refinement.
struct Budget {
    remaining: usize,
    used: usize,
    deadline: Option<Instant>,
}

impl Budget {
    fn take(&mut self) -> bool {
        if self.remaining == 0 || self.deadline.is_some_and(|d| Instant::now() >= d) {
            return false;
        }
        self.remaining -= 1;
        self.used += 1;
        true
    }
}

fn score(candidate: &Option<InterceptSolution>) -> f64 {
    candidate.map_or(0.0, |c| c.feasibility)
}

impl InterceptSolver for MovingTargetSolver {
    fn solve(&self, problem: &InterceptProblem) -> Result<InterceptSolution, PlanError> {
        let max_t = problem.max_flight_time.as_secs_f64();
        if !(max_t > 0.0) || !(problem.max_delta_v > 0.0) {
            return Err(PlanError::InvalidInput(format!(
                "solver needs positive limits, got {max_t} s and {} m/s",
                problem.max_delta_v
            )));
        }

        let step = if self.settings.time_step.is_zero() {
            SOLVER_TIME_STEP_SECS as f64
        } else {
            self.settings.time_step.as_secs_f64()
        };
        let start = self.settings.min_flight_time.as_secs_f64().min(max_t).max(step.min(max_t));
        let mut budget = Budget {
            remaining: self.settings.max_iterations,
            used: 0,
            deadline: self.settings.deadline.map(|d| Instant::now() + d),
        };

        let mut best: Option<InterceptSolution> = None;
        let mut best_t = start;
        let steps = ((max_t - start) / step).floor() as usize;
        for i in 0..=steps {
            if !budget.take() {
                break;
            }
            let t = start + step * i as f64;
            let candidate = self.evaluate(problem, t);
            if score(&candidate) > score(&best) {
                best = candidate;
                best_t = t;
            }
        }

        if budget.used == 0 {
            return Err(PlanError::SolverBudgetExhausted { evaluations: 0 });
        }

        if best.is_some() {
            // Golden-section search for the feasibility peak near the best scan point
            let inv_phi = (5f64.sqrt() - 1.0) / 2.0;
            let (mut lo, mut hi) = ((best_t - step).max(start), (best_t + step).min(max_t));
            for _ in 0..self.settings.refine_iterations {
                if hi - lo < 1e-3 || !budget.take() || !budget.take() {
                    break;
                }
                let a = hi - inv_phi * (hi - lo);
                let b = lo + inv_phi * (hi - lo);
                let ca = self.evaluate(problem, a);
                let cb = self.evaluate(problem, b);
                for c in [ca, cb] {
                    if score(&c) > score(&best) {
                        best = c;
                    }
                }
                if score(&ca) >= score(&cb) {
                    hi = b;
                } else {
                    lo = a;
                }
            }
        }

        log::debug!(
            "intercept solve: {} evaluations, best feasibility {:.3}",
            budget.used,
            score(&best)
        );

        match best {
            Some(solution) if solution.feasibility > 0.0 => Ok(solution),
            _ => Err(PlanError::NoSolutionFound {
                max_delta_v: problem.max_delta_v,
                max_flight_time: max_t,
            }),
        }
    }
}
