use precision_core::enums::MissionStatus;
use thiserror::Error;

/// Failures of mission planning and mission lifecycle changes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("no feasible intercept within {max_delta_v:.0} m/s delta-V and {max_flight_time:.0} s flight time")]
    NoSolutionFound { max_delta_v: f64, max_flight_time: f64 },

    #[error("intercept solver budget exhausted after {evaluations} evaluations")]
    SolverBudgetExhausted { evaluations: usize },

    #[error("invalid planning input: {0}")]
    InvalidInput(String),

    #[error("illegal mission status change {from:?} -> {to:?}")]
    InvalidTransition { from: MissionStatus, to: MissionStatus },
}
