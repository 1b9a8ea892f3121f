//! Precision guidance engine.
//!
//! Tracks a possibly maneuvering target with a Kalman filter, computes
//! guidance commands with a family of proportional-navigation laws, and
//! plans intercept missions before launch.

pub mod error;
pub mod interceptor;
pub mod laws;
pub mod planner;
pub mod solver;
pub mod tracker;

pub use error::PlanError;
pub use interceptor::{GuidanceCommand, InterceptorMetrics, PrecisionInterceptor};
pub use planner::{classify_environment, InterceptMission, MissionPlanner, MissionWaypoint};
pub use precision_core as core;
pub use tracker::TargetTracker;

#[cfg(test)]
mod tests;
