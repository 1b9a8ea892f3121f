//! ECS components for hecs entities.
//!
//! Components are plain data. Behavior lives in systems.

use std::sync::Arc;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use precision_core::types::Vector3D;
use precision_guidance::{GuidanceCommand, PrecisionInterceptor};

/// Inertial position (meters, central-body centered).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position(pub DVec3);

/// Inertial velocity (m/s).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity(pub DVec3);

/// Acceleration applied during the next integration step (m/s²).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Acceleration(pub DVec3);

/// Scripted target motion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetBehavior {
    /// No acceleration.
    #[default]
    Constant,
    /// Sinusoidal acceleration `acceleration · sin(2π t / period)`.
    Weave { acceleration: Vector3D, period: f64 },
    /// Constant acceleration switched on at `at` seconds.
    Step { at: f64, acceleration: Vector3D },
}

/// Marks a target entity.
#[derive(Debug, Clone)]
pub struct Target {
    pub id: String,
    pub behavior: TargetBehavior,
}

/// The guided payload. Shares its interceptor with the engine.
#[derive(Debug, Clone)]
pub struct Payload {
    pub interceptor: Arc<PrecisionInterceptor>,
    pub target: hecs::Entity,
    pub launch_mass: f64,
    pub mass: f64,
    pub launched: bool,
}

/// Sensor noise applied to target observations fed to the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Seeker {
    /// Uniform position error bound per axis (meters).
    pub position_noise: f64,
    /// Uniform velocity error bound per axis (m/s).
    pub velocity_noise: f64,
}

/// Latest guidance output of a launched payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Command(pub GuidanceCommand);

/// How an engagement ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementOutcome {
    /// Closest approach within the lethal radius.
    Hit,
    /// The payload passed the target outside the lethal radius.
    Miss,
    /// The payload went below the central body surface.
    GroundImpact,
    Timeout,
}

/// Closest-approach bookkeeping for a launched payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissTracker {
    pub previous: Option<(DVec3, DVec3)>,
    pub closest_approach: f64,
    pub closest_time: f64,
    pub payload_at_closest: DVec3,
    pub target_at_closest: DVec3,
    pub outcome: Option<EngagementOutcome>,
}

impl Default for MissTracker {
    fn default() -> Self {
        Self {
            previous: None,
            closest_approach: f64::INFINITY,
            closest_time: 0.0,
            payload_at_closest: DVec3::ZERO,
            target_at_closest: DVec3::ZERO,
            outcome: None,
        }
    }
}
