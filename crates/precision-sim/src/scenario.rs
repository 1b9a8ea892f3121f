//! Engagement scenarios: JSON-loadable descriptions plus built-in geometries.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use precision_core::config::{InterceptorConfig, MissionConstraints};
use precision_core::constants::*;
use precision_core::enums::{GuidanceLaw, TargetType};
use precision_core::types::Vector3D;
use precision_guidance::laws::lead_intercept_point;

use crate::components::{Seeker, TargetBehavior};

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid scenario: {0}")]
    Invalid(String),
}

/// How the payload leaves the rail at launch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchMode {
    /// Keep the scenario's initial velocity.
    #[default]
    Scripted,
    /// Take the planned mission's launch velocity.
    Planned,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadSetup {
    pub position: Vector3D,
    pub velocity: Vector3D,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSetup {
    pub id: String,
    pub target_type: TargetType,
    pub position: Vector3D,
    pub velocity: Vector3D,
    pub behavior: TargetBehavior,
}

impl Default for TargetSetup {
    fn default() -> Self {
        Self {
            id: "target-1".into(),
            target_type: TargetType::Linear,
            position: Vector3D::ZERO,
            velocity: Vector3D::ZERO,
            behavior: TargetBehavior::Constant,
        }
    }
}

/// One engagement: interceptor configuration, initial geometry and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    pub interceptor: InterceptorConfig,
    pub constraints: MissionConstraints,
    pub payload: PayloadSetup,
    pub target: TargetSetup,
    pub seeker: Seeker,
    pub launch: LaunchMode,
    /// Tracking time before the payload launches (seconds).
    pub warmup_secs: f64,
    /// Engagement time limit, warm-up included (seconds).
    pub max_duration_secs: f64,
    pub lethal_radius: f64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "unnamed".into(),
            interceptor: InterceptorConfig::default(),
            constraints: MissionConstraints::default(),
            payload: PayloadSetup::default(),
            target: TargetSetup::default(),
            seeker: Seeker::default(),
            launch: LaunchMode::default(),
            warmup_secs: SIM_TRACK_WARMUP_SECS,
            max_duration_secs: SIM_MAX_DURATION_SECS,
            lethal_radius: SIM_LETHAL_RADIUS,
        }
    }
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ScenarioError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject geometry and timing the engine cannot fly.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let vectors = [
            ("payload.position", self.payload.position),
            ("payload.velocity", self.payload.velocity),
            ("target.position", self.target.position),
            ("target.velocity", self.target.velocity),
        ];
        for (name, v) in vectors {
            if !v.is_finite() {
                return Err(ScenarioError::Invalid(format!("{name} is not finite")));
            }
        }
        match self.target.behavior {
            TargetBehavior::Constant => {}
            TargetBehavior::Weave { acceleration, period } => {
                if !acceleration.is_finite() || !(period > 0.0 && period.is_finite()) {
                    return Err(ScenarioError::Invalid(
                        "weave needs a finite acceleration and a positive period".into(),
                    ));
                }
            }
            TargetBehavior::Step { at, acceleration } => {
                if !acceleration.is_finite() || !at.is_finite() {
                    return Err(ScenarioError::Invalid("step behavior is not finite".into()));
                }
            }
        }

        let non_negative = [
            ("seeker.position_noise", self.seeker.position_noise),
            ("seeker.velocity_noise", self.seeker.velocity_noise),
            ("warmup_secs", self.warmup_secs),
            ("lethal_radius", self.lethal_radius),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ScenarioError::Invalid(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        if !(self.max_duration_secs.is_finite() && self.max_duration_secs > self.warmup_secs) {
            return Err(ScenarioError::Invalid(format!(
                "max_duration_secs ({}) must exceed warmup_secs ({})",
                self.max_duration_secs, self.warmup_secs
            )));
        }
        Ok(())
    }

    /// Look up a built-in scenario by name.
    pub fn builtin(name: &str) -> Option<Scenario> {
        match name {
            "head_on" => Some(Self::head_on()),
            "crossing" => Some(Self::crossing()),
            "weaving" => Some(Self::weaving()),
            _ => None,
        }
    }

    pub fn builtin_names() -> &'static [&'static str] {
        &["head_on", "crossing", "weaving"]
    }

    /// Interceptor used by the built-in scenarios: a slender 25 cm airframe
    /// with a gimballed seeker covering ±0.75 rad.
    pub fn airframe() -> InterceptorConfig {
        InterceptorConfig {
            drag_area: 0.05,
            seeker_fov: 1.5,
            ..Default::default()
        }
    }

    /// 8 km head-on closure at 5 km altitude, 500 m/s closing speed.
    pub fn head_on() -> Scenario {
        let altitude = R_EARTH + 5_000.0;
        Scenario {
            name: "head_on".into(),
            interceptor: InterceptorConfig {
                guidance_law: GuidanceLaw::ProNav,
                ..Self::airframe()
            },
            payload: PayloadSetup {
                position: Vector3D::new(altitude, 0.0, 0.0),
                velocity: Vector3D::new(0.0, 400.0, 0.0),
            },
            target: TargetSetup {
                id: "head-on-1".into(),
                target_type: TargetType::Linear,
                position: Vector3D::new(altitude, 8_000.0, 0.0),
                velocity: Vector3D::new(0.0, -100.0, 0.0),
                behavior: TargetBehavior::Constant,
            },
            ..Default::default()
        }
    }

    /// Target crossing the payload's line of sight; the payload is pointed
    /// at the lead point for its launch speed as seen at launch time.
    pub fn crossing() -> Scenario {
        let altitude = R_EARTH + 5_000.0;
        let payload_position = Vector3D::new(altitude, 0.0, 0.0);
        let target_position = Vector3D::new(altitude, 10_000.0, 4_000.0);
        let target_velocity = Vector3D::new(0.0, 0.0, -200.0);
        let speed = 600.0;
        let at_launch = target_position + target_velocity.scale(SIM_TRACK_WARMUP_SECS);
        let (aim, _) = lead_intercept_point(at_launch, target_velocity, payload_position, speed);
        Scenario {
            name: "crossing".into(),
            interceptor: Self::airframe(),
            payload: PayloadSetup {
                position: payload_position,
                velocity: (aim - payload_position).normalize().scale(speed),
            },
            target: TargetSetup {
                id: "crossing-1".into(),
                target_type: TargetType::Linear,
                position: target_position,
                velocity: target_velocity,
                behavior: TargetBehavior::Constant,
            },
            seeker: Seeker {
                position_noise: 5.0,
                velocity_noise: 1.0,
            },
            ..Default::default()
        }
    }

    /// Head-on closure against a target weaving at 3 g.
    pub fn weaving() -> Scenario {
        let mut scenario = Self::head_on();
        scenario.name = "weaving".into();
        scenario.interceptor.guidance_law = GuidanceLaw::AugmentedProNav;
        scenario.target.id = "weave-1".into();
        scenario.target.target_type = TargetType::Maneuvering;
        scenario.target.behavior = TargetBehavior::Weave {
            acceleration: Vector3D::new(0.0, 0.0, 3.0 * G0),
            period: 4.0,
        };
        scenario
    }
}
