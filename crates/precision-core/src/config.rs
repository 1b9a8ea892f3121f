//! Configuration bundles supplied by the outer config or CLI layer.
//!
//! The engine never reads files itself; it only fills in defaults and
//! repairs values that would make the guidance loop misbehave.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::types::Vector3D;

/// Serde adapter storing a `Duration` as fractional seconds.
pub mod secs {
    use std::time::Duration;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}

/// Immutable configuration of one precision interceptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterceptorConfig {
    pub payload_type: PayloadType,
    /// Dry-plus-propellant mass at launch (kg).
    pub payload_mass: f64,
    /// Maximum thrust (N).
    pub max_thrust: f64,
    /// Specific impulse (seconds).
    pub specific_impulse: f64,
    /// Reference drag area (m²).
    pub drag_area: f64,
    pub drag_coefficient: f64,
    /// Maximum lateral load (g).
    pub max_g: f64,
    pub max_mach: f64,
    /// Maximum steering rate (rad/s).
    pub steering_rate: f64,
    /// Seeker field of view (radians).
    pub seeker_fov: f64,
    /// Seeker detection range (meters).
    pub seeker_range: f64,
    /// Minimum intercept distance (meters).
    pub min_intercept_distance: f64,
    pub central_body: CentralBody,
    pub gravity_model: GravityModel,
    pub atmosphere_model: AtmosphereModel,
    pub guidance_law: GuidanceLaw,
    /// Guidance update period (seconds in serialized form).
    #[serde(with = "secs")]
    pub update_period: Duration,
    /// Target prediction horizon (seconds in serialized form).
    #[serde(with = "secs")]
    pub look_ahead: Duration,
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            payload_type: PayloadType::Hypersonic,
            payload_mass: 1_000.0,
            max_thrust: 50_000.0,
            specific_impulse: 300.0,
            drag_area: 1.0,
            drag_coefficient: 0.3,
            max_g: 30.0,
            max_mach: 10.0,
            steering_rate: 0.5,
            seeker_fov: 0.1,
            seeker_range: 100_000.0,
            min_intercept_distance: 10.0,
            central_body: CentralBody::Earth,
            gravity_model: GravityModel::PointMass,
            atmosphere_model: AtmosphereModel::Exponential,
            guidance_law: GuidanceLaw::AugmentedProNav,
            update_period: Duration::from_nanos(1_000_000_000 / DEFAULT_UPDATE_RATE_HZ as u64),
            look_ahead: Duration::from_secs(DEFAULT_LOOK_AHEAD_SECS),
        }
    }
}

impl InterceptorConfig {
    /// Guidance update rate in Hz.
    pub fn update_rate_hz(&self) -> f64 {
        1.0 / self.update_period.as_secs_f64()
    }

    /// Maximum commanded acceleration magnitude (m/s²).
    pub fn max_acceleration(&self) -> f64 {
        self.max_g * G0
    }

    /// Copy of this config with zero durations defaulted and non-physical
    /// numeric fields replaced by their defaults.
    pub fn sanitized(&self) -> InterceptorConfig {
        let defaults = InterceptorConfig::default();
        let mut cfg = self.clone();

        if cfg.update_period.is_zero() {
            cfg.update_period = defaults.update_period;
        }
        if cfg.look_ahead.is_zero() {
            cfg.look_ahead = defaults.look_ahead;
        }

        let positive = [
            ("payload_mass", &mut cfg.payload_mass, defaults.payload_mass),
            ("max_thrust", &mut cfg.max_thrust, defaults.max_thrust),
            ("specific_impulse", &mut cfg.specific_impulse, defaults.specific_impulse),
            ("max_g", &mut cfg.max_g, defaults.max_g),
        ];
        for (name, value, default) in positive {
            if !(value.is_finite() && *value > 0.0) {
                log::warn!("interceptor config {name}={value} is not positive, using {default}");
                *value = default;
            }
        }

        let non_negative = [
            ("drag_area", &mut cfg.drag_area, defaults.drag_area),
            ("drag_coefficient", &mut cfg.drag_coefficient, defaults.drag_coefficient),
            ("max_mach", &mut cfg.max_mach, defaults.max_mach),
            ("steering_rate", &mut cfg.steering_rate, defaults.steering_rate),
            ("seeker_fov", &mut cfg.seeker_fov, defaults.seeker_fov),
            ("seeker_range", &mut cfg.seeker_range, defaults.seeker_range),
            (
                "min_intercept_distance",
                &mut cfg.min_intercept_distance,
                defaults.min_intercept_distance,
            ),
        ];
        for (name, value, default) in non_negative {
            if !(value.is_finite() && *value >= 0.0) {
                log::warn!("interceptor config {name}={value} is invalid, using {default}");
                *value = default;
            }
        }

        cfg
    }
}

/// Limits a mission plan must respect. Zero values mean "use the planner default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConstraints {
    #[serde(with = "secs")]
    pub max_flight_time: Duration,
    /// Delta-V budget (m/s).
    pub max_delta_v: f64,
    /// Structural load limit (g).
    pub max_g_load: f64,
    pub min_altitude: f64,
    pub max_altitude: f64,
    pub no_fly_zones: Vec<Vector3D>,
    pub weather_limits: bool,
    pub radiation_limits: bool,
}

/// Knobs of the default intercept-geometry solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// First candidate flight time.
    #[serde(with = "secs")]
    pub min_flight_time: Duration,
    /// Scan step between candidate flight times.
    #[serde(with = "secs")]
    pub time_step: Duration,
    /// Hard cap on candidate evaluations.
    pub max_iterations: usize,
    /// Golden-section steps after the scan.
    pub refine_iterations: usize,
    /// Optional wall-clock budget for one solve.
    #[serde(skip)]
    pub deadline: Option<Duration>,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            min_flight_time: Duration::from_secs(SOLVER_MIN_FLIGHT_TIME_SECS),
            time_step: Duration::from_secs(SOLVER_TIME_STEP_SECS),
            max_iterations: SOLVER_MAX_ITERATIONS,
            refine_iterations: SOLVER_REFINE_ITERATIONS,
            deadline: None,
        }
    }
}

/// Policy constants used when expanding a solution into waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerPolicy {
    /// Delay from launch to the main burn waypoint.
    #[serde(with = "secs")]
    pub burn_offset: Duration,
    /// Share of delta-V spent at the main burn; the rest is reserved for terminal.
    pub burn_fraction: f64,
    pub default_max_delta_v: f64,
    #[serde(with = "secs")]
    pub default_max_flight_time: Duration,
    pub solver: SolverSettings,
}

impl Default for PlannerPolicy {
    fn default() -> Self {
        Self {
            burn_offset: Duration::from_secs(DEFAULT_BURN_OFFSET_SECS),
            burn_fraction: DEFAULT_BURN_FRACTION,
            default_max_delta_v: DEFAULT_MAX_DELTA_V,
            default_max_flight_time: Duration::from_secs(DEFAULT_MAX_FLIGHT_TIME_SECS),
            solver: SolverSettings::default(),
        }
    }
}
