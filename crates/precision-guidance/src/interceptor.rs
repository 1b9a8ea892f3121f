//! The precision interceptor: owns a target tracker and turns payload
//! telemetry plus the current target estimate into guidance commands.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use precision_core::config::{secs, InterceptorConfig};
use precision_core::constants::*;
use precision_core::enums::TargetType;
use precision_core::gravity::calculate_gravity;
use precision_core::types::{OrbitalState, TargetState, Vector3D};

use crate::laws::{self, GuidanceGeometry};
use crate::tracker::TargetTracker;

/// One guidance output, consumed by the actuation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuidanceCommand {
    /// Commanded acceleration including gravity compensation (m/s²).
    pub accel_command: Vector3D,
    /// Unit thrust direction.
    pub thrust_vector: Vector3D,
    /// Throttle, 0.0 - 1.0.
    pub thrust_level: f64,
    #[serde(with = "secs")]
    pub time_to_go: Duration,
    /// Predicted miss distance at `time_to_go` (m).
    pub predicted_miss: f64,
    pub confidence: f64,
    pub timestamp: f64,
}

/// Running engagement metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InterceptorMetrics {
    pub miss_distance: f64,
    #[serde(with = "secs")]
    pub time_to_intercept: Duration,
    pub delta_v_used: f64,
    pub max_g_experienced: f64,
    pub guidance_updates: u64,
    pub maneuvers_detected: u32,
    pub final_closing_speed: f64,
}

#[derive(Debug)]
struct GuidanceState {
    payload: OrbitalState,
    metrics: InterceptorMetrics,
    last_guidance_time: Option<f64>,
}

/// Guided payload controller. All methods take `&self`; share it across
/// threads behind an `Arc`.
#[derive(Debug)]
pub struct PrecisionInterceptor {
    config: InterceptorConfig,
    tracker: TargetTracker,
    state: RwLock<GuidanceState>,
}

impl PrecisionInterceptor {
    pub fn new(config: InterceptorConfig) -> Self {
        Self::with_target(config, "target", TargetType::default())
    }

    pub fn with_target(
        config: InterceptorConfig,
        target_id: impl Into<String>,
        target_type: TargetType,
    ) -> Self {
        let config = config.sanitized();
        let payload = OrbitalState {
            mass: config.payload_mass,
            ..Default::default()
        };
        log::debug!(
            "interceptor ready: {} payload, {} guidance at {:.0} Hz",
            config.payload_type,
            config.guidance_law,
            config.update_rate_hz()
        );
        Self {
            tracker: TargetTracker::new(target_id, target_type),
            state: RwLock::new(GuidanceState {
                payload,
                metrics: InterceptorMetrics::default(),
                last_guidance_time: None,
            }),
            config,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, GuidanceState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, GuidanceState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &InterceptorConfig {
        &self.config
    }

    pub fn tracker(&self) -> &TargetTracker {
        &self.tracker
    }

    /// Replace the payload telemetry. Non-finite states are ignored.
    pub fn update_payload_state(&self, state: OrbitalState) {
        if !state.is_finite() {
            log::warn!("rejected non-finite payload state");
            return;
        }
        self.write().payload = state;
    }

    pub fn update_target_observation(&self, observation: TargetState) {
        self.tracker.update_target(observation);
    }

    /// Run one guidance cycle at mission time `now` (seconds).
    pub fn compute_guidance(&self, now: f64) -> GuidanceCommand {
        let mut state = self.write();
        let track = self.tracker.snapshot();
        let payload = state.payload;
        let target = track.state;

        let geometry = GuidanceGeometry::from_states(payload.position, payload.velocity, &target);
        let steering = clamp_magnitude(
            laws::compute(self.config.guidance_law, &geometry),
            self.config.max_acceleration(),
        );
        let gravity = calculate_gravity(
            payload.position,
            self.config.gravity_model,
            self.config.central_body,
        );
        // Gravity compensation shares the same acceleration budget as steering.
        let accel_command = clamp_magnitude(
            (steering - gravity).finite_or_zero(),
            self.config.max_acceleration(),
        );

        let tgo = geometry.time_to_go;
        let time_to_go = Duration::try_from_secs_f64(tgo)
            .unwrap_or(Duration::from_secs(NOT_CLOSING_TIME_TO_GO_SECS));
        let predicted_miss = predict_miss(&payload, &target, tgo);

        let mass = if payload.mass > 0.0 {
            payload.mass
        } else {
            self.config.payload_mass
        };
        let thrust_level = if self.config.max_thrust > 0.0 {
            (accel_command.magnitude() * mass / self.config.max_thrust).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let thrust_level = if thrust_level.is_finite() { thrust_level } else { 0.0 };

        let dt = match state.last_guidance_time {
            Some(prev) if now - prev > 0.0 => now - prev,
            _ => self.config.update_period.as_secs_f64(),
        };
        if now.is_finite() {
            state.last_guidance_time = Some(now);
        }

        let steering_mag = steering.magnitude();
        let metrics = &mut state.metrics;
        metrics.guidance_updates += 1;
        metrics.miss_distance = predicted_miss;
        metrics.time_to_intercept = time_to_go;
        metrics.final_closing_speed = geometry.closing_speed;
        metrics.delta_v_used += steering_mag * dt;
        metrics.max_g_experienced = metrics.max_g_experienced.max(steering_mag / G0);
        metrics.maneuvers_detected = track.maneuvers_detected;

        GuidanceCommand {
            accel_command,
            thrust_vector: accel_command.normalize(),
            thrust_level,
            time_to_go,
            predicted_miss,
            confidence: if track.observations == 0 {
                0.0
            } else {
                target.confidence
            },
            timestamp: if now.is_finite() { now } else { payload.time },
        }
    }

    pub fn metrics(&self) -> InterceptorMetrics {
        self.read().metrics
    }

    pub fn payload_state(&self) -> OrbitalState {
        self.read().payload
    }

    pub fn target_state(&self) -> TargetState {
        self.tracker.current_state()
    }

    /// Target estimate projected over the configured look-ahead horizon.
    pub fn predicted_target_state(&self) -> TargetState {
        self.tracker.predicted_state(self.config.look_ahead)
    }

    pub fn maneuver_probability(&self) -> f64 {
        self.tracker.maneuver_probability()
    }
}

fn clamp_magnitude(v: Vector3D, max: f64) -> Vector3D {
    let mag = v.magnitude();
    if mag > max && mag > 0.0 {
        v.scale(max / mag)
    } else {
        v
    }
}

/// Miss distance at `tgo` with the payload coasting and the target
/// keeping its current acceleration.
fn predict_miss(payload: &OrbitalState, target: &TargetState, tgo: f64) -> f64 {
    if !(tgo > 0.0) {
        return 0.0;
    }
    let payload_future = payload.position + payload.velocity.scale(tgo);
    let target_future = target.extrapolate(tgo).position;
    let miss = payload_future.distance_to(target_future);
    if miss.is_finite() {
        miss
    } else {
        0.0
    }
}
