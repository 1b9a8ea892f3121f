//! Target tracking: a 9-state constant-acceleration Kalman filter plus a
//! bounded observation history and a maneuver-probability signal.
//!
//! The filter keeps only the covariance diagonal. Cross-axis terms are never
//! populated, so the gain reduces to a per-state scalar.

use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use precision_core::constants::*;
use precision_core::enums::TargetType;
use precision_core::types::{TargetState, Vector3D};

const N: usize = TRACKER_STATE_DIM;

/// Diagonal-gain Kalman filter over `[px,py,pz,vx,vy,vz,ax,ay,az]`.
#[derive(Debug, Clone, PartialEq)]
pub struct KalmanFilter {
    state: [f64; N],
    covariance: [[f64; N]; N],
    process_noise: [[f64; N]; N],
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl KalmanFilter {
    pub fn new() -> Self {
        let mut covariance = [[0.0; N]; N];
        let mut process_noise = [[0.0; N]; N];
        for i in 0..N {
            covariance[i][i] = TRACKER_INITIAL_VARIANCE;
            process_noise[i][i] = match i / 3 {
                0 => PROCESS_NOISE_POSITION,
                1 => PROCESS_NOISE_VELOCITY,
                _ => PROCESS_NOISE_ACCELERATION,
            };
        }
        Self {
            state: [0.0; N],
            covariance,
            process_noise,
        }
    }

    /// Constant-acceleration time update. `dt == 0` leaves the filter unchanged.
    pub fn predict(&mut self, dt: f64) {
        let half_dt2 = 0.5 * dt * dt;
        for axis in 0..3 {
            let (p, v, a) = (axis, axis + 3, axis + 6);
            self.state[p] += self.state[v] * dt + self.state[a] * half_dt2;
            self.state[v] += self.state[a] * dt;
        }
        for i in 0..N {
            self.covariance[i][i] += self.process_noise[i][i] * dt;
        }
    }

    /// Measurement update with an observed `[position, velocity]` vector.
    /// Acceleration states are only moved by `predict`.
    pub fn update(&mut self, measurement: &[f64; TRACKER_OBSERVED_DIM]) {
        for (i, z) in measurement.iter().enumerate() {
            let r = if i < 3 {
                MEASUREMENT_VARIANCE_POSITION
            } else {
                MEASUREMENT_VARIANCE_VELOCITY
            };
            let p = self.covariance[i][i];
            let gain = p / (p + r);
            self.state[i] += gain * (z - self.state[i]);
            self.covariance[i][i] = ((1.0 - gain) * p).max(0.0);
        }
    }

    pub fn state(&self) -> [f64; N] {
        self.state
    }

    pub fn covariance_diagonal(&self) -> [f64; N] {
        let mut diag = [0.0; N];
        for (i, d) in diag.iter_mut().enumerate() {
            *d = self.covariance[i][i];
        }
        diag
    }

    pub fn position(&self) -> Vector3D {
        Vector3D::new(self.state[0], self.state[1], self.state[2])
    }

    pub fn velocity(&self) -> Vector3D {
        Vector3D::new(self.state[3], self.state[4], self.state[5])
    }

    pub fn acceleration(&self) -> Vector3D {
        Vector3D::new(self.state[6], self.state[7], self.state[8])
    }
}

/// Consistent view of a track taken under a single read lock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSnapshot {
    pub state: TargetState,
    pub maneuver_probability: f64,
    pub maneuvers_detected: u32,
    pub observations: usize,
}

#[derive(Debug)]
struct Track {
    filter: KalmanFilter,
    history: VecDeque<TargetState>,
    maneuver_probability: f64,
    maneuvers_detected: u32,
    last_maneuver_time: Option<f64>,
    last_timestamp: Option<f64>,
    observations: usize,
}

impl Track {
    fn new() -> Self {
        Self {
            filter: KalmanFilter::new(),
            history: VecDeque::with_capacity(TRACKER_HISTORY_LEN),
            maneuver_probability: 0.0,
            maneuvers_detected: 0,
            last_maneuver_time: None,
            last_timestamp: None,
            observations: 0,
        }
    }

    fn current_state(&self) -> TargetState {
        TargetState {
            position: self.filter.position(),
            velocity: self.filter.velocity(),
            acceleration: self.filter.acceleration(),
            timestamp: self.last_timestamp.unwrap_or(0.0),
            confidence: 1.0,
        }
    }

    fn detect_maneuver(&mut self) {
        let n = self.history.len();
        if n < 2 {
            return;
        }
        let newest = self.history[n - 1];
        let previous = self.history[n - 2];
        let accel_change = (newest.acceleration - previous.acceleration).magnitude();

        if accel_change > MANEUVER_ACCEL_THRESHOLD {
            self.maneuver_probability = (self.maneuver_probability + MANEUVER_PROBABILITY_GAIN).min(1.0);
            self.maneuvers_detected += 1;
            self.last_maneuver_time = Some(self.last_timestamp.unwrap_or(0.0));
            log::debug!(
                "maneuver detected: accel change {accel_change:.1} m/s², probability {:.2}",
                self.maneuver_probability
            );
        } else {
            self.maneuver_probability = (self.maneuver_probability - MANEUVER_PROBABILITY_DECAY).max(0.0);
        }
    }
}

/// Tracks one target. Single writer (`update_target`), any number of readers.
///
/// Not `Clone`: a tracker is owned by exactly one interceptor.
#[derive(Debug)]
pub struct TargetTracker {
    target_id: String,
    target_type: TargetType,
    track: RwLock<Track>,
}

impl TargetTracker {
    pub fn new(target_id: impl Into<String>, target_type: TargetType) -> Self {
        Self {
            target_id: target_id.into(),
            target_type,
            track: RwLock::new(Track::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Track> {
        self.track.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Track> {
        self.track.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn target_type(&self) -> TargetType {
        self.target_type
    }

    /// Fold one observation into the track.
    ///
    /// Observations with non-finite kinematics are dropped. A missing,
    /// non-finite, duplicate or out-of-order timestamp falls back to the
    /// default time step.
    pub fn update_target(&self, observation: TargetState) {
        if !observation.has_finite_kinematics() {
            log::warn!("target {}: rejected non-finite observation", self.target_id);
            return;
        }

        let mut track = self.write();

        let timestamp = observation.timestamp.is_finite().then_some(observation.timestamp);
        let dt = match (track.last_timestamp, timestamp) {
            (Some(prev), Some(now)) if now - prev > 0.0 => now - prev,
            _ => TRACKER_DEFAULT_DT,
        };
        if let Some(now) = timestamp {
            track.last_timestamp = Some(now);
        }

        if track.history.len() == TRACKER_HISTORY_LEN {
            track.history.pop_front();
        }
        track.history.push_back(observation);
        track.observations += 1;

        let measurement = [
            observation.position.x,
            observation.position.y,
            observation.position.z,
            observation.velocity.x,
            observation.velocity.y,
            observation.velocity.z,
        ];
        track.filter.predict(dt);
        track.filter.update(&measurement);
        track.detect_maneuver();
    }

    /// Current filter estimate, confidence 1.0, stamped with the last observation time.
    pub fn current_state(&self) -> TargetState {
        self.read().current_state()
    }

    /// Estimate projected `ahead` into the future with confidence decaying 10% per second.
    pub fn predicted_state(&self, ahead: Duration) -> TargetState {
        let secs = ahead.as_secs_f64();
        let mut predicted = self.current_state().extrapolate(secs);
        predicted.confidence = (1.0 - PREDICTION_CONFIDENCE_DECAY * secs).max(0.0);
        predicted
    }

    /// Projections every `step` out to `horizon`, inclusive, at most
    /// `TRACKER_MAX_PATH_SAMPLES` of them. Empty for a zero step.
    pub fn predicted_path(&self, horizon: Duration, step: Duration) -> Vec<TargetState> {
        if step.is_zero() {
            return Vec::new();
        }
        let current = self.current_state();
        let step_secs = step.as_secs_f64();
        let count =
            ((horizon.as_secs_f64() / step_secs).floor() as usize).min(TRACKER_MAX_PATH_SAMPLES);
        (1..=count)
            .map(|i| {
                let secs = step_secs * i as f64;
                let mut s = current.extrapolate(secs);
                s.confidence = (1.0 - PREDICTION_CONFIDENCE_DECAY * secs).max(0.0);
                s
            })
            .collect()
    }

    pub fn snapshot(&self) -> TrackSnapshot {
        let track = self.read();
        TrackSnapshot {
            state: track.current_state(),
            maneuver_probability: track.maneuver_probability,
            maneuvers_detected: track.maneuvers_detected,
            observations: track.observations,
        }
    }

    pub fn maneuver_probability(&self) -> f64 {
        self.read().maneuver_probability
    }

    /// Number of observations that tripped the maneuver threshold.
    pub fn maneuvers_detected(&self) -> u32 {
        self.read().maneuvers_detected
    }

    pub fn last_maneuver_time(&self) -> Option<f64> {
        self.read().last_maneuver_time
    }

    pub fn history_len(&self) -> usize {
        self.read().history.len()
    }

    /// Total observations accepted, including those evicted from history.
    pub fn observation_count(&self) -> usize {
        self.read().observations
    }

    pub fn covariance_diagonal(&self) -> [f64; N] {
        self.read().filter.covariance_diagonal()
    }
}
