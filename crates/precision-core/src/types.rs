//! Fundamental geometric and state types.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 3D vector in a Cartesian frame (meters, m/s or m/s² depending on use).
///
/// Engine positions are central-body-centered inertial coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3D {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vector3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vector3D) -> Vector3D {
        Vector3D::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn scale(self, s: f64) -> Vector3D {
        Vector3D::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn magnitude_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn magnitude(self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Unit vector in the same direction.
    ///
    /// A zero-length vector, or one whose length is not finite, normalizes
    /// to the zero vector so NaN never leaks into guidance outputs.
    pub fn normalize(self) -> Vector3D {
        let mag = self.magnitude();
        if !(mag > 0.0 && mag.is_finite()) {
            return Vector3D::ZERO;
        }
        let unit = self.scale(1.0 / mag);
        if unit.is_finite() {
            unit
        } else {
            Vector3D::ZERO
        }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(self, other: Vector3D) -> f64 {
        (other - self).magnitude()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Returns `self` if every component is finite, otherwise the zero vector.
    pub fn finite_or_zero(self) -> Vector3D {
        if self.is_finite() {
            self
        } else {
            Vector3D::ZERO
        }
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    fn add(self, rhs: Vector3D) -> Vector3D {
        Vector3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3D {
    fn add_assign(&mut self, rhs: Vector3D) {
        *self = *self + rhs;
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    fn sub(self, rhs: Vector3D) -> Vector3D {
        Vector3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vector3D {
    fn sub_assign(&mut self, rhs: Vector3D) {
        *self = *self - rhs;
    }
}

impl Neg for Vector3D {
    type Output = Vector3D;

    fn neg(self) -> Vector3D {
        Vector3D::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vector3D {
    type Output = Vector3D;

    fn mul(self, rhs: f64) -> Vector3D {
        self.scale(rhs)
    }
}

impl From<DVec3> for Vector3D {
    fn from(v: DVec3) -> Self {
        Vector3D::new(v.x, v.y, v.z)
    }
}

impl From<Vector3D> for DVec3 {
    fn from(v: Vector3D) -> Self {
        DVec3::new(v.x, v.y, v.z)
    }
}

/// Kinematic state of the guided payload, as reported by its telemetry feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrbitalState {
    pub position: Vector3D,
    pub velocity: Vector3D,
    /// Current mass (kg).
    pub mass: f64,
    /// Telemetry time (seconds, mission clock).
    #[serde(default)]
    pub time: f64,
}

impl OrbitalState {
    pub fn new(position: Vector3D, velocity: Vector3D, mass: f64) -> Self {
        Self {
            position,
            velocity,
            mass,
            time: 0.0,
        }
    }

    /// Position, velocity and mass are all finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.mass.is_finite()
    }

    /// Altitude above a spherical central body of the given radius (meters).
    pub fn altitude(&self, body_radius: f64) -> f64 {
        self.position.magnitude() - body_radius
    }
}

/// Snapshot of a target's kinematic state at one instant.
///
/// Produced by observation feeds and by the tracker; always copied, never shared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetState {
    pub position: Vector3D,
    pub velocity: Vector3D,
    #[serde(default)]
    pub acceleration: Vector3D,
    /// Observation time (seconds, mission clock). Non-finite means "unknown".
    pub timestamp: f64,
    /// Confidence in this state (0.0 - 1.0).
    pub confidence: f64,
}

impl Default for TargetState {
    fn default() -> Self {
        Self {
            position: Vector3D::ZERO,
            velocity: Vector3D::ZERO,
            acceleration: Vector3D::ZERO,
            timestamp: 0.0,
            confidence: 1.0,
        }
    }
}

impl TargetState {
    pub fn new(position: Vector3D, velocity: Vector3D, acceleration: Vector3D, timestamp: f64) -> Self {
        Self {
            position,
            velocity,
            acceleration,
            timestamp,
            confidence: 1.0,
        }
    }

    /// Position, velocity and acceleration are all finite. The timestamp is
    /// checked separately because a missing timestamp is tolerated.
    pub fn has_finite_kinematics(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.acceleration.is_finite()
    }

    /// Constant-acceleration extrapolation by `dt` seconds.
    pub fn extrapolate(&self, dt: f64) -> TargetState {
        TargetState {
            position: self.position + self.velocity * dt + self.acceleration * (0.5 * dt * dt),
            velocity: self.velocity + self.acceleration * dt,
            acceleration: self.acceleration,
            timestamp: self.timestamp + dt,
            confidence: self.confidence,
        }
    }
}
