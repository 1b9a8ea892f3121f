//! Gravitational acceleration of the central body.
//!
//! Point-mass field with optional zonal harmonics (J2, J3, J4). The guidance
//! loop subtracts this from its steering command so thrust also cancels gravity.

use crate::constants::*;
use crate::enums::{CentralBody, GravityModel};
use crate::types::Vector3D;

/// Physical parameters of a central body's gravity field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyParameters {
    /// Standard gravitational parameter (m³/s²).
    pub gm: f64,
    /// Reference radius for the harmonics (meters).
    pub reference_radius: f64,
    /// Mean radius (meters).
    pub mean_radius: f64,
    pub j2: f64,
    pub j3: f64,
    pub j4: f64,
}

impl CentralBody {
    pub fn parameters(self) -> BodyParameters {
        match self {
            CentralBody::Earth => BodyParameters {
                gm: GM_EARTH,
                reference_radius: EARTH_EQUATORIAL_RADIUS,
                mean_radius: R_EARTH,
                j2: EARTH_J2,
                j3: EARTH_J3,
                j4: EARTH_J4,
            },
            CentralBody::Moon => BodyParameters {
                gm: GM_MOON,
                reference_radius: R_MOON,
                mean_radius: R_MOON,
                j2: 0.0,
                j3: 0.0,
                j4: 0.0,
            },
            CentralBody::Mars => BodyParameters {
                gm: GM_MARS,
                reference_radius: R_MARS,
                mean_radius: R_MARS,
                j2: MARS_J2,
                j3: 0.0,
                j4: 0.0,
            },
        }
    }
}

/// Gravitational acceleration (m/s²) at `position`, relative to the body's center.
///
/// Returns the zero vector at the body's center or for non-finite positions.
pub fn calculate_gravity(position: Vector3D, model: GravityModel, body: CentralBody) -> Vector3D {
    let r = position.magnitude();
    if !(r > 0.0 && r.is_finite()) {
        return Vector3D::ZERO;
    }

    let p = body.parameters();
    let r2 = r * r;
    let r3 = r2 * r;
    let point_mass = position * (-p.gm / r3);

    if model == GravityModel::PointMass {
        return point_mass;
    }

    let (x, y, z) = (position.x, position.y, position.z);
    let z2 = z * z;
    let r5 = r3 * r2;
    let re2 = p.reference_radius * p.reference_radius;

    // J2 oblateness
    let k2 = 1.5 * p.j2 * p.gm * re2 / r5;
    let s2 = 5.0 * z2 / r2;
    let j2 = Vector3D::new(k2 * x * (s2 - 1.0), k2 * y * (s2 - 1.0), k2 * z * (s2 - 3.0));

    if model == GravityModel::J2 {
        return point_mass + j2;
    }

    let r7 = r5 * r2;
    let re3 = re2 * p.reference_radius;
    let re4 = re3 * p.reference_radius;
    let z3 = z2 * z;
    let z4 = z2 * z2;
    let r4 = r2 * r2;

    // J3 pear-shape term
    let k3 = 2.5 * p.j3 * p.gm * re3 / r7;
    let s3 = 7.0 * z3 / r2 - 3.0 * z;
    let j3 = Vector3D::new(
        k3 * x * s3,
        k3 * y * s3,
        -k3 * (6.0 * z2 - 7.0 * z4 / r2 - 0.6 * r2),
    );

    // J4
    let k4 = 5.0 / 8.0 * p.j4 * p.gm * re4 / r7;
    let s4 = 3.0 - 42.0 * z2 / r2 + 63.0 * z4 / r4;
    let j4 = Vector3D::new(
        k4 * x * s4,
        k4 * y * s4,
        k4 * z * (15.0 - 70.0 * z2 / r2 + 63.0 * z4 / r4),
    );

    point_mass + j2 + j3 + j4
}
