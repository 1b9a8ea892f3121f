//! Earth atmosphere: density, speed of sound and aerodynamic drag.

use crate::constants::*;
use crate::enums::AtmosphereModel;
use crate::types::Vector3D;

/// One layer of the 1976 standard atmosphere.
struct Layer {
    /// Base geopotential altitude (km).
    base: f64,
    /// Base temperature (K).
    temperature: f64,
    /// Lapse rate (K/km).
    lapse: f64,
    /// Base density (kg/m³).
    density: f64,
}

static US76_LAYERS: [Layer; 8] = [
    Layer { base: 0.0, temperature: 288.15, lapse: -6.5, density: 1.225 },
    Layer { base: 11.0, temperature: 216.65, lapse: 0.0, density: 0.363_91 },
    Layer { base: 20.0, temperature: 216.65, lapse: 1.0, density: 0.088_03 },
    Layer { base: 32.0, temperature: 228.65, lapse: 2.8, density: 0.013_22 },
    Layer { base: 47.0, temperature: 270.65, lapse: 0.0, density: 0.001_43 },
    Layer { base: 51.0, temperature: 270.65, lapse: -2.8, density: 0.000_86 },
    Layer { base: 71.0, temperature: 214.65, lapse: -2.0, density: 0.000_064 },
    Layer { base: 86.0, temperature: 186.95, lapse: 0.0, density: 0.000_003_7 },
];

/// Air density (kg/m³) at `altitude` meters. Negative altitudes read as sea level.
pub fn atmospheric_density(altitude: f64, model: AtmosphereModel) -> f64 {
    let altitude = if altitude.is_nan() { 0.0 } else { altitude.max(0.0) };
    if altitude > ATMOSPHERE_CEILING {
        return VACUUM_DENSITY;
    }
    match model {
        AtmosphereModel::Exponential => {
            SEA_LEVEL_DENSITY * (-altitude / ATMOSPHERE_SCALE_HEIGHT).exp()
        }
        AtmosphereModel::Us76 => us76_density(altitude),
    }
}

fn us76_density(altitude: f64) -> f64 {
    let km = altitude / 1_000.0;
    let layer = US76_LAYERS
        .iter()
        .rev()
        .find(|l| km >= l.base)
        .unwrap_or(&US76_LAYERS[0]);
    let dh = km - layer.base;

    if layer.lapse == 0.0 {
        layer.density * (-US76_HYDROSTATIC_CONSTANT * dh / layer.temperature).exp()
    } else {
        let t = layer.temperature + layer.lapse * dh;
        layer.density * (t / layer.temperature).powf(-1.0 - US76_HYDROSTATIC_CONSTANT / layer.lapse)
    }
}

/// Speed of sound (m/s), falling with altitude down to ~70% of sea level.
pub fn speed_of_sound(altitude: f64) -> f64 {
    let ratio = 1.0 - altitude.max(0.0) / (100.0 * ATMOSPHERE_SCALE_HEIGHT);
    SPEED_OF_SOUND_SEA_LEVEL * ratio.max(0.5).sqrt()
}

pub fn mach_number(speed: f64, altitude: f64) -> f64 {
    speed / speed_of_sound(altitude)
}

/// Drag coefficient at `speed`, scaled from the subsonic `base_cd` through
/// the transonic rise and the supersonic fall-off.
pub fn drag_coefficient(speed: f64, altitude: f64, base_cd: f64) -> f64 {
    let mach = mach_number(speed, altitude);
    let factor = if mach < 0.8 {
        1.0
    } else if mach < 1.2 {
        1.0 + 0.5 * (mach - 0.8) / 0.4
    } else if mach < 5.0 {
        1.5 - 0.1 * (mach - 1.2)
    } else {
        1.1 + 0.05 * mach.ln()
    };
    base_cd * factor
}

/// Drag acceleration (m/s²) opposing `velocity` for a body of `mass` kg with
/// reference `area` m² and drag coefficient `cd`. `position` is relative to
/// the Earth's center; the air is taken as at rest in that frame.
pub fn calculate_drag(
    velocity: Vector3D,
    position: Vector3D,
    mass: f64,
    area: f64,
    cd: f64,
    model: AtmosphereModel,
) -> Vector3D {
    let speed = velocity.magnitude();
    if !(speed > 0.0 && mass > 0.0) {
        return Vector3D::ZERO;
    }
    let altitude = position.magnitude() - R_EARTH;
    let rho = atmospheric_density(altitude, model);
    let force = 0.5 * rho * speed * speed * cd * area;
    let drag = velocity.normalize().scale(-force / mass);
    if drag.is_finite() {
        drag
    } else {
        Vector3D::ZERO
    }
}
