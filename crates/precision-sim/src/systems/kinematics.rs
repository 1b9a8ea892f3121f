//! Kinematic integration (semi-implicit Euler).
//!
//! Targets fly their scripted acceleration. Launched payloads fly their
//! thrust plus gravity plus drag and burn propellant at the configured
//! specific impulse; payloads still on the rail do not move.
//!
//! Thrust is bounded three ways: by `max_thrust` over the current mass, by
//! `steering_rate` (the lateral part may turn the velocity at most that many
//! rad/s), and by `max_mach` (no forward thrust at or above it). A zero
//! steering rate or Mach limit disables that bound.

use glam::DVec3;
use hecs::World;

use precision_core::atmosphere::{calculate_drag, drag_coefficient, mach_number};
use precision_core::config::InterceptorConfig;
use precision_core::constants::{G0, SIM_MIN_MASS_FRACTION};
use precision_core::enums::CentralBody;
use precision_core::gravity::calculate_gravity;
use precision_core::types::Vector3D;

use crate::components::{Acceleration, Command, Payload, Position, Target, Velocity};

pub fn run(world: &mut World, dt: f64) {
    for (_entity, (_target, pos, vel, acc)) in
        world.query_mut::<(&Target, &mut Position, &mut Velocity, &Acceleration)>()
    {
        vel.0 += acc.0 * dt;
        pos.0 += vel.0 * dt;
    }

    for (_entity, (payload, pos, vel, acc, command)) in world.query_mut::<(
        &mut Payload,
        &mut Position,
        &mut Velocity,
        &mut Acceleration,
        Option<&Command>,
    )>() {
        if !payload.launched {
            continue;
        }
        let config = payload.interceptor.config();
        let commanded = command.map_or(DVec3::ZERO, |c| DVec3::from(c.0.accel_command));
        let thrust_accel = limit_thrust(
            commanded.clamp_length_max(config.max_thrust / payload.mass),
            pos.0,
            vel.0,
            config,
        );
        let gravity: DVec3 = calculate_gravity(
            Vector3D::from(pos.0),
            config.gravity_model,
            config.central_body,
        )
        .into();
        let drag = drag_accel(pos.0, vel.0, payload.mass, config);

        acc.0 = thrust_accel + gravity + drag;
        vel.0 += acc.0 * dt;
        pos.0 += vel.0 * dt;

        let thrust = thrust_accel.length() * payload.mass;
        let burned = thrust / (config.specific_impulse * G0) * dt;
        payload.mass = (payload.mass - burned).max(payload.launch_mass * SIM_MIN_MASS_FRACTION);
    }
}

fn altitude(pos: DVec3, config: &InterceptorConfig) -> f64 {
    pos.length() - config.central_body.parameters().mean_radius
}

/// Apply the steering-rate and Mach bounds to a thrust acceleration.
fn limit_thrust(thrust: DVec3, pos: DVec3, vel: DVec3, config: &InterceptorConfig) -> DVec3 {
    let speed = vel.length();
    if speed < 1.0 {
        return thrust;
    }
    let heading = vel / speed;
    let mut along = heading * thrust.dot(heading);
    let mut lateral = thrust - along;

    if config.steering_rate > 0.0 {
        lateral = lateral.clamp_length_max(config.steering_rate * speed);
    }
    if config.max_mach > 0.0
        && config.central_body == CentralBody::Earth
        && along.dot(heading) > 0.0
        && mach_number(speed, altitude(pos, config)) >= config.max_mach
    {
        along = DVec3::ZERO;
    }
    along + lateral
}

/// Aerodynamic drag. Only the Earth has an atmosphere here.
fn drag_accel(pos: DVec3, vel: DVec3, mass: f64, config: &InterceptorConfig) -> DVec3 {
    if config.central_body != CentralBody::Earth || config.drag_area <= 0.0 {
        return DVec3::ZERO;
    }
    let cd = drag_coefficient(vel.length(), altitude(pos, config), config.drag_coefficient);
    calculate_drag(
        vel.into(),
        pos.into(),
        mass,
        config.drag_area,
        cd,
        config.atmosphere_model,
    )
    .into()
}
