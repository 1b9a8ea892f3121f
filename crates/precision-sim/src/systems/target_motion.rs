//! Scripted target maneuvers: sets each target's acceleration for the tick.

use std::f64::consts::TAU;

use glam::DVec3;
use hecs::World;

use crate::components::{Acceleration, Target, TargetBehavior};

pub fn run(world: &mut World, time: f64) {
    for (_entity, (target, accel)) in world.query_mut::<(&Target, &mut Acceleration)>() {
        accel.0 = behavior_acceleration(&target.behavior, time);
    }
}

pub fn behavior_acceleration(behavior: &TargetBehavior, time: f64) -> DVec3 {
    match *behavior {
        TargetBehavior::Constant => DVec3::ZERO,
        TargetBehavior::Weave {
            acceleration,
            period,
        } => DVec3::from(acceleration) * (TAU * time / period).sin(),
        TargetBehavior::Step { at, acceleration } => {
            if time >= at {
                acceleration.into()
            } else {
                DVec3::ZERO
            }
        }
    }
}
