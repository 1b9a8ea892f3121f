//! Guidance system: pushes payload telemetry into each launched payload's
//! interceptor and stores the resulting command.

use hecs::World;

use precision_core::types::OrbitalState;

use crate::components::{Command, Payload, Position, Velocity};

pub fn run(world: &mut World, time: f64) {
    let mut commands = Vec::new();
    for (entity, (payload, pos, vel)) in world.query_mut::<(&Payload, &Position, &Velocity)>() {
        if !payload.launched {
            continue;
        }
        let mut telemetry = OrbitalState::new(pos.0.into(), vel.0.into(), payload.mass);
        telemetry.time = time;
        payload.interceptor.update_payload_state(telemetry);
        commands.push((entity, payload.interceptor.compute_guidance(time)));
    }

    for (entity, command) in commands {
        let _ = world.insert_one(entity, Command(command));
    }
}
