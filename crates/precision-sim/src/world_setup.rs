//! Entity spawn factories for setting up the engagement world.

use std::sync::Arc;

use glam::DVec3;
use hecs::World;

use precision_guidance::PrecisionInterceptor;

use crate::components::*;
use crate::scenario::Scenario;

/// Spawn the scenario's target and payload. Returns `(payload, target)`.
pub fn setup_engagement(
    world: &mut World,
    scenario: &Scenario,
    interceptor: Arc<PrecisionInterceptor>,
) -> (hecs::Entity, hecs::Entity) {
    let target = spawn_target(world, scenario);
    let payload = spawn_payload(world, scenario, interceptor, target);
    (payload, target)
}

pub fn spawn_target(world: &mut World, scenario: &Scenario) -> hecs::Entity {
    let setup = &scenario.target;
    world.spawn((
        Target {
            id: setup.id.clone(),
            behavior: setup.behavior,
        },
        Position(setup.position.into()),
        Velocity(setup.velocity.into()),
        Acceleration(DVec3::ZERO),
    ))
}

/// Spawn the payload on its rail. It holds position until launch.
pub fn spawn_payload(
    world: &mut World,
    scenario: &Scenario,
    interceptor: Arc<PrecisionInterceptor>,
    target: hecs::Entity,
) -> hecs::Entity {
    let mass = interceptor.config().payload_mass;
    world.spawn((
        Payload {
            interceptor,
            target,
            launch_mass: mass,
            mass,
            launched: false,
        },
        Position(scenario.payload.position.into()),
        Velocity(scenario.payload.velocity.into()),
        Acceleration(DVec3::ZERO),
        scenario.seeker,
        MissTracker::default(),
    ))
}
