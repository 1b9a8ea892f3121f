//! Sensor system: observes each payload's target and feeds the tracker.
//!
//! On the rail the launch platform cues the tracker with no envelope. After
//! launch only the payload's seeker observes, and only targets inside its
//! range and its field of view about the velocity vector. Outside that the
//! tracker coasts on its last estimate.
//!
//! Observations carry the target's true acceleration. Position and velocity
//! get uniform per-axis noise from the payload's seeker.

use std::collections::HashMap;

use glam::DVec3;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use precision_core::types::TargetState;

use crate::components::{Acceleration, Payload, Position, Seeker, Target, Velocity};

pub fn run(world: &mut World, rng: &mut ChaCha8Rng, time: f64) {
    let truth: HashMap<hecs::Entity, (DVec3, DVec3, DVec3)> = world
        .query::<(&Target, &Position, &Velocity, &Acceleration)>()
        .iter()
        .map(|(entity, (_t, pos, vel, acc))| (entity, (pos.0, vel.0, acc.0)))
        .collect();

    for (_entity, (payload, seeker, own_pos, own_vel)) in
        world.query_mut::<(&Payload, &Seeker, &Position, &Velocity)>()
    {
        let Some(&(pos, vel, acc)) = truth.get(&payload.target) else {
            continue;
        };
        if payload.launched {
            let config = payload.interceptor.config();
            if !in_envelope(config.seeker_range, config.seeker_fov, own_pos.0, own_vel.0, pos) {
                continue;
            }
        }
        let observation = TargetState::new(
            (pos + noise(rng, seeker.position_noise)).into(),
            (vel + noise(rng, seeker.velocity_noise)).into(),
            acc.into(),
            time,
        );
        payload.interceptor.update_target_observation(observation);
    }
}

/// Whether `target` lies within `range` of `origin` and within half of
/// `fov` (radians) of `boresight`. A zero range or field of view disables
/// that limit.
pub fn in_envelope(range: f64, fov: f64, origin: DVec3, boresight: DVec3, target: DVec3) -> bool {
    let los = target - origin;
    let distance = los.length();
    if range > 0.0 && distance > range {
        return false;
    }
    if fov > 0.0 && distance > 0.0 && boresight.length_squared() > 0.0 {
        return boresight.angle_between(los) <= 0.5 * fov;
    }
    true
}

fn noise(rng: &mut ChaCha8Rng, bound: f64) -> DVec3 {
    if bound <= 0.0 {
        return DVec3::ZERO;
    }
    DVec3::new(
        rng.gen_range(-bound..=bound),
        rng.gen_range(-bound..=bound),
        rng.gen_range(-bound..=bound),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;

    use super::*;
    use precision_core::config::InterceptorConfig;
    use precision_guidance::PrecisionInterceptor;

    #[test]
    fn test_envelope_range_and_cone() {
        let origin = DVec3::ZERO;
        let ahead = DVec3::new(0.0, 100.0, 0.0);
        // 0.2 rad cone: ±0.1 rad about the boresight
        assert!(in_envelope(5_000.0, 0.2, origin, ahead, DVec3::new(0.0, 4_000.0, 300.0)));
        assert!(!in_envelope(5_000.0, 0.2, origin, ahead, DVec3::new(0.0, 4_000.0, 600.0)));
        assert!(!in_envelope(5_000.0, 0.2, origin, ahead, DVec3::new(0.0, 6_000.0, 0.0)));
        assert!(!in_envelope(5_000.0, 0.2, origin, ahead, DVec3::new(0.0, -1_000.0, 0.0)));
        // Zero limits see everything
        assert!(in_envelope(0.0, 0.0, origin, ahead, DVec3::new(0.0, -1e9, 0.0)));
    }

    fn world_with(launched: bool, target_at: DVec3) -> (World, Arc<PrecisionInterceptor>) {
        let mut world = World::new();
        let interceptor = Arc::new(PrecisionInterceptor::new(InterceptorConfig {
            seeker_range: 10_000.0,
            seeker_fov: 0.5,
            ..Default::default()
        }));
        let target = world.spawn((
            Target {
                id: "t".into(),
                behavior: Default::default(),
            },
            Position(target_at),
            Velocity(DVec3::ZERO),
            Acceleration(DVec3::ZERO),
        ));
        world.spawn((
            Payload {
                interceptor: Arc::clone(&interceptor),
                target,
                launch_mass: 1_000.0,
                mass: 1_000.0,
                launched,
            },
            Seeker::default(),
            Position(DVec3::ZERO),
            Velocity(DVec3::new(300.0, 0.0, 0.0)),
        ));
        (world, interceptor)
    }

    #[test]
    fn test_seeker_blind_outside_cone_after_launch() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        // Target abeam of the payload
        let abeam = DVec3::new(0.0, 2_000.0, 0.0);

        let (mut world, interceptor) = world_with(true, abeam);
        run(&mut world, &mut rng, 0.0);
        assert_eq!(interceptor.tracker().observation_count(), 0);

        // On the rail the platform still cues the tracker
        let (mut world, interceptor) = world_with(false, abeam);
        run(&mut world, &mut rng, 0.0);
        assert_eq!(interceptor.tracker().observation_count(), 1);
    }

    #[test]
    fn test_seeker_observes_target_ahead() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (mut world, interceptor) = world_with(true, DVec3::new(5_000.0, 100.0, 0.0));
        run(&mut world, &mut rng, 0.0);
        run(&mut world, &mut rng, 0.01);
        assert_eq!(interceptor.tracker().observation_count(), 2);
    }
}
