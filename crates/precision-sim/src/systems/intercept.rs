//! Intercept evaluation: tracks the closest approach of each launched
//! payload to its target and decides the engagement outcome.
//!
//! The closest approach is solved analytically over each tick's straight
//! segment, so a fast pass between two samples is still scored.

use glam::DVec3;
use hecs::World;

use crate::components::{EngagementOutcome, MissTracker, Payload, Position, Target};

/// Limits applied to every engagement in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterceptLimits {
    pub lethal_radius: f64,
    pub max_duration: f64,
}

/// Run the intercept system for the tick ending at `time`.
pub fn run(world: &mut World, time: f64, dt: f64, limits: InterceptLimits) {
    let mut updates: Vec<(hecs::Entity, DVec3, DVec3)> = Vec::new();
    {
        let mut query = world.query::<(&Payload, &Position, &MissTracker)>();
        for (entity, (payload, pos, miss)) in query.iter() {
            if !payload.launched || miss.outcome.is_some() {
                continue;
            }
            // Target gone: nothing to score against
            let Ok(mut target_query) = world.query_one::<(&Target, &Position)>(payload.target) else {
                continue;
            };
            let Some((_target, target_pos)) = target_query.get() else {
                continue;
            };
            updates.push((entity, pos.0, target_pos.0));
        }
    }

    for (entity, payload_pos, target_pos) in updates {
        let Ok((payload, miss)) = world.query_one_mut::<(&Payload, &mut MissTracker)>(entity)
        else {
            continue;
        };
        let surface = payload.interceptor.config().central_body.parameters().mean_radius;
        evaluate(miss, payload_pos, target_pos, time, dt, surface, limits);
    }
}

fn evaluate(
    miss: &mut MissTracker,
    payload_pos: DVec3,
    target_pos: DVec3,
    time: f64,
    dt: f64,
    surface_radius: f64,
    limits: InterceptLimits,
) {
    let (p0, q0) = miss.previous.unwrap_or((payload_pos, target_pos));
    let r0 = q0 - p0;
    let r1 = target_pos - payload_pos;
    let d = r1 - r0;

    let s = if d.length_squared() > 0.0 {
        (-r0.dot(d) / d.length_squared()).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let range = (r0 + d * s).length();
    if range < miss.closest_approach {
        miss.closest_approach = range;
        miss.closest_time = time - dt * (1.0 - s);
        miss.payload_at_closest = p0.lerp(payload_pos, s);
        miss.target_at_closest = q0.lerp(target_pos, s);
    }
    miss.previous = Some((payload_pos, target_pos));

    miss.outcome = if miss.closest_approach <= limits.lethal_radius {
        Some(EngagementOutcome::Hit)
    } else if payload_pos.length() < surface_radius {
        Some(EngagementOutcome::GroundImpact)
    } else if r1.dot(d) > 0.0 {
        Some(EngagementOutcome::Miss)
    } else if time >= limits.max_duration {
        Some(EngagementOutcome::Timeout)
    } else {
        None
    };
    if let Some(outcome) = miss.outcome {
        log::info!(
            "engagement over at {time:.2} s: {outcome:?}, closest approach {:.2} m",
            miss.closest_approach
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: InterceptLimits = InterceptLimits {
        lethal_radius: 10.0,
        max_duration: 100.0,
    };

    #[test]
    fn test_pass_between_samples_is_scored() {
        let mut miss = MissTracker::default();
        evaluate(&mut miss, DVec3::ZERO, DVec3::new(100.0, 3.0, 0.0), 1.0, 0.1, 0.0, LIMITS);
        assert!(miss.outcome.is_none());
        // Payload jumps past the target within one tick
        evaluate(&mut miss, DVec3::new(200.0, 0.0, 0.0), DVec3::new(100.0, 3.0, 0.0), 1.1, 0.1, 0.0, LIMITS);
        assert!((miss.closest_approach - 3.0).abs() < 1e-9);
        assert!((miss.closest_time - 1.05).abs() < 1e-9);
        assert_eq!(miss.outcome, Some(EngagementOutcome::Hit));
    }

    #[test]
    fn test_opening_range_is_a_miss() {
        let mut miss = MissTracker::default();
        let target = DVec3::new(0.0, 50.0, 0.0);
        evaluate(&mut miss, DVec3::new(-30.0, 0.0, 0.0), target, 1.0, 0.1, 0.0, LIMITS);
        evaluate(&mut miss, DVec3::new(-10.0, 0.0, 0.0), target, 1.1, 0.1, 0.0, LIMITS);
        assert!(miss.outcome.is_none(), "still closing");
        evaluate(&mut miss, DVec3::new(10.0, 0.0, 0.0), target, 1.2, 0.1, 0.0, LIMITS);
        assert_eq!(miss.outcome, Some(EngagementOutcome::Miss));
        assert!((miss.closest_approach - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_ground_impact_and_timeout() {
        let mut miss = MissTracker::default();
        evaluate(&mut miss, DVec3::new(5.0, 0.0, 0.0), DVec3::new(500.0, 0.0, 0.0), 1.0, 0.1, 100.0, LIMITS);
        assert_eq!(miss.outcome, Some(EngagementOutcome::GroundImpact));

        let mut miss = MissTracker::default();
        evaluate(&mut miss, DVec3::ZERO, DVec3::new(500.0, 0.0, 0.0), 100.0, 0.1, 0.0, LIMITS);
        assert_eq!(miss.outcome, Some(EngagementOutcome::Timeout));
    }
}
