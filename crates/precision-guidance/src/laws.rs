//! Guidance laws for the precision interceptor.
//!
//! Every law maps line-of-sight geometry to a commanded steering
//! acceleration. The laws are pure: identical geometry always yields a
//! bit-identical command.

use precision_core::constants::*;
use precision_core::enums::GuidanceLaw;
use precision_core::types::{TargetState, Vector3D};

/// Relative geometry between the payload and the target at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidanceGeometry {
    /// Line of sight, payload to target (m).
    pub los: Vector3D,
    /// Target velocity relative to the payload (m/s).
    pub relative_velocity: Vector3D,
    /// LOS angular rate vector (rad/s).
    pub los_rate: Vector3D,
    /// Positive when the range is shrinking (m/s).
    pub closing_speed: f64,
    pub target_acceleration: Vector3D,
    /// Time to go (s); the not-closing sentinel when the range is opening.
    pub time_to_go: f64,
}

impl GuidanceGeometry {
    /// Build the geometry from payload kinematics and a target estimate.
    /// Non-finite inputs collapse to zero vectors.
    pub fn from_states(
        payload_position: Vector3D,
        payload_velocity: Vector3D,
        target: &TargetState,
    ) -> Self {
        let los = (target.position - payload_position).finite_or_zero();
        let relative_velocity = (target.velocity - payload_velocity).finite_or_zero();
        let closing_speed = closing_speed(los, relative_velocity);
        Self {
            los,
            relative_velocity,
            los_rate: los_rate(los, relative_velocity),
            closing_speed,
            target_acceleration: target.acceleration.finite_or_zero(),
            time_to_go: time_to_go(los.magnitude(), closing_speed),
        }
    }

    pub fn range(&self) -> f64 {
        self.los.magnitude()
    }
}

/// LOS angular rate `ω = LOS × v_rel / |LOS|²`. Zero at zero range.
pub fn los_rate(los: Vector3D, relative_velocity: Vector3D) -> Vector3D {
    let range_sq = los.magnitude_squared();
    if !(range_sq > 0.0 && range_sq.is_finite()) {
        return Vector3D::ZERO;
    }
    los.cross(relative_velocity)
        .scale(1.0 / range_sq)
        .finite_or_zero()
}

/// Closing speed `Vc = -v_rel · unit(LOS)`.
pub fn closing_speed(los: Vector3D, relative_velocity: Vector3D) -> f64 {
    let vc = -relative_velocity.dot(los.normalize());
    if vc.is_finite() {
        vc
    } else {
        0.0
    }
}

/// Range over closing speed, or the not-closing sentinel when `Vc <= 0`.
pub fn time_to_go(range: f64, closing_speed: f64) -> f64 {
    let not_closing = NOT_CLOSING_TIME_TO_GO_SECS as f64;
    if !(closing_speed > 0.0) {
        return not_closing;
    }
    let tgo = range / closing_speed;
    if tgo.is_finite() {
        tgo
    } else {
        not_closing
    }
}

/// Steering acceleration for the selected law.
pub fn compute(law: GuidanceLaw, geometry: &GuidanceGeometry) -> Vector3D {
    let accel = match law {
        GuidanceLaw::ProNav => pronav(geometry, PRONAV_NAVIGATION_CONSTANT),
        GuidanceLaw::AugmentedProNav => {
            augmented_pronav(geometry, AUG_PRONAV_NAVIGATION_CONSTANT)
        }
        GuidanceLaw::TrueProNav => true_pronav(geometry, TPN_NAVIGATION_CONSTANT),
        GuidanceLaw::ZeroEffortMiss => zero_effort_miss(geometry),
        GuidanceLaw::Optimal => optimal(geometry),
    };
    accel.finite_or_zero()
}

/// Proportional navigation: `N·Vc·ω`.
pub fn pronav(g: &GuidanceGeometry, n: f64) -> Vector3D {
    g.los_rate.scale(n * g.closing_speed)
}

/// Augmented proportional navigation: `N·Vc·ω + ½·N·a_t`.
pub fn augmented_pronav(g: &GuidanceGeometry, n: f64) -> Vector3D {
    pronav(g, n) + g.target_acceleration.scale(0.5 * n)
}

/// True proportional navigation: `N·Vc·|ω|` applied perpendicular to the LOS.
pub fn true_pronav(g: &GuidanceGeometry, n: f64) -> Vector3D {
    let perp = g.los.normalize().cross(g.los_rate).normalize();
    perp.scale(n * g.closing_speed * g.los_rate.magnitude())
}

/// Zero-effort-miss: `-2·ZEM/tgo²` with `ZEM = LOS + v_rel·tgo`.
pub fn zero_effort_miss(g: &GuidanceGeometry) -> Vector3D {
    let t = clamped_tgo(g.time_to_go);
    let zem = g.los + g.relative_velocity.scale(t);
    zem.scale(-2.0 / (t * t))
}

/// Optimal guidance against a maneuvering target:
/// `6·ZEM/tgo² + 2·ZEM'/tgo + ½·a_t`.
pub fn optimal(g: &GuidanceGeometry) -> Vector3D {
    let t = clamped_tgo(g.time_to_go);
    let a_t = g.target_acceleration;
    let zem = g.los + g.relative_velocity.scale(t) + a_t.scale(0.5 * t * t);
    let zem_dot = g.relative_velocity + a_t.scale(t);
    zem.scale(6.0 / (t * t)) + zem_dot.scale(2.0 / t) + a_t.scale(0.5)
}

fn clamped_tgo(tgo: f64) -> f64 {
    if tgo > 0.0 && tgo.is_finite() {
        tgo
    } else {
        MIN_TIME_TO_GO_SECS
    }
}

/// Lead intercept point for a constant-velocity target and a payload flying
/// at constant `speed`. Returns (point, time to intercept).
///
/// Two fixed-point refinements of the flight time, enough for a launch heading.
pub fn lead_intercept_point(
    target_position: Vector3D,
    target_velocity: Vector3D,
    own_position: Vector3D,
    speed: f64,
) -> (Vector3D, f64) {
    if !(speed > 0.0) {
        return (target_position, NOT_CLOSING_TIME_TO_GO_SECS as f64);
    }
    let mut tti = own_position.distance_to(target_position) / speed;
    for _ in 0..2 {
        let predicted = target_position + target_velocity.scale(tti);
        tti = own_position.distance_to(predicted) / speed;
    }
    (target_position + target_velocity.scale(tti), tti)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_at(x: f64, y: f64, vx: f64, vy: f64) -> TargetState {
        TargetState::new(
            Vector3D::new(x, y, 0.0),
            Vector3D::new(vx, vy, 0.0),
            Vector3D::ZERO,
            0.0,
        )
    }

    #[test]
    fn test_head_on_geometry() {
        let g = GuidanceGeometry::from_states(
            Vector3D::ZERO,
            Vector3D::new(100.0, 0.0, 0.0),
            &target_at(1000.0, 0.0, 0.0, 0.0),
        );
        assert!((g.closing_speed - 100.0).abs() < 1e-9);
        assert!((g.time_to_go - 10.0).abs() < 1e-9);
        assert_eq!(g.los_rate, Vector3D::ZERO);
        assert_eq!(compute(GuidanceLaw::ProNav, &g), Vector3D::ZERO);
    }

    #[test]
    fn test_not_closing_uses_sentinel() {
        let g = GuidanceGeometry::from_states(
            Vector3D::ZERO,
            Vector3D::new(-50.0, 0.0, 0.0),
            &target_at(1000.0, 0.0, 0.0, 0.0),
        );
        assert!(g.closing_speed < 0.0);
        assert_eq!(g.time_to_go, 999.0);
    }

    #[test]
    fn test_zero_range_is_safe() {
        let g = GuidanceGeometry::from_states(
            Vector3D::new(5.0, 5.0, 5.0),
            Vector3D::new(1.0, 0.0, 0.0),
            &TargetState::new(Vector3D::new(5.0, 5.0, 5.0), Vector3D::ZERO, Vector3D::ZERO, 0.0),
        );
        assert_eq!(g.los_rate, Vector3D::ZERO);
        assert_eq!(g.closing_speed, 0.0);
        for law in GuidanceLaw::ALL {
            assert!(compute(law, &g).is_finite(), "{law} produced non-finite output");
        }
    }

    #[test]
    fn test_pronav_scales_los_rate() {
        let g = GuidanceGeometry::from_states(
            Vector3D::ZERO,
            Vector3D::new(300.0, 0.0, 0.0),
            &target_at(3000.0, 0.0, 0.0, 100.0),
        );
        // ω = (0, 0, 3000·100 / 3000²), Vc = 300
        assert!((g.los_rate.z - 100.0 / 3000.0).abs() < 1e-12);
        let a = compute(GuidanceLaw::ProNav, &g);
        let expected = 3.0 * 300.0 * (100.0 / 3000.0);
        assert!((a.z - expected).abs() < 1e-9, "got {a:?}");
        assert_eq!(a.x, 0.0);
        assert_eq!(a.y, 0.0);
    }

    #[test]
    fn test_augmented_pronav_adds_target_accel() {
        let mut target = target_at(3000.0, 0.0, 0.0, 100.0);
        target.acceleration = Vector3D::new(0.0, 0.0, 20.0);
        let g = GuidanceGeometry::from_states(Vector3D::ZERO, Vector3D::new(300.0, 0.0, 0.0), &target);
        let apn = compute(GuidanceLaw::AugmentedProNav, &g);
        let pn4 = pronav(&g, 4.0);
        assert!((apn.z - pn4.z - 0.5 * 4.0 * 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_true_pronav_perpendicular_to_los() {
        let g = GuidanceGeometry::from_states(
            Vector3D::ZERO,
            Vector3D::new(250.0, 10.0, 0.0),
            &target_at(2000.0, 500.0, -80.0, 60.0),
        );
        let a = compute(GuidanceLaw::TrueProNav, &g);
        assert!(a.magnitude() > 0.0);
        assert!(a.dot(g.los.normalize()).abs() < 1e-9 * a.magnitude().max(1.0));
        let expected = 4.0 * g.closing_speed * g.los_rate.magnitude();
        assert!((a.magnitude() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_zem_formula_and_clamp() {
        let g = GuidanceGeometry {
            los: Vector3D::new(100.0, 20.0, 0.0),
            relative_velocity: Vector3D::new(-10.0, 0.0, 0.0),
            los_rate: Vector3D::ZERO,
            closing_speed: 10.0,
            target_acceleration: Vector3D::ZERO,
            time_to_go: 10.0,
        };
        let a = zero_effort_miss(&g);
        // ZEM = (0, 20, 0); a = -2·ZEM/100
        assert!((a.x).abs() < 1e-12);
        assert!((a.y + 0.4).abs() < 1e-12);

        let clamped = GuidanceGeometry { time_to_go: 0.0, ..g };
        let a = zero_effort_miss(&clamped);
        let zem = clamped.los + clamped.relative_velocity.scale(0.1);
        assert!((a.x + 2.0 * zem.x / 0.01).abs() < 1e-6);
        assert!(compute(GuidanceLaw::Optimal, &GuidanceGeometry { time_to_go: -3.0, ..g }).is_finite());
    }

    #[test]
    fn test_optimal_formula() {
        let g = GuidanceGeometry {
            los: Vector3D::new(1000.0, 0.0, 0.0),
            relative_velocity: Vector3D::new(-100.0, 0.0, 0.0),
            los_rate: Vector3D::ZERO,
            closing_speed: 100.0,
            target_acceleration: Vector3D::new(0.0, 2.0, 0.0),
            time_to_go: 10.0,
        };
        let a = optimal(&g);
        // ZEM = (0, 100, 0), ZEM' = (-100, 20, 0)
        assert!((a.x - (-20.0)).abs() < 1e-9);
        assert!((a.y - (6.0 + 4.0 + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_laws_are_deterministic() {
        let mut target = target_at(4200.0, -350.0, -120.0, 45.0);
        target.acceleration = Vector3D::new(3.0, -7.0, 1.5);
        let g = GuidanceGeometry::from_states(
            Vector3D::new(10.0, 20.0, 30.0),
            Vector3D::new(280.0, 15.0, -4.0),
            &target,
        );
        for law in GuidanceLaw::ALL {
            let a = compute(law, &g);
            let b = compute(law, &g);
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.y.to_bits(), b.y.to_bits());
            assert_eq!(a.z.to_bits(), b.z.to_bits());
        }
    }

    #[test]
    fn test_lead_intercept_point() {
        let (pip, tti) = lead_intercept_point(
            Vector3D::new(10_000.0, 0.0, 0.0),
            Vector3D::new(0.0, 100.0, 0.0),
            Vector3D::ZERO,
            1000.0,
        );
        assert!(tti > 10.0 && tti < 10.1, "tti {tti:.3}");
        assert!(pip.y > 1000.0);

        let (_, tti) = lead_intercept_point(Vector3D::ZERO, Vector3D::ZERO, Vector3D::ZERO, 0.0);
        assert_eq!(tti, 999.0);
    }
}
