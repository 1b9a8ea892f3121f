//! ECS systems that operate on the engagement world each tick.
//!
//! Systems are free functions over `&mut World`. They keep no state of
//! their own; everything lives in components.
//!
//! Tick order: target motion, sensor, guidance, kinematics, intercept.

pub mod guidance;
pub mod intercept;
pub mod kinematics;
pub mod sensor;
pub mod target_motion;
