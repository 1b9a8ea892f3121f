//! Headless engagement simulation for the precision guidance engine.
//!
//! Owns a hecs ECS world, observes a scripted target through a noisy
//! seeker, and flies the guided payload at a fixed tick rate. Monte Carlo
//! campaigns repeat one scenario with dispersed initial conditions.

pub mod components;
pub mod engine;
pub mod monte_carlo;
pub mod scenario;
pub mod systems;
pub mod world_setup;

pub use engine::{EngagementReport, EngagementSim, EngagementSnapshot, SimConfig};
pub use monte_carlo::{run_campaign, CampaignReport, MonteCarloConfig};
pub use precision_core as core;
pub use scenario::{Scenario, ScenarioError};
