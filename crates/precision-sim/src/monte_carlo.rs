//! Monte Carlo accuracy campaigns: many engagements of one scenario with
//! dispersed target initial conditions and independent sensor noise.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use precision_core::accuracy::{accuracy_spec, DeliveryAccuracy, PayloadAccuracySpec};
use precision_core::types::Vector3D;

use crate::components::EngagementOutcome;
use crate::engine::{EngagementSim, SimConfig};
use crate::scenario::{Scenario, ScenarioError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    pub runs: usize,
    /// Base seed; run `i` uses `seed + i`.
    pub seed: u64,
    /// Uniform per-axis dispersion of the target's initial position (meters).
    pub position_dispersion: f64,
    /// Uniform per-axis dispersion of the target's initial velocity (m/s).
    pub velocity_dispersion: f64,
    pub tick_rate: u32,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            runs: 20,
            seed: 42,
            position_dispersion: 200.0,
            velocity_dispersion: 10.0,
            tick_rate: SimConfig::default().tick_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub outcome: EngagementOutcome,
    pub miss_distance: f64,
    pub flight_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignReport {
    pub scenario: String,
    pub runs: usize,
    pub hits: usize,
    pub hit_rate: f64,
    /// Miss statistics about the target at closest approach.
    pub accuracy: DeliveryAccuracy,
    /// Catalog figures for the scenario's payload type.
    pub reference: PayloadAccuracySpec,
    pub within_reference_cep: bool,
    pub results: Vec<RunSummary>,
}

pub fn run_campaign(
    scenario: &Scenario,
    config: &MonteCarloConfig,
) -> Result<CampaignReport, ScenarioError> {
    if config.runs == 0 {
        return Err(ScenarioError::Invalid("campaign needs at least one run".into()));
    }
    for (name, value) in [
        ("position_dispersion", config.position_dispersion),
        ("velocity_dispersion", config.velocity_dispersion),
    ] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(ScenarioError::Invalid(format!(
                "{name} must be non-negative, got {value}"
            )));
        }
    }
    scenario.validate()?;

    let mut results = Vec::with_capacity(config.runs);
    let mut misses = Vec::with_capacity(config.runs);
    for i in 0..config.runs {
        let seed = config.seed.wrapping_add(i as u64);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut run = scenario.clone();
        run.target.position += dispersion(&mut rng, config.position_dispersion);
        run.target.velocity += dispersion(&mut rng, config.velocity_dispersion);

        let report = EngagementSim::new(
            run,
            SimConfig {
                seed,
                tick_rate: config.tick_rate,
            },
        )?
        .run();
        log::debug!(
            "run {i}: {:?}, miss {:.2} m",
            report.outcome,
            report.miss_distance
        );

        misses.push(report.miss_vector);
        results.push(RunSummary {
            seed,
            outcome: report.outcome,
            miss_distance: report.miss_distance,
            flight_time: report.flight_time,
        });
    }

    let hits = results
        .iter()
        .filter(|r| r.outcome == EngagementOutcome::Hit)
        .count();
    let accuracy = DeliveryAccuracy::from_impacts(Vector3D::ZERO, &misses);
    let reference = accuracy_spec(&scenario.interceptor.payload_type);
    log::info!(
        "{}: {hits}/{} hits, CEP {:.2} m (catalog {:.1} m)",
        scenario.name,
        config.runs,
        accuracy.cep,
        reference.cep
    );

    Ok(CampaignReport {
        scenario: scenario.name.clone(),
        runs: config.runs,
        hits,
        hit_rate: hits as f64 / config.runs as f64,
        within_reference_cep: accuracy.cep <= reference.cep,
        accuracy,
        reference,
        results,
    })
}

fn dispersion(rng: &mut ChaCha8Rng, bound: f64) -> Vector3D {
    if bound <= 0.0 {
        return Vector3D::ZERO;
    }
    Vector3D::new(
        rng.gen_range(-bound..=bound),
        rng.gen_range(-bound..=bound),
        rng.gen_range(-bound..=bound),
    )
}
