//! Engagement engine: the fixed-rate loop around one precision interceptor.
//!
//! `EngagementSim` owns the hecs world, tracks the target through a
//! warm-up period, launches the payload, and steps guidance and kinematics
//! until the engagement resolves. Fully headless and deterministic for a
//! given seed.

use std::sync::Arc;

use glam::DVec3;
use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use precision_core::constants::SIM_TICK_RATE;
use precision_core::enums::MissionStatus;
use precision_core::types::{OrbitalState, TargetState, Vector3D};
use precision_guidance::{
    GuidanceCommand, InterceptMission, InterceptorMetrics, MissionPlanner, PrecisionInterceptor,
};

use crate::components::*;
use crate::scenario::{LaunchMode, Scenario, ScenarioError};
use crate::systems;
use crate::systems::intercept::InterceptLimits;
use crate::world_setup;

/// Configuration for one engagement run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for sensor noise. Equal seeds replay identical engagements.
    pub seed: u64,
    /// Loop rate (Hz).
    pub tick_rate: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_rate: SIM_TICK_RATE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementPhase {
    /// Payload on the rail, tracker warming up.
    Tracking,
    Guided,
    Complete,
}

/// State of the engagement after one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementSnapshot {
    pub tick: u64,
    pub time: f64,
    pub phase: EngagementPhase,
    pub payload: OrbitalState,
    /// Ground truth.
    pub target: TargetState,
    /// Tracker estimate.
    pub estimate: TargetState,
    pub command: Option<GuidanceCommand>,
    pub range: f64,
    pub closest_approach: Option<f64>,
    pub mission_status: Option<MissionStatus>,
    pub outcome: Option<EngagementOutcome>,
}

/// Summary of a finished engagement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementReport {
    pub scenario: String,
    pub seed: u64,
    pub outcome: EngagementOutcome,
    pub miss_distance: f64,
    /// Payload position relative to the target at closest approach.
    pub miss_vector: Vector3D,
    /// Mission clock at closest approach (seconds).
    pub closest_time: f64,
    /// Launch to closest approach (seconds).
    pub flight_time: f64,
    pub final_mass: f64,
    pub metrics: InterceptorMetrics,
    pub mission: Option<InterceptMission>,
    pub ticks: u64,
}

pub struct EngagementSim {
    world: World,
    rng: ChaCha8Rng,
    scenario: Scenario,
    seed: u64,
    dt: f64,
    tick: u64,
    max_ticks: u64,
    interceptor: Arc<PrecisionInterceptor>,
    planner: MissionPlanner,
    payload: hecs::Entity,
    target: hecs::Entity,
    mission: Option<InterceptMission>,
    launch_time: Option<f64>,
}

impl EngagementSim {
    pub fn new(scenario: Scenario, config: SimConfig) -> Result<Self, ScenarioError> {
        scenario.validate()?;
        let tick_rate = if config.tick_rate == 0 {
            SIM_TICK_RATE
        } else {
            config.tick_rate
        };
        let dt = 1.0 / tick_rate as f64;

        let interceptor = Arc::new(PrecisionInterceptor::with_target(
            scenario.interceptor.clone(),
            scenario.target.id.clone(),
            scenario.target.target_type,
        ));
        let mut world = World::new();
        let (payload, target) =
            world_setup::setup_engagement(&mut world, &scenario, Arc::clone(&interceptor));

        log::debug!(
            "engagement {} ready: seed {}, {tick_rate} Hz, launch at {:.1} s",
            scenario.name,
            config.seed,
            scenario.warmup_secs
        );

        Ok(Self {
            world,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            max_ticks: (scenario.max_duration_secs / dt).ceil() as u64 + 1,
            scenario,
            seed: config.seed,
            dt,
            tick: 0,
            interceptor,
            planner: MissionPlanner::default(),
            payload,
            target,
            mission: None,
            launch_time: None,
        })
    }

    /// Replace the planner used at launch.
    pub fn with_planner(mut self, planner: MissionPlanner) -> Self {
        self.planner = planner;
        self
    }

    pub fn time(&self) -> f64 {
        self.tick as f64 * self.dt
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn interceptor(&self) -> &PrecisionInterceptor {
        &self.interceptor
    }

    pub fn mission(&self) -> Option<&InterceptMission> {
        self.mission.as_ref()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn outcome(&self) -> Option<EngagementOutcome> {
        self.world
            .get::<&MissTracker>(self.payload)
            .ok()
            .and_then(|m| m.outcome)
    }

    /// Advance one tick and return the resulting snapshot. A resolved
    /// engagement no longer changes.
    pub fn tick(&mut self) -> EngagementSnapshot {
        if self.outcome().is_some() {
            return self.snapshot();
        }

        let now = self.time();
        if self.launch_time.is_none() && now >= self.scenario.warmup_secs {
            self.launch(now);
        }

        systems::target_motion::run(&mut self.world, now);
        systems::sensor::run(&mut self.world, &mut self.rng, now);
        systems::guidance::run(&mut self.world, now);
        systems::kinematics::run(&mut self.world, self.dt);

        self.tick += 1;
        let limits = InterceptLimits {
            lethal_radius: self.scenario.lethal_radius,
            max_duration: self.scenario.max_duration_secs,
        };
        let t = self.time();
        systems::intercept::run(&mut self.world, t, self.dt, limits);

        if let Some(outcome) = self.outcome() {
            self.close_mission(outcome);
        }
        self.snapshot()
    }

    /// Run to completion.
    pub fn run(&mut self) -> EngagementReport {
        while self.outcome().is_none() && self.tick < self.max_ticks {
            self.tick();
        }
        self.report()
    }

    fn launch(&mut self, now: f64) {
        let (position, velocity) = self.payload_kinematics();
        let mass = self
            .world
            .get::<&Payload>(self.payload)
            .map(|p| p.mass)
            .unwrap_or(self.interceptor.config().payload_mass);
        let mut launch_state = OrbitalState::new(position.into(), velocity.into(), mass);
        launch_state.time = now;

        match self.planner.plan_intercept(
            &launch_state,
            self.interceptor.tracker(),
            self.interceptor.config().payload_type.clone(),
            self.scenario.constraints.clone(),
        ) {
            Ok(mut mission) => {
                if let Err(e) = mission.transition(MissionStatus::Executing) {
                    log::warn!("{e}");
                }
                if self.scenario.launch == LaunchMode::Planned {
                    if let Ok(mut vel) = self.world.get::<&mut Velocity>(self.payload) {
                        vel.0 = mission
                            .waypoints
                            .get(1)
                            .map_or(velocity, |w| DVec3::from(w.velocity));
                    }
                }
                self.mission = Some(mission);
            }
            Err(e) => log::warn!("launching without a mission plan: {e}"),
        }

        if let Ok(mut payload) = self.world.get::<&mut Payload>(self.payload) {
            payload.launched = true;
        }
        self.launch_time = Some(now);
        log::info!("{}: payload launched at {now:.2} s", self.scenario.name);
    }

    fn close_mission(&mut self, outcome: EngagementOutcome) {
        let Some(mission) = self.mission.as_mut() else {
            return;
        };
        if mission.status.is_terminal() {
            return;
        }
        let next = if outcome == EngagementOutcome::Hit {
            MissionStatus::Completed
        } else {
            MissionStatus::Aborted
        };
        if let Err(e) = mission.transition(next) {
            log::warn!("{e}");
        }
    }

    fn payload_kinematics(&self) -> (DVec3, DVec3) {
        let pos = self.world.get::<&Position>(self.payload).map(|p| p.0);
        let vel = self.world.get::<&Velocity>(self.payload).map(|v| v.0);
        (pos.unwrap_or_default(), vel.unwrap_or_default())
    }

    fn target_truth(&self) -> TargetState {
        let pos = self.world.get::<&Position>(self.target).map(|p| p.0);
        let vel = self.world.get::<&Velocity>(self.target).map(|v| v.0);
        let acc = self.world.get::<&Acceleration>(self.target).map(|a| a.0);
        TargetState::new(
            pos.unwrap_or_default().into(),
            vel.unwrap_or_default().into(),
            acc.unwrap_or_default().into(),
            self.time(),
        )
    }

    pub fn snapshot(&self) -> EngagementSnapshot {
        let (position, velocity) = self.payload_kinematics();
        let mass = self.world.get::<&Payload>(self.payload).map(|p| p.mass);
        let mut payload = OrbitalState::new(position.into(), velocity.into(), mass.unwrap_or(0.0));
        payload.time = self.time();

        let target = self.target_truth();
        let miss = self.world.get::<&MissTracker>(self.payload).map(|m| *m).ok();
        let outcome = miss.and_then(|m| m.outcome);
        let phase = match (outcome, self.launch_time) {
            (Some(_), _) => EngagementPhase::Complete,
            (None, Some(_)) => EngagementPhase::Guided,
            (None, None) => EngagementPhase::Tracking,
        };

        EngagementSnapshot {
            tick: self.tick,
            time: self.time(),
            phase,
            payload,
            target,
            estimate: self.interceptor.target_state(),
            command: self.world.get::<&Command>(self.payload).map(|c| c.0).ok(),
            range: payload.position.distance_to(target.position),
            closest_approach: miss
                .map(|m| m.closest_approach)
                .filter(|d| d.is_finite()),
            mission_status: self.mission.as_ref().map(|m| m.status),
            outcome,
        }
    }

    /// Report on the engagement so far; unresolved runs count as timeouts.
    pub fn report(&self) -> EngagementReport {
        let miss = self
            .world
            .get::<&MissTracker>(self.payload)
            .map(|m| *m)
            .unwrap_or_default();
        let final_mass = self.world.get::<&Payload>(self.payload).map(|p| p.mass);
        let launch = self.launch_time.unwrap_or(0.0);
        let miss_distance = if miss.closest_approach.is_finite() {
            miss.closest_approach
        } else {
            self.snapshot().range
        };

        EngagementReport {
            scenario: self.scenario.name.clone(),
            seed: self.seed,
            outcome: miss.outcome.unwrap_or(EngagementOutcome::Timeout),
            miss_distance,
            miss_vector: (miss.payload_at_closest - miss.target_at_closest).into(),
            closest_time: miss.closest_time,
            flight_time: (miss.closest_time - launch).max(0.0),
            final_mass: final_mass.unwrap_or(0.0),
            metrics: self.interceptor.metrics(),
            mission: self.mission.clone(),
            ticks: self.tick,
        }
    }
}
