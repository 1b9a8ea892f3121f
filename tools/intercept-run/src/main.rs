//! intercept-run: plan, fly and score precision-guided engagements.
//!
//! Usage:
//!   intercept-run catalog [--payload cruise]
//!   intercept-run scenario head_on > head_on.json
//!   intercept-run plan --scenario scenarios/head_on.json
//!   intercept-run engage --scenario crossing --seed 7 --trace-every 100
//!   intercept-run monte-carlo --scenario head_on --runs 50
//!
//! `--scenario` takes a JSON file path or a built-in scenario name.
//! Results are printed to stdout as JSON; logs go to stderr.

use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;

use precision_core::accuracy::{accuracy_spec, catalog, PayloadAccuracySpec};
use precision_core::enums::PayloadType;
use precision_sim::engine::EngagementPhase;
use precision_sim::{run_campaign, EngagementSim, MonteCarloConfig, Scenario, ScenarioError, SimConfig};

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown scenario {0:?}: not a file and not one of {1}")]
    UnknownScenario(String, String),

    #[error("no mission could be planned at launch")]
    NoMission,
}

#[derive(Parser, Debug)]
#[command(name = "intercept-run", version, about = "Precision guidance engagement runner")]
struct Cli {
    /// Log filter when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print payload accuracy specifications
    Catalog {
        /// Only this payload type
        #[arg(long)]
        payload: Option<String>,
    },
    /// Print a built-in scenario as JSON
    Scenario { name: String },
    /// Track the target through warm-up and print the planned mission
    Plan {
        #[arg(short, long)]
        scenario: String,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Fly one engagement and print its report
    Engage {
        #[arg(short, long)]
        scenario: String,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Also print a snapshot every N ticks (JSON lines, before the report)
        #[arg(long)]
        trace_every: Option<u64>,
    },
    /// Run a dispersed campaign and print accuracy statistics
    MonteCarlo {
        #[arg(short, long)]
        scenario: String,
        #[arg(long, default_value_t = 20)]
        runs: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Target initial position dispersion per axis (meters)
        #[arg(long, default_value_t = 200.0)]
        position_dispersion: f64,
        /// Target initial velocity dispersion per axis (m/s)
        #[arg(long, default_value_t = 10.0)]
        velocity_dispersion: f64,
    },
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    if let Err(e) = run(cli.command) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Catalog { payload } => cmd_catalog(payload),
        Command::Scenario { name } => {
            let scenario = resolve_scenario(&name)?;
            println!("{}", scenario.to_json()?);
            Ok(())
        }
        Command::Plan { scenario, seed } => cmd_plan(&scenario, seed),
        Command::Engage {
            scenario,
            seed,
            trace_every,
        } => cmd_engage(&scenario, seed, trace_every),
        Command::MonteCarlo {
            scenario,
            runs,
            seed,
            position_dispersion,
            velocity_dispersion,
        } => {
            let scenario = resolve_scenario(&scenario)?;
            let config = MonteCarloConfig {
                runs,
                seed,
                position_dispersion,
                velocity_dispersion,
                ..Default::default()
            };
            print_json(&run_campaign(&scenario, &config)?)
        }
    }
}

/// A path to an existing file is loaded; anything else must name a built-in.
fn resolve_scenario(arg: &str) -> Result<Scenario, CliError> {
    if Path::new(arg).is_file() {
        log::debug!("loading scenario file {arg}");
        return Ok(Scenario::load(arg)?);
    }
    Scenario::builtin(arg)
        .ok_or_else(|| CliError::UnknownScenario(arg.into(), Scenario::builtin_names().join(", ")))
}

fn cmd_catalog(payload: Option<String>) -> Result<(), CliError> {
    if let Some(name) = payload {
        return print_json(&accuracy_spec(&PayloadType::from_name(&name)));
    }
    let mut specs: Vec<&PayloadAccuracySpec> = catalog().values().collect();
    specs.sort_by(|a, b| a.payload_type.as_str().cmp(b.payload_type.as_str()));
    print_json(&specs)
}

fn cmd_plan(arg: &str, seed: u64) -> Result<(), CliError> {
    let scenario = resolve_scenario(arg)?;
    let mut sim = EngagementSim::new(scenario, SimConfig { seed, ..Default::default() })?;
    loop {
        let snapshot = sim.tick();
        if snapshot.phase != EngagementPhase::Tracking {
            break;
        }
    }
    let mission = sim.mission().ok_or(CliError::NoMission)?;
    print_json(mission)
}

fn cmd_engage(arg: &str, seed: u64, trace_every: Option<u64>) -> Result<(), CliError> {
    let scenario = resolve_scenario(arg)?;
    let mut sim = EngagementSim::new(scenario, SimConfig { seed, ..Default::default() })?;

    if let Some(every) = trace_every.filter(|n| *n > 0) {
        while sim.outcome().is_none() {
            let snapshot = sim.tick();
            if snapshot.tick % every == 0 || snapshot.outcome.is_some() {
                println!("{}", serde_json::to_string(&snapshot)?);
            }
        }
    }

    print_json(&sim.run())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
