//! Headless runner for the Gridlife simulation.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from the path given as the first argument, else
//!    `gridlife-config.yaml`, else built-in defaults
//! 3. Build the grid and register agent types
//! 4. Scatter food and spawn seed agents
//! 5. Run the tick loop until `max_ticks` or extinction
//! 6. Verify the causation ledger and log the result
//!
//! Set `GRIDLIFE_LOG_FORMAT=json` for JSON log lines; `RUST_LOG` controls
//! the filter (default `info`).

mod error;
mod spawner;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use gridlife_core::{Simulation, SimulationConfig};
use gridlife_ledger::ConservationResult;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Config file looked up in the working directory when no path is given.
const DEFAULT_CONFIG_PATH: &str = "gridlife-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, seeding or a tick fails, or if the
/// ledger does not balance at the end of the run.
fn main() -> anyhow::Result<()> {
    init_logging();
    info!("gridlife-engine starting");

    let config_arg = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_config(config_arg.as_deref())?;
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        width = config.world.width,
        height = config.world.height,
        depth = config.world.depth,
        wrap = config.world.wrap,
        agent_types = config.agent_types.len(),
        max_ticks = config.simulation.max_ticks,
        "Configuration loaded"
    );

    let mut sim = Simulation::new(&config).context("failed to build simulation")?;
    let report = spawner::seed_world(&mut sim, &config).context("failed to seed world")?;
    info!(
        agents = report.agents.len(),
        food_cells = report.food_cells,
        total_food = report.total_food,
        "World seeded, entering tick loop"
    );

    let summary = sim
        .run(config.simulation.max_ticks)
        .context("simulation aborted")?;

    let energy_by_category = sim.ledger().totals_by_category();
    info!(
        ticks_run = summary.ticks_run,
        final_tick = summary.final_tick,
        living = summary.living,
        ever_lived = summary.ever_lived,
        extinct = summary.extinct,
        births = sim.population().len(),
        deaths = sim.population().dead_count(),
        energy_by_category = ?energy_by_category,
        "Simulation finished"
    );
    info!(
        summary = %serde_json::to_string(&summary).context("failed to encode run summary")?,
        "Run summary"
    );

    match sim.verify_ledger() {
        ConservationResult::Balanced => {
            info!(entries = sim.ledger().len(), "Ledger balanced");
            Ok(())
        }
        ConservationResult::Anomaly(anomaly) => Err(anyhow::anyhow!("ledger anomaly: {anomaly}")),
    }
}

/// Install the global subscriber: human-readable by default, JSON when
/// `GRIDLIFE_LOG_FORMAT=json`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("GRIDLIFE_LOG_FORMAT").is_ok_and(|format| format == "json");
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load configuration from `explicit`, or from [`DEFAULT_CONFIG_PATH`] if it
/// exists, or fall back to defaults.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<SimulationConfig> {
    if let Some(path) = explicit {
        return SimulationConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()));
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        Ok(SimulationConfig::from_file(default_path)?)
    } else {
        info!("Config file not found, using defaults");
        Ok(SimulationConfig::default())
    }
}
