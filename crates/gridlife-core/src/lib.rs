//! Clock, configuration and tick scheduling for the Gridlife simulation.
//!
//! This crate owns the agents. It binds the agent state machine from
//! `gridlife-agents` to the grid world from `gridlife-world` and records
//! every energy change and lifecycle event in the causation ledger from
//! `gridlife-ledger`.
//!
//! # Modules
//!
//! - [`clock`] -- Monotonic tick counter.
//! - [`config`] -- Loading `gridlife-config.yaml` into strongly-typed structs.
//! - [`journal`] -- [`EventJournal`]: ledger recording, per-tick statistics
//!   and listener fan-out.
//! - [`population`] -- Registry of every agent ever spawned.
//! - [`simulation`] -- [`Simulation`]: spawning, breeding and the tick loop.

pub mod clock;
pub mod config;
pub mod journal;
pub mod population;
pub mod simulation;

pub use clock::{ClockError, SimClock};
pub use config::{
    AgentTypeConfig, ConfigError, FoodConfig, RunConfig, SimulationConfig, WorldConfig,
};
pub use journal::{EventJournal, TickStats};
pub use population::{Population, PopulationRecord};
pub use simulation::{RunSummary, Simulation, SimulationError};
