//! Agent lifecycle for the Gridlife simulation.
//!
//! This crate defines what an agent *is* and how its state evolves: energy
//! accounting with cause attribution, the three spawn modes, per-tick
//! update, movement with occupancy synchronization, step resolution and
//! death. It performs no I/O and owns no world; everything outside the agent
//! is reached through the binding traits below, passed in explicitly as an
//! [`AgentContext`].
//!
//! # Modules
//!
//! - [`agent`] -- [`UnbornAgent`], [`Agent`], [`AgentBody`] and the state machine
//! - [`controller`] -- The [`Controller`] trait and [`RandomWalkController`]
//! - [`environment`] -- The [`Environment`] and [`Topology`] bindings
//! - [`params`] -- Shared per-type [`AgentParams`]
//! - [`simulation`] -- [`SimulationInternals`], [`AgentListener`], [`AgentContext`]
//! - [`state`] -- The auxiliary [`StateBag`]
//!
//! # Execution model
//!
//! Single-threaded. The owning scheduler updates one agent at a time; an
//! agent's mutations of the shared occupancy and food maps are never
//! interleaved with another agent's.

pub mod agent;
pub mod controller;
pub mod environment;
pub mod params;
pub mod simulation;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

// Re-export primary types at crate root for convenience.
pub use agent::{Agent, AgentBody, Parent2, StepOutcome, UnbornAgent};
pub use controller::{Controller, RandomWalkController};
pub use environment::{Environment, Tile, Topology};
pub use params::AgentParams;
pub use simulation::{
    AgentContext, AgentListener, EnergyChange, Occupant, Parentage, SimulationInternals,
};
pub use state::{AuxState, StateBag};
