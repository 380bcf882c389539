//! Shared type definitions for the Gridlife simulation.
//!
//! This crate is the single source of truth for the value types passed
//! between the agent state machine, the world, the causation ledger, and
//! the simulation core.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifiers for agents and agent types
//! - [`cause`] -- The closed Cause Taxonomy ([`Cause`], [`CauseCategory`])
//! - [`location`] -- Grid cells, facings, and spawn points

pub mod cause;
pub mod ids;
pub mod location;

// Re-export all public types at crate root for convenience.
pub use cause::{Cause, CauseCategory};
pub use ids::{AgentId, AgentType};
pub use location::{Direction, Location, LocationDirection, SpawnPoint};
