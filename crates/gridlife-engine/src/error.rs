//! Error types for the engine binary.

use gridlife_types::AgentType;

/// Top-level error for the engine binary.
///
/// Each variant wraps a subsystem error so `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Building or advancing the simulation failed.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying simulation error.
        #[from]
        source: gridlife_core::SimulationError,
    },

    /// Food placement failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: gridlife_world::WorldError,
    },

    /// Not enough free cells for the requested seed agents.
    #[error("no free cell left for {agent_type}: {placed} of {requested} placed")]
    GridFull {
        /// Type being seeded when space ran out.
        agent_type: AgentType,
        /// Agents of that type placed so far.
        placed: u32,
        /// Agents of that type requested.
        requested: u32,
    },
}
