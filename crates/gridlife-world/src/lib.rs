//! The grid world for the Gridlife simulation.
//!
//! Reference implementations of the binding traits the agent state machine
//! consumes:
//!
//! - [`topology`] -- [`GridTopology`]: a bounded or wrapping 3-D grid with
//!   six facings, implementing [`Topology`](gridlife_agents::Topology).
//! - [`environment`] -- [`GridEnvironment`]: dense occupancy, food and
//!   obstacle storage plus the per-type parameter table, implementing
//!   [`Environment`](gridlife_agents::Environment).
//! - [`error`] -- [`WorldError`] for setup and placement failures.

pub mod environment;
pub mod error;
pub mod topology;

// Re-export primary types at crate root.
pub use environment::GridEnvironment;
pub use error::WorldError;
pub use topology::GridTopology;
