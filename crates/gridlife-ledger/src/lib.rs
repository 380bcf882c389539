//! Causation ledger for the Gridlife simulation.
//!
//! Every energy change an agent undergoes is appended here together with
//! the [`Cause`] that produced it, and every birth and death is recorded as
//! a lifecycle entry. Downstream statistics read totals per cause or per
//! category; integrity checks compare each agent's recorded deltas with its
//! observed energy.
//!
//! # Modules
//!
//! - [`ledger`] -- The [`CauseLedger`] struct: append-only log with queries.
//! - [`conservation`] -- Per-agent balance verification and anomaly reports.
//!
//! # Conservation Law
//!
//! For every agent A:
//!
//! ```text
//! sum(deltas recorded for A) == observed energy of A
//! ```
//!
//! A violation produces a [`LedgerAnomaly`]. The ledger never panics; it
//! returns errors.
//!
//! # Usage
//!
//! ```
//! use gridlife_ledger::{CauseLedger, ConservationResult};
//! use gridlife_types::{AgentId, Cause};
//!
//! let mut ledger = CauseLedger::new();
//! let agent = AgentId::new();
//!
//! ledger.record_lifecycle(0, agent, Cause::CreationBirth).ok();
//! ledger.record_energy(0, agent, 20, Cause::CreationBirth, 20);
//! ledger.record_energy(1, agent, -1, Cause::StepForward, 19);
//!
//! assert_eq!(ledger.verify_agent(agent, 19), ConservationResult::Balanced);
//! ```
//!
//! [`Cause`]: gridlife_types::Cause

pub mod conservation;
pub mod ledger;

// Re-export primary types at crate root.
pub use conservation::ConservationResult;
pub use ledger::{CauseLedger, EnergyEntry, LifecycleEntry};

use gridlife_types::{AgentId, Cause};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when recording ledger entries.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Lifecycle entries must carry a birth or death cause.
    #[error("{cause} is not a lifecycle cause")]
    NotLifecycleCause {
        /// The rejected cause.
        cause: Cause,
    },
}

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// A balance violation detected for one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAnomaly {
    /// The agent whose records disagree.
    pub agent_id: AgentId,
    /// Sum of all recorded deltas.
    pub recorded: i64,
    /// Energy the caller observed on the agent.
    pub observed: i64,
    /// Human-readable description of the anomaly.
    pub message: String,
}

impl core::fmt::Display for LedgerAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}
