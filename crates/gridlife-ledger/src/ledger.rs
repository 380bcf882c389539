//! The causation ledger: an append-only log of energy changes and
//! lifecycle events.
//!
//! # Design
//!
//! - **Append-only**: entries are never modified or deleted, including the
//!   entries of agents that have since died.
//! - **Attributed**: every entry carries exactly one [`Cause`].
//! - **Balanced**: the deltas recorded for an agent sum to its energy.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use gridlife_types::{AgentId, Cause, CauseCategory};

use crate::LedgerError;
use crate::conservation::{self, ConservationResult};

/// One energy change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyEntry {
    /// Tick at which the change happened.
    pub tick: u64,
    /// The agent whose energy changed.
    pub agent_id: AgentId,
    /// Signed amount added to the agent's energy.
    pub delta: i64,
    /// Why the change happened.
    pub cause: Cause,
    /// The agent's energy after the change.
    pub balance: i64,
}

/// One birth or death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEntry {
    /// Tick of the event.
    pub tick: u64,
    /// The agent born or deceased.
    pub agent_id: AgentId,
    /// A `Birth`-descended cause or `Death`.
    pub cause: Cause,
}

/// Causation ledger covering a whole simulation run.
#[derive(Debug, Default, Clone)]
pub struct CauseLedger {
    /// Energy entries, in insertion order.
    energy: Vec<EnergyEntry>,
    /// Lifecycle entries, in insertion order.
    lifecycle: Vec<LifecycleEntry>,
}

impl CauseLedger {
    /// Create a new empty ledger.
    pub const fn new() -> Self {
        Self {
            energy: Vec::new(),
            lifecycle: Vec::new(),
        }
    }

    /// Total number of entries of both kinds.
    pub const fn len(&self) -> usize {
        self.energy.len().saturating_add(self.lifecycle.len())
    }

    /// Whether nothing has been recorded.
    pub const fn is_empty(&self) -> bool {
        self.energy.is_empty() && self.lifecycle.is_empty()
    }

    /// Record an energy change.
    pub fn record_energy(
        &mut self,
        tick: u64,
        agent_id: AgentId,
        delta: i64,
        cause: Cause,
        balance: i64,
    ) -> EnergyEntry {
        let entry = EnergyEntry {
            tick,
            agent_id,
            delta,
            cause,
            balance,
        };
        self.energy.push(entry);
        entry
    }

    /// Record a birth or a death.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotLifecycleCause`] for any cause that is
    /// neither `Death` nor descended from `Birth`.
    pub fn record_lifecycle(
        &mut self,
        tick: u64,
        agent_id: AgentId,
        cause: Cause,
    ) -> Result<LifecycleEntry, LedgerError> {
        if !cause.is_lifecycle() {
            return Err(LedgerError::NotLifecycleCause { cause });
        }
        let entry = LifecycleEntry {
            tick,
            agent_id,
            cause,
        };
        self.lifecycle.push(entry);
        Ok(entry)
    }

    /// All energy entries in insertion order.
    pub fn energy_entries(&self) -> &[EnergyEntry] {
        &self.energy
    }

    /// All lifecycle entries in insertion order.
    pub fn lifecycle_entries(&self) -> &[LifecycleEntry] {
        &self.lifecycle
    }

    /// Energy entries belonging to one agent.
    pub fn entries_for(&self, agent_id: AgentId) -> impl Iterator<Item = &EnergyEntry> {
        self.energy.iter().filter(move |e| e.agent_id == agent_id)
    }

    /// Every agent that has at least one energy entry.
    pub fn agents(&self) -> BTreeSet<AgentId> {
        self.energy.iter().map(|e| e.agent_id).collect()
    }

    /// Sum of every delta recorded for `agent_id`.
    pub fn balance(&self, agent_id: AgentId) -> i64 {
        self.entries_for(agent_id)
            .fold(0_i64, |acc, e| acc.saturating_add(e.delta))
    }

    /// Net energy per cause for entries whose tick lies in `ticks`.
    pub fn totals_by_cause(&self, ticks: RangeInclusive<u64>) -> BTreeMap<Cause, i64> {
        let mut totals: BTreeMap<Cause, i64> = BTreeMap::new();
        for entry in self.energy.iter().filter(|e| ticks.contains(&e.tick)) {
            let total = totals.entry(entry.cause).or_insert(0);
            *total = total.saturating_add(entry.delta);
        }
        totals
    }

    /// Net energy per category over the whole run.
    pub fn totals_by_category(&self) -> BTreeMap<CauseCategory, i64> {
        let mut totals: BTreeMap<CauseCategory, i64> = BTreeMap::new();
        for entry in &self.energy {
            let total = totals.entry(entry.cause.category()).or_insert(0);
            *total = total.saturating_add(entry.delta);
        }
        totals
    }

    /// Number of lifecycle entries tagged with `cause` or a descendant of it.
    pub fn lifecycle_count(&self, cause: Cause) -> usize {
        self.lifecycle.iter().filter(|e| e.cause.is_a(cause)).count()
    }

    /// Check one agent's recorded deltas against its observed energy.
    pub fn verify_agent(&self, agent_id: AgentId, observed: i64) -> ConservationResult {
        conservation::verify_agent(agent_id, &self.energy, observed)
    }

    /// Check every agent in `observed`, plus the running balances stored
    /// on each entry.
    pub fn verify_all(&self, observed: &BTreeMap<AgentId, i64>) -> ConservationResult {
        let running = conservation::verify_running_balances(&self.energy);
        if running != ConservationResult::Balanced {
            return running;
        }
        let result = observed
            .iter()
            .map(|(&agent_id, &energy)| conservation::verify_agent(agent_id, &self.energy, energy))
            .find(|result| *result != ConservationResult::Balanced)
            .unwrap_or(ConservationResult::Balanced);
        if result.is_balanced() {
            tracing::debug!(
                agents = observed.len(),
                entries = self.energy.len(),
                "ledger verified"
            );
        }
        result
    }
}
