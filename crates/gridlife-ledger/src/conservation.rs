//! Balance verification for the causation ledger.
//!
//! Energy only changes through the agent's ledger operation, so the sum of
//! the deltas recorded for an agent must equal the energy the agent holds.
//! Each entry also stores the balance the agent reported right after the
//! change; replaying the deltas must reproduce every one of those values.
//!
//! A violation produces a [`LedgerAnomaly`].

use std::collections::BTreeMap;

use gridlife_types::AgentId;

use crate::LedgerAnomaly;
use crate::ledger::EnergyEntry;

/// The result of a balance check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConservationResult {
    /// Recorded deltas agree with observed energy.
    Balanced,
    /// Recorded deltas and observed energy disagree.
    Anomaly(LedgerAnomaly),
}

impl ConservationResult {
    /// Whether the check passed.
    pub const fn is_balanced(&self) -> bool {
        matches!(self, Self::Balanced)
    }
}

/// Verify that `agent_id`'s recorded deltas sum to `observed`.
pub fn verify_agent(agent_id: AgentId, entries: &[EnergyEntry], observed: i64) -> ConservationResult {
    let recorded = entries
        .iter()
        .filter(|e| e.agent_id == agent_id)
        .fold(0_i64, |acc, e| acc.saturating_add(e.delta));

    if recorded == observed {
        ConservationResult::Balanced
    } else {
        ConservationResult::Anomaly(LedgerAnomaly {
            agent_id,
            recorded,
            observed,
            message: format!(
                "LEDGER_ANOMALY for agent {agent_id}: recorded deltas sum to {recorded}, observed energy is {observed}",
            ),
        })
    }
}

/// Replay all entries and check the balance stored on each one.
///
/// Returns the first disagreement found, in insertion order.
pub fn verify_running_balances(entries: &[EnergyEntry]) -> ConservationResult {
    let mut running: BTreeMap<AgentId, i64> = BTreeMap::new();

    for entry in entries {
        let sum = running.entry(entry.agent_id).or_insert(0);
        *sum = sum.saturating_add(entry.delta);
        if *sum != entry.balance {
            let recorded = *sum;
            return ConservationResult::Anomaly(LedgerAnomaly {
                agent_id: entry.agent_id,
                recorded,
                observed: entry.balance,
                message: format!(
                    "LEDGER_ANOMALY at tick {}: agent {} reported balance {} after {:?}, replay gives {recorded}",
                    entry.tick, entry.agent_id, entry.balance, entry.cause,
                ),
            });
        }
    }

    ConservationResult::Balanced
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use gridlife_types::Cause;

    use super::*;

    fn entry(agent_id: AgentId, tick: u64, delta: i64, cause: Cause, balance: i64) -> EnergyEntry {
        EnergyEntry {
            tick,
            agent_id,
            delta,
            cause,
            balance,
        }
    }

    #[test]
    fn empty_entries_balance_at_zero() {
        let agent = AgentId::new();
        assert!(verify_agent(agent, &[], 0).is_balanced());
        assert!(verify_running_balances(&[]).is_balanced());
    }

    #[test]
    fn matching_energy_is_balanced() {
        let agent = AgentId::new();
        let entries = vec![
            entry(agent, 0, 20, Cause::CreationBirth, 20),
            entry(agent, 1, -3, Cause::StepForward, 17),
        ];
        assert_eq!(verify_agent(agent, &entries, 17), ConservationResult::Balanced);
        assert!(verify_running_balances(&entries).is_balanced());
    }

    #[test]
    fn dropped_delta_is_detected() {
        let agent = AgentId::new();
        let entries = vec![entry(agent, 0, 20, Cause::CreationBirth, 20)];
        let result = verify_agent(agent, &entries, 19);
        match result {
            ConservationResult::Anomaly(anomaly) => {
                assert_eq!(anomaly.recorded, 20);
                assert_eq!(anomaly.observed, 19);
                assert!(anomaly.message.contains("LEDGER_ANOMALY"));
            }
            ConservationResult::Balanced => panic!("expected an anomaly"),
        }
    }

    #[test]
    fn inconsistent_running_balance_is_detected() {
        let agent = AgentId::new();
        let entries = vec![
            entry(agent, 0, 20, Cause::CreationBirth, 20),
            entry(agent, 1, -3, Cause::StepForward, 18),
        ];
        assert!(!verify_running_balances(&entries).is_balanced());
    }

    #[test]
    fn negative_energy_death_keeps_balance() {
        let agent = AgentId::new();
        let entries = vec![
            entry(agent, 0, 2, Cause::CreationBirth, 2),
            entry(agent, 1, -5, Cause::BumpAgent, -3),
            entry(agent, 2, 0, Cause::Death, -3),
        ];
        assert!(verify_agent(agent, &entries, -3).is_balanced());
        assert!(verify_running_balances(&entries).is_balanced());
    }
}
