//! Population registry.
//!
//! Every agent the simulation has ever spawned is recorded here with its
//! type and birth tick; reaped agents keep their record with the tick they
//! were removed and their final energy, so ledger verification can still
//! account for them.

use std::collections::BTreeMap;

use serde::Serialize;

use gridlife_types::{AgentId, AgentType};

/// Registry entry for one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PopulationRecord {
    /// Species.
    pub agent_type: AgentType,
    /// Tick of spawn.
    pub birth_tick: u64,
    /// Tick the dead agent was reaped, if it has been.
    pub death_tick: Option<u64>,
    /// Energy at the moment of reaping.
    pub final_energy: Option<i64>,
}

/// All agents ever registered, living and dead.
#[derive(Debug, Clone, Default)]
pub struct Population {
    records: BTreeMap<AgentId, PopulationRecord>,
}

impl Population {
    /// An empty registry.
    pub const fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Record a newly spawned agent.
    pub fn register(&mut self, id: AgentId, agent_type: AgentType, birth_tick: u64) {
        self.records.insert(
            id,
            PopulationRecord {
                agent_type,
                birth_tick,
                death_tick: None,
                final_energy: None,
            },
        );
    }

    /// Mark `id` as reaped at `tick` with `final_energy`.
    ///
    /// Returns `false` if the agent is unknown or was already reaped.
    pub fn record_death(&mut self, id: AgentId, tick: u64, final_energy: i64) -> bool {
        match self.records.get_mut(&id) {
            Some(record) if record.death_tick.is_none() => {
                record.death_tick = Some(tick);
                record.final_energy = Some(final_energy);
                true
            }
            _ => false,
        }
    }

    /// Look up one agent.
    pub fn get(&self, id: AgentId) -> Option<&PopulationRecord> {
        self.records.get(&id)
    }

    /// Total agents ever registered.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Agents not yet reaped.
    pub fn living_count(&self) -> usize {
        self.records.values().filter(|r| r.death_tick.is_none()).count()
    }

    /// Agents reaped so far.
    pub fn dead_count(&self) -> usize {
        self.records.values().filter(|r| r.death_tick.is_some()).count()
    }

    /// Living agents per type. Types with no living agents are omitted.
    pub fn living_by_type(&self) -> BTreeMap<AgentType, usize> {
        self.count_by_type(|r| r.death_tick.is_none())
    }

    /// Reaped agents per type. Types with no deaths are omitted.
    pub fn dead_by_type(&self) -> BTreeMap<AgentType, usize> {
        self.count_by_type(|r| r.death_tick.is_some())
    }

    fn count_by_type(&self, keep: impl Fn(&PopulationRecord) -> bool) -> BTreeMap<AgentType, usize> {
        let mut counts: BTreeMap<AgentType, usize> = BTreeMap::new();
        for record in self.records.values().filter(|r| keep(r)) {
            let count = counts.entry(record.agent_type).or_insert(0);
            *count = count.saturating_add(1);
        }
        counts
    }

    /// Final energy of every reaped agent.
    pub fn final_energies(&self) -> impl Iterator<Item = (AgentId, i64)> + '_ {
        self.records
            .iter()
            .filter_map(|(id, r)| r.final_energy.map(|energy| (*id, energy)))
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn register_and_reap() {
        let mut population = Population::new();
        let a = AgentId::new();
        let b = AgentId::new();
        population.register(a, AgentType(0), 0);
        population.register(b, AgentType(1), 2);

        assert_eq!(population.len(), 2);
        assert_eq!(population.living_count(), 2);
        assert!(population.record_death(a, 5, 0));
        assert!(!population.record_death(a, 6, 0));
        assert!(!population.record_death(AgentId::new(), 6, 0));

        assert_eq!(population.living_count(), 1);
        assert_eq!(population.dead_count(), 1);
        assert_eq!(population.get(a).and_then(|r| r.death_tick), Some(5));
        assert_eq!(population.final_energies().collect::<Vec<_>>(), vec![(a, 0)]);
    }

    #[test]
    fn counts_by_type_split_living_and_dead() {
        let mut population = Population::new();
        let ids: Vec<AgentId> = (0..3).map(|_| AgentId::new()).collect();
        for id in &ids {
            population.register(*id, AgentType(0), 0);
        }
        population.register(AgentId::new(), AgentType(2), 0);
        population.record_death(ids[0], 1, -4);

        let counts = population.living_by_type();
        assert_eq!(counts.get(&AgentType(0)), Some(&2));
        assert_eq!(counts.get(&AgentType(2)), Some(&1));
        assert_eq!(counts.get(&AgentType(1)), None);

        let dead = population.dead_by_type();
        assert_eq!(dead.get(&AgentType(0)), Some(&1));
        assert_eq!(dead.get(&AgentType(2)), None);
    }
}
