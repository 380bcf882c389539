//! The simulation's own listener.
//!
//! [`EventJournal`] receives every agent event first. It appends energy
//! changes and lifecycle events to the [`CauseLedger`], tallies the current
//! tick's [`TickStats`], emits `tracing` events, and then forwards the event
//! to any listeners attached with
//! [`Simulation::add_listener`](crate::Simulation::add_listener), in
//! attachment order.

use serde::Serialize;

use gridlife_agents::{AgentBody, AgentListener, EnergyChange, Occupant, Parentage};
use gridlife_ledger::CauseLedger;
use gridlife_types::{Cause, LocationDirection};

/// Counters for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickStats {
    /// The tick these counters cover.
    pub tick: u64,
    /// Agents spawned.
    pub spawns: u64,
    /// Agents that died.
    pub deaths: u64,
    /// Moves from one cell to another.
    pub steps: u64,
    /// Bumps into other agents.
    pub contacts: u64,
    /// Food items eaten.
    pub food_eaten: u64,
    /// Sum of negative energy deltas, as a positive number.
    pub energy_spent: i64,
    /// Sum of positive energy deltas.
    pub energy_gained: i64,
}

impl TickStats {
    /// Zeroed counters for `tick`.
    pub const fn new(tick: u64) -> Self {
        Self {
            tick,
            spawns: 0,
            deaths: 0,
            steps: 0,
            contacts: 0,
            food_eaten: 0,
            energy_spent: 0,
            energy_gained: 0,
        }
    }
}

/// Ledger, statistics and listener fan-out.
pub struct EventJournal {
    ledger: CauseLedger,
    stats: TickStats,
    listeners: Vec<Box<dyn AgentListener>>,
}

impl core::fmt::Debug for EventJournal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventJournal")
            .field("ledger_entries", &self.ledger.len())
            .field("stats", &self.stats)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for EventJournal {
    fn default() -> Self {
        Self::new()
    }
}

impl EventJournal {
    /// An empty journal at tick 0.
    pub const fn new() -> Self {
        Self {
            ledger: CauseLedger::new(),
            stats: TickStats::new(0),
            listeners: Vec::new(),
        }
    }

    /// The causation ledger.
    pub const fn ledger(&self) -> &CauseLedger {
        &self.ledger
    }

    /// Counters accumulated so far for the current tick.
    pub const fn stats(&self) -> &TickStats {
        &self.stats
    }

    /// Forward all future events to `listener` as well.
    pub fn attach(&mut self, listener: Box<dyn AgentListener>) {
        self.listeners.push(listener);
    }

    /// Return the current tick's counters and start fresh ones for `next`.
    pub const fn roll_over(&mut self, next: u64) -> TickStats {
        std::mem::replace(&mut self.stats, TickStats::new(next))
    }

    fn record_lifecycle(&mut self, tick: u64, agent: &AgentBody, cause: Cause) {
        if let Err(error) = self.ledger.record_lifecycle(tick, agent.id(), cause) {
            tracing::warn!(agent_id = %agent.id(), %error, "lifecycle event not recorded");
        }
    }
}

fn bump(counter: &mut u64) {
    *counter = counter.saturating_add(1);
}

impl AgentListener for EventJournal {
    fn on_spawn(&mut self, agent: &AgentBody, parentage: Parentage) {
        self.record_lifecycle(agent.birth_tick(), agent, parentage.cause());
        bump(&mut self.stats.spawns);
        tracing::debug!(
            tick = agent.birth_tick(),
            agent_id = %agent.id(),
            agent_type = %agent.agent_type(),
            ?parentage,
            "spawn"
        );
        for listener in &mut self.listeners {
            listener.on_spawn(agent, parentage);
        }
    }

    fn on_step(
        &mut self,
        agent: &AgentBody,
        from: Option<LocationDirection>,
        to: Option<LocationDirection>,
    ) {
        if from.is_some() && to.is_some() {
            bump(&mut self.stats.steps);
        }
        for listener in &mut self.listeners {
            listener.on_step(agent, from, to);
        }
    }

    fn on_contact(&mut self, agent: &AgentBody, other: &Occupant) {
        bump(&mut self.stats.contacts);
        tracing::debug!(
            tick = self.stats.tick,
            agent_id = %agent.id(),
            other = %other.id,
            other_alive = other.alive,
            "contact"
        );
        for listener in &mut self.listeners {
            listener.on_contact(agent, other);
        }
    }

    fn on_consume_food(&mut self, agent: &AgentBody, food: u32) {
        bump(&mut self.stats.food_eaten);
        tracing::debug!(tick = self.stats.tick, agent_id = %agent.id(), food, "food eaten");
        for listener in &mut self.listeners {
            listener.on_consume_food(agent, food);
        }
    }

    fn on_energy_changed(&mut self, agent: &AgentBody, change: &EnergyChange) {
        self.ledger.record_energy(
            change.tick,
            agent.id(),
            change.delta,
            change.cause,
            change.balance,
        );
        if change.delta < 0 {
            self.stats.energy_spent = self
                .stats
                .energy_spent
                .saturating_add(change.delta.saturating_neg());
        } else {
            self.stats.energy_gained = self.stats.energy_gained.saturating_add(change.delta);
        }
        for listener in &mut self.listeners {
            listener.on_energy_changed(agent, change);
        }
    }

    fn on_death(&mut self, agent: &AgentBody) {
        let tick = self.stats.tick;
        self.record_lifecycle(tick, agent, Cause::Death);
        bump(&mut self.stats.deaths);
        tracing::debug!(
            tick,
            agent_id = %agent.id(),
            age = agent.age(tick),
            energy = agent.energy(),
            "death"
        );
        for listener in &mut self.listeners {
            listener.on_death(agent);
        }
    }
}
