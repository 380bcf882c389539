//! Bindings between an agent and the simulation that owns it.
//!
//! - [`SimulationInternals`] -- clock, random source, agent registry and
//!   the listener that receives every lifecycle event.
//! - [`AgentListener`] -- observability sink. All methods default to no-ops.
//! - [`AgentContext`] -- the environment and simulation handed to every
//!   agent operation that touches the outside world.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use gridlife_types::{AgentId, AgentType, Cause, LocationDirection};

use crate::agent::AgentBody;
use crate::environment::Environment;

/// How an agent came into the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parentage {
    /// Root spawn with no parents.
    Created,
    /// Copy of a single parent.
    Asexual(AgentId),
    /// Combination of two parents.
    Sexual(AgentId, AgentId),
}

impl Parentage {
    /// The birth cause matching this parentage.
    pub const fn cause(self) -> Cause {
        match self {
            Self::Created => Cause::CreationBirth,
            Self::Asexual(_) => Cause::AsexualBirth,
            Self::Sexual(_, _) => Cause::SexualBirth,
        }
    }
}

/// One attributed energy change, as forwarded to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyChange {
    /// Tick at which the change happened.
    pub tick: u64,
    /// Signed amount added.
    pub delta: i64,
    /// Why.
    pub cause: Cause,
    /// Energy after the change.
    pub balance: i64,
}

/// Summary of another registered agent, as seen by a stepping agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    /// The other agent.
    pub id: AgentId,
    /// Its species.
    pub agent_type: AgentType,
    /// Whether it is still alive.
    pub alive: bool,
}

/// Receives agent lifecycle events.
pub trait AgentListener {
    /// An agent finished spawning.
    fn on_spawn(&mut self, _agent: &AgentBody, _parentage: Parentage) {}

    /// An agent moved from `_from` to `_to`. `None` means off the grid.
    fn on_step(
        &mut self,
        _agent: &AgentBody,
        _from: Option<LocationDirection>,
        _to: Option<LocationDirection>,
    ) {
    }

    /// An agent bumped into another.
    fn on_contact(&mut self, _agent: &AgentBody, _other: &Occupant) {}

    /// An agent ate food worth `_food`.
    fn on_consume_food(&mut self, _agent: &AgentBody, _food: u32) {}

    /// An agent's energy changed.
    fn on_energy_changed(&mut self, _agent: &AgentBody, _change: &EnergyChange) {}

    /// An agent died.
    fn on_death(&mut self, _agent: &AgentBody) {}
}

/// What the owning simulation exposes to its agents.
pub trait SimulationInternals {
    /// The current tick.
    fn time(&self) -> u64;

    /// The simulation's random source.
    fn rng(&mut self) -> &mut dyn RngCore;

    /// The sink for lifecycle events.
    fn listener(&mut self) -> &mut dyn AgentListener;

    /// Record a newly spawned agent in the global registry.
    fn register_agent(&mut self, agent: &AgentBody);

    /// Look up a registered agent other than the one being updated.
    ///
    /// `None` for an id the grid holds but the registry does not know. A
    /// step into such a cell pays the bump cost under [`Cause::BumpAgent`]
    /// with no contact event, and reports an obstructed step.
    fn occupant(&self, id: AgentId) -> Option<Occupant>;
}

/// The collaborators an agent operation runs against.
pub struct AgentContext<'a> {
    /// Occupancy, food and topology.
    pub environment: &'a mut dyn Environment,
    /// Clock, registry, randomness and listener.
    pub simulation: &'a mut dyn SimulationInternals,
}

impl<'a> AgentContext<'a> {
    /// Bundle an environment and a simulation.
    pub const fn new(
        environment: &'a mut dyn Environment,
        simulation: &'a mut dyn SimulationInternals,
    ) -> Self {
        Self {
            environment,
            simulation,
        }
    }

    /// The current tick.
    pub fn time(&self) -> u64 {
        self.simulation.time()
    }
}

impl core::fmt::Debug for AgentContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AgentContext")
            .field("time", &self.simulation.time())
            .finish_non_exhaustive()
    }
}
