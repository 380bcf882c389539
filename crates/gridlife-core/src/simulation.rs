//! The sequential tick scheduler.
//!
//! [`Simulation`] owns the world, every live agent, the clock, the random
//! source and the [`EventJournal`]. Each [`tick`](Simulation::tick):
//!
//! 1. Updates every agent once, in ascending id order (creation order).
//!    The agent being updated is taken out of the registry for the
//!    duration of its update, so it can borrow the world and the rest of
//!    the simulation mutably.
//! 2. Reaps agents that died, recording their final energy.
//! 3. Closes the tick's statistics and advances the clock.
//!
//! Agents are created between ticks with [`spawn_agent`](Simulation::spawn_agent),
//! [`breed_asexual`](Simulation::breed_asexual) and
//! [`breed_sexual`](Simulation::breed_sexual).

use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;

use gridlife_agents::{
    Agent, AgentBody, AgentContext, AgentListener, Controller, Occupant, Parent2,
    SimulationInternals, UnbornAgent,
};
use gridlife_ledger::{CauseLedger, ConservationResult};
use gridlife_types::{AgentId, AgentType, SpawnPoint};
use gridlife_world::{GridEnvironment, GridTopology, WorldError};

use crate::clock::{ClockError, SimClock};
use crate::config::{ConfigError, SimulationConfig};
use crate::journal::{EventJournal, TickStats};
use crate::population::Population;

/// Errors raised by the scheduler.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// Clock failure.
    #[error("clock error: {0}")]
    Clock(#[from] ClockError),

    /// World setup or placement failure.
    #[error("world error: {0}")]
    World(#[from] WorldError),

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// No parameters are registered for the type.
    #[error("unknown agent type {0}")]
    UnknownAgentType(AgentType),

    /// No live agent has this id.
    #[error("no live agent {0}")]
    UnknownAgent(AgentId),

    /// An agent cannot be both parents.
    #[error("agent {0} cannot breed with itself")]
    SelfPairing(AgentId),
}

/// What a finished run looked like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Ticks executed by this call.
    pub ticks_run: u64,
    /// Clock value when the run stopped.
    pub final_tick: u64,
    /// Agents alive at the end.
    pub living: usize,
    /// Agents ever registered.
    pub ever_lived: usize,
    /// Whether the run stopped because every agent died.
    pub extinct: bool,
}

/// Everything an agent can reach through [`SimulationInternals`].
#[derive(Debug)]
struct SimulationCore {
    clock: SimClock,
    rng: SmallRng,
    journal: EventJournal,
    population: Population,
    agents: BTreeMap<AgentId, Agent>,
}

impl SimulationInternals for SimulationCore {
    fn time(&self) -> u64 {
        self.clock.tick()
    }

    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }

    fn listener(&mut self) -> &mut dyn AgentListener {
        &mut self.journal
    }

    fn register_agent(&mut self, agent: &AgentBody) {
        self.population
            .register(agent.id(), agent.agent_type(), agent.birth_tick());
    }

    fn occupant(&self, id: AgentId) -> Option<Occupant> {
        self.agents.get(&id).map(|agent| Occupant {
            id,
            agent_type: agent.body().agent_type(),
            alive: agent.body().is_alive(),
        })
    }
}

/// A running Gridlife world.
#[derive(Debug)]
pub struct Simulation {
    environment: GridEnvironment,
    core: SimulationCore,
}

impl Simulation {
    /// Build an empty world from configuration.
    ///
    /// Agent type `n` gets the parameters of `config.agent_types[n]`.
    ///
    /// # Errors
    ///
    /// Fails if the configuration does not validate or the grid cannot be
    /// allocated.
    pub fn new(config: &SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let world = &config.world;
        let topology = GridTopology::new(world.width, world.height, world.depth, world.wrap)?;
        let mut environment = GridEnvironment::new(topology)?;
        for (number, type_config) in (0_u32..).zip(&config.agent_types) {
            environment.set_agent_params(AgentType(number), type_config.params());
        }
        Ok(Self::with_environment(environment, world.seed))
    }

    /// Wrap a prepared environment.
    pub fn with_environment(environment: GridEnvironment, seed: u64) -> Self {
        Self {
            environment,
            core: SimulationCore {
                clock: SimClock::new(),
                rng: SmallRng::seed_from_u64(seed),
                journal: EventJournal::new(),
                population: Population::new(),
                agents: BTreeMap::new(),
            },
        }
    }

    /// The current tick.
    pub const fn time(&self) -> u64 {
        self.core.clock.tick()
    }

    /// The world.
    pub const fn environment(&self) -> &GridEnvironment {
        &self.environment
    }

    /// Mutable world access for setup (food, obstacles).
    pub const fn environment_mut(&mut self) -> &mut GridEnvironment {
        &mut self.environment
    }

    /// The simulation's seeded random source.
    pub const fn rng(&mut self) -> &mut SmallRng {
        &mut self.core.rng
    }

    /// Forward all future agent events to `listener`, after the journal.
    pub fn add_listener(&mut self, listener: Box<dyn AgentListener>) {
        self.core.journal.attach(listener);
    }

    /// A live agent.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.core.agents.get(&id)
    }

    /// All live agents in id order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.core.agents.values()
    }

    /// Number of live agents.
    pub fn living_count(&self) -> usize {
        self.core
            .agents
            .values()
            .filter(|agent| agent.body().is_alive())
            .count()
    }

    /// Registry of every agent ever spawned.
    pub const fn population(&self) -> &Population {
        &self.core.population
    }

    /// The causation ledger.
    pub const fn ledger(&self) -> &CauseLedger {
        self.core.journal.ledger()
    }

    /// Counters accumulated so far in the current tick.
    pub const fn current_stats(&self) -> &TickStats {
        self.core.journal.stats()
    }

    /// Root-spawn an agent of `agent_type` at `point`.
    ///
    /// # Errors
    ///
    /// Fails if the cell is off the grid, occupied or an obstacle, or the
    /// type has no parameters.
    pub fn spawn_agent(
        &mut self,
        agent_type: AgentType,
        point: SpawnPoint,
        controller: Box<dyn Controller>,
    ) -> Result<AgentId, SimulationError> {
        self.environment.check_vacant(point.location)?;
        let mut ctx = AgentContext::new(&mut self.environment, &mut self.core);
        let agent = UnbornAgent::new(agent_type)
            .spawn(&mut ctx, point, controller)
            .ok_or(SimulationError::UnknownAgentType(agent_type))?;
        Ok(self.adopt(agent))
    }

    /// Spawn an asexual child of `parent` at `point`.
    ///
    /// # Errors
    ///
    /// Fails if the parent is not a live agent or the cell cannot hold an
    /// agent.
    pub fn breed_asexual(
        &mut self,
        parent: AgentId,
        point: SpawnPoint,
    ) -> Result<AgentId, SimulationError> {
        self.environment.check_vacant(point.location)?;
        let parent_agent = self.take_live(parent)?;

        let mut ctx = AgentContext::new(&mut self.environment, &mut self.core);
        let child = parent_agent.create_child_asexual(&mut ctx, point);

        self.core.agents.insert(parent, parent_agent);
        Ok(self.adopt(child))
    }

    /// Spawn a child of `parent` and `other` at `point`.
    ///
    /// # Errors
    ///
    /// Fails if either parent is not a live agent, both are the same agent,
    /// or the cell cannot hold an agent.
    pub fn breed_sexual(
        &mut self,
        parent: AgentId,
        other: AgentId,
        point: SpawnPoint,
    ) -> Result<AgentId, SimulationError> {
        if parent == other {
            return Err(SimulationError::SelfPairing(parent));
        }
        self.environment.check_vacant(point.location)?;
        let first = self.take_live(parent)?;
        let second = match self.take_live(other) {
            Ok(agent) => agent,
            Err(error) => {
                self.core.agents.insert(parent, first);
                return Err(error);
            }
        };

        let mut ctx = AgentContext::new(&mut self.environment, &mut self.core);
        let child = first.create_child_sexual(&mut ctx, point, Parent2::SameKind(&second));

        self.core.agents.insert(parent, first);
        self.core.agents.insert(other, second);
        Ok(self.adopt(child))
    }

    /// Run one tick and return its statistics.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Clock`] if the clock cannot advance.
    pub fn tick(&mut self) -> Result<TickStats, SimulationError> {
        let now = self.core.clock.tick();
        let order: Vec<AgentId> = self.core.agents.keys().copied().collect();

        for id in order {
            let Some(mut agent) = self.core.agents.remove(&id) else {
                continue;
            };
            let mut ctx = AgentContext::new(&mut self.environment, &mut self.core);
            agent.update(&mut ctx);
            self.core.agents.insert(id, agent);
        }

        self.reap(now);

        let next = self.core.clock.advance()?;
        let stats = self.core.journal.roll_over(next);
        tracing::debug!(
            tick = now,
            living = self.core.agents.len(),
            spawns = stats.spawns,
            deaths = stats.deaths,
            steps = stats.steps,
            contacts = stats.contacts,
            food_eaten = stats.food_eaten,
            "tick complete"
        );
        Ok(stats)
    }

    /// Tick until `max_ticks` have run or no agent is left alive.
    ///
    /// # Errors
    ///
    /// Propagates any [`tick`](Self::tick) failure.
    pub fn run(&mut self, max_ticks: u64) -> Result<RunSummary, SimulationError> {
        let mut ticks_run: u64 = 0;
        while ticks_run < max_ticks && self.living_count() > 0 {
            self.tick()?;
            ticks_run = ticks_run.saturating_add(1);
        }
        Ok(RunSummary {
            ticks_run,
            final_tick: self.time(),
            living: self.living_count(),
            ever_lived: self.core.population.len(),
            extinct: self.living_count() == 0,
        })
    }

    /// Check the causation ledger against every agent's observed energy,
    /// living or reaped.
    pub fn verify_ledger(&self) -> ConservationResult {
        let mut observed: BTreeMap<AgentId, i64> =
            self.core.population.final_energies().collect();
        for (id, agent) in &self.core.agents {
            observed.insert(*id, agent.body().energy());
        }
        let result = self.ledger().verify_all(&observed);
        if let ConservationResult::Anomaly(anomaly) = &result {
            tracing::warn!(agent_id = %anomaly.agent_id, %anomaly, "ledger anomaly");
        }
        result
    }

    fn adopt(&mut self, agent: Agent) -> AgentId {
        let id = agent.id();
        self.core.agents.insert(id, agent);
        id
    }

    fn take_live(&mut self, id: AgentId) -> Result<Agent, SimulationError> {
        match self.core.agents.remove(&id) {
            Some(agent) if agent.body().is_alive() => Ok(agent),
            Some(agent) => {
                self.core.agents.insert(id, agent);
                Err(SimulationError::UnknownAgent(id))
            }
            None => Err(SimulationError::UnknownAgent(id)),
        }
    }

    fn reap(&mut self, now: u64) {
        let dead: Vec<AgentId> = self
            .core
            .agents
            .iter()
            .filter(|(_, agent)| !agent.body().is_alive())
            .map(|(id, _)| *id)
            .collect();
        for id in dead {
            if let Some(agent) = self.core.agents.remove(&id) {
                self.core
                    .population
                    .record_death(id, now, agent.body().energy());
            }
        }
    }
}
