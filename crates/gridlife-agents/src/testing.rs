//! In-memory collaborators for unit tests.

use std::any::Any;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

use gridlife_types::{AgentId, AgentType, Cause, Direction, Location, LocationDirection};

use crate::agent::AgentBody;
use crate::controller::Controller;
use crate::environment::{Environment, Topology};
use crate::params::AgentParams;
use crate::simulation::{AgentContext, AgentListener, EnergyChange, Occupant, Parentage, SimulationInternals};

pub fn params(init_energy: i64, step_energy: i64, step_agent_energy: i64) -> AgentParams {
    AgentParams {
        init_energy,
        step_energy,
        step_agent_energy,
        aging_mode: false,
        aging_limit: 0,
    }
}

/// Bounded single-layer grid.
#[derive(Debug)]
pub struct FlatTopology {
    width: u32,
    height: u32,
}

impl Topology for FlatTopology {
    fn adjacent(&self, position: LocationDirection) -> LocationDirection {
        let Location { x, y, z } = position.location;
        let next = match position.direction {
            Direction::East => x.checked_add(1).filter(|&x| x < self.width).map(|x| Location::new(x, y, z)),
            Direction::West => x.checked_sub(1).map(|x| Location::new(x, y, z)),
            Direction::North => y.checked_add(1).filter(|&y| y < self.height).map(|y| Location::new(x, y, z)),
            Direction::South => y.checked_sub(1).map(|y| Location::new(x, y, z)),
            Direction::Up | Direction::Down => None,
        };
        next.map_or(position, |next| next.facing(position.direction))
    }

    fn turn_left(&self, position: LocationDirection) -> LocationDirection {
        let direction = match position.direction {
            Direction::East => Direction::North,
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::Up | Direction::Down => Direction::North,
        };
        position.location.facing(direction)
    }

    fn turn_right(&self, position: LocationDirection) -> LocationDirection {
        let direction = match position.direction {
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
            Direction::North => Direction::East,
            Direction::Up | Direction::Down => Direction::South,
        };
        position.location.facing(direction)
    }

    fn turn_up(&self, position: LocationDirection) -> LocationDirection {
        position.location.facing(Direction::Up)
    }

    fn turn_down(&self, position: LocationDirection) -> LocationDirection {
        position.location.facing(Direction::Down)
    }

    fn random_direction(&self, rng: &mut dyn RngCore) -> Direction {
        let index = rng.random_range(0..Direction::HORIZONTAL.len());
        Direction::HORIZONTAL.get(index).copied().unwrap_or(Direction::East)
    }
}

#[derive(Debug)]
pub struct FakeEnvironment {
    pub topology: FlatTopology,
    pub occupancy: BTreeMap<Location, AgentId>,
    pub food: HashMap<Location, u32>,
    pub obstacles: HashSet<Location>,
    pub params: HashMap<AgentType, Arc<AgentParams>>,
}

impl FakeEnvironment {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            topology: FlatTopology { width, height },
            occupancy: BTreeMap::new(),
            food: HashMap::new(),
            obstacles: HashSet::new(),
            params: HashMap::new(),
        }
    }

    pub fn set_params(&mut self, agent_type: AgentType, params: AgentParams) {
        self.params.insert(agent_type, Arc::new(params));
    }
}

impl Environment for FakeEnvironment {
    fn topology(&self) -> &dyn Topology {
        &self.topology
    }

    fn has_agent(&self, location: Location) -> bool {
        self.occupancy.contains_key(&location)
    }

    fn agent_at(&self, location: Location) -> Option<AgentId> {
        self.occupancy.get(&location).copied()
    }

    fn set_agent(&mut self, location: Location, agent: Option<AgentId>) {
        match agent {
            Some(id) => self.occupancy.insert(location, id),
            None => self.occupancy.remove(&location),
        };
    }

    fn is_obstacle(&self, location: Location) -> bool {
        self.obstacles.contains(&location)
    }

    fn food_at(&self, location: Location) -> Option<u32> {
        self.food.get(&location).copied()
    }

    fn remove_food(&mut self, location: Location) {
        self.food.remove(&location);
    }

    fn agent_params(&self, agent_type: AgentType) -> Option<Arc<AgentParams>> {
        self.params.get(&agent_type).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Spawn(AgentId, Parentage),
    Step(AgentId, Option<LocationDirection>, Option<LocationDirection>),
    Contact(AgentId, AgentId),
    ConsumeFood(AgentId, u32),
    Energy(AgentId, EnergyChange),
    Death(AgentId),
}

impl AgentListener for Vec<Event> {
    fn on_spawn(&mut self, agent: &AgentBody, parentage: Parentage) {
        self.push(Event::Spawn(agent.id(), parentage));
    }

    fn on_step(
        &mut self,
        agent: &AgentBody,
        from: Option<LocationDirection>,
        to: Option<LocationDirection>,
    ) {
        self.push(Event::Step(agent.id(), from, to));
    }

    fn on_contact(&mut self, agent: &AgentBody, other: &Occupant) {
        self.push(Event::Contact(agent.id(), other.id));
    }

    fn on_consume_food(&mut self, agent: &AgentBody, food: u32) {
        self.push(Event::ConsumeFood(agent.id(), food));
    }

    fn on_energy_changed(&mut self, agent: &AgentBody, change: &EnergyChange) {
        self.push(Event::Energy(agent.id(), *change));
    }

    fn on_death(&mut self, agent: &AgentBody) {
        self.push(Event::Death(agent.id()));
    }
}

#[derive(Debug)]
pub struct FakeSimulation {
    pub time: u64,
    pub events: Vec<Event>,
    rng: SmallRng,
    registry: HashMap<AgentId, Occupant>,
}

impl FakeSimulation {
    pub fn at(time: u64) -> Self {
        Self {
            time,
            events: Vec::new(),
            rng: SmallRng::seed_from_u64(7),
            registry: HashMap::new(),
        }
    }

    pub fn mark_dead(&mut self, id: AgentId) {
        if let Some(occupant) = self.registry.get_mut(&id) {
            occupant.alive = false;
        }
    }

    /// `(delta, cause)` of every energy change recorded for `id`.
    pub fn energy_causes(&self, id: AgentId) -> Vec<(i64, Cause)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Energy(agent, change) if *agent == id => Some((change.delta, change.cause)),
                _ => None,
            })
            .collect()
    }
}

impl SimulationInternals for FakeSimulation {
    fn time(&self) -> u64 {
        self.time
    }

    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }

    fn listener(&mut self) -> &mut dyn AgentListener {
        &mut self.events
    }

    fn register_agent(&mut self, agent: &AgentBody) {
        self.registry.insert(
            agent.id(),
            Occupant {
                id: agent.id(),
                agent_type: agent.agent_type(),
                alive: agent.is_alive(),
            },
        );
    }

    fn occupant(&self, id: AgentId) -> Option<Occupant> {
        self.registry.get(&id).copied()
    }
}

/// Steps forward every tick.
#[derive(Debug, Clone, Copy)]
pub struct StepController;

impl Controller for StepController {
    fn control_agent(&mut self, agent: &mut AgentBody, ctx: &mut AgentContext<'_>) {
        let _ = agent.step(ctx);
    }

    fn create_child_asexual(&self) -> Box<dyn Controller> {
        Box::new(Self)
    }

    fn create_child_sexual(&self, _other: &dyn Controller) -> Box<dyn Controller> {
        Box::new(Self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// How a [`LineageController`] came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lineage {
    Root,
    Asexual,
    Sexual,
}

/// Idles, and remembers which derivation produced it.
#[derive(Debug, Clone, Copy)]
pub struct LineageController(pub Lineage);

impl LineageController {
    pub fn of(controller: &dyn Controller) -> Option<Lineage> {
        controller.as_any().downcast_ref::<Self>().map(|c| c.0)
    }
}

impl Controller for LineageController {
    fn control_agent(&mut self, _agent: &mut AgentBody, _ctx: &mut AgentContext<'_>) {}

    fn create_child_asexual(&self) -> Box<dyn Controller> {
        Box::new(Self(Lineage::Asexual))
    }

    fn create_child_sexual(&self, _other: &dyn Controller) -> Box<dyn Controller> {
        Box::new(Self(Lineage::Sexual))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
