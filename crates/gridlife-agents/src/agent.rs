//! The agent entity and its lifecycle state machine.
//!
//! An agent moves through `Unborn -> Alive -> Dead`:
//!
//! - [`UnbornAgent`] holds only an identity and a type. Consuming it through
//!   [`UnbornAgent::spawn`], [`UnbornAgent::spawn_asexual`] or
//!   [`UnbornAgent::spawn_sexual`] yields a placed, registered, energized
//!   [`Agent`].
//! - [`Agent::update`] runs once per tick: it kills the agent when it is
//!   too old or out of energy, and otherwise hands control to the agent's
//!   [`Controller`].
//! - [`AgentBody::die`] is the only transition to `Dead`.
//!
//! Every energy change goes through [`AgentBody::change_energy`] with a
//! [`Cause`], and every position change goes through
//! [`AgentBody::move_to`], so the occupancy map and the agent's position
//! agree at every point a listener can observe.

use std::sync::Arc;

use gridlife_types::{AgentId, AgentType, Cause, LocationDirection, SpawnPoint};

use crate::controller::Controller;
use crate::environment::Tile;
use crate::params::AgentParams;
use crate::simulation::{AgentContext, EnergyChange, Occupant, Parentage};
use crate::state::StateBag;

/// Result of a single [`AgentBody::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum StepOutcome {
    /// The cell ahead is the current cell (edge of a bounded grid).
    Blocked,
    /// The agent moved forward, eating `food` if any lay there.
    Moved {
        /// Food value consumed at the destination.
        food: Option<u32>,
    },
    /// The agent bumped into a dead agent or one of another type.
    Bumped(Occupant),
    /// The agent bumped into a living agent of its own type. No rule at this
    /// layer reacts to it.
    BumpedKin(Occupant),
    /// The cell ahead is impassable terrain, or is held by an agent the
    /// simulation cannot resolve. The latter still costs `step_agent_energy`.
    Obstructed,
    /// The agent is not on the grid.
    Unplaced,
}

/// The second parent of a sexual spawn.
#[derive(Debug, Clone, Copy)]
pub enum Parent2<'a> {
    /// A full agent whose controller can be combined with the first parent's.
    SameKind(&'a Agent),
    /// Some other entity. Controller derivation falls back to asexual.
    OtherKind(AgentId),
}

impl Parent2<'_> {
    /// Identifier of the second parent.
    pub const fn id(&self) -> AgentId {
        match self {
            Self::SameKind(agent) => agent.id(),
            Self::OtherKind(id) => *id,
        }
    }
}

/// An agent that has an identity but is not yet in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnbornAgent {
    id: AgentId,
    agent_type: AgentType,
}

impl UnbornAgent {
    /// Allocate a fresh identity for an agent of `agent_type`.
    pub fn new(agent_type: AgentType) -> Self {
        Self {
            id: AgentId::new(),
            agent_type,
        }
    }

    /// The identity the agent will have once spawned.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// The agent's type.
    pub const fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    /// Root spawn using the environment's defaults for this agent's type.
    ///
    /// Returns `None`, touching nothing, when the environment has no
    /// parameters for the type. The caller must ensure the target cell is
    /// free.
    pub fn spawn(
        self,
        ctx: &mut AgentContext<'_>,
        point: SpawnPoint,
        controller: Box<dyn Controller>,
    ) -> Option<Agent> {
        let params = ctx.environment.agent_params(self.agent_type)?;
        Some(self.spawn_with_params(ctx, point, params, controller))
    }

    /// Root spawn with explicitly supplied parameters.
    pub fn spawn_with_params(
        self,
        ctx: &mut AgentContext<'_>,
        point: SpawnPoint,
        params: Arc<AgentParams>,
        controller: Box<dyn Controller>,
    ) -> Agent {
        self.init(ctx, point, params, controller, Parentage::Created)
    }

    /// Spawn as a copy of `parent`.
    ///
    /// Parameters come from the environment's defaults for the parent's
    /// type, or the parent's own shared parameters when the environment has
    /// none. The controller is derived from the parent's.
    pub fn spawn_asexual(
        self,
        ctx: &mut AgentContext<'_>,
        point: SpawnPoint,
        parent: &Agent,
    ) -> Agent {
        let params = inherited_params(ctx, parent);
        let controller = parent.controller.create_child_asexual();
        self.init(ctx, point, params, controller, Parentage::Asexual(parent.id()))
    }

    /// Spawn as the combination of `parent1` and `parent2`.
    ///
    /// Parameters follow `parent1` as in [`spawn_asexual`](Self::spawn_asexual).
    /// The controller combines both parents' controllers when the second
    /// parent is [`Parent2::SameKind`]; otherwise it is derived from
    /// `parent1` alone.
    pub fn spawn_sexual(
        self,
        ctx: &mut AgentContext<'_>,
        point: SpawnPoint,
        parent1: &Agent,
        parent2: Parent2<'_>,
    ) -> Agent {
        let params = inherited_params(ctx, parent1);
        let controller = match parent2 {
            Parent2::SameKind(other) => parent1
                .controller
                .create_child_sexual(other.controller.as_ref()),
            Parent2::OtherKind(_) => parent1.controller.create_child_asexual(),
        };
        let parentage = Parentage::Sexual(parent1.id(), parent2.id());
        self.init(ctx, point, params, controller, parentage)
    }

    /// Bind parameters and controller, announce, place, register, energize.
    fn init(
        self,
        ctx: &mut AgentContext<'_>,
        point: SpawnPoint,
        params: Arc<AgentParams>,
        controller: Box<dyn Controller>,
        parentage: Parentage,
    ) -> Agent {
        let mut body = AgentBody {
            id: self.id,
            agent_type: self.agent_type,
            position: None,
            energy: 0,
            alive: true,
            birth_tick: ctx.simulation.time(),
            params,
            state: StateBag::new(),
        };

        ctx.simulation.listener().on_spawn(&body, parentage);

        let direction = match point.direction {
            Some(direction) => direction,
            None => ctx
                .environment
                .topology()
                .random_direction(ctx.simulation.rng()),
        };
        body.move_to(ctx, Some(point.location.facing(direction)));

        ctx.simulation.register_agent(&body);

        let init_energy = body.params.init_energy;
        body.change_energy(ctx, init_energy, parentage.cause());

        tracing::debug!(
            agent_id = %body.id,
            agent_type = %body.agent_type,
            location = %point.location,
            ?direction,
            cause = %parentage.cause(),
            "agent spawned"
        );

        Agent { body, controller }
    }
}

fn inherited_params(ctx: &AgentContext<'_>, parent: &Agent) -> Arc<AgentParams> {
    ctx.environment
        .agent_params(parent.body.agent_type)
        .unwrap_or_else(|| Arc::clone(&parent.body.params))
}

/// The state of one agent, without its controller.
///
/// Controllers receive `&mut AgentBody` each tick and act through its
/// methods.
#[derive(Debug)]
pub struct AgentBody {
    id: AgentId,
    agent_type: AgentType,
    position: Option<LocationDirection>,
    energy: i64,
    alive: bool,
    birth_tick: u64,
    params: Arc<AgentParams>,
    state: StateBag,
}

impl AgentBody {
    /// Unique identifier.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Species, fixed at construction.
    pub const fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    /// Current cell and facing, or `None` when off the grid.
    pub const fn position(&self) -> Option<LocationDirection> {
        self.position
    }

    /// Current energy. May be negative.
    pub const fn energy(&self) -> i64 {
        self.energy
    }

    /// Whether the agent has not died yet.
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Tick at which the agent was spawned.
    pub const fn birth_tick(&self) -> u64 {
        self.birth_tick
    }

    /// Age at tick `now`.
    pub const fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.birth_tick)
    }

    /// The parameters shared with the rest of the agent's type.
    pub const fn params(&self) -> &Arc<AgentParams> {
        &self.params
    }

    /// Auxiliary state attached by external collaborators.
    pub const fn state(&self) -> &StateBag {
        &self.state
    }

    /// Mutable auxiliary state.
    pub const fn state_mut(&mut self) -> &mut StateBag {
        &mut self.state
    }

    /// Add `delta` to the agent's energy and report it with `cause`.
    pub fn change_energy(&mut self, ctx: &mut AgentContext<'_>, delta: i64, cause: Cause) {
        self.energy = self.energy.saturating_add(delta);
        let change = EnergyChange {
            tick: ctx.simulation.time(),
            delta,
            cause,
            balance: self.energy,
        };
        ctx.simulation.listener().on_energy_changed(self, &change);
    }

    /// Kill the agent.
    ///
    /// Energy is adjusted by `min(0, -energy)` under [`Cause::Death`], so a
    /// positive balance drops to zero and a negative one is kept. The agent
    /// then leaves the grid. Calling this on a dead agent does nothing.
    pub fn die(&mut self, ctx: &mut AgentContext<'_>) {
        if !self.alive {
            return;
        }
        self.alive = false;

        let delta = self.energy.saturating_neg().min(0);
        self.change_energy(ctx, delta, Cause::Death);
        ctx.simulation.listener().on_death(self);
        if self.position.is_some() {
            self.move_to(ctx, None);
        }

        tracing::debug!(
            agent_id = %self.id,
            tick = ctx.simulation.time(),
            age = self.age(ctx.simulation.time()),
            energy = self.energy,
            "agent died"
        );
    }

    /// Move to `new_position`, or off the grid with `None`.
    ///
    /// The old cell is vacated and the new one occupied before the listener
    /// hears about it; the agent's own position is updated last.
    pub fn move_to(&mut self, ctx: &mut AgentContext<'_>, new_position: Option<LocationDirection>) {
        let old_position = self.position;
        if let Some(old) = old_position {
            ctx.environment.set_agent(old.location, None);
        }
        if let Some(new) = new_position {
            ctx.environment.set_agent(new.location, Some(self.id));
        }
        ctx.simulation
            .listener()
            .on_step(self, old_position, new_position);
        self.position = new_position;
    }

    /// Turn left in place.
    pub fn turn_left(&mut self, ctx: &AgentContext<'_>) {
        if let Some(position) = self.position {
            self.position = Some(ctx.environment.topology().turn_left(position));
        }
    }

    /// Turn right in place.
    pub fn turn_right(&mut self, ctx: &AgentContext<'_>) {
        if let Some(position) = self.position {
            self.position = Some(ctx.environment.topology().turn_right(position));
        }
    }

    /// Face upward.
    pub fn turn_up(&mut self, ctx: &AgentContext<'_>) {
        if let Some(position) = self.position {
            self.position = Some(ctx.environment.topology().turn_up(position));
        }
    }

    /// Face downward.
    pub fn turn_down(&mut self, ctx: &AgentContext<'_>) {
        if let Some(position) = self.position {
            self.position = Some(ctx.environment.topology().turn_down(position));
        }
    }

    /// Try to move one cell forward and resolve what is found there.
    ///
    /// - Free cell: move, eat any food, pay `step_energy` ([`Cause::StepForward`]).
    /// - Agent: report contact, pay `step_agent_energy` ([`Cause::BumpAgent`]),
    ///   stay put.
    /// - Agent the simulation cannot resolve: pay `step_agent_energy`, no
    ///   contact, reported as [`StepOutcome::Obstructed`].
    /// - Obstacle, world edge, or no position: nothing happens.
    pub fn step(&mut self, ctx: &mut AgentContext<'_>) -> StepOutcome {
        let Some(position) = self.position else {
            return StepOutcome::Unplaced;
        };

        let destination = ctx.environment.topology().adjacent(position);
        if destination == position {
            return StepOutcome::Blocked;
        }

        match ctx.environment.tile(destination.location) {
            Tile::Free => self.step_onto_free(ctx, destination),
            Tile::Agent(other) => self.bump_into(ctx, other),
            Tile::Obstacle => StepOutcome::Obstructed,
        }
    }

    fn step_onto_free(
        &mut self,
        ctx: &mut AgentContext<'_>,
        destination: LocationDirection,
    ) -> StepOutcome {
        self.move_to(ctx, Some(destination));

        let food = ctx.environment.food_at(destination.location);
        if let Some(value) = food {
            ctx.simulation.listener().on_consume_food(self, value);
            ctx.environment.remove_food(destination.location);
        }

        let cost = self.params.step_energy;
        self.change_energy(ctx, cost.saturating_neg(), Cause::StepForward);
        StepOutcome::Moved { food }
    }

    fn bump_into(&mut self, ctx: &mut AgentContext<'_>, other: AgentId) -> StepOutcome {
        let cost = self.params.step_agent_energy;
        let Some(occupant) = ctx.simulation.occupant(other) else {
            tracing::warn!(
                agent_id = %self.id,
                occupant = %other,
                "cell held by an unregistered agent, bump charged without contact"
            );
            self.change_energy(ctx, cost.saturating_neg(), Cause::BumpAgent);
            return StepOutcome::Obstructed;
        };

        ctx.simulation.listener().on_contact(self, &occupant);
        self.change_energy(ctx, cost.saturating_neg(), Cause::BumpAgent);

        if occupant.alive && occupant.agent_type == self.agent_type {
            StepOutcome::BumpedKin(occupant)
        } else {
            StepOutcome::Bumped(occupant)
        }
    }
}

/// A live (or dead but not yet reaped) agent: its state plus its controller.
#[derive(Debug)]
pub struct Agent {
    body: AgentBody,
    controller: Box<dyn Controller>,
}

impl Agent {
    /// Unique identifier.
    pub const fn id(&self) -> AgentId {
        self.body.id
    }

    /// The agent's state.
    pub const fn body(&self) -> &AgentBody {
        &self.body
    }

    /// Mutable access to the agent's state.
    pub const fn body_mut(&mut self) -> &mut AgentBody {
        &mut self.body
    }

    /// The agent's decision strategy.
    pub fn controller(&self) -> &dyn Controller {
        self.controller.as_ref()
    }

    /// Run one tick.
    ///
    /// Dead agents are skipped. An agent whose age has reached its aging
    /// limit (when aging is on) or whose energy is zero or below dies;
    /// otherwise its controller acts.
    pub fn update(&mut self, ctx: &mut AgentContext<'_>) {
        if !self.body.alive {
            return;
        }

        let age = self.body.age(ctx.simulation.time());
        if self.body.params.is_too_old(age) || self.body.energy <= 0 {
            self.body.die(ctx);
            return;
        }

        self.controller.control_agent(&mut self.body, ctx);
    }

    /// Spawn an asexual child of the same type at `point`.
    pub fn create_child_asexual(&self, ctx: &mut AgentContext<'_>, point: SpawnPoint) -> Self {
        UnbornAgent::new(self.body.agent_type).spawn_asexual(ctx, point, self)
    }

    /// Spawn a child of this agent and `other` at `point`.
    pub fn create_child_sexual(
        &self,
        ctx: &mut AgentContext<'_>,
        point: SpawnPoint,
        other: Parent2<'_>,
    ) -> Self {
        UnbornAgent::new(self.body.agent_type).spawn_sexual(ctx, point, self, other)
    }
}
