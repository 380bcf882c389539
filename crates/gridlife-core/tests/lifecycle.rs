//! End-to-end agent lifecycle tests through the [`Simulation`] API.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::missing_panics_doc,
    missing_docs
)]

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use gridlife_agents::{
    AgentBody, AgentContext, AgentListener, AgentParams, Controller, Environment,
    RandomWalkController,
};
use gridlife_core::{Simulation, SimulationConfig};
use gridlife_types::{AgentType, Cause, Direction, Location, SpawnPoint};
use gridlife_world::{GridEnvironment, GridTopology};

// =============================================================================
// Helpers
// =============================================================================

/// Does nothing on its turn.
#[derive(Debug)]
struct Idle;

impl Controller for Idle {
    fn control_agent(&mut self, _agent: &mut AgentBody, _ctx: &mut AgentContext<'_>) {}

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

/// Steps forward every tick.
#[derive(Debug)]
struct Forward;

impl Controller for Forward {
    fn control_agent(&mut self, agent: &mut AgentBody, ctx: &mut AgentContext<'_>) {
        let _outcome = agent.step(ctx);
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

fn world(width: u32, height: u32, wrap: bool, params: &[AgentParams]) -> Simulation {
    let topology = GridTopology::new(width, height, 1, wrap).unwrap();
    let mut environment = GridEnvironment::new(topology).unwrap();
    for (index, p) in params.iter().enumerate() {
        environment.set_agent_params(AgentType(u32::try_from(index).unwrap()), p.clone());
    }
    Simulation::with_environment(environment, 3)
}

fn at(x: u32, y: u32, direction: Direction) -> SpawnPoint {
    SpawnPoint::facing(Location::new(x, y, 0), direction)
}

fn energy_causes(sim: &Simulation, id: gridlife_types::AgentId) -> Vec<(i64, Cause)> {
    sim.ledger()
        .entries_for(id)
        .map(|entry| (entry.delta, entry.cause))
        .collect()
}

// =============================================================================
// Spawning
// =============================================================================

#[test]
fn root_spawn_occupies_cell_and_credits_energy() {
    let mut sim = world(5, 5, false, &[AgentParams::default()]);
    let id = sim
        .spawn_agent(AgentType(0), at(2, 2, Direction::West), Box::new(Idle))
        .unwrap();

    let body = sim.agent(id).unwrap().body();
    assert_eq!(body.energy(), 100);
    assert_eq!(body.birth_tick(), 0);
    assert_eq!(sim.environment().agent_at(Location::new(2, 2, 0)), Some(id));
    assert_eq!(energy_causes(&sim, id), vec![(100, Cause::CreationBirth)]);
    assert_eq!(sim.ledger().lifecycle_count(Cause::CreationBirth), 1);
    assert_eq!(sim.population().get(id).unwrap().agent_type, AgentType(0));
}

#[test]
fn offspring_are_attributed_to_their_parentage() {
    let mut sim = world(6, 6, false, &[AgentParams::default()]);
    let a = sim
        .spawn_agent(AgentType(0), at(0, 0, Direction::East), Box::new(RandomWalkController::new(20)))
        .unwrap();
    let b = sim
        .spawn_agent(AgentType(0), at(5, 5, Direction::East), Box::new(RandomWalkController::new(40)))
        .unwrap();

    let solo = sim.breed_asexual(a, at(2, 2, Direction::North)).unwrap();
    let pair = sim.breed_sexual(a, b, SpawnPoint::anywhere_facing(Location::new(3, 3, 0))).unwrap();

    assert_eq!(energy_causes(&sim, solo), vec![(100, Cause::AsexualBirth)]);
    assert_eq!(energy_causes(&sim, pair), vec![(100, Cause::SexualBirth)]);
    assert_eq!(sim.ledger().lifecycle_count(Cause::AsexualBirth), 1);
    assert_eq!(sim.ledger().lifecycle_count(Cause::SexualBirth), 1);

    let child = sim.agent(pair).unwrap();
    let walker = child
        .controller()
        .as_any()
        .downcast_ref::<RandomWalkController>()
        .unwrap();
    assert_eq!(walker.turn_pct(), 30);
    assert!(child.body().position().is_some());
}

// =============================================================================
// Death
// =============================================================================

#[test]
fn aging_agent_dies_on_its_limit_tick() {
    let aging = AgentParams {
        aging_mode: true,
        aging_limit: 10,
        ..AgentParams::default()
    };
    let mut sim = world(4, 4, false, &[aging]);
    let id = sim
        .spawn_agent(AgentType(0), at(1, 1, Direction::North), Box::new(Idle))
        .unwrap();

    for _ in 0..10 {
        sim.tick().unwrap();
    }
    assert!(sim.agent(id).unwrap().body().is_alive());
    assert_eq!(sim.agent(id).unwrap().body().age(sim.time()), 10);

    let stats = sim.tick().unwrap();
    assert_eq!(stats.tick, 10);
    assert_eq!(stats.deaths, 1);
    assert!(sim.agent(id).is_none());
    assert!(!sim.environment().has_agent(Location::new(1, 1, 0)));

    let record = sim.population().get(id).unwrap();
    assert_eq!(record.death_tick, Some(10));
    assert_eq!(record.final_energy, Some(0));
    assert_eq!(
        energy_causes(&sim, id),
        vec![(100, Cause::CreationBirth), (-100, Cause::Death)]
    );
    assert!(sim.verify_ledger().is_balanced());
}

#[test]
fn exhausted_agent_dies_on_next_update() {
    let frail = AgentParams {
        init_energy: 2,
        step_energy: 1,
        ..AgentParams::default()
    };
    let mut sim = world(5, 5, true, &[frail]);
    let id = sim
        .spawn_agent(AgentType(0), at(0, 0, Direction::East), Box::new(Forward))
        .unwrap();

    sim.tick().unwrap();
    sim.tick().unwrap();
    assert_eq!(sim.agent(id).unwrap().body().energy(), 0);
    assert!(sim.agent(id).unwrap().body().is_alive());

    sim.tick().unwrap();
    assert!(sim.agent(id).is_none());
    assert_eq!(sim.environment().occupied_count(), 0);
    assert_eq!(
        energy_causes(&sim, id),
        vec![
            (2, Cause::CreationBirth),
            (-1, Cause::StepForward),
            (-1, Cause::StepForward),
            (0, Cause::Death),
        ]
    );
    assert!(sim.verify_ledger().is_balanced());
}

// =============================================================================
// Stepping
// =============================================================================

#[test]
fn stepping_onto_food_eats_it() {
    let mut sim = world(4, 4, false, &[AgentParams::default()]);
    sim.environment_mut().place_food(Location::new(1, 0, 0), 3).unwrap();
    let id = sim
        .spawn_agent(AgentType(0), at(0, 0, Direction::East), Box::new(Forward))
        .unwrap();

    let stats = sim.tick().unwrap();
    assert_eq!(stats.steps, 1);
    assert_eq!(stats.food_eaten, 1);

    let body = sim.agent(id).unwrap().body();
    assert_eq!(body.position().unwrap().location, Location::new(1, 0, 0));
    assert_eq!(body.energy(), 99);
    assert_eq!(sim.environment().food_at(Location::new(1, 0, 0)), None);
    assert_eq!(sim.environment().agent_at(Location::new(1, 0, 0)), Some(id));
    assert!(!sim.environment().has_agent(Location::new(0, 0, 0)));
}

#[test]
fn bumping_another_agent_costs_contact_energy() {
    let mut sim = world(4, 4, false, &[AgentParams::default(), AgentParams::default()]);
    let mover = sim
        .spawn_agent(AgentType(0), at(0, 0, Direction::East), Box::new(Forward))
        .unwrap();
    let target = sim
        .spawn_agent(AgentType(1), at(1, 0, Direction::North), Box::new(Idle))
        .unwrap();

    let stats = sim.tick().unwrap();
    assert_eq!(stats.contacts, 1);
    assert_eq!(stats.steps, 0);

    let body = sim.agent(mover).unwrap().body();
    assert_eq!(body.energy(), 98);
    assert_eq!(body.position().unwrap().location, Location::new(0, 0, 0));
    assert_eq!(sim.agent(target).unwrap().body().energy(), 100);
    assert_eq!(
        energy_causes(&sim, mover).last(),
        Some(&(-2, Cause::BumpAgent))
    );
}

#[test]
fn edge_in_bounded_world_blocks_without_cost() {
    let mut sim = world(3, 3, false, &[AgentParams::default()]);
    let id = sim
        .spawn_agent(AgentType(0), at(2, 1, Direction::East), Box::new(Forward))
        .unwrap();

    sim.tick().unwrap();
    let body = sim.agent(id).unwrap().body();
    assert_eq!(body.energy(), 100);
    assert_eq!(body.position().unwrap().location, Location::new(2, 1, 0));
}

// =============================================================================
// Whole runs
// =============================================================================

#[derive(Debug, Default)]
struct Counts {
    spawns: usize,
    deaths: usize,
}

struct Recorder(Rc<RefCell<Counts>>);

impl AgentListener for Recorder {
    fn on_spawn(&mut self, _agent: &AgentBody, _parentage: gridlife_agents::Parentage) {
        self.0.borrow_mut().spawns += 1;
    }

    fn on_death(&mut self, _agent: &AgentBody) {
        self.0.borrow_mut().deaths += 1;
    }
}

#[test]
fn attached_listener_sees_every_lifecycle_event() {
    let frail = AgentParams {
        init_energy: 1,
        ..AgentParams::default()
    };
    let mut sim = world(4, 4, true, &[frail]);
    let counts = Rc::new(RefCell::new(Counts::default()));
    sim.add_listener(Box::new(Recorder(Rc::clone(&counts))));

    for x in 0..3 {
        sim.spawn_agent(AgentType(0), at(x, 0, Direction::North), Box::new(Forward))
            .unwrap();
    }
    let summary = sim.run(20).unwrap();

    assert!(summary.extinct);
    assert_eq!(summary.ever_lived, 3);
    assert_eq!(counts.borrow().spawns, 3);
    assert_eq!(counts.borrow().deaths, 3);
    assert_eq!(sim.ledger().lifecycle_count(Cause::Death), 3);
    assert!(sim.verify_ledger().is_balanced());
}

#[test]
fn configured_run_keeps_occupancy_and_ledger_consistent() {
    let config = SimulationConfig::parse(
        "world:\n  seed: 11\n  width: 8\n  height: 8\n  wrap: true\nagent_types:\n  - init_energy: 30\n    turn_pct: 30\n  - init_energy: 40\n    step_agent_energy: 5\n    turn_pct: 10\n",
    )
    .unwrap();
    let mut sim = Simulation::new(&config).unwrap();

    let cells = sim.environment().free_cells();
    for (n, location) in cells.iter().step_by(5).take(10).enumerate() {
        let agent_type = AgentType(u32::try_from(n % 2).unwrap());
        let turn_pct = config.agent_types[n % 2].turn_pct;
        sim.spawn_agent(
            agent_type,
            SpawnPoint::anywhere_facing(*location),
            Box::new(RandomWalkController::new(turn_pct)),
        )
        .unwrap();
    }

    for _ in 0..25 {
        sim.tick().unwrap();
        assert_eq!(sim.environment().occupied_count(), sim.living_count());
        for agent in sim.agents() {
            let position = agent.body().position().unwrap();
            assert_eq!(sim.environment().agent_at(position.location), Some(agent.id()));
        }
    }
    assert!(sim.verify_ledger().is_balanced());
}
