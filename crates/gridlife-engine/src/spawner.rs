//! Initial world seeding.
//!
//! Before the first tick the spawner root-spawns each configured agent
//! type's initial population on distinct random free cells, every agent
//! driven by a [`RandomWalkController`] with its type's turn percentage,
//! then scatters food over the cells left free.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use tracing::{debug, info};

use gridlife_agents::RandomWalkController;
use gridlife_core::{AgentTypeConfig, FoodConfig, Simulation, SimulationConfig};
use gridlife_types::{AgentId, AgentType, Location, SpawnPoint};

use crate::error::EngineError;

/// What the spawner put into the world.
#[derive(Debug)]
pub struct SeedReport {
    /// Spawned agents in creation order.
    pub agents: Vec<AgentId>,
    /// Cells that received food.
    pub food_cells: u32,
    /// Sum of placed food values.
    pub total_food: u64,
}

/// Spawn every type's initial agents, then scatter food.
///
/// # Errors
///
/// Returns [`EngineError::GridFull`] if the free cells run out, or a
/// wrapped world/simulation error if placement is refused.
pub fn seed_world(
    sim: &mut Simulation,
    config: &SimulationConfig,
) -> Result<SeedReport, EngineError> {
    let agents = spawn_seed_agents(sim, &config.agent_types)?;
    let food_cells = scatter_food(sim, &config.food)?;
    Ok(SeedReport {
        agents,
        food_cells,
        total_food: sim.environment().total_food(),
    })
}

/// Put food on up to `food.initial_cells` distinct free cells, each worth a
/// random value in `1..=food.kinds`. Returns the number of cells filled.
///
/// # Errors
///
/// Propagates a refused placement.
pub fn scatter_food(sim: &mut Simulation, food: &FoodConfig) -> Result<u32, EngineError> {
    if food.initial_cells == 0 || food.kinds == 0 {
        return Ok(0);
    }

    let free = sim.environment().free_cells();
    let wanted = usize::try_from(food.initial_cells).unwrap_or(usize::MAX);
    let chosen: Vec<Location> = free.choose_multiple(sim.rng(), wanted).copied().collect();

    let mut placed: u32 = 0;
    for location in chosen {
        let value = sim.rng().random_range(1..=food.kinds);
        sim.environment_mut().place_food(location, value)?;
        placed = placed.saturating_add(1);
    }

    info!(
        requested = food.initial_cells,
        placed,
        kinds = food.kinds,
        "Food scattered"
    );
    Ok(placed)
}

/// Root-spawn `initial_count` agents of each type on distinct free cells.
///
/// Type `n` is `types[n]`. Facings are chosen at random.
///
/// # Errors
///
/// Returns [`EngineError::GridFull`] when no free cell is left.
pub fn spawn_seed_agents(
    sim: &mut Simulation,
    types: &[AgentTypeConfig],
) -> Result<Vec<AgentId>, EngineError> {
    let mut free = sim.environment().free_cells();
    free.shuffle(sim.rng());
    let mut cells = free.into_iter();

    let mut spawned = Vec::new();
    for (number, type_config) in (0_u32..).zip(types) {
        let agent_type = AgentType(number);
        for placed in 0..type_config.initial_count {
            let Some(location) = cells.next() else {
                return Err(EngineError::GridFull {
                    agent_type,
                    placed,
                    requested: type_config.initial_count,
                });
            };
            let id = sim.spawn_agent(
                agent_type,
                SpawnPoint::anywhere_facing(location),
                Box::new(RandomWalkController::new(type_config.turn_pct)),
            )?;
            debug!(agent_id = %id, %agent_type, ?location, "Spawned seed agent");
            spawned.push(id);
        }
        info!(
            %agent_type,
            count = type_config.initial_count,
            init_energy = type_config.params.init_energy,
            turn_pct = type_config.turn_pct,
            "Seeded agent type"
        );
    }
    Ok(spawned)
}
