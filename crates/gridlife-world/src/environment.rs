//! The grid environment: occupancy, food, obstacles and per-type parameters.
//!
//! Cells are stored densely in index order of the owning [`GridTopology`].
//! Agents write occupancy through the [`Environment`] trait; setup code
//! places food and obstacles through the inherent methods, which validate
//! their input and return [`WorldError`].

use std::collections::BTreeMap;
use std::sync::Arc;

use gridlife_agents::{AgentParams, Environment, Topology};
use gridlife_types::{AgentId, AgentType, Location};

use crate::error::WorldError;
use crate::topology::GridTopology;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cell {
    agent: Option<AgentId>,
    food: Option<u32>,
    obstacle: bool,
}

/// A bounded (or wrapping) grid world.
#[derive(Debug, Clone)]
pub struct GridEnvironment {
    topology: GridTopology,
    cells: Vec<Cell>,
    params: BTreeMap<AgentType, Arc<AgentParams>>,
}

impl GridEnvironment {
    /// Create an empty world over `topology`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::GridTooLarge`] if the cell count cannot be
    /// addressed.
    pub fn new(topology: GridTopology) -> Result<Self, WorldError> {
        let count = topology.cell_count().ok_or(WorldError::GridTooLarge {
            width: topology.width(),
            height: topology.height(),
            depth: topology.depth(),
        })?;
        Ok(Self {
            topology,
            cells: vec![Cell::default(); count],
            params: BTreeMap::new(),
        })
    }

    /// The grid geometry.
    pub const fn grid(&self) -> &GridTopology {
        &self.topology
    }

    /// Whether `location` lies on the grid.
    pub const fn contains(&self, location: Location) -> bool {
        self.topology.contains(location)
    }

    /// Register the default parameters for `agent_type`, returning the
    /// shared handle agents of that type will hold.
    pub fn set_agent_params(&mut self, agent_type: AgentType, params: AgentParams) -> Arc<AgentParams> {
        let shared = Arc::new(params);
        self.params.insert(agent_type, Arc::clone(&shared));
        shared
    }

    /// Every agent type with registered parameters.
    pub fn agent_types(&self) -> impl Iterator<Item = AgentType> + '_ {
        self.params.keys().copied()
    }

    /// Put `value` worth of food at `location`, replacing any already there.
    ///
    /// # Errors
    ///
    /// Fails if the location is off the grid or an obstacle.
    pub fn place_food(&mut self, location: Location, value: u32) -> Result<(), WorldError> {
        let cell = self.cell_mut(location)?;
        if cell.obstacle {
            return Err(WorldError::CellObstructed(location));
        }
        cell.food = Some(value);
        Ok(())
    }

    /// Turn `location` into impassable terrain, destroying any food there.
    ///
    /// # Errors
    ///
    /// Fails if the location is off the grid or holds an agent.
    pub fn place_obstacle(&mut self, location: Location) -> Result<(), WorldError> {
        let cell = self.cell_mut(location)?;
        if cell.agent.is_some() {
            return Err(WorldError::CellOccupied(location));
        }
        cell.obstacle = true;
        cell.food = None;
        Ok(())
    }

    /// Check that an agent could be placed at `location`.
    ///
    /// # Errors
    ///
    /// Fails if the location is off the grid, occupied or an obstacle.
    pub fn check_vacant(&self, location: Location) -> Result<(), WorldError> {
        let cell = self.cell(location).ok_or(WorldError::OutOfBounds(location))?;
        if cell.agent.is_some() {
            return Err(WorldError::CellOccupied(location));
        }
        if cell.obstacle {
            return Err(WorldError::CellObstructed(location));
        }
        Ok(())
    }

    /// Cells with neither an agent nor an obstacle, in index order.
    pub fn free_cells(&self) -> Vec<Location> {
        self.iter_cells()
            .filter(|(_, cell)| cell.agent.is_none() && !cell.obstacle)
            .map(|(location, _)| location)
            .collect()
    }

    /// Number of cells holding an agent.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.agent.is_some()).count()
    }

    /// Number of cells holding food.
    pub fn food_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.food.is_some()).count()
    }

    /// Sum of all food values on the grid.
    pub fn total_food(&self) -> u64 {
        self.cells
            .iter()
            .filter_map(|cell| cell.food)
            .fold(0_u64, |acc, food| acc.saturating_add(u64::from(food)))
    }

    /// Every occupied cell and its agent, in index order.
    pub fn occupants(&self) -> Vec<(Location, AgentId)> {
        self.iter_cells()
            .filter_map(|(location, cell)| cell.agent.map(|id| (location, id)))
            .collect()
    }

    fn iter_cells(&self) -> impl Iterator<Item = (Location, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| self.topology.location_at(index).map(|loc| (loc, cell)))
    }

    fn cell(&self, location: Location) -> Option<&Cell> {
        self.topology
            .index(location)
            .and_then(|index| self.cells.get(index))
    }

    fn cell_mut(&mut self, location: Location) -> Result<&mut Cell, WorldError> {
        self.topology
            .index(location)
            .and_then(|index| self.cells.get_mut(index))
            .ok_or(WorldError::OutOfBounds(location))
    }
}

impl Environment for GridEnvironment {
    fn topology(&self) -> &dyn Topology {
        &self.topology
    }

    fn has_agent(&self, location: Location) -> bool {
        self.agent_at(location).is_some()
    }

    fn agent_at(&self, location: Location) -> Option<AgentId> {
        self.cell(location).and_then(|cell| cell.agent)
    }

    fn set_agent(&mut self, location: Location, agent: Option<AgentId>) {
        match self.cell_mut(location) {
            Ok(cell) => cell.agent = agent,
            Err(error) => tracing::warn!(%error, ?agent, "ignored occupancy write"),
        }
    }

    fn is_obstacle(&self, location: Location) -> bool {
        self.cell(location).is_some_and(|cell| cell.obstacle)
    }

    fn food_at(&self, location: Location) -> Option<u32> {
        self.cell(location).and_then(|cell| cell.food)
    }

    fn remove_food(&mut self, location: Location) {
        if let Ok(cell) = self.cell_mut(location) {
            cell.food = None;
        }
    }

    fn agent_params(&self, agent_type: AgentType) -> Option<Arc<AgentParams>> {
        self.params.get(&agent_type).cloned()
    }
}
